// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Owning store of compute contexts addressed by compact handles.
//!
//! [`ComputeContext`](crate::ComputeContext) borrows its parent, which fits an
//! evaluation that nests contexts on the call stack. Code that builds contexts
//! outside such a stack (UI inspection, deferred evaluation, caches that
//! outlive one evaluation) stores them here instead. Parents are referenced by
//! [`ContextId`], so a dangling parent cannot be expressed.
//!
//! Contexts are deduplicated by identity: adding a context whose hash is
//! already present returns the existing handle.
use std::fmt::{self, Write};

use tracing::trace;

use crate::print::{render_stack, write_stack, Frame};
use crate::{
    derive_hash, ComputeContextHash, ContextError, ContextHashMap, ContextPayload, PrintOptions,
};

/// Handle of a context stored in a [`ContextArena`].
///
/// Only meaningful for the arena that issued it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ContextId(usize);

impl ContextId {
    /// Position of the context in its arena (insertion order).
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Node {
    parent: Option<ContextId>,
    hash: ComputeContextHash,
    payload: Box<dyn ContextPayload>,
}

/// Append-only, deduplicating store of compute contexts.
///
/// # Invariants
/// - A context's parent always has a smaller [`ContextId::index`].
/// - At most one context per identity.
/// - Stored contexts are never mutated or removed (only [`clear`](Self::clear)
///   drops them all, invalidating every handle).
#[derive(Default)]
pub struct ContextArena {
    nodes: Vec<Node>,
    by_hash: ContextHashMap<ContextId>,
}

impl ContextArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored contexts.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds (or finds) a root context.
    pub fn add_root<P: ContextPayload>(&mut self, payload: P) -> ContextId {
        let hash = derive_hash(ComputeContextHash::ZERO, &payload);
        self.insert(None, hash, Box::new(payload))
    }

    /// Adds (or finds) a context nested in `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::UnknownContext`] if `parent` was not issued by
    /// this arena (or was issued before a [`clear`](Self::clear)).
    pub fn add_child<P: ContextPayload>(
        &mut self,
        parent: ContextId,
        payload: P,
    ) -> Result<ContextId, ContextError> {
        let parent_hash = self
            .nodes
            .get(parent.0)
            .map(|node| node.hash)
            .ok_or(ContextError::UnknownContext(parent))?;
        let hash = derive_hash(parent_hash, &payload);
        Ok(self.insert(Some(parent), hash, Box::new(payload)))
    }

    fn insert(
        &mut self,
        parent: Option<ContextId>,
        hash: ComputeContextHash,
        payload: Box<dyn ContextPayload>,
    ) -> ContextId {
        if let Some(&existing) = self.by_hash.get(&hash) {
            trace!(%hash, id = %existing, "context already present");
            return existing;
        }
        let id = ContextId(self.nodes.len());
        trace!(
            %hash,
            %id,
            static_type = payload.static_type(),
            "context added"
        );
        self.nodes.push(Node {
            parent,
            hash,
            payload,
        });
        self.by_hash.insert(hash, id);
        id
    }

    /// Looks up a stored context.
    pub fn get(&self, id: ContextId) -> Option<ArenaContext<'_>> {
        self.nodes.get(id.0).map(|node| ArenaContext { arena: self, node })
    }

    /// Identity of a stored context.
    pub fn hash(&self, id: ContextId) -> Option<ComputeContextHash> {
        self.nodes.get(id.0).map(|node| node.hash)
    }

    /// Handle of the context with identity `hash`, if stored.
    pub fn find(&self, hash: &ComputeContextHash) -> Option<ContextId> {
        self.by_hash.get(hash).copied()
    }

    /// Drops every context. Previously issued handles become unknown.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.by_hash.clear();
    }
}

impl fmt::Debug for ContextArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextArena")
            .field("len", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

/// Borrowed view of a context stored in a [`ContextArena`].
#[derive(Clone, Copy)]
pub struct ArenaContext<'a> {
    arena: &'a ContextArena,
    node: &'a Node,
}

impl<'a> ArenaContext<'a> {
    /// Identity of this context and all its ancestors.
    pub fn hash(&self) -> ComputeContextHash {
        self.node.hash
    }

    /// Handle of the enclosing context.
    pub fn parent_id(&self) -> Option<ContextId> {
        self.node.parent
    }

    /// Enclosing context, or `None` for a root.
    pub fn parent(&self) -> Option<ArenaContext<'a>> {
        self.node.parent.and_then(|id| self.arena.get(id))
    }

    /// Variant-specific data.
    pub fn payload(&self) -> &'a dyn ContextPayload {
        &*self.node.payload
    }

    /// Variant label, for diagnostics only.
    pub fn static_type(&self) -> &'static str {
        self.node.payload.static_type()
    }

    /// Iterates the enclosing contexts from the direct parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = ArenaContext<'a>> {
        std::iter::successors(self.parent(), ArenaContext::parent)
    }

    /// Number of enclosing contexts (zero for a root).
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Writes a single-line description of this context only.
    pub fn print_current_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        self.node.payload.fmt_in_line(out)
    }

    /// Writes the entire nested stack, root first. Same format as
    /// [`ComputeContext::print_stack`](crate::ComputeContext::print_stack).
    pub fn print_stack(&self, out: &mut dyn Write, label: &str) -> fmt::Result {
        self.print_stack_with(out, label, &PrintOptions::default())
    }

    /// [`print_stack`](Self::print_stack) with explicit rendering options.
    pub fn print_stack_with(
        &self,
        out: &mut dyn Write,
        label: &str,
        options: &PrintOptions,
    ) -> fmt::Result {
        write_stack(out, label, self.frames().into_iter(), options)
    }

    /// Renders [`print_stack`](Self::print_stack) into a `String`.
    pub fn stack_string(&self, label: &str) -> String {
        render_stack(label, self.frames().into_iter(), &PrintOptions::default())
    }

    fn frames(&self) -> Vec<Frame<'a>> {
        std::iter::once(*self)
            .chain(self.ancestors())
            .map(|ctx| Frame {
                payload: ctx.payload(),
                hash: ctx.hash(),
            })
            .collect()
    }
}

impl fmt::Debug for ArenaContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaContext")
            .field("static_type", &self.static_type())
            .field("hash", &self.hash())
            .field("parent", &self.node.parent)
            .finish()
    }
}
