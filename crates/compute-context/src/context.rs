// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Parent-linked compute contexts.
//!
//! A [`ComputeContext`] identifies the place where a value was computed: which
//! node, inside which node group, inside which zone iteration, and so on. The
//! nesting is a singly linked list that only points upward. A parent never
//! learns about its children, because the same parent is shared by many
//! children that may be evaluated on different threads.
//!
//! The parent link is a plain shared borrow. A child therefore cannot outlive
//! the frame that owns its parent, which is exactly the scope nesting of an
//! evaluation (a node's frame lives inside its group's frame). Callers whose
//! nesting is not a call stack use [`ContextArena`](crate::ContextArena).
use std::fmt::{self, Write};

use crate::print::{render_stack, write_stack, Frame};
use crate::{ComputeContextHash, PrintOptions};

/// Variant-specific data of a compute context.
///
/// This is the single extension point of the crate. Each implementation
/// supplies:
/// - a static type label (diagnostics, and a domain separator for hashing),
/// - the discriminating data mixed into the identity,
/// - a one-line human-readable rendering.
///
/// `mix_into` must be a pure function of `self`: two payloads that compare
/// equal in meaning must mix identical bytes, otherwise identities stop being
/// reproducible between runs.
///
/// Payloads must be `'static`: parents are stored as `&dyn ContextPayload`
/// and the arena keeps them as `Box<dyn ContextPayload>`. Copy borrowed
/// evaluator data (such as a group name) into an owned field.
///
/// ```compile_fail
/// use std::fmt::{self, Write};
/// use compute_context::{ComputeContextHash, ContextPayload};
///
/// struct Borrowed<'a>(&'a str);
///
/// impl<'a> ContextPayload for Borrowed<'a> {
///     fn static_type(&self) -> &'static str {
///         "BORROWED"
///     }
///     fn mix_into(&self, hash: &mut ComputeContextHash) {
///         hash.mix_in_str(self.0);
///     }
///     fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result {
///         out.write_str(self.0)
///     }
/// }
/// ```
pub trait ContextPayload: AsContextPayload + Send + Sync + 'static {
    /// Short label naming the variant (e.g. `"NODE_GROUP"`).
    fn static_type(&self) -> &'static str;

    /// Mixes the discriminating fields into `hash`, in a fixed order.
    fn mix_into(&self, hash: &mut ComputeContextHash);

    /// Writes a single-line description of this payload (no trailing newline).
    fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result;
}

/// Upcast helper so generic code can view any payload as `&dyn ContextPayload`.
///
/// Implemented for every sized [`ContextPayload`]; there is no reason to
/// implement it by hand.
pub trait AsContextPayload {
    /// Returns `self` as a trait object.
    fn as_payload(&self) -> &dyn ContextPayload;
}

impl<T: ContextPayload> AsContextPayload for T {
    fn as_payload(&self) -> &dyn ContextPayload {
        self
    }
}

/// Identity of a context with `payload` nested under `parent`.
///
/// Pass [`ComputeContextHash::ZERO`] for a root. Mixing order is the static
/// type label first, then whatever [`ContextPayload::mix_into`] adds. This lets
/// callers compute the identity of a context without building it, e.g. to probe
/// a value log.
pub fn derive_hash(
    parent: ComputeContextHash,
    payload: &dyn ContextPayload,
) -> ComputeContextHash {
    let mut hash = parent;
    hash.mix_in_str(payload.static_type());
    payload.mix_into(&mut hash);
    hash
}

/// One link in a compute-context chain.
///
/// `P` is the concrete payload while the context is being built; parents are
/// always stored type-erased as `&ComputeContext<'p>` (i.e. `P = dyn
/// ContextPayload`), so chains can mix variants freely.
///
/// # Invariants
/// - The identity is computed once in [`new`](Self::new) and never changes.
/// - Identity = `parent.hash()` (or zero for a root), then the static type
///   label, then the payload's own fields, each mixed in that order.
/// - Nothing is mutated after construction, so a context can be shared across
///   threads whenever its payload can.
pub struct ComputeContext<'p, P: ContextPayload + ?Sized = dyn ContextPayload> {
    parent: Option<&'p ComputeContext<'p>>,
    hash: ComputeContextHash,
    payload: P,
}

impl<'p, P: ContextPayload> ComputeContext<'p, P> {
    /// Builds a context below `parent` (or a root when `parent` is `None`).
    pub fn new(parent: Option<&'p ComputeContext<'p>>, payload: P) -> Self {
        let start = parent.map_or(ComputeContextHash::ZERO, |p| p.hash());
        let hash = derive_hash(start, &payload);
        Self {
            parent,
            hash,
            payload,
        }
    }

    /// Builds a root context.
    pub fn root(payload: P) -> Self {
        Self::new(None, payload)
    }

    /// Builds a context nested in `parent`.
    pub fn child(parent: &'p ComputeContext<'p>, payload: P) -> Self {
        Self::new(Some(parent), payload)
    }

    /// Type-erased view, suitable as a parent for further nesting.
    pub fn as_dyn(&self) -> &ComputeContext<'p> {
        self
    }
}

impl<'p, P: ContextPayload + ?Sized> ComputeContext<'p, P> {
    /// Identity of this context and all its ancestors.
    pub fn hash(&self) -> ComputeContextHash {
        self.hash
    }

    /// Enclosing context, or `None` for a root.
    pub fn parent(&self) -> Option<&'p ComputeContext<'p>> {
        self.parent
    }

    /// Returns `true` when this context has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Variant-specific data.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Variant label, for diagnostics only.
    pub fn static_type(&self) -> &'static str {
        self.payload.static_type()
    }

    /// Iterates the enclosing contexts from the direct parent up to the root.
    pub fn ancestors(&self) -> Ancestors<'p> {
        Ancestors { next: self.parent }
    }

    /// Number of enclosing contexts (zero for a root).
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Outermost context of the chain, or `None` if `self` is the root.
    pub fn root_ancestor(&self) -> Option<&'p ComputeContext<'p>> {
        self.ancestors().last()
    }

    /// Writes a single-line description of this context only.
    pub fn print_current_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        self.payload.fmt_in_line(out)
    }

    /// Writes the entire nested stack, root first, preceded by a
    /// `Context Stack: <label>` header.
    ///
    /// Each frame renders as `-> <in-line description> \t(hash: <hex>)`.
    pub fn print_stack(&self, out: &mut dyn Write, label: &str) -> fmt::Result {
        self.print_stack_with(out, label, &PrintOptions::default())
    }

    /// [`print_stack`](Self::print_stack) with explicit rendering options.
    ///
    /// A payload whose `fmt_in_line` fails is shown as
    /// [`UNPRINTABLE`](crate::UNPRINTABLE); only errors from `out` are returned.
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

    fn frames(&self) -> Vec<Frame<'_>> {
        let own = Frame {
            payload: self.payload.as_payload(),
            hash: self.hash,
        };
        std::iter::once(own)
            .chain(self.ancestors().map(|ctx| Frame {
                payload: &ctx.payload,
                hash: ctx.hash,
            }))
            .collect()
    }

    /// Emits the stack as a `tracing` debug event.
    pub fn trace_stack(&self, label: &str) {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                static_type = self.static_type(),
                hash = %self.hash,
                depth = self.depth(),
                "{}",
                self.stack_string(label)
            );
        }
    }
}

impl<P: ContextPayload + ?Sized> fmt::Display for ComputeContext<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_stack(f, "")
    }
}

impl<P: ContextPayload + ?Sized> fmt::Debug for ComputeContext<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputeContext")
            .field("static_type", &self.static_type())
            .field("hash", &self.hash)
            .field("depth", &self.depth())
            .finish()
    }
}

/// Iterator over the enclosing contexts of a [`ComputeContext`], innermost first.
#[derive(Clone)]
pub struct Ancestors<'p> {
    next: Option<&'p ComputeContext<'p>>,
}

impl<'p> Iterator for Ancestors<'p> {
    type Item = &'p ComputeContext<'p>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent;
        Some(current)
    }
}

impl std::iter::FusedIterator for Ancestors<'_> {}
