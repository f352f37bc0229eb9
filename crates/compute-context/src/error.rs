// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types.

use crate::ContextId;

/// Errors raised by [`ContextArena`](crate::ContextArena).
///
/// Plain [`ComputeContext`](crate::ComputeContext) construction is total and
/// never produces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The handle does not name a context stored in this arena.
    #[error("[CTX_UNKNOWN_CONTEXT] no context {0} in this arena")]
    UnknownContext(ContextId),
}
