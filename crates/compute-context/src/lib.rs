// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! compute-context: fixed-size identities for nested computation sites.
//!
//! When a value is logged during an evaluation we want to know where it was
//! computed. A pointer to the producing node is not enough: the same node
//! produces different values when its group is used several times, inside
//! different zone iterations, under different modifiers. The whole nesting
//! path is the address.
//!
//! Storing that path next to every value would be expensive and awkward to
//! compare, so:
//! - every path is summarized by a 128-bit [`ComputeContextHash`], and
//! - paths are built as parent-linked [`ComputeContext`]s, each computing its
//!   hash once from its parent's hash and its own [`ContextPayload`].
//!
//! Links only point upward. A parent is shared by any number of children,
//! possibly on different threads, and is never mutated.
//!
//! ```
//! use compute_context::{ComputeContext, GroupNodeContext, NamedContext};
//!
//! let scene = ComputeContext::root(NamedContext::new("scene"));
//! let a = ComputeContext::child(&scene, GroupNodeContext::named(1, 0, "Foo"));
//! let b = ComputeContext::child(&scene, GroupNodeContext::named(1, 1, "Foo"));
//! assert_ne!(a.hash(), b.hash());
//!
//! let again = ComputeContext::child(&scene, GroupNodeContext::named(1, 0, "Foo"));
//! assert_eq!(a.hash(), again.hash());
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::use_self
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod arena;
mod context;
/// Built-in context payloads.
pub mod contexts;
mod error;
mod hash;
mod log;
mod map;
mod print;

pub use arena::{ArenaContext, ContextArena, ContextId};
pub use context::{derive_hash, Ancestors, AsContextPayload, ComputeContext, ContextPayload};
pub use contexts::{
    ForeachElementZoneContext, GroupNodeContext, ModifierContext, NamedContext, OperatorContext,
    RepeatZoneContext, SimulationZoneContext,
};
pub use error::ContextError;
pub use hash::ComputeContextHash;
pub use log::{ContextRegistry, ContextValueLog};
pub use map::{BuildContextHasher, ContextHashMap, ContextHashSet};
pub use print::{PrintOptions, StackOrder, UNPRINTABLE};
