// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Human-readable rendering of context stacks.
//!
//! Output is for diagnostics only. Nothing in the crate parses it back, and
//! identity never depends on it.
use std::fmt::{self, Write};

use crate::{ComputeContextHash, ContextPayload};

/// Order in which [`print_stack`](crate::ComputeContext::print_stack) emits frames.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StackOrder {
    /// Outermost (root) context first, innermost last.
    #[default]
    RootFirst,
    /// Innermost context first, root last.
    InnermostFirst,
}

/// Rendering options for context stacks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintOptions {
    /// Frame order.
    pub order: StackOrder,
    /// Append `(hash: ...)` to every frame.
    pub show_hash: bool,
    /// Emit the `Context Stack: <label>` header line.
    pub header: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            order: StackOrder::RootFirst,
            show_hash: true,
            header: true,
        }
    }
}

/// Text written in place of a payload whose `fmt_in_line` fails.
pub const UNPRINTABLE: &str = "<unprintable>";

/// One rendered line of a stack: the payload and the identity at that depth.
pub(crate) struct Frame<'a> {
    pub(crate) payload: &'a dyn ContextPayload,
    pub(crate) hash: ComputeContextHash,
}

/// Writes `frames` (given innermost first) using `options`.
///
/// Only errors from `out` are returned; payload rendering failures are
/// replaced by [`UNPRINTABLE`].
pub(crate) fn write_stack<'a>(
    out: &mut dyn Write,
    label: &str,
    frames: impl DoubleEndedIterator<Item = Frame<'a>>,
    options: &PrintOptions,
) -> fmt::Result {
    out.write_str(&render_stack(label, frames, options))
}

/// Renders `frames` (given innermost first) into a new `String`.
pub(crate) fn render_stack<'a>(
    label: &str,
    frames: impl DoubleEndedIterator<Item = Frame<'a>>,
    options: &PrintOptions,
) -> String {
    let mut text = String::new();
    if options.header {
        text.push_str("Context Stack: ");
        text.push_str(label);
        text.push('\n');
    }
    match options.order {
        StackOrder::RootFirst => {
            for frame in frames.rev() {
                push_frame(&mut text, &frame, options);
            }
        }
        StackOrder::InnermostFirst => {
            for frame in frames {
                push_frame(&mut text, &frame, options);
            }
        }
    }
    text
}

fn push_frame(text: &mut String, frame: &Frame<'_>, options: &PrintOptions) {
    let mut line = String::new();
    if frame.payload.fmt_in_line(&mut line).is_err() {
        line.clear();
        line.push_str(UNPRINTABLE);
    }
    text.push_str("-> ");
    text.push_str(&line);
    if options.show_hash {
        text.push_str(" \t(hash: ");
        text.push_str(&frame.hash.to_string());
        text.push(')');
    }
    text.push('\n');
}
