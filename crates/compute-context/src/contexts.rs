// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Built-in context payloads used by node-tree evaluation.
//!
//! Every payload mixes its fields in declaration order after the static type
//! label (mixed by [`ComputeContext::new`](crate::ComputeContext::new)).
//! Display-only fields, such as a group's name, are never mixed in: renaming a
//! group must not change which logged values belong to it.
//!
//! Changing a mixed field or its order changes every downstream identity.
use std::fmt::{self, Write};

use crate::{ComputeContextHash, ContextPayload};

/// Free-form labelled frame, typically the root of an evaluation (`"scene"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedContext {
    label: String,
}

impl NamedContext {
    /// Static type label.
    pub const STATIC_TYPE: &'static str = "NAMED";

    /// Creates a frame labelled `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The label (mixed into the identity).
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl ContextPayload for NamedContext {
    fn static_type(&self) -> &'static str {
        Self::STATIC_TYPE
    }

    fn mix_into(&self, hash: &mut ComputeContextHash) {
        hash.mix_in_str(&self.label);
    }

    fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        out.write_str(&self.label)
    }
}

/// Evaluation of a modifier on an object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModifierContext {
    name: String,
}

impl ModifierContext {
    /// Static type label.
    pub const STATIC_TYPE: &'static str = "MODIFIER";

    /// Creates the context of the modifier called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Modifier name (mixed into the identity).
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ContextPayload for ModifierContext {
    fn static_type(&self) -> &'static str {
        Self::STATIC_TYPE
    }

    fn mix_into(&self, hash: &mut ComputeContextHash) {
        hash.mix_in_str(&self.name);
    }

    fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        write!(out, "Modifier: {}", self.name)
    }
}

/// Evaluation of a node group through one of its group nodes.
///
/// The same group used by several group nodes, or instanced several times
/// by one node, yields distinct identities through `node_id` and `instance`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupNodeContext {
    node_id: i32,
    instance: u32,
    group_name: Option<String>,
}

impl GroupNodeContext {
    /// Static type label.
    pub const STATIC_TYPE: &'static str = "NODE_GROUP";

    /// Context of group node `node_id`, instance `instance`.
    pub fn new(node_id: i32, instance: u32) -> Self {
        Self {
            node_id,
            instance,
            group_name: None,
        }
    }

    /// Like [`new`](Self::new), with a group name for diagnostics.
    pub fn named(node_id: i32, instance: u32, group_name: impl Into<String>) -> Self {
        Self {
            node_id,
            instance,
            group_name: Some(group_name.into()),
        }
    }

    /// Identifier of the group node in its tree.
    pub fn node_id(&self) -> i32 {
        self.node_id
    }

    /// Instance index of the group evaluation.
    pub fn instance(&self) -> u32 {
        self.instance
    }

    /// Name of the evaluated group, if known. Display only.
    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }
}

impl ContextPayload for GroupNodeContext {
    fn static_type(&self) -> &'static str {
        Self::STATIC_TYPE
    }

    fn mix_into(&self, hash: &mut ComputeContextHash) {
        hash.mix_in_i32(self.node_id);
        hash.mix_in_u32(self.instance);
    }

    fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        match &self.group_name {
            Some(name) => write!(out, "Node group '{name}'")?,
            None => out.write_str("Node group")?,
        }
        write!(out, ", node {}, instance {}", self.node_id, self.instance)
    }
}

/// Body of a simulation zone, identified by its output node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SimulationZoneContext {
    output_node_id: i32,
}

impl SimulationZoneContext {
    /// Static type label.
    pub const STATIC_TYPE: &'static str = "SIMULATION_ZONE";

    /// Context of the simulation zone closed by `output_node_id`.
    pub fn new(output_node_id: i32) -> Self {
        Self { output_node_id }
    }

    /// Identifier of the zone's output node.
    pub fn output_node_id(&self) -> i32 {
        self.output_node_id
    }
}

impl ContextPayload for SimulationZoneContext {
    fn static_type(&self) -> &'static str {
        Self::STATIC_TYPE
    }

    fn mix_into(&self, hash: &mut ComputeContextHash) {
        hash.mix_in_i32(self.output_node_id);
    }

    fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        write!(out, "Simulation Zone ID: {}", self.output_node_id)
    }
}

/// One iteration of a repeat zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RepeatZoneContext {
    output_node_id: i32,
    iteration: u32,
}

impl RepeatZoneContext {
    /// Static type label.
    pub const STATIC_TYPE: &'static str = "REPEAT_ZONE";

    /// Context of `iteration` in the repeat zone closed by `output_node_id`.
    pub fn new(output_node_id: i32, iteration: u32) -> Self {
        Self {
            output_node_id,
            iteration,
        }
    }

    /// Identifier of the zone's output node.
    pub fn output_node_id(&self) -> i32 {
        self.output_node_id
    }

    /// Zero-based iteration index.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }
}

impl ContextPayload for RepeatZoneContext {
    fn static_type(&self) -> &'static str {
        Self::STATIC_TYPE
    }

    fn mix_into(&self, hash: &mut ComputeContextHash) {
        hash.mix_in_i32(self.output_node_id);
        hash.mix_in_u32(self.iteration);
    }

    fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        write!(
            out,
            "Repeat Zone ID: {}, iteration: {}",
            self.output_node_id, self.iteration
        )
    }
}

/// Evaluation of a for-each-element zone for one element index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ForeachElementZoneContext {
    output_node_id: i32,
    index: u32,
}

impl ForeachElementZoneContext {
    /// Static type label.
    pub const STATIC_TYPE: &'static str = "FOREACH_GEOMETRY_ELEMENT_ZONE";

    /// Context of element `index` in the zone closed by `output_node_id`.
    pub fn new(output_node_id: i32, index: u32) -> Self {
        Self {
            output_node_id,
            index,
        }
    }

    /// Identifier of the zone's output node.
    pub fn output_node_id(&self) -> i32 {
        self.output_node_id
    }

    /// Element index.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl ContextPayload for ForeachElementZoneContext {
    fn static_type(&self) -> &'static str {
        Self::STATIC_TYPE
    }

    fn mix_into(&self, hash: &mut ComputeContextHash) {
        hash.mix_in_i32(self.output_node_id);
        hash.mix_in_u32(self.index);
    }

    fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        write!(
            out,
            "Foreach Zone ID: {}, index: {}",
            self.output_node_id, self.index
        )
    }
}

/// Root of an operator invocation. Carries no data besides its type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OperatorContext;

impl OperatorContext {
    /// Static type label.
    pub const STATIC_TYPE: &'static str = "OPERATOR";
}

impl ContextPayload for OperatorContext {
    fn static_type(&self) -> &'static str {
        Self::STATIC_TYPE
    }

    fn mix_into(&self, _hash: &mut ComputeContextHash) {}

    fn fmt_in_line(&self, out: &mut dyn Write) -> fmt::Result {
        out.write_str("Operator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComputeContext;

    fn line(payload: &dyn ContextPayload) -> String {
        let mut out = String::new();
        payload.fmt_in_line(&mut out).unwrap();
        out
    }

    #[test]
    fn renders_in_line() {
        assert_eq!(line(&NamedContext::new("scene")), "scene");
        assert_eq!(line(&ModifierContext::new("GeoNodes")), "Modifier: GeoNodes");
        assert_eq!(
            line(&GroupNodeContext::named(3, 1, "Foo")),
            "Node group 'Foo', node 3, instance 1"
        );
        assert_eq!(
            line(&GroupNodeContext::new(3, 1)),
            "Node group, node 3, instance 1"
        );
        assert_eq!(
            line(&SimulationZoneContext::new(8)),
            "Simulation Zone ID: 8"
        );
        assert_eq!(
            line(&RepeatZoneContext::new(2, 5)),
            "Repeat Zone ID: 2, iteration: 5"
        );
        assert_eq!(
            line(&ForeachElementZoneContext::new(2, 5)),
            "Foreach Zone ID: 2, index: 5"
        );
        assert_eq!(line(&OperatorContext), "Operator");
    }

    #[test]
    fn group_name_is_display_only() {
        let root = ComputeContext::root(ModifierContext::new("GeoNodes"));
        let plain = ComputeContext::child(&root, GroupNodeContext::new(3, 0));
        let named = ComputeContext::child(&root, GroupNodeContext::named(3, 0, "Foo"));
        assert_eq!(plain.hash(), named.hash());
    }

    #[test]
    fn static_type_separates_identical_fields() {
        // Same (i32, u32) bytes, different variants.
        let root = ComputeContext::root(OperatorContext);
        let repeat = ComputeContext::child(&root, RepeatZoneContext::new(4, 1));
        let foreach = ComputeContext::child(&root, ForeachElementZoneContext::new(4, 1));
        let group = ComputeContext::child(&root, GroupNodeContext::new(4, 1));
        assert_ne!(repeat.hash(), foreach.hash());
        assert_ne!(repeat.hash(), group.hash());
        assert_ne!(foreach.hash(), group.hash());
    }

    #[test]
    fn operator_root_hashes_only_its_type() {
        let op = ComputeContext::root(OperatorContext);
        let expected = ComputeContextHash::ZERO.mixed(OperatorContext::STATIC_TYPE.as_bytes());
        assert_eq!(op.hash(), expected);
    }
}
