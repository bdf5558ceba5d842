//! Helpers for reading values off KDL nodes and building nodes back up.

use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};

pub(crate) fn first_arg(node: &KdlNode) -> Option<&KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
}

pub(crate) fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    first_arg(node)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

pub(crate) fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

/// The first argument as a string, or a parse error naming `field`.
pub(crate) fn require_string(node: &KdlNode, field: &str) -> ConfigResult<String> {
    match first_arg(node) {
        Some(value) => value
            .as_string()
            .map(|s| s.to_string())
            .ok_or_else(|| ConfigError::malformed(field, format!("expected a string, got {:?}", value))),
        None => Err(ConfigError::malformed(field, "missing value")),
    }
}

pub(crate) fn children(node: &KdlNode) -> &[KdlNode] {
    node.children().map(|c| c.nodes()).unwrap_or(&[])
}

/// Store `value` into an unset slot, rejecting repeated keys.
pub(crate) fn set_once<T>(slot: &mut Option<T>, value: T, field: &str) -> ConfigResult<()> {
    if slot.is_some() {
        return Err(ConfigError::Duplicate(field.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

pub(crate) fn leaf(name: &str, value: impl Into<KdlValue>) -> KdlNode {
    let mut node = KdlNode::new(name);
    node.entries_mut().push(KdlEntry::new(value));
    node
}

pub(crate) fn block(name: &str, nodes: Vec<KdlNode>) -> KdlNode {
    let mut node = KdlNode::new(name);
    let mut doc = KdlDocument::new();
    doc.nodes_mut().extend(nodes);
    node.set_children(doc);
    node
}
