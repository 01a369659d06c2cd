//! JSON and YAML emission of [`Node`] trees.
//!
//! Every emitter first checks the tree for [`Node::Opaque`] leaves and
//! reports the first one with its pointer, so callers see which value
//! could not be encoded instead of a bare encoder message.

use std::ops::ControlFlow;

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::node::Node;
use crate::walk::{format_pointer, walk_with_path};

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("unserializable value of type `{type_name}` at `{pointer}`")]
    Unserializable { type_name: String, pointer: String },
    #[error("json emission failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml emission failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Fails on the first opaque leaf, in depth-first order.
pub fn check_emittable(node: &Node) -> Result<(), EmitError> {
    let found = walk_with_path(node, &mut |path, n| match n {
        Node::Opaque(type_name) => ControlFlow::Break(EmitError::Unserializable {
            type_name: type_name.clone(),
            pointer: format_pointer(path),
        }),
        _ => ControlFlow::Continue(()),
    });
    match found {
        ControlFlow::Break(err) => Err(err),
        ControlFlow::Continue(()) => Ok(()),
    }
}

pub fn to_json(node: &Node) -> Result<String, EmitError> {
    check_emittable(node)?;
    Ok(serde_json::to_string(node)?)
}

/// Two-space indented JSON.
pub fn to_json_pretty(node: &Node) -> Result<String, EmitError> {
    check_emittable(node)?;
    Ok(serde_json::to_string_pretty(node)?)
}

pub fn to_json_value(node: &Node) -> Result<JsonValue, EmitError> {
    check_emittable(node)?;
    Ok(serde_json::to_value(node)?)
}

pub fn to_yaml(node: &Node) -> Result<String, EmitError> {
    check_emittable(node)?;
    Ok(serde_yaml::to_string(node)?)
}
