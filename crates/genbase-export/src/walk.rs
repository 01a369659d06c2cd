//! Depth-first traversal of [`Node`] trees.

use std::ops::ControlFlow;

use crate::node::Node;

/// Calls `callback` on `node`, then on every nested node (sequence elements
/// and mapping values, in order).
pub fn walk<F>(node: &Node, callback: &mut F)
where
    F: FnMut(&Node),
{
    callback(node);
    match node {
        Node::Seq(items) => {
            for item in items {
                walk(item, callback);
            }
        }
        Node::Map(entries) => {
            for value in entries.values() {
                walk(value, callback);
            }
        }
        _ => {}
    }
}

/// Like [`walk`], also passing the path of each node (mapping keys and
/// sequence indices). Stops at the first `Break`.
pub fn walk_with_path<B, F>(node: &Node, callback: &mut F) -> ControlFlow<B>
where
    F: FnMut(&[String], &Node) -> ControlFlow<B>,
{
    let mut path = Vec::new();
    walk_path_inner(node, &mut path, callback)
}

fn walk_path_inner<B, F>(node: &Node, path: &mut Vec<String>, callback: &mut F) -> ControlFlow<B>
where
    F: FnMut(&[String], &Node) -> ControlFlow<B>,
{
    callback(path.as_slice(), node)?;
    match node {
        Node::Seq(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(index.to_string());
                let flow = walk_path_inner(item, path, callback);
                path.pop();
                flow?;
            }
        }
        Node::Map(entries) => {
            for (key, value) in entries {
                path.push(key.clone());
                let flow = walk_path_inner(value, path, callback);
                path.pop();
                flow?;
            }
        }
        _ => {}
    }
    ControlFlow::Continue(())
}

/// Escapes one RFC 6901 pointer component.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Formats path components as an RFC 6901 pointer (`""` for the root).
pub fn format_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}
