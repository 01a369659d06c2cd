//! Recursive, type-directed serializer.
//!
//! Dispatch order per value:
//! 1. recognized domain containers get their own flattening rule;
//! 2. objects become `__class__`-tagged attribute mappings;
//! 3. everything else goes through safe-export (platform numbers to plain
//!    numbers, arrays to nested sequences, sets to sequences, containers
//!    element-wise).
//!
//! Objects currently being expanded are tracked by identity; meeting one
//! again yields a `{"__cycle__": true}` placeholder instead of recursing.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use crate::domain::{Environment, Instance, InstanceId, InstanceProvider, LabelProvider};
use crate::node::{Node, CLASS_KEY, CYCLE_KEY, TRUNCATED_KEY};
use crate::object::Object;
use crate::options::ExportOptions;
use crate::value::Value;

/// Serializes `value` with default options.
pub fn serialize(value: &Value) -> Node {
    serialize_with(value, &ExportOptions::default())
}

/// Serializes `value`; `options.exclude` drops matching object attributes at
/// every depth.
pub fn serialize_with(value: &Value, options: &ExportOptions) -> Node {
    Walker::new(options).value(value, 0)
}

/// Safe-export only: skips the object and domain dispatch for `value`
/// itself. Nested values are still fully serialized.
pub fn export_safe(value: &Value) -> Node {
    let options = ExportOptions::default();
    Walker::new(&options).safe(value, 0)
}

/// The attributes of `object`, serialized, without a class tag. Names are
/// filtered as for any object: `__`-prefixed and excluded names are left
/// out, single-underscore names are kept. References back to `object`
/// become cycle markers.
pub fn export_attributes(object: &Object, options: &ExportOptions) -> IndexMap<String, Node> {
    let mut walker = Walker::new(options);
    walker.in_progress.insert(object.id());
    object
        .attributes()
        .iter()
        .filter(|(name, _)| is_exported(name, options))
        .map(|(name, value)| (name.clone(), walker.value(value, 1)))
        .collect()
}

fn is_exported(name: &str, options: &ExportOptions) -> bool {
    !name.starts_with("__") && !options.is_excluded(name)
}

struct Walker<'a> {
    options: &'a ExportOptions,
    in_progress: HashSet<usize>,
}

impl<'a> Walker<'a> {
    fn new(options: &'a ExportOptions) -> Self {
        Self {
            options,
            in_progress: HashSet::new(),
        }
    }

    fn value(&mut self, value: &Value, depth: usize) -> Node {
        if depth > self.options.max_depth {
            debug!(depth, type_name = %value.type_name(), "depth limit reached");
            return Node::marker(TRUNCATED_KEY);
        }
        match value {
            Value::Environment(env) => self.environment(env, depth),
            Value::Instance(instance) => self.instance(instance, depth),
            Value::InstanceProvider(provider) => self.provider(provider, depth),
            Value::LabelProvider(labels) => labels_node(labels),
            Value::Object(obj) => self.object(obj, depth),
            other => self.safe(other, depth),
        }
    }

    fn object(&mut self, obj: &Object, depth: usize) -> Node {
        let id = obj.id();
        if !self.in_progress.insert(id) {
            debug!(class = %obj.class().qualified_name(), "reference cycle");
            return Node::marker(CYCLE_KEY);
        }
        let mut map = IndexMap::new();
        map.insert(CLASS_KEY.to_owned(), Node::Str(obj.class().qualified_name()));
        for (name, attr) in obj.attributes().iter() {
            if !is_exported(name, self.options) {
                continue;
            }
            let node = self.value(attr, depth + 1);
            map.insert(name.clone(), node);
        }
        self.in_progress.remove(&id);
        Node::Map(map)
    }

    fn safe(&mut self, value: &Value, depth: usize) -> Node {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Int(i) => Node::Int(*i),
            Value::Float(f) => Node::Float(*f),
            Value::Str(s) => Node::Str(s.clone()),
            Value::Scalar(s) => s.to_node(),
            Value::Array(a) => a.to_node(),
            Value::Set(set) => Node::Seq(set.iter().map(|v| self.value(v, depth + 1)).collect()),
            Value::List(items) | Value::Tuple(items) => {
                Node::Seq(items.iter().map(|v| self.value(v, depth + 1)).collect())
            }
            Value::Map(entries) => Node::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.value(v, depth + 1)))
                    .collect(),
            ),
            Value::Opaque(type_name) => Node::Opaque(type_name.clone()),
            Value::Object(obj) => self.object(obj, depth),
            Value::Environment(env) => self.environment(env, depth),
            Value::Instance(instance) => self.instance(instance, depth),
            Value::InstanceProvider(provider) => self.provider(provider, depth),
            Value::LabelProvider(labels) => labels_node(labels),
        }
    }

    fn environment(&mut self, env: &Environment, depth: usize) -> Node {
        let mut map = IndexMap::with_capacity(2);
        map.insert("dataset".to_owned(), self.provider(env.dataset(), depth + 1));
        map.insert("labels".to_owned(), labels_node(env.labels()));
        Node::Map(map)
    }

    fn instance(&mut self, instance: &Instance, depth: usize) -> Node {
        let mut map = IndexMap::new();
        map.insert("identifier".to_owned(), self.value(&instance.identifier().into(), depth + 1));
        map.insert("data".to_owned(), self.value(instance.data(), depth + 1));
        map.insert(
            "vector".to_owned(),
            instance.vector().map_or(Node::Null, |v| v.to_node()),
        );
        map.insert(
            "representation".to_owned(),
            self.value(instance.representation(), depth + 1),
        );
        for (name, value) in instance.extra() {
            if name.starts_with('_') {
                continue;
            }
            let node = self.value(value, depth + 1);
            map.insert(name.clone(), node);
        }
        Node::Map(map)
    }

    fn provider(&mut self, provider: &InstanceProvider, depth: usize) -> Node {
        Node::Seq(
            provider
                .all_data()
                .map(|instance| self.instance(instance, depth + 1))
                .collect(),
        )
    }
}

fn labels_node(labels: &LabelProvider) -> Node {
    let mut map = IndexMap::with_capacity(2);
    map.insert("labelset".to_owned(), label_seq(labels.labelset()));
    map.insert("labeldict".to_owned(), labeldict_node(labels));
    Node::Map(map)
}

fn label_seq(set: &BTreeSet<String>) -> Node {
    Node::Seq(set.iter().cloned().map(Node::Str).collect())
}

/// Identifiers keyed by their text form. When two identifiers share a text
/// form (`1` and `"1"`), the whole dict becomes a sequence of
/// `[identifier, labels]` pairs instead so no entry is lost.
fn labeldict_node(labels: &LabelProvider) -> Node {
    let dict = labels.labeldict();
    let keys: Vec<String> = dict.keys().map(ToString::to_string).collect();
    let mut seen = HashSet::with_capacity(keys.len());
    if keys.iter().all(|key| seen.insert(key.as_str())) {
        return Node::Map(
            keys.iter()
                .zip(dict.values())
                .map(|(key, assigned)| (key.clone(), label_seq(assigned)))
                .collect(),
        );
    }
    debug!(entries = dict.len(), "labeldict identifiers collide as keys");
    Node::Seq(
        dict.iter()
            .map(|(id, assigned)| {
                let id = match id {
                    InstanceId::Int(i) => Node::Int(*i),
                    InstanceId::Str(s) => Node::Str(s.clone()),
                };
                Node::Seq(vec![id, label_seq(assigned)])
            })
            .collect(),
    )
}
