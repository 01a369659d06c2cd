//! The per-invocation call record.

use genbase_export::{export_attributes, serialize_with, ExportOptions, Node, Value};
use indexmap::IndexMap;

use crate::signature::{BindingError, BoundArguments, Signature, RECEIVER_PARAM};

/// Key holding the callable name in a record, and the class name in a
/// normalized receiver.
pub const NAME_KEY: &str = "__name__";

/// Resolved arguments of one call, plus a snapshot of the receiver for
/// methods.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    name: String,
    arguments: IndexMap<String, Value>,
    receiver: Option<IndexMap<String, Node>>,
}

impl CallRecord {
    /// Builds the record for `bound`. The receiver, if any, is taken out of
    /// the plain arguments and replaced by its normalized snapshot; the
    /// reserved record parameter is left out.
    pub fn build(
        signature: &Signature,
        bound: &BoundArguments,
        options: &ExportOptions,
    ) -> Result<Self, BindingError> {
        let mut arguments = bound.arguments().clone();
        let receiver = if signature.is_method() {
            let value = arguments.shift_remove(RECEIVER_PARAM).ok_or_else(|| {
                BindingError::MissingReceiver {
                    callable: signature.name().to_owned(),
                }
            })?;
            let normalized = normalize_receiver(&value, options).ok_or_else(|| {
                BindingError::InvalidReceiver {
                    callable: signature.name().to_owned(),
                    type_name: value.type_name(),
                }
            })?;
            Some(normalized)
        } else {
            None
        };
        Ok(Self {
            name: signature.name().to_owned(),
            arguments,
            receiver,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, param: &str) -> Option<&Value> {
        self.arguments.get(param)
    }

    pub fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    /// Normalized receiver snapshot (`self` entry).
    pub fn receiver(&self) -> Option<&IndexMap<String, Node>> {
        self.receiver.as_ref()
    }

    /// The whole record as a node: `__name__`, each argument serialized,
    /// then `self`.
    pub fn to_node(&self, options: &ExportOptions) -> Node {
        let mut map = IndexMap::with_capacity(self.arguments.len() + 2);
        map.insert(NAME_KEY.to_owned(), Node::Str(self.name.clone()));
        for (name, value) in &self.arguments {
            map.insert(name.clone(), serialize_with(value, options));
        }
        if let Some(receiver) = &self.receiver {
            map.insert(RECEIVER_PARAM.to_owned(), Node::Map(receiver.clone()));
        }
        Node::Map(map)
    }
}

/// Snapshot of a call receiver: the object's own configuration export when
/// it is self-describing, its serialized attributes otherwise (filtered by
/// `options` like any object). Environments, instances and label providers
/// use their mapping export. The class name is added under [`NAME_KEY`]
/// unless already present.
///
/// Returns `None` for receivers without a mapping form: plain values and
/// instance providers, which export as a sequence of instances.
pub fn normalize_receiver(receiver: &Value, options: &ExportOptions) -> Option<IndexMap<String, Node>> {
    let mut repr = match receiver {
        Value::Object(obj) => obj
            .to_config()
            .unwrap_or_else(|| export_attributes(obj, options)),
        Value::Environment(_) | Value::Instance(_) | Value::LabelProvider(_) => {
            match serialize_with(receiver, options) {
                Node::Map(map) => map,
                _ => return None,
            }
        }
        _ => return None,
    };
    if !repr.contains_key(NAME_KEY) {
        repr.insert(NAME_KEY.to_owned(), Node::Str(receiver.class_name()));
    }
    Some(repr)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use genbase_export::{Class, Environment, Instance, InstanceProvider, LabelProvider, Object};

    #[test]
    fn plain_object_snapshot() {
        let obj = Object::builder(Class::new("shapes", "Point"))
            .attr("x", 1)
            .attr("y", 2)
            .build();
        let repr = normalize_receiver(&Value::Object(obj), &ExportOptions::default()).unwrap();
        assert_eq!(repr.keys().collect::<Vec<_>>(), vec!["x", "y", NAME_KEY]);
        assert_eq!(repr[NAME_KEY], Node::Str("Point".into()));
    }

    #[test]
    fn config_export_keeps_its_own_name() {
        let obj = Object::builder(Class::new("m", "Wrapper"))
            .to_config(|_| {
                let mut out = IndexMap::new();
                out.insert(NAME_KEY.to_owned(), Node::Str("CustomName".into()));
                out.insert("k".to_owned(), Node::Int(3));
                out
            })
            .build();
        let repr = normalize_receiver(&Value::Object(obj), &ExportOptions::default()).unwrap();
        assert_eq!(repr[NAME_KEY], Node::Str("CustomName".into()));
        assert_eq!(repr["k"], Node::Int(3));
    }

    #[test]
    fn scalars_are_not_receivers() {
        assert!(normalize_receiver(&Value::Int(1), &ExportOptions::default()).is_none());
        assert!(normalize_receiver(&Value::map([("a", 1)]), &ExportOptions::default()).is_none());
    }

    #[test]
    fn providers_are_not_receivers_but_environments_are() {
        let provider: InstanceProvider = [Instance::new(0, "doc")].into_iter().collect();
        let options = ExportOptions::default();
        assert!(normalize_receiver(&Value::InstanceProvider(Arc::new(provider.clone())), &options).is_none());

        let env = Environment::new(provider, LabelProvider::new(["x"]));
        let repr = normalize_receiver(&Value::Environment(Arc::new(env)), &options).unwrap();
        assert_eq!(repr.keys().collect::<Vec<_>>(), vec!["dataset", "labels", NAME_KEY]);
        assert_eq!(repr[NAME_KEY], Node::Str("Environment".into()));
    }
}
