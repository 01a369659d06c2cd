//! Attribute-bearing objects.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::node::Node;
use crate::value::Value;

/// Class descriptor: defining module plus class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Class {
    module: String,
    name: String,
}

impl Class {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `module.Name`, or just `Name` for an empty module.
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }
}

/// Explicit configuration export of a self-describing object.
pub type ConfigExport = Arc<dyn Fn(&Object) -> IndexMap<String, Node> + Send + Sync>;

/// How an object describes itself when captured as a call receiver.
#[derive(Clone, Default)]
pub enum Description {
    /// Generic attribute flattening.
    #[default]
    Attributes,
    /// The object exposes its own configuration export.
    Config(ConfigExport),
}

impl fmt::Debug for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Description::Attributes => f.write_str("Attributes"),
            Description::Config(_) => f.write_str("Config(..)"),
        }
    }
}

/// An object with a class and an ordered, mutable attribute table.
///
/// Always handled through [`ObjectRef`]; the handle's address is the
/// object's identity.
pub struct Object {
    class: Class,
    attrs: RwLock<IndexMap<String, Value>>,
    description: Description,
}

pub type ObjectRef = Arc<Object>;

impl Object {
    pub fn builder(class: Class) -> ObjectBuilder {
        ObjectBuilder {
            class,
            attrs: IndexMap::new(),
            description: Description::Attributes,
        }
    }

    pub fn new(class: Class) -> ObjectRef {
        Self::builder(class).build()
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn id(&self) -> usize {
        self as *const Object as usize
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.attrs.read().get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.attrs.read().contains_key(name)
    }

    /// Sets an attribute, keeping the position of an existing one.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.attrs.write().insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.attrs.write().shift_remove(name)
    }

    pub fn attribute_names(&self) -> Vec<String> {
        self.attrs.read().keys().cloned().collect()
    }

    /// Read access to the attribute table. Do not call [`Object::set`] on
    /// the same object while the guard is alive.
    pub fn attributes(&self) -> RwLockReadGuard<'_, IndexMap<String, Value>> {
        self.attrs.read()
    }

    /// The configuration export, for self-describing objects.
    pub fn to_config(&self) -> Option<IndexMap<String, Node>> {
        match &self.description {
            Description::Config(export) => Some(export(self)),
            Description::Attributes => None,
        }
    }
}

// Attribute values may point back at this object, so only names are printed.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class.qualified_name())
            .field("attributes", &self.attribute_names())
            .field("description", &self.description)
            .finish()
    }
}

pub struct ObjectBuilder {
    class: Class,
    attrs: IndexMap<String, Value>,
    description: Description,
}

impl ObjectBuilder {
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn attrs<K, V, I>(mut self, attrs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.attrs
            .extend(attrs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Makes the object self-describing.
    pub fn to_config<F>(mut self, export: F) -> Self
    where
        F: Fn(&Object) -> IndexMap<String, Node> + Send + Sync + 'static,
    {
        self.description = Description::Config(Arc::new(export));
        self
    }

    pub fn build(self) -> ObjectRef {
        Arc::new(Object {
            class: self.class,
            attrs: RwLock::new(self.attrs),
            description: self.description,
        })
    }
}
