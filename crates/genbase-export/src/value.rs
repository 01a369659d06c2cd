//! Dynamic value model.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::array::NumericArray;
use crate::domain::{Environment, Instance, InstanceProvider, LabelProvider};
use crate::node::Node;
use crate::object::ObjectRef;

/// A platform-specific numeric scalar (the numpy `np.integer` and
/// `np.floating` family).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    /// Element type name, numpy spelling.
    pub fn dtype(&self) -> &'static str {
        match self {
            Scalar::I8(_) => "int8",
            Scalar::I16(_) => "int16",
            Scalar::I32(_) => "int32",
            Scalar::I64(_) => "int64",
            Scalar::U8(_) => "uint8",
            Scalar::U16(_) => "uint16",
            Scalar::U32(_) => "uint32",
            Scalar::U64(_) => "uint64",
            Scalar::F32(_) => "float32",
            Scalar::F64(_) => "float64",
        }
    }

    /// Plain integer or floating equivalent.
    pub fn to_node(self) -> Node {
        match self {
            Scalar::I8(v) => Node::Int(v.into()),
            Scalar::I16(v) => Node::Int(v.into()),
            Scalar::I32(v) => Node::Int(v.into()),
            Scalar::I64(v) => Node::Int(v),
            Scalar::U8(v) => Node::Int(v.into()),
            Scalar::U16(v) => Node::Int(v.into()),
            Scalar::U32(v) => Node::Int(v.into()),
            Scalar::U64(v) => unsigned_node(v),
            Scalar::F32(v) => Node::Float(v.into()),
            Scalar::F64(v) => Node::Float(v),
        }
    }
}

pub(crate) fn unsigned_node(v: u64) -> Node {
    i64::try_from(v).map_or(Node::UInt(v), Node::Int)
}

/// Set or frozen set. Deduplicated on insert, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    items: Vec<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` unless an equal element is present. Returns whether
    /// the set changed.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item == value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.items.iter().all(|item| other.contains(item))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A dynamically typed runtime value.
///
/// Objects and the recognized domain containers are shared handles: cloning
/// a `Value` clones the handle, not the referenced state, and equality on
/// them is identity.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Scalar(Scalar),
    Array(NumericArray),
    Set(ValueSet),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(IndexMap<String, Value>),
    Object(ObjectRef),
    Environment(Arc<Environment>),
    Instance(Arc<Instance>),
    InstanceProvider(Arc<InstanceProvider>),
    LabelProvider(Arc<LabelProvider>),
    /// No attribute surface and no safe export (callables, open handles).
    /// Holds the type name only.
    Opaque(String),
}

impl Value {
    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Set(items.into_iter().collect())
    }

    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Fully qualified type name.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "NoneType".to_owned(),
            Value::Bool(_) => "bool".to_owned(),
            Value::Int(_) => "int".to_owned(),
            Value::Float(_) => "float".to_owned(),
            Value::Str(_) => "str".to_owned(),
            Value::Scalar(s) => format!("numpy.{}", s.dtype()),
            Value::Array(_) => "numpy.ndarray".to_owned(),
            Value::Set(_) => "set".to_owned(),
            Value::List(_) => "list".to_owned(),
            Value::Tuple(_) => "tuple".to_owned(),
            Value::Map(_) => "dict".to_owned(),
            Value::Object(obj) => obj.class().qualified_name(),
            Value::Environment(_) => "Environment".to_owned(),
            Value::Instance(_) => "Instance".to_owned(),
            Value::InstanceProvider(_) => "InstanceProvider".to_owned(),
            Value::LabelProvider(_) => "LabelProvider".to_owned(),
            Value::Opaque(name) => name.clone(),
        }
    }

    /// Unqualified type name (last dotted segment of [`Value::type_name`]).
    pub fn class_name(&self) -> String {
        match self {
            Value::Object(obj) => obj.class().name().to_owned(),
            other => {
                let full = other.type_name();
                match full.rsplit_once('.') {
                    Some((_, short)) => short.to_owned(),
                    None => full,
                }
            }
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Environment(a), Value::Environment(b)) => Arc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(a, b),
            (Value::InstanceProvider(a), Value::InstanceProvider(b)) => Arc::ptr_eq(a, b),
            (Value::LabelProvider(a), Value::LabelProvider(b)) => Arc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

impl From<NumericArray> for Value {
    fn from(v: NumericArray) -> Self {
        Value::Array(v)
    }
}

impl From<ValueSet> for Value {
    fn from(v: ValueSet) -> Self {
        Value::Set(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(v: IndexMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

impl From<Arc<Environment>> for Value {
    fn from(v: Arc<Environment>) -> Self {
        Value::Environment(v)
    }
}

impl From<Arc<Instance>> for Value {
    fn from(v: Arc<Instance>) -> Self {
        Value::Instance(v)
    }
}

impl From<Arc<InstanceProvider>> for Value {
    fn from(v: Arc<InstanceProvider>) -> Self {
        Value::InstanceProvider(v)
    }
}

impl From<Arc<LabelProvider>> for Value {
    fn from(v: Arc<LabelProvider>) -> Self {
        Value::LabelProvider(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
