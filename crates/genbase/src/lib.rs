//! genbase - shared plumbing for explanation front-ends.
//!
//! Re-exports the call-record capture of [`genbase_calldict`] and the safe
//! export of [`genbase_export`], and adds the [`Config`] envelope that
//! renderers consume.
//!
//! ```
//! use genbase::{capture, serialize, to_json, Class, Object, Param, Signature, Value};
//!
//! let sig = Signature::method("explain", [Param::var_keyword("kwargs")]).unwrap();
//! let explain = capture(sig, |call| {
//!     let record = call.call_record().expect("record");
//!     to_json(&record.to_node(&Default::default())).unwrap()
//! });
//! let model = Object::builder(Class::new("demo", "Model")).attr("depth", 3).build();
//! let json = explain.call_method(model.clone(), vec![], Default::default()).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"__name__":"explain","kwargs":{},"self":{"depth":3,"__name__":"Model"}}"#
//! );
//! assert!(to_json(&serialize(&Value::Object(model))).is_ok());
//! ```

mod config;

pub use config::{Config, ConfigError, Configs, CONTENT_KEY, DEFAULT_TAB_TITLE, META_KEY};

pub use genbase_calldict::{
    capture, normalize_receiver, BindingError, BoundArguments, CallRecord, Captured, Invocation,
    Param, ParamKind, Signature, SignatureError, CALL_RECORD_PARAM, NAME_KEY, RECEIVER_PARAM,
};
pub use genbase_export::{
    emit, export_attributes, export_safe, serialize, serialize_with, to_json, to_json_pretty,
    to_json_value, to_yaml, walk, ArrayError, Class, EmitError, Environment, ExportOptions,
    Instance, InstanceId, InstanceProvider, LabelProvider, Node, NumericArray, Object,
    ObjectBuilder, ObjectRef, Scalar, Value, ValueSet, CLASS_KEY, CYCLE_KEY, TRUNCATED_KEY,
};
