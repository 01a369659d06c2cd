//! genbase-export - recursive export of dynamic object graphs.
//!
//! Converts a [`Value`] graph (plain scalars, containers, attribute-bearing
//! objects and the recognized domain containers) into a [`Node`] tree that a
//! JSON or YAML encoder can emit without further transformation.
//!
//! ```
//! use genbase_export::{serialize, Class, Object, Value};
//!
//! let obj = Object::builder(Class::new("app.model", "Point"))
//!     .attr("x", 1)
//!     .attr("y", 2)
//!     .build();
//! let node = serialize(&Value::Object(obj));
//! assert_eq!(node.class_name(), Some("app.model.Point"));
//! ```

mod array;
mod domain;
mod node;
mod object;
mod options;
mod serialize;
mod value;

pub mod emit;
pub mod walk;

pub use array::{ArrayError, NumericArray};
pub use domain::{Environment, Instance, InstanceId, InstanceProvider, LabelProvider};
pub use emit::{to_json, to_json_pretty, to_json_value, to_yaml, EmitError};
pub use node::{Node, CLASS_KEY, CYCLE_KEY, TRUNCATED_KEY};
pub use object::{Class, ConfigExport, Description, Object, ObjectBuilder, ObjectRef};
pub use options::{ExportOptions, DEFAULT_MAX_DEPTH};
pub use serialize::{export_attributes, export_safe, serialize, serialize_with};
pub use value::{Scalar, Value, ValueSet};
