//! Runtime-built decorator instances.
//!
//! [`DecoratorProxy`] turns a [`Schema`](decorum_model::Schema) into a live
//! instance: it seeds a property store with the schema's defaults, validates
//! every assignment, and hands out a [`ProducedInstance`] that compares,
//! hashes and renders exactly like any other conforming value, including
//! natively defined ones.
//!
//! ```rust
//! use std::sync::Arc;
//! use decorum_model::{ElementType, PrimitiveKind, PropertyDeclaration, Schema, Value};
//! use decorum_proxy::DecoratorProxy;
//!
//! let schema = Arc::new(Schema::new(
//!     "com.example.Marker",
//!     vec![
//!         PropertyDeclaration::string("string"),
//!         PropertyDeclaration::sequence("integer", ElementType::Primitive(PrimitiveKind::Int)),
//!     ],
//! ).unwrap());
//!
//! let proxy = DecoratorProxy::new(schema).unwrap();
//! proxy.set_property("integer", vec![4]).unwrap();
//!
//! let instance = proxy.instance();
//! assert_eq!(instance.get("integer"), Some(Value::from(vec![4])));
//! assert_eq!(instance.to_string(), "@com.example.Marker(string=, integer=[4])");
//! ```

mod dispatch;
mod instance;
mod proxy;

pub use dispatch::{DispatchTable, Member};
pub use instance::{Accessor, ProducedInstance};
pub use proxy::DecoratorProxy;
