//! Cermin Runtime
//!
//! Dynamic instances of registered classes plus the reflective
//! field-by-field copier. Instances enforce the declared metadata on every
//! access; the copier lifts accessibility for the duration of a copy and
//! restores it afterwards.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod copy;
pub mod error;
pub mod instance;
pub mod value;

pub use copy::{AccessOverride, FieldCopier};
pub use error::RuntimeError;
pub use instance::{Instance, ObjectRef};
pub use value::Value;
