//! Cermin Type Metadata
//!
//! Registration-based type metadata with generic supertype resolution.
//! Declaration sites record the actual type arguments of their
//! `extends`/`implements` clauses, and the resolver recovers the concrete
//! type bound to a generic ancestor's parameter from any descendant.

#![warn(missing_docs)]

pub mod error;
pub mod field;
pub mod registry;
pub mod resolve;
pub mod subtyping;
pub mod ty;

pub use error::TypeError;
pub use field::{FieldDescriptor, Modifiers};
pub use registry::{TypeBuilder, TypeRegistry};
pub use resolve::TypeResolver;
pub use subtyping::is_assignable;
pub use ty::{AncestorRef, TypeArg, TypeDescriptor, TypeId, TypeKind};
