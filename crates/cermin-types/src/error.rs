//! Type metadata errors

use thiserror::Error;

use crate::ty::TypeId;

/// Errors that can occur during type registration and resolution
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// Type id not present in the registry
    #[error("Unknown type: {id}")]
    UnknownType {
        /// Id that resolved to nothing
        id: TypeId,
    },

    /// Type name registered more than once
    #[error("Duplicate type: `{name}` is already registered")]
    DuplicateType {
        /// Name of the colliding type
        name: String,
    },

    /// Type parameter name declared more than once on the same type
    #[error("Duplicate type parameter `{param}` on `{ty}`")]
    DuplicateTypeParameter {
        /// Declaring type
        ty: String,
        /// Colliding parameter name
        param: String,
    },

    /// Invalid type argument count on a parameterized ancestor reference
    #[error("Invalid type argument count for `{ancestor}` in `{ty}`: expected {expected}, got {actual}")]
    InvalidTypeArgCount {
        /// Declaring type
        ty: String,
        /// Referenced ancestor
        ancestor: String,
        /// Expected count
        expected: usize,
        /// Actual count
        actual: usize,
    },

    /// Type variable argument naming no declared parameter
    #[error("Unknown type parameter `{param}` referenced by `{ty}`")]
    UnknownTypeParameter {
        /// Declaring type
        ty: String,
        /// Name that matched no parameter
        param: String,
    },

    /// Ancestor reference violating the inheritance rules
    #[error("Invalid ancestor `{ancestor}` for `{ty}`: {reason}")]
    InvalidAncestor {
        /// Declaring type
        ty: String,
        /// Referenced ancestor
        ancestor: String,
        /// Rule that was violated
        reason: String,
    },

    /// Field name already declared on the type or one of its superclasses
    #[error("Duplicate field `{field}` in the hierarchy of `{ty}`")]
    DuplicateField {
        /// Declaring type
        ty: String,
        /// Colliding field name
        field: String,
    },
}
