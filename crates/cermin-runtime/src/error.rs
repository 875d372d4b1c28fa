//! Runtime errors for instance access and field copying

use thiserror::Error;

use cermin_types::TypeError;

/// Errors that can occur while touching instances and copying fields
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    /// Required argument was null
    #[error("The {which} argument is mandatory")]
    NullArgument {
        /// Which argument was null
        which: &'static str,
    },

    /// Argument was a value without fields
    #[error("The {which} argument is not an object (got {kind})")]
    NotAnObject {
        /// Which argument was rejected
        which: &'static str,
        /// Kind of the rejected value
        kind: &'static str,
    },

    /// No field under the given name
    #[error("Field `{field}` not found on `{class}`")]
    FieldNotFound {
        /// Type that was searched
        class: String,
        /// Name that matched nothing
        field: String,
    },

    /// Visibility rejected the access and no override was in place
    #[error("Field `{field}` of `{class}` is not accessible")]
    FieldNotAccessible {
        /// Declaring type
        class: String,
        /// Field that was rejected
        field: String,
    },

    /// Write to a final field without an override
    #[error("Field `{field}` of `{class}` is final")]
    FinalField {
        /// Declaring type
        class: String,
        /// Field that was rejected
        field: String,
    },

    /// Instance access to a static field
    #[error("Field `{field}` of `{class}` is static and not reachable through an instance")]
    StaticField {
        /// Declaring type
        class: String,
        /// Field that was rejected
        field: String,
    },

    /// Value incompatible with the declared field type
    #[error("Cannot assign {actual} to field `{field}` of `{class}` (declared {expected})")]
    TypeMismatch {
        /// Declaring type
        class: String,
        /// Field being written
        field: String,
        /// Declared field type
        expected: String,
        /// Kind of the offered value
        actual: &'static str,
    },

    /// Attempt to instantiate something that is not a class
    #[error("`{name}` is not instantiable")]
    NotInstantiable {
        /// Name of the rejected type
        name: String,
    },

    /// Underlying type metadata error
    #[error(transparent)]
    Type(#[from] TypeError),
}
