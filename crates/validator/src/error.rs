//! Usage errors.
//!
//! A failed validation is data ([`ValidationError`](crate::ValidationError)).
//! An [`EngineError`] means the caller used the engine incorrectly: a
//! malformed property reference, a range check over a value with no ordering,
//! or a property the type never declared. These propagate to the caller and
//! are never folded into validation messages.

/// Errors raised by the validation engine itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A property reference was not a direct member access.
    #[error("invalid property expression `{expression}`: expected a direct member access")]
    InvalidPropertyExpression {
        /// The rejected expression text.
        expression: String,
    },

    /// A range check was applied to a value with no ordering against its bounds.
    #[error("cannot compare a {value} value with a {bound} bound")]
    NotComparable {
        /// Kind of the validated value.
        value: &'static str,
        /// Kind of the bound it was compared with.
        bound: &'static str,
    },

    /// The type's descriptor has no getter for the requested property.
    #[error("type `{type_name}` does not declare property `{property}`")]
    UnknownProperty {
        /// Name of the validated type.
        type_name: &'static str,
        /// The property that was requested.
        property: String,
    },

    /// The metadata cache holds a descriptor of an unexpected type.
    #[error("cached descriptor for `{type_name}` has an unexpected type")]
    DescriptorMismatch {
        /// Name of the validated type.
        type_name: &'static str,
    },
}

/// Result alias for engine operations.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
