//! Prelude module for convenient imports.
//!
//! Provides a single `use vigil_validator::prelude::*;` import that brings in
//! the registry, the error collection, the descriptor types and the standard
//! attributes.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vigil_validator::prelude::*;
//!
//! let validator = Validator::new();
//! validator.add_rules::<Person>("Name").string_required().string_length(3, 7);
//! ```

// ============================================================================
// ENGINE: Registry, collection, errors
// ============================================================================

pub use crate::collection::{DataErrorInfo, ErrorNotifier, ErrorsCollection};
pub use crate::config::ValidatorConfig;
pub use crate::error::EngineError;
pub use crate::foundation::ValidationError;
pub use crate::rules::ValidationRules;
pub use crate::validator::Validator;

// ============================================================================
// METADATA: Self-description of validated types
// ============================================================================

pub use crate::metadata::{TypeDescriptor, Validatable};
pub use crate::property::PropertyRef;

// ============================================================================
// ATTRIBUTES: Capability and standard set
// ============================================================================

pub use crate::attributes::{
    AttributeExt, Predicate, Range, RegularExpression, Required, StringLength,
    ValidationAttribute, max_length, predicate, range, regular_expression, required,
    string_length,
};

pub use serde_json::Value;
