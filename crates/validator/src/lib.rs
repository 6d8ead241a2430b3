//! # vigil-validator
//!
//! Property validation for data-bound objects: rule chains registered per
//! `(type, property)`, declarative attributes discovered through a cached type
//! descriptor, and a per-instance error collection that notifies a UI layer
//! when a property's error state changes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vigil_validator::prelude::*;
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Validatable for Person {
//!     fn describe(d: &mut TypeDescriptor<Self>) {
//!         d.property("Name", |p| p.name.clone().into());
//!         d.property("Age", |p| p.age.into());
//!     }
//! }
//!
//! let validator = Arc::new(Validator::new());
//! validator.add_rules::<Person>("Name").string_length(3, 7);
//! validator.add_rules::<Person>("Age").range(18, 200);
//!
//! let errors = ErrorsCollection::new(Arc::clone(&validator));
//! let person = Person { name: "Al".into(), age: 12 };
//! assert_eq!(errors.validate_all(&person)?.len(), 2);
//! ```
//!
//! ## Sources of validation
//!
//! - **Rules**: [`ValidationRules`] chains, built fluently through
//!   [`Validator::add_rules`] / [`Validator::set_rules`], plus whole-object
//!   rules reported under the empty property name
//! - **Attributes**: [`ValidationAttribute`](attributes::ValidationAttribute)
//!   values declared in [`Validatable::describe`]; new ones are defined with
//!   the [`attribute!`] macro
//!
//! Combined validation runs both and merges the messages, rules first.
//!
//! A failed validation is data ([`ValidationError`]); misuse of the engine is
//! an [`EngineError`].

pub mod attributes;
pub mod collection;
pub mod config;
pub mod error;
pub mod foundation;
mod macros;
pub mod metadata;
pub mod prelude;
pub mod property;
pub mod rules;
pub mod validator;

pub use collection::{DataErrorInfo, ErrorNotifier, ErrorsCollection};
pub use config::{DefaultMessages, ValidatorConfig};
pub use error::{EngineError, Result};
pub use foundation::ValidationError;
pub use metadata::{MetadataCache, PropertyDescriptor, TypeDescriptor, Validatable};
pub use property::PropertyRef;
pub use rules::ValidationRules;
pub use validator::{RulesHandle, Validator};

/// The dynamic value type produced by property getters.
pub use serde_json::Value;
