//! Foundation types shared by every layer of the engine.
//!
//! - **Errors**: [`ValidationError`], the `(property, message)` value
//! - **Values**: helpers over [`serde_json::Value`], the dynamic value type
//!   property getters produce and rules consume

pub mod error;
pub mod value;

pub use error::ValidationError;
pub use value::{compare, join_messages, kind_name, stringify, within};
