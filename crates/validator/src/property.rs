//! Expression-style property references.
//!
//! Hosts that keep property references as text (binding paths, generated
//! code, config) can name a property with a direct member access instead of
//! a bare name. Exactly three shapes are accepted:
//!
//! - `name`
//! - `recv.name`
//! - `|recv| recv.name`
//!
//! Anything else (nested paths, calls, indexing) is a usage error, not a
//! validation failure.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EngineError, Result};

static MEMBER_ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:\|\s*(?P<param>[A-Za-z_][A-Za-z0-9_]*)\s*\|\s*)?(?:(?P<recv>[A-Za-z_][A-Za-z0-9_]*)\s*\.\s*)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*$",
    )
    .unwrap()
});

/// A property named by a direct member access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    name: String,
}

impl PropertyRef {
    /// Parses `expression` into a property reference.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use vigil_validator::PropertyRef;
    ///
    /// assert_eq!(PropertyRef::parse("|p| p.Name")?.name(), "Name");
    /// assert!(PropertyRef::parse("p.Address.City").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidPropertyExpression {
            expression: expression.to_owned(),
        };
        let caps = MEMBER_ACCESS.captures(expression).ok_or_else(invalid)?;

        // A closure must access the member through its own parameter.
        if let Some(param) = caps.name("param") {
            match caps.name("recv") {
                Some(recv) if recv.as_str() == param.as_str() => {}
                _ => return Err(invalid()),
            }
        }

        Ok(Self {
            name: caps["name"].to_owned(),
        })
    }

    /// The referenced property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
