//! Rule chains.
//!
//! A [`ValidationRules`] chain is the fluent, ordered list of checks attached
//! to one `(type, property)` pair. Every rule runs on every validation, there
//! is no short-circuit, so the combined message lists every violation at once
//! in registration order.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vigil_validator::ValidationRules;
//! use serde_json::json;
//!
//! let mut rules = ValidationRules::new();
//! rules
//!     .string_required()
//!     .string_length(3, 7)
//!     .with_message("Name must be $min$ to $max$ characters.");
//!
//! assert_eq!(rules.validate(&json!("abc"))?, "");
//! assert_eq!(rules.validate(&json!("ab"))?, "Name must be 3 to 7 characters.");
//! ```

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::config::{DefaultMessages, ValidatorConfig};
use crate::error::Result;
use crate::foundation::{join_messages, stringify, within};

type Check = Arc<dyn Fn(&Value) -> Result<bool> + Send + Sync>;

// ============================================================================
// RULE
// ============================================================================

/// One check plus the message it yields on failure.
#[derive(Clone)]
struct Rule {
    kind: &'static str,
    check: Check,
    message: String,
    params: Vec<(&'static str, String)>,
}

impl Rule {
    fn new(
        kind: &'static str,
        message: &str,
        check: impl Fn(&Value) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            check: Arc::new(check),
            message: message.to_owned(),
            params: Vec::new(),
        }
    }

    fn with_param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Returns the rendered message on failure, `""` on success.
    fn evaluate(&self, value: &Value) -> Result<String> {
        if (self.check)(value)? {
            return Ok(String::new());
        }
        let mut message = self.message.clone();
        for (key, param) in &self.params {
            message = message.replace(&format!("${key}$"), param);
        }
        Ok(message)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// VALIDATION RULES
// ============================================================================

/// An ordered chain of rules for one property.
///
/// Each builder method appends one rule and returns the chain, so rules are
/// declared in a single expression. Rules without an explicit message use the
/// templates of the [`ValidatorConfig`] the chain was created with.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    rules: Vec<Rule>,
    messages: Arc<DefaultMessages>,
    separator: Arc<str>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRules {
    /// Creates an empty chain with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&ValidatorConfig::default())
    }

    /// Creates an empty chain using `config`'s templates and separator.
    #[must_use]
    pub fn with_config(config: &ValidatorConfig) -> Self {
        Self {
            rules: Vec::new(),
            messages: Arc::new(config.messages.clone()),
            separator: Arc::from(config.separator.as_str()),
        }
    }

    /// Number of rules in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no rule has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn push(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Moves the rules of `other` to the end of this chain.
    pub(crate) fn append(&mut self, mut other: Self) {
        self.rules.append(&mut other.rules);
    }

    // ------------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------------

    /// The value must not be null.
    pub fn required(&mut self) -> &mut Self {
        let rule = Rule::new("required", &self.messages.required, |value| {
            Ok(!value.is_null())
        });
        self.push(rule)
    }

    /// The value must satisfy `predicate`.
    pub fn custom_rule<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let rule = Rule::new("custom", &self.messages.custom, move |value| {
            Ok(predicate(value))
        });
        self.push(rule)
    }

    // ------------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------------

    /// The string form of the value must have between `min` and `max`
    /// characters (inclusive). Null fails.
    ///
    /// Bounds are taken lower bound first; use
    /// [`max_string_length`](Self::max_string_length) for an upper bound only.
    pub fn string_length(&mut self, min: usize, max: usize) -> &mut Self {
        let rule = Rule::new("string_length", &self.messages.string_length, move |value| {
            Ok(stringify(value).is_some_and(|s| {
                let len = s.chars().count();
                len >= min && len <= max
            }))
        })
        .with_param("min", min.to_string())
        .with_param("max", max.to_string());
        self.push(rule)
    }

    /// Shorthand for `string_length(0, max)`.
    pub fn max_string_length(&mut self, max: usize) -> &mut Self {
        self.string_length(0, max)
    }

    /// The value must be non-null and its string form non-blank.
    pub fn string_required(&mut self) -> &mut Self {
        let rule = Rule::new("string_required", &self.messages.string_required, |value| {
            Ok(stringify(value).is_some_and(|s| !s.trim().is_empty()))
        });
        self.push(rule)
    }

    /// The value must be non-null and its string form must match `pattern`.
    pub fn string_regex(&mut self, pattern: Regex) -> &mut Self {
        let rule = Rule::new("string_regex", &self.messages.string_regex, move |value| {
            Ok(stringify(value).is_some_and(|s| pattern.is_match(&s)))
        });
        self.push(rule)
    }

    // ------------------------------------------------------------------------
    // Comparable values
    // ------------------------------------------------------------------------

    /// The value must lie within `[min, max]`.
    ///
    /// Validating a value that has no ordering against the bounds (null, an
    /// array, a string against numeric bounds, ...) is a usage error and fails
    /// the whole chain with [`EngineError::NotComparable`].
    ///
    /// [`EngineError::NotComparable`]: crate::EngineError::NotComparable
    pub fn range(&mut self, min: impl Into<Value>, max: impl Into<Value>) -> &mut Self {
        let (min, max) = (min.into(), max.into());
        let min_text = stringify(&min).map(|s| s.into_owned()).unwrap_or_default();
        let max_text = stringify(&max).map(|s| s.into_owned()).unwrap_or_default();
        let rule = Rule::new("range", &self.messages.range, move |value| {
            within(value, &min, &max)
        })
        .with_param("min", min_text)
        .with_param("max", max_text);
        self.push(rule)
    }

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    /// Replaces the message of the most recently added rule.
    ///
    /// Rules with bounds substitute `$min$` and `$max$` into the template.
    /// Has no effect on an empty chain.
    pub fn with_message(&mut self, message: impl Into<String>) -> &mut Self {
        if let Some(last) = self.rules.last_mut() {
            last.message = message.into();
        }
        self
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Runs every rule and joins the failure messages in registration order.
    ///
    /// Returns `""` when every rule passes or the chain is empty.
    pub fn validate(&self, value: &Value) -> Result<String> {
        let mut messages = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            messages.push(rule.evaluate(value)?);
        }
        Ok(join_messages(messages, &self.separator))
    }
}

// ============================================================================
// TESTS
// ============================================================================
