//! The rule registry and validation dispatcher.
//!
//! A [`Validator`] owns everything the engine shares between instances: the
//! property rule chains keyed by `(type, property)`, the whole-object rules
//! keyed by type, the [`MetadataCache`] and the [`ValidatorConfig`]. Hosts
//! create one and share it through an `Arc`; nothing here is global.
//!
//! Every validation entry point comes in three flavours:
//!
//! - `validate_rules*` - registered rule chains only
//! - `validate_attributes*` - declared attributes only
//! - `validate*` - both, merged into one message per property (rules first)
//!
//! Value-less forms read the property's current value through the type
//! descriptor; `*_with` forms validate a caller-supplied value instead, which
//! is how a setter validates a value before storing it.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vigil_validator::Validator;
//!
//! let validator = Validator::new();
//! validator.add_rules::<Person>("Name").string_length(3, 7);
//! validator.add_rules::<Person>("Age").range(18, 200);
//!
//! let person = Person { name: "ab".into(), age: 10 };
//! let errors = validator.validate_all(&person)?;
//! assert_eq!(errors.len(), 2);
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

use crate::attributes::ValidationAttribute;
use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::foundation::{ValidationError, join_messages};
use crate::metadata::{MetadataCache, Validatable};
use crate::property::PropertyRef;
use crate::rules::ValidationRules;

/// A whole-object check, type-erased for storage.
type ObjectRule = Arc<dyn Fn(&dyn Any) -> String + Send + Sync>;

type RuleKey = (TypeId, String);

// ============================================================================
// VALIDATOR
// ============================================================================

/// Rule registry, metadata cache and validation entry points.
pub struct Validator {
    config: ValidatorConfig,
    metadata: MetadataCache,
    property_rules: DashMap<RuleKey, Arc<ValidationRules>>,
    object_rules: DashMap<TypeId, Vec<ObjectRule>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("metadata", &self.metadata)
            .field("property_rules", &self.property_rules.len())
            .field("object_rules", &self.object_rules.len())
            .finish()
    }
}

impl Validator {
    /// Creates a validator with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Creates a validator with `config`.
    #[must_use]
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            config,
            metadata: MetadataCache::new(),
            property_rules: DashMap::new(),
            object_rules: DashMap::new(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The metadata cache shared by every validated instance.
    #[must_use]
    pub fn metadata(&self) -> &MetadataCache {
        &self.metadata
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Opens a handle that appends rules to the chain of `T::property`.
    ///
    /// Rules added through the handle are committed when it drops, after any
    /// chain registered earlier (the chain is created when absent). The
    /// registry is not locked while the handle is alive.
    pub fn add_rules<T: 'static>(&self, property: impl Into<String>) -> RulesHandle<'_> {
        self.open_rules::<T>(property.into(), Commit::Append)
    }

    /// Opens a handle whose rules replace the chain of `T::property`.
    ///
    /// An untouched handle still replaces the chain with an empty one.
    pub fn set_rules<T: 'static>(&self, property: impl Into<String>) -> RulesHandle<'_> {
        self.open_rules::<T>(property.into(), Commit::Replace)
    }

    /// [`add_rules`](Self::add_rules) through a property expression.
    pub fn add_member_rules<T: 'static>(&self, expression: &str) -> Result<RulesHandle<'_>> {
        let property = PropertyRef::parse(expression)?;
        Ok(self.add_rules::<T>(property.name()))
    }

    /// [`set_rules`](Self::set_rules) through a property expression.
    pub fn set_member_rules<T: 'static>(&self, expression: &str) -> Result<RulesHandle<'_>> {
        let property = PropertyRef::parse(expression)?;
        Ok(self.set_rules::<T>(property.name()))
    }

    fn open_rules<T: 'static>(&self, property: String, commit: Commit) -> RulesHandle<'_> {
        tracing::debug!(type_name = type_name::<T>(), %property, ?commit, "opening property rules");
        RulesHandle {
            registry: &self.property_rules,
            key: Some((TypeId::of::<T>(), property)),
            pending: ValidationRules::with_config(&self.config),
            commit,
        }
    }

    /// Appends a whole-object rule for `T`.
    ///
    /// The rule returns a message, empty when the object is valid. Failures
    /// are reported under the empty property name.
    pub fn add_object_rule<T, F>(&self, rule: F)
    where
        T: 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        tracing::debug!(type_name = type_name::<T>(), "adding object rule");
        self.object_rules
            .entry(TypeId::of::<T>())
            .or_default()
            .push(erase_object_rule(rule));
    }

    /// Replaces every whole-object rule of `T`.
    pub fn set_object_rules<T, I, F>(&self, rules: I)
    where
        T: 'static,
        I: IntoIterator<Item = F>,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let rules: Vec<ObjectRule> = rules.into_iter().map(erase_object_rule).collect();
        tracing::debug!(type_name = type_name::<T>(), count = rules.len(), "replacing object rules");
        self.object_rules.insert(TypeId::of::<T>(), rules);
    }

    /// Returns true when a rule chain is registered for `T::property`.
    #[must_use]
    pub fn has_rules<T: 'static>(&self, property: &str) -> bool {
        self.property_rules
            .contains_key(&(TypeId::of::<T>(), property.to_owned()))
    }

    /// Drops every property and whole-object rule registered for `T`.
    pub fn clear_rules<T: 'static>(&self) {
        let id = TypeId::of::<T>();
        self.property_rules.retain(|(type_id, _), _| *type_id != id);
        self.object_rules.remove(&id);
        tracing::debug!(type_name = type_name::<T>(), "cleared rules");
    }

    fn rules_for<T: 'static>(&self, property: &str) -> Option<Arc<ValidationRules>> {
        self.property_rules
            .get(&(TypeId::of::<T>(), property.to_owned()))
            .map(|entry| Arc::clone(entry.value()))
    }

    fn object_rules_for<T: 'static>(&self) -> Vec<ObjectRule> {
        self.object_rules
            .get(&TypeId::of::<T>())
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn current_value<T: Validatable>(&self, obj: &T, property: &str) -> Result<Value> {
        self.metadata.descriptor::<T>()?.value_of(obj, property)
    }

    // ------------------------------------------------------------------------
    // Rules only
    // ------------------------------------------------------------------------

    /// Runs the rule chain of `property` against `value`.
    ///
    /// Returns `None` when no chain is registered, otherwise the chain's
    /// result, which carries no error when every rule passed.
    pub fn validate_rules_with<T: 'static>(
        &self,
        _obj: &T,
        property: &str,
        value: &Value,
    ) -> Result<Option<ValidationError>> {
        let Some(rules) = self.rules_for::<T>(property) else {
            return Ok(None);
        };
        let message = rules.validate(value)?;
        Ok(Some(ValidationError::new(property, message)))
    }

    /// Runs the rule chain of `property` against its current value.
    pub fn validate_rules<T: Validatable>(
        &self,
        obj: &T,
        property: &str,
    ) -> Result<Option<ValidationError>> {
        let value = self.current_value(obj, property)?;
        self.validate_rules_with(obj, property, &value)
    }

    /// Runs every property rule chain and every whole-object rule of `obj`.
    ///
    /// Only results carrying an error are returned.
    pub fn validate_rules_all<T: Validatable>(&self, obj: &T) -> Result<Vec<ValidationError>> {
        let descriptor = self.metadata.descriptor::<T>()?;
        let mut errors = Vec::new();
        for property in descriptor.property_names() {
            let value = descriptor.value_of(obj, property)?;
            if let Some(error) = self.validate_rules_with(obj, property, &value)? {
                if error.has_error() {
                    errors.push(error);
                }
            }
        }
        errors.extend(self.validate_object_rules(obj));
        Ok(errors)
    }

    /// Runs the whole-object rules of `obj`; failures are keyed to `""`.
    pub fn validate_object_rules<T: 'static>(&self, obj: &T) -> Vec<ValidationError> {
        self.object_rules_for::<T>()
            .iter()
            .map(|rule| ValidationError::new("", rule(obj as &dyn Any)))
            .filter(ValidationError::has_error)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Attributes only
    // ------------------------------------------------------------------------

    /// Invokes every attribute declared on `property` against `value`.
    ///
    /// Failing messages are joined like rule chain messages.
    pub fn validate_attributes_with<T: Validatable>(
        &self,
        _obj: &T,
        property: &str,
        value: &Value,
    ) -> Result<ValidationError> {
        let descriptor = self.metadata.descriptor::<T>()?;
        let messages = descriptor
            .require(property)?
            .attributes()
            .iter()
            .filter(|attribute| !attribute.is_valid(value))
            .map(|attribute| attribute.format_error_message(property));
        Ok(ValidationError::new(
            property,
            join_messages(messages, &self.config.separator),
        ))
    }

    /// Invokes the attributes of `property` against its current value.
    pub fn validate_attributes<T: Validatable>(
        &self,
        obj: &T,
        property: &str,
    ) -> Result<ValidationError> {
        let value = self.current_value(obj, property)?;
        self.validate_attributes_with(obj, property, &value)
    }

    /// Invokes the attributes of every declared property of `obj`.
    pub fn validate_attributes_all<T: Validatable>(
        &self,
        obj: &T,
    ) -> Result<Vec<ValidationError>> {
        let descriptor = self.metadata.descriptor::<T>()?;
        let mut errors = Vec::new();
        for property in descriptor.property_names() {
            let value = descriptor.value_of(obj, property)?;
            let error = self.validate_attributes_with(obj, property, &value)?;
            if error.has_error() {
                errors.push(error);
            }
        }
        Ok(errors)
    }

    // ------------------------------------------------------------------------
    // Combined
    // ------------------------------------------------------------------------

    /// Validates `value` for `property` against rules and attributes.
    ///
    /// Returns `None` when neither source reports an error, the failing
    /// source's result when only one does, and `rules + separator +
    /// attributes` when both do.
    pub fn validate_with<T: Validatable>(
        &self,
        obj: &T,
        property: &str,
        value: &Value,
    ) -> Result<Option<ValidationError>> {
        let rules = self
            .validate_rules_with(obj, property, value)?
            .filter(ValidationError::has_error);
        let attributes = Some(self.validate_attributes_with(obj, property, value)?)
            .filter(ValidationError::has_error);

        let merged = match (rules, attributes) {
            (None, None) => None,
            (Some(error), None) | (None, Some(error)) => Some(error),
            (Some(mut error), Some(attributes)) => {
                let message = format!(
                    "{}{}{}",
                    error.message(),
                    self.config.separator,
                    attributes.message()
                );
                error.set_message(message);
                Some(error)
            }
        };

        tracing::trace!(
            type_name = type_name::<T>(),
            property,
            has_error = merged.is_some(),
            "validated property"
        );
        Ok(merged)
    }

    /// Validates the current value of `property`.
    pub fn validate<T: Validatable>(
        &self,
        obj: &T,
        property: &str,
    ) -> Result<Option<ValidationError>> {
        let value = self.current_value(obj, property)?;
        self.validate_with(obj, property, &value)
    }

    /// Validates the property named by a member-access expression.
    pub fn validate_member<T: Validatable>(
        &self,
        obj: &T,
        expression: &str,
    ) -> Result<Option<ValidationError>> {
        let property = PropertyRef::parse(expression)?;
        self.validate(obj, property.name())
    }

    /// Validates every declared property of `obj` plus its whole-object rules.
    ///
    /// Only results carrying an error are returned, properties first in
    /// declaration order, then whole-object failures under `""`.
    pub fn validate_all<T: Validatable>(&self, obj: &T) -> Result<Vec<ValidationError>> {
        let descriptor = self.metadata.descriptor::<T>()?;
        let mut errors = Vec::new();
        for property in descriptor.property_names() {
            let value = descriptor.value_of(obj, property)?;
            if let Some(error) = self.validate_with(obj, property, &value)? {
                errors.push(error);
            }
        }
        errors.extend(self.validate_object_rules(obj));
        Ok(errors)
    }

    // ------------------------------------------------------------------------
    // Flattened string shapes
    // ------------------------------------------------------------------------

    /// [`validate`](Self::validate) as a message, empty when valid.
    pub fn validate_as_string<T: Validatable>(&self, obj: &T, property: &str) -> Result<String> {
        Ok(into_message(self.validate(obj, property)?))
    }

    /// [`validate_with`](Self::validate_with) as a message, empty when valid.
    pub fn validate_with_as_string<T: Validatable>(
        &self,
        obj: &T,
        property: &str,
        value: &Value,
    ) -> Result<String> {
        Ok(into_message(self.validate_with(obj, property, value)?))
    }

    /// [`validate_rules`](Self::validate_rules) as a message.
    pub fn validate_rules_as_string<T: Validatable>(
        &self,
        obj: &T,
        property: &str,
    ) -> Result<String> {
        Ok(into_message(self.validate_rules(obj, property)?))
    }

    /// [`validate_attributes`](Self::validate_attributes) as a message.
    pub fn validate_attributes_as_string<T: Validatable>(
        &self,
        obj: &T,
        property: &str,
    ) -> Result<String> {
        Ok(self.validate_attributes(obj, property)?.into_message())
    }

    /// [`validate_all`](Self::validate_all) as messages.
    pub fn validate_all_as_strings<T: Validatable>(&self, obj: &T) -> Result<Vec<String>> {
        Ok(into_messages(self.validate_all(obj)?))
    }

    /// [`validate_rules_all`](Self::validate_rules_all) as messages.
    pub fn validate_rules_all_as_strings<T: Validatable>(&self, obj: &T) -> Result<Vec<String>> {
        Ok(into_messages(self.validate_rules_all(obj)?))
    }

    /// [`validate_attributes_all`](Self::validate_attributes_all) as messages.
    pub fn validate_attributes_all_as_strings<T: Validatable>(
        &self,
        obj: &T,
    ) -> Result<Vec<String>> {
        Ok(into_messages(self.validate_attributes_all(obj)?))
    }
}

// ============================================================================
// RULES HANDLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    Append,
    Replace,
}

/// Builder for one registered rule chain, returned by
/// [`Validator::add_rules`] and [`Validator::set_rules`].
///
/// Dereferences to a private [`ValidationRules`]; its rules reach the
/// registry when the handle drops. `with_message` only reaches rules added
/// through the same handle.
#[derive(Debug)]
pub struct RulesHandle<'a> {
    registry: &'a DashMap<RuleKey, Arc<ValidationRules>>,
    key: Option<RuleKey>,
    pending: ValidationRules,
    commit: Commit,
}

impl Deref for RulesHandle<'_> {
    type Target = ValidationRules;

    fn deref(&self) -> &ValidationRules {
        &self.pending
    }
}

impl DerefMut for RulesHandle<'_> {
    fn deref_mut(&mut self) -> &mut ValidationRules {
        &mut self.pending
    }
}

impl Drop for RulesHandle<'_> {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let pending = std::mem::take(&mut self.pending);
        tracing::debug!(property = %key.1, rules = pending.len(), commit = ?self.commit, "committing property rules");
        match (self.commit, self.registry.entry(key)) {
            (Commit::Append, Entry::Occupied(mut slot)) => {
                Arc::make_mut(slot.get_mut()).append(pending);
            }
            (Commit::Append, Entry::Vacant(slot)) => {
                slot.insert(Arc::new(pending));
            }
            (Commit::Replace, entry) => {
                entry.insert(Arc::new(pending));
            }
        }
    }
}

fn erase_object_rule<T, F>(rule: F) -> ObjectRule
where
    T: 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    Arc::new(move |obj: &dyn Any| obj.downcast_ref::<T>().map(&rule).unwrap_or_default())
}

fn into_message(error: Option<ValidationError>) -> String {
    error.map(ValidationError::into_message).unwrap_or_default()
}

fn into_messages(errors: Vec<ValidationError>) -> Vec<String> {
    errors.into_iter().map(ValidationError::into_message).collect()
}

// ============================================================================
// TESTS
// ============================================================================
