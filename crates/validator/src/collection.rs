//! Per-instance error state with change notification.
//!
//! An [`ErrorsCollection`] holds at most one [`ValidationError`] per property
//! of the entity that owns it. Every mutation reports the affected property
//! names to an optional [`ErrorNotifier`], which is how a UI layer learns that
//! it has to re-query errors. The query side of that contract is
//! [`DataErrorInfo`].
//!
//! The collection is meant to live as a field of its entity. All methods take
//! `&self`, and the entity is passed to the validating methods, so an entity's
//! setter can validate itself through its own collection.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vigil_validator::{ErrorsCollection, Validator};
//!
//! let validator = Arc::new(Validator::new());
//! validator.add_rules::<Person>("Age").range(18, 200);
//!
//! let errors = ErrorsCollection::with_notifier(validator, |property: &str| {
//!     println!("errors changed: {property}");
//! });
//! errors.validate(&person, "Age")?;
//! ```

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::error::Result;
use crate::foundation::ValidationError;
use crate::metadata::Validatable;
use crate::property::PropertyRef;
use crate::validator::Validator;

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Receives the name of every property whose error state may have changed.
///
/// Implemented for every `Fn(&str)`.
pub trait ErrorNotifier {
    /// Called once per affected property, after the collection is updated.
    fn notify(&self, property: &str);
}

impl<F: Fn(&str)> ErrorNotifier for F {
    fn notify(&self, property: &str) {
        self(property);
    }
}

/// Query side of the error-change contract.
pub trait DataErrorInfo {
    /// Returns true when any property carries an error.
    fn has_errors(&self) -> bool;

    /// Errors of `property`; at most one entry.
    fn get_errors(&self, property: &str) -> Vec<ValidationError>;
}

// ============================================================================
// ERRORS COLLECTION
// ============================================================================

/// Error state of one entity of type `T`.
pub struct ErrorsCollection<T> {
    validator: Arc<Validator>,
    notifier: Option<Box<dyn ErrorNotifier>>,
    errors: RefCell<IndexMap<String, ValidationError>>,
    _entity: PhantomData<fn(&T)>,
}

impl<T> fmt::Debug for ErrorsCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorsCollection")
            .field("errors", &self.errors.borrow().values().collect::<Vec<_>>())
            .field("notifier", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> ErrorsCollection<T> {
    /// Creates a collection that never notifies.
    #[must_use]
    pub fn new(validator: Arc<Validator>) -> Self {
        Self {
            validator,
            notifier: None,
            errors: RefCell::new(IndexMap::new()),
            _entity: PhantomData,
        }
    }

    /// Creates a collection reporting changes to `notifier`.
    #[must_use]
    pub fn with_notifier(validator: Arc<Validator>, notifier: impl ErrorNotifier + 'static) -> Self {
        Self {
            notifier: Some(Box::new(notifier)),
            ..Self::new(validator)
        }
    }

    /// The validator this collection delegates to.
    #[must_use]
    pub fn validator(&self) -> &Arc<Validator> {
        &self.validator
    }

    // Never called while `errors` is borrowed.
    fn notify(&self, property: &str) {
        if let Some(notifier) = &self.notifier {
            tracing::trace!(property, "error state changed");
            notifier.notify(property);
        }
    }

    // ------------------------------------------------------------------------
    // Get and set
    // ------------------------------------------------------------------------

    /// Stores `message` as the error of `property`.
    ///
    /// A blank message removes the entry instead. Notifies once per call,
    /// whether or not the stored state changed. Returns the stored error, or
    /// `None` when the property is now valid.
    pub fn set_error(&self, property: &str, message: impl AsRef<str>) -> Option<ValidationError> {
        let error = ValidationError::new(property, message);
        let stored = {
            let mut errors = self.errors.borrow_mut();
            if error.has_error() {
                errors.insert(property.to_owned(), error.clone());
                Some(error)
            } else {
                errors.shift_remove(property);
                None
            }
        };
        self.notify(property);
        stored
    }

    /// The error of `property`, if any.
    #[must_use]
    pub fn get_error(&self, property: &str) -> Option<ValidationError> {
        self.errors.borrow().get(property).cloned()
    }

    /// The error message of `property`, empty when valid.
    #[must_use]
    pub fn get_error_string(&self, property: &str) -> String {
        self.get_error(property)
            .map(ValidationError::into_message)
            .unwrap_or_default()
    }

    /// The error of `property` as a list of zero or one entries.
    #[must_use]
    pub fn get_errors(&self, property: &str) -> Vec<ValidationError> {
        self.get_error(property).into_iter().collect()
    }

    /// [`get_errors`](Self::get_errors) as messages.
    #[must_use]
    pub fn get_errors_as_strings(&self, property: &str) -> Vec<String> {
        self.get_error(property)
            .map(ValidationError::into_message)
            .into_iter()
            .collect()
    }

    /// Every stored error.
    #[must_use]
    pub fn errors(&self) -> Vec<ValidationError> {
        self.errors.borrow().values().cloned().collect()
    }

    /// Returns true when any property carries an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.borrow().values().any(ValidationError::has_error)
    }

    /// Empties the collection and notifies every property that had an entry.
    pub fn clear_errors(&self) {
        let previous = self.errors.take();
        for property in previous.keys() {
            self.notify(property);
        }
    }

    // ------------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------------

    /// Inserts `error`, replacing the entry of its property.
    ///
    /// An error without a message is not retained. Always notifies.
    pub fn add(&self, error: ValidationError) {
        let property = error.property_name().to_owned();
        if error.has_error() {
            self.errors.borrow_mut().insert(property.clone(), error);
        }
        self.notify(&property);
    }

    /// Removes `error` if it is stored as is. Always notifies.
    pub fn remove(&self, error: &ValidationError) -> bool {
        let removed = {
            let mut errors = self.errors.borrow_mut();
            let matches = errors
                .get(error.property_name())
                .is_some_and(|stored| stored == error);
            if matches {
                errors.shift_remove(error.property_name());
            }
            matches
        };
        self.notify(error.property_name());
        removed
    }

    /// Returns true when `error` is stored as is.
    #[must_use]
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.errors
            .borrow()
            .get(error.property_name())
            .is_some_and(|stored| stored == error)
    }

    /// Number of stored errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    /// Returns true when no error is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Iterates over a snapshot of the stored errors.
    pub fn iter(&self) -> std::vec::IntoIter<ValidationError> {
        self.errors().into_iter()
    }
}

impl<T: Validatable> ErrorsCollection<T> {
    fn store(&self, property: &str, result: Option<ValidationError>) -> Option<ValidationError> {
        let message = result.map(ValidationError::into_message).unwrap_or_default();
        self.set_error(property, message)
    }

    // ------------------------------------------------------------------------
    // Validate
    // ------------------------------------------------------------------------

    /// Validates the current value of `property` and stores the outcome.
    pub fn validate(&self, entity: &T, property: &str) -> Result<Option<ValidationError>> {
        let result = self.validator.validate(entity, property)?;
        Ok(self.store(property, result))
    }

    /// Validates `value` as the next value of `property` and stores the outcome.
    pub fn validate_with(
        &self,
        entity: &T,
        property: &str,
        value: &Value,
    ) -> Result<Option<ValidationError>> {
        let result = self.validator.validate_with(entity, property, value)?;
        Ok(self.store(property, result))
    }

    /// [`validate`](Self::validate) through a member-access expression.
    pub fn validate_member(&self, entity: &T, expression: &str) -> Result<Option<ValidationError>> {
        let property = PropertyRef::parse(expression)?;
        self.validate(entity, property.name())
    }

    /// Validates the whole entity and replaces the stored set.
    ///
    /// Several whole-object failures are joined into the single `""` entry.
    /// Notifies once per property that had an error before or has one now.
    pub fn validate_all(&self, entity: &T) -> Result<Vec<ValidationError>> {
        let separator = &self.validator.config().separator;
        let mut fresh: IndexMap<String, ValidationError> = IndexMap::new();
        for error in self.validator.validate_all(entity)? {
            match fresh.entry(error.property_name().to_owned()) {
                Entry::Occupied(mut slot) => {
                    let joined = format!("{}{separator}{}", slot.get().message(), error.message());
                    slot.get_mut().set_message(joined);
                }
                Entry::Vacant(slot) => {
                    slot.insert(error);
                }
            }
        }

        let previous = self.errors.replace(fresh.clone());
        let touched: IndexSet<String> = previous.into_keys().chain(fresh.keys().cloned()).collect();
        for property in &touched {
            self.notify(property);
        }
        Ok(fresh.into_values().collect())
    }

    /// [`validate`](Self::validate) as a message, empty when valid.
    pub fn validate_as_string(&self, entity: &T, property: &str) -> Result<String> {
        Ok(self
            .validate(entity, property)?
            .map(ValidationError::into_message)
            .unwrap_or_default())
    }

    /// [`validate_with`](Self::validate_with) as a message, empty when valid.
    pub fn validate_with_as_string(&self, entity: &T, property: &str, value: &Value) -> Result<String> {
        Ok(self
            .validate_with(entity, property, value)?
            .map(ValidationError::into_message)
            .unwrap_or_default())
    }

    /// [`validate_all`](Self::validate_all) as messages.
    pub fn validate_all_as_strings(&self, entity: &T) -> Result<Vec<String>> {
        Ok(self
            .validate_all(entity)?
            .into_iter()
            .map(ValidationError::into_message)
            .collect())
    }
}

impl<T> DataErrorInfo for ErrorsCollection<T> {
    fn has_errors(&self) -> bool {
        ErrorsCollection::has_errors(self)
    }

    fn get_errors(&self, property: &str) -> Vec<ValidationError> {
        ErrorsCollection::get_errors(self, property)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TypeDescriptor;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    struct Widget {
        size: i64,
        label: String,
    }

    impl Validatable for Widget {
        fn describe(d: &mut TypeDescriptor<Self>) {
            d.property("Size", |w| w.size.into());
            d.property("Label", |w| w.label.clone().into());
        }
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |p: &str| sink.borrow_mut().push(p.to_owned()))
    }

    fn collection() -> (ErrorsCollection<Widget>, Rc<RefCell<Vec<String>>>) {
        let validator = Arc::new(Validator::new());
        validator.add_rules::<Widget>("Size").range(1, 10);
        validator.add_rules::<Widget>("Label").string_length(1, 4);
        let (log, notifier) = recorder();
        (ErrorsCollection::with_notifier(validator, notifier), log)
    }

    #[test]
    fn test_set_error_fires_on_every_call() {
        let (errors, log) = collection();
        assert!(errors.set_error("Size", "bad").is_some());
        assert!(errors.set_error("Size", "bad").is_some());
        assert!(errors.set_error("Size", "  ").is_none());
        assert!(errors.set_error("Size", "").is_none());
        assert_eq!(*log.borrow(), ["Size", "Size", "Size", "Size"]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_set_error_overwrites() {
        let (errors, _) = collection();
        errors.set_error("Size", "first");
        errors.set_error("Size", " second ");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get_error_string("Size"), "second");
        assert_eq!(errors.get_errors_as_strings("Size"), ["second"]);
        assert!(errors.get_errors("Label").is_empty());
    }

    #[test]
    fn test_validate_stores_and_clears() {
        let (errors, log) = collection();
        let widget = Widget {
            size: 0,
            label: "ok".to_owned(),
        };
        let error = errors.validate(&widget, "Size").unwrap().unwrap();
        assert_eq!(error.message(), "Must be between 1 and 10.");
        assert!(errors.has_errors());

        let fixed = Widget { size: 5, ..widget };
        assert_eq!(errors.validate(&fixed, "Size").unwrap(), None);
        assert!(!errors.has_errors());
        assert_eq!(*log.borrow(), ["Size", "Size"]);
    }

    #[test]
    fn test_validate_with_checks_the_supplied_value() {
        let (errors, _) = collection();
        let widget = Widget {
            size: 5,
            label: "ok".to_owned(),
        };
        let msg = errors
            .validate_with_as_string(&widget, "Label", &Value::from("too long"))
            .unwrap();
        assert!(!msg.is_empty());
        assert_eq!(errors.get_error_string("Label"), msg);
    }

    #[test]
    fn test_validate_all_notifies_old_and_new() {
        let (errors, log) = collection();
        errors.set_error("Stale", "old problem");
        log.borrow_mut().clear();

        let widget = Widget {
            size: 50,
            label: String::new(),
        };
        let all = errors.validate_all(&widget).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(errors.len(), 2);
        assert!(errors.get_error("Stale").is_none());
        assert_eq!(*log.borrow(), ["Stale", "Size", "Label"]);
    }

    #[test]
    fn test_validate_all_coalesces_object_failures() {
        let (errors, _) = collection();
        errors
            .validator()
            .add_object_rule(|_: &Widget| "A".to_owned());
        errors
            .validator()
            .add_object_rule(|_: &Widget| "B".to_owned());
        let widget = Widget {
            size: 5,
            label: "ok".to_owned(),
        };
        let all = errors.validate_all_as_strings(&widget).unwrap();
        assert_eq!(all, ["A\nB"]);
        assert_eq!(errors.get_error_string(""), "A\nB");
    }

    #[test]
    fn test_clear_errors_notifies_every_old_key() {
        let (errors, log) = collection();
        errors.set_error("Size", "x");
        errors.set_error("Label", "y");
        log.borrow_mut().clear();
        errors.clear_errors();
        assert!(errors.is_empty());
        assert_eq!(*log.borrow(), ["Size", "Label"]);
    }

    #[test]
    fn test_collection_contract() {
        let (errors, log) = collection();
        let error = ValidationError::new("Size", "x");
        errors.add(error.clone());
        errors.add(ValidationError::none("Label"));
        assert!(errors.contains(&error));
        assert_eq!(errors.len(), 1);
        assert!(!errors.remove(&ValidationError::new("Size", "other")));
        assert!(errors.remove(&error));
        assert!(!errors.contains(&error));
        assert_eq!(*log.borrow(), ["Size", "Label", "Size", "Size"]);
    }

    #[test]
    fn test_without_notifier_is_silent() {
        let errors: ErrorsCollection<Widget> = ErrorsCollection::new(Arc::new(Validator::new()));
        errors.set_error("Size", "x");
        assert_eq!(errors.iter().count(), 1);
        assert!(DataErrorInfo::has_errors(&errors));
    }
}
