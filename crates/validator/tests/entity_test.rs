//! End-to-end tests: an entity owning its error collection.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use vigil_validator::prelude::*;
use vigil_validator::Result;

// ============================================================================
// FIXTURES
// ============================================================================

type Log = Rc<RefCell<Vec<String>>>;

struct Person {
    name: String,
    age: i64,
    errors: ErrorsCollection<Person>,
}

impl Validatable for Person {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.property("Name", |p| p.name.clone().into());
        d.property("Age", |p| p.age.into());
    }
}

impl Person {
    fn new(validator: Arc<Validator>, log: &Log) -> Self {
        let sink = Rc::clone(log);
        Self {
            name: String::new(),
            age: 0,
            errors: ErrorsCollection::with_notifier(validator, move |p: &str| {
                sink.borrow_mut().push(p.to_owned());
            }),
        }
    }

    fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = name.to_owned();
        let this = &*self;
        this.errors.validate(this, "Name")?;
        Ok(())
    }

    // Rejects the value before storing it.
    fn set_age(&mut self, age: i64) -> Result<bool> {
        let this = &*self;
        let error = this.errors.validate_with(this, "Age", &age.into())?;
        if error.is_none() {
            self.age = age;
        }
        Ok(error.is_none())
    }
}

impl DataErrorInfo for Person {
    fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }

    fn get_errors(&self, property: &str) -> Vec<ValidationError> {
        self.errors.get_errors(property)
    }
}

fn person_validator() -> Arc<Validator> {
    let validator = Validator::new();
    validator.add_rules::<Person>("Name").string_length(3, 7);
    validator.add_rules::<Person>("Age").range(18, 200);
    Arc::new(validator)
}

fn person(name: &str, age: i64) -> (Person, Log) {
    let log = Log::default();
    let mut person = Person::new(person_validator(), &log);
    person.name = name.to_owned();
    person.age = age;
    (person, log)
}

// ============================================================================
// RULE BOUNDARIES
// ============================================================================

#[rstest]
#[case("ab", true)]
#[case("abc", false)]
#[case("abcdefg", false)]
#[case("abcdefgh", true)]
fn name_length_bounds(#[case] name: &str, #[case] has_error: bool) {
    let (person, _) = person(name, 30);
    let result = person.errors.validate(&person, "Name").unwrap();
    assert_eq!(result.is_some(), has_error);
}

#[rstest]
#[case(17, true)]
#[case(18, false)]
#[case(200, false)]
#[case(201, true)]
fn age_range_bounds(#[case] age: i64, #[case] has_error: bool) {
    let (person, _) = person("Alice", age);
    let message = person.errors.validate_as_string(&person, "Age").unwrap();
    assert_eq!(!message.is_empty(), has_error);
    if has_error {
        assert_eq!(message, "Must be between 18 and 200.");
    }
}

#[test]
fn required_rule_on_null() {
    let mut rules = ValidationRules::new();
    rules.required();
    assert_eq!(rules.validate(&Value::Null).unwrap(), "Can not be empty.");
    assert_eq!(rules.validate(&Value::from(0)).unwrap(), "");
    assert_eq!(rules.validate(&Value::from("")).unwrap(), "");
}

// ============================================================================
// NOTIFICATION
// ============================================================================

#[test]
fn clearing_a_missing_error_still_notifies() {
    let (person, log) = person("Alice", 30);
    assert!(person.errors.set_error("Name", "").is_none());
    assert!(person.errors.set_error("Name", "").is_none());
    assert!(person.errors.is_empty());
    assert_eq!(*log.borrow(), ["Name", "Name"]);
}

#[test]
fn set_then_clear_notifies_twice() {
    let (person, log) = person("Alice", 30);
    assert!(person.errors.set_error("Name", "x").is_some());
    assert!(person.has_errors());
    assert!(person.errors.set_error("Name", "").is_none());
    assert!(!person.has_errors());
    assert_eq!(*log.borrow(), ["Name", "Name"]);
}

#[test]
fn notifier_may_query_the_collection() {
    struct Plain {
        size: i64,
    }

    impl Validatable for Plain {
        fn describe(d: &mut TypeDescriptor<Self>) {
            d.property("Size", |p| p.size.into());
        }
    }

    let validator = Arc::new(Validator::new());
    validator.add_rules::<Plain>("Size").range(1, 3);

    let seen: Rc<RefCell<Vec<(String, String)>>> = Rc::default();
    let errors = {
        let seen = Rc::clone(&seen);
        Rc::new_cyclic(|weak: &Weak<ErrorsCollection<Plain>>| {
            let weak = weak.clone();
            ErrorsCollection::with_notifier(validator, move |p: &str| {
                if let Some(errors) = weak.upgrade() {
                    seen.borrow_mut()
                        .push((p.to_owned(), errors.get_error_string(p)));
                }
            })
        })
    };

    errors.validate(&Plain { size: 9 }, "Size").unwrap();
    errors.validate(&Plain { size: 2 }, "Size").unwrap();
    assert_eq!(
        *seen.borrow(),
        [
            ("Size".to_owned(), "Must be between 1 and 3.".to_owned()),
            ("Size".to_owned(), String::new()),
        ]
    );
}

// ============================================================================
// WHOLE OBJECT
// ============================================================================

#[test]
fn whole_object_reports_every_failing_property() {
    let (person, log) = person("ab", 10);
    let errors = person.errors.validate_all(&person).unwrap();

    let mut properties: Vec<_> = errors.iter().map(ValidationError::property_name).collect();
    properties.sort_unstable();
    assert_eq!(properties, ["Age", "Name"]);

    let mut notified = log.borrow().clone();
    notified.sort();
    assert_eq!(notified, ["Age", "Name"]);
}

#[test]
fn whole_object_is_idempotent() {
    let (person, log) = person("ab", 10);
    let first = person.errors.validate_all(&person).unwrap();
    let second = person.errors.validate_all(&person).unwrap();
    assert_eq!(first, second);
    assert_eq!(person.errors.errors(), second);
    assert_eq!(log.borrow().len(), 4);
}

#[test]
fn whole_object_clears_fixed_properties() {
    let (mut person, log) = person("ab", 10);
    person.errors.validate_all(&person).unwrap();
    person.name = "Alice".to_owned();
    person.age = 30;
    log.borrow_mut().clear();

    assert!(person.errors.validate_all(&person).unwrap().is_empty());
    assert!(!person.has_errors());
    assert_eq!(log.borrow().len(), 2);
}

// ============================================================================
// SETTERS
// ============================================================================

#[test]
fn setters_validate_through_the_owned_collection() {
    let (mut person, log) = person("Alice", 30);

    person.set_name("Al").unwrap();
    assert_eq!(person.get_errors("Name").len(), 1);

    assert!(!person.set_age(5).unwrap());
    assert_eq!(person.age, 30);
    assert!(person.set_age(40).unwrap());
    assert_eq!(person.age, 40);

    person.set_name("Alice").unwrap();
    assert!(!person.has_errors());
    assert_eq!(*log.borrow(), ["Name", "Age", "Age", "Name"]);
}

// ============================================================================
// MERGE
// ============================================================================

#[test]
fn rules_and_attributes_merge_rules_first() {
    struct Ticket {
        code: String,
    }

    impl Validatable for Ticket {
        fn describe(d: &mut TypeDescriptor<Self>) {
            d.property("Code", |t| t.code.clone().into())
                .attribute(predicate(|_| false, "B"));
        }
    }

    let validator = Arc::new(Validator::new());
    validator
        .add_rules::<Ticket>("Code")
        .custom_rule(|_| false)
        .with_message("A");

    let errors = ErrorsCollection::new(Arc::clone(&validator));
    let ticket = Ticket {
        code: "T-1".to_owned(),
    };
    let error = errors.validate(&ticket, "Code").unwrap().unwrap();
    assert_eq!(error.message(), "A\nB");
    assert_eq!(error.to_string(), "Code: A\nB");
    assert_eq!(
        validator.validate_rules_as_string(&ticket, "Code").unwrap(),
        "A"
    );
    assert_eq!(
        validator.validate_attributes_as_string(&ticket, "Code").unwrap(),
        "B"
    );
}

#[test]
fn member_expressions_resolve_to_properties() {
    let (person, _) = person("ab", 30);
    for expr in ["Name", "p.Name", "|p| p.Name"] {
        let error = person.errors.validate_member(&person, expr).unwrap();
        assert!(error.is_some(), "{expr}");
    }
    for expr in ["p.Address.City", "Name()", ""] {
        let err = person.errors.validate_member(&person, expr).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPropertyExpression { .. }));
    }
}

#[test]
fn range_on_text_is_a_usage_error() {
    let (person, _) = person("Alice", 30);
    let validator = person.errors.validator();
    validator.add_rules::<Person>("Name").range(1, 5);
    let err = person.errors.validate(&person, "Name").unwrap_err();
    assert!(matches!(err, EngineError::NotComparable { .. }));
}
