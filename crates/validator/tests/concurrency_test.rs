//! The shared validator under concurrent use.

use std::sync::Arc;
use std::thread;

use vigil_validator::prelude::*;

struct Order {
    quantity: i64,
    sku: String,
}

impl Validatable for Order {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.property("Quantity", |o| o.quantity.into())
            .attribute(range(1, 99));
        d.property("Sku", |o| o.sku.clone().into())
            .attribute(required());
    }
}

const THREADS: usize = 16;

#[test]
fn concurrent_first_access_builds_one_descriptor() {
    let validator = Validator::new();

    let descriptors: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| s.spawn(|| validator.metadata().descriptor::<Order>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(validator.metadata().len(), 1);
    let first = &descriptors[0];
    for descriptor in &descriptors {
        assert!(Arc::ptr_eq(first, descriptor));
        assert_eq!(
            descriptor.property_names().collect::<Vec<_>>(),
            ["Quantity", "Sku"]
        );
    }
}

#[test]
fn concurrent_registration_is_cumulative() {
    let validator = Validator::new();

    thread::scope(|s| {
        for i in 0..THREADS {
            let validator = &validator;
            s.spawn(move || {
                validator
                    .add_rules::<Order>("Quantity")
                    .custom_rule(|_| false)
                    .with_message(format!("rule {i}"));
            });
        }
    });

    let order = Order {
        quantity: 5,
        sku: "A-1".to_owned(),
    };
    let message = validator.validate_rules_as_string(&order, "Quantity").unwrap();
    assert_eq!(message.lines().count(), THREADS);
}

#[test]
fn validation_runs_while_rules_are_registered() {
    let validator = Arc::new(Validator::new());
    validator.add_rules::<Order>("Quantity").range(1, 99);

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..100 {
                validator.add_rules::<Order>("Sku").string_required();
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                let order = Order {
                    quantity: 500,
                    sku: "A-1".to_owned(),
                };
                for _ in 0..100 {
                    let errors = validator.validate_all(&order).unwrap();
                    assert_eq!(errors.len(), 1);
                    assert_eq!(errors[0].property_name(), "Quantity");
                }
            });
        }
    });

    assert!(validator.has_rules::<Order>("Sku"));
}

#[test]
fn rule_closures_may_call_back_into_the_validator() {
    let validator = Arc::new(Validator::new());
    let inner = Arc::downgrade(&validator);
    validator
        .add_rules::<Order>("Quantity")
        .custom_rule(move |_| {
            inner
                .upgrade()
                .is_some_and(|v| v.has_rules::<Order>("Quantity"))
        })
        .with_message("unreachable");

    let order = Order {
        quantity: 5,
        sku: "A-1".to_owned(),
    };
    assert_eq!(validator.validate(&order, "Quantity").unwrap(), None);
}
