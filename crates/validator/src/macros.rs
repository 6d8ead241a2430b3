//! Macros for defining validation attributes with minimal boilerplate.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vigil_validator::attribute;
//! use vigil_validator::Value;
//!
//! // Unit attribute (no fields)
//! attribute! {
//!     /// The value must be `true`.
//!     pub MustBeTrue;
//!     valid(value) { value.as_bool() == Some(true) }
//!     message(name) { format!("The {name} field must be checked.") }
//!     fn must_be_true();
//! }
//!
//! // Struct with fields
//! attribute! {
//!     pub MultipleOf { step: i64 };
//!     valid(self, value) { value.as_i64().is_none_or(|n| n % self.step == 0) }
//!     message(self, name) { format!("The field {name} must be a multiple of {}.", self.step) }
//!     new(step: i64) { Self { step } }
//!     fn multiple_of(step: i64);
//! }
//! ```

// ============================================================================
// ATTRIBUTE MACRO
// ============================================================================

/// Creates a complete attribute: struct definition, `ValidationAttribute`
/// implementation, constructor and factory function.
///
/// `#[derive(Debug, Clone)]` is always applied. Add extra derives via
/// `#[derive(...)]`.
///
/// # Variants
///
/// **Unit attribute** (zero-sized, no fields):
/// ```rust,ignore
/// attribute! {
///     pub NotNull;
///     valid(value) { !value.is_null() }
///     message(name) { format!("The {name} field is required.") }
///     fn not_null();
/// }
/// ```
///
/// **Struct with fields** (explicit `new`):
/// ```rust,ignore
/// attribute! {
///     pub MaxChars { max: usize };
///     valid(self, value) { value.as_str().is_none_or(|s| s.chars().count() <= self.max) }
///     message(self, name) { format!("{name} is too long.") }
///     new(max: usize) { Self { max } }
///     fn max_chars(max: usize);
/// }
/// ```
///
/// **Fallible constructor** (the type after `->` is the error type):
/// ```rust,ignore
/// attribute! {
///     pub Matches { pattern: regex::Regex };
///     valid(self, value) { value.as_str().is_none_or(|s| self.pattern.is_match(s)) }
///     message(self, name) { format!("{name} is malformed.") }
///     new(pattern: &str) -> regex::Error { Ok(Self { pattern: regex::Regex::new(pattern)? }) }
///     fn matches(pattern: &str) -> regex::Error;
/// }
/// ```
#[macro_export]
macro_rules! attribute {
    // ── Variant 1: Unit attribute (no fields) + factory fn ───────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident;
        valid($val:ident) $valid:block
        message($prop:ident) $msg:block
        fn $factory:ident();
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::attributes::ValidationAttribute for $name {
            #[allow(unused_variables)]
            fn is_valid(&self, $val: &$crate::Value) -> bool $valid

            #[allow(unused_variables)]
            fn format_error_message(&self, $prop: &str) -> String $msg
        }

        #[must_use]
        $vis const fn $factory() -> $name { $name }
    };

    // ── Variant 2: Struct with fields + fallible new + fallible factory ──
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        valid($self_:ident, $val:ident) $valid:block
        message($self2:ident, $prop:ident) $msg:block
        new($($narg:ident: $naty:ty),* $(,)?) -> $ety:ty $new_body:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?) -> $efty:ty;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $name {
            pub fn new($($narg: $naty),*) -> ::std::result::Result<Self, $ety> $new_body
        }

        impl $crate::attributes::ValidationAttribute for $name {
            #[allow(unused_variables)]
            fn is_valid(&$self_, $val: &$crate::Value) -> bool $valid

            #[allow(unused_variables)]
            fn format_error_message(&$self2, $prop: &str) -> String $msg
        }

        $vis fn $factory($($farg: $faty),*) -> ::std::result::Result<$name, $efty> {
            $name::new($($farg),*)
        }
    };

    // ── Variant 3: Struct with fields + new + factory fn ─────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? };
        valid($self_:ident, $val:ident) $valid:block
        message($self2:ident, $prop:ident) $msg:block
        new($($narg:ident: $naty:ty),* $(,)?) $new_body:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $name {
            #[must_use]
            pub fn new($($narg: $naty),*) -> Self $new_body
        }

        impl $crate::attributes::ValidationAttribute for $name {
            #[allow(unused_variables)]
            fn is_valid(&$self_, $val: &$crate::Value) -> bool $valid

            #[allow(unused_variables)]
            fn format_error_message(&$self2, $prop: &str) -> String $msg
        }

        #[must_use]
        $vis fn $factory($($farg: $faty),*) -> $name {
            $name::new($($farg),*)
        }
    };
}
