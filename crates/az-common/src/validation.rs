//! Form validation
//!
//! Each entity declares a constraint table (field, required, rule, message)
//! and exposes its field values by name. [`validate`] walks the table and
//! collects at most one message per field.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const REQUIRED_MESSAGE: &str = "Câmp obligatoriu";

/// Whether the form creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Update,
}

/// Inputs that change which constraints apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub kind: FormKind,
    /// Require a phone number of exactly ten digits
    pub strict_phone: bool,
}

impl ValidationContext {
    pub fn create() -> Self {
        Self { kind: FormKind::Create, strict_phone: false }
    }

    pub fn update() -> Self {
        Self { kind: FormKind::Update, strict_phone: false }
    }

    pub fn with_strict_phone(mut self, strict: bool) -> Self {
        self.strict_phone = strict;
        self
    }
}

/// A field's current value as the validator sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    List(usize),
}

/// Constraint applied to a present value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Character count within bounds
    Length { min: usize, max: usize },
    Email,
    /// Exactly `len` ASCII digits
    Digits { len: usize },
    IntRange { min: i64, max: i64 },
    DecimalRange { min: f64, max: f64 },
    OneOf(&'static [&'static str]),
    MinItems(usize),
    /// Presence is all that is checked
    Present,
}

impl Rule {
    pub fn accepts(&self, value: &FieldValue<'_>) -> bool {
        match (self, value) {
            (Rule::Present, _) => true,
            (Rule::Length { min, max }, FieldValue::Text(s)) => {
                let n = s.trim().chars().count();
                n >= *min && n <= *max
            }
            (Rule::Email, FieldValue::Text(s)) => email_regex().is_match(s.trim()),
            (Rule::Digits { len }, FieldValue::Text(s)) => {
                s.len() == *len && s.chars().all(|c| c.is_ascii_digit())
            }
            (Rule::IntRange { min, max }, FieldValue::Integer(n)) => n >= min && n <= max,
            (Rule::DecimalRange { min, max }, FieldValue::Decimal(x)) => x >= min && x <= max,
            (Rule::DecimalRange { min, max }, FieldValue::Integer(n)) => {
                let x = *n as f64;
                x >= *min && x <= *max
            }
            (Rule::OneOf(options), FieldValue::Text(s)) => options.contains(s),
            (Rule::MinItems(min), FieldValue::List(n)) => n >= min,
            _ => false,
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid e-mail pattern"))
}

/// One row of an entity's constraint table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConstraint {
    pub field: &'static str,
    pub required: bool,
    pub rule: Rule,
    pub message: &'static str,
}

impl FieldConstraint {
    pub const fn required(field: &'static str, rule: Rule, message: &'static str) -> Self {
        Self { field, required: true, rule, message }
    }

    pub const fn optional(field: &'static str, rule: Rule, message: &'static str) -> Self {
        Self { field, required: false, rule, message }
    }
}

/// Implemented by every form body the console submits
pub trait Validate {
    /// Constraint table for this entity
    fn constraints(ctx: &ValidationContext) -> Vec<FieldConstraint>;

    /// Current value of `field`
    fn field(&self, field: &str) -> FieldValue<'_>;
}

/// Field name → message, one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message unless the field already has one
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for FieldErrors {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut errors = FieldErrors::new();
        for (k, v) in iter {
            errors.insert(k, v);
        }
        errors
    }
}

/// Check `input` against its constraint table
pub fn validate<T: Validate>(input: &T, ctx: &ValidationContext) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for constraint in T::constraints(ctx) {
        if errors.contains(constraint.field) {
            continue;
        }
        let value = input.field(constraint.field);
        let missing = match value {
            FieldValue::Missing => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        };

        if missing {
            if constraint.required {
                errors.insert(constraint.field, REQUIRED_MESSAGE);
            }
            continue;
        }

        if !constraint.rule.accepts(&value) {
            errors.insert(constraint.field, constraint.message);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe<'a> {
        name: Option<&'a str>,
        count: i64,
    }

    impl Validate for Probe<'_> {
        fn constraints(_ctx: &ValidationContext) -> Vec<FieldConstraint> {
            vec![
                FieldConstraint::required("name", Rule::Length { min: 2, max: 4 }, "2-4"),
                FieldConstraint::required("count", Rule::IntRange { min: 1, max: 3 }, "1-3"),
            ]
        }

        fn field(&self, field: &str) -> FieldValue<'_> {
            match field {
                "name" => self.name.map(FieldValue::Text).unwrap_or(FieldValue::Missing),
                "count" => FieldValue::Integer(self.count),
                _ => FieldValue::Missing,
            }
        }
    }

    #[test]
    fn test_required_and_rule_messages() {
        let errors = validate(&Probe { name: None, count: 9 }, &ValidationContext::create()).unwrap_err();
        assert_eq!(errors.get("name"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get("count"), Some("1-3"));

        let errors = validate(&Probe { name: Some("abcdef"), count: 2 }, &ValidationContext::create()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("2-4"));

        assert!(validate(&Probe { name: Some("abc"), count: 2 }, &ValidationContext::create()).is_ok());
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let errors = validate(&Probe { name: Some("   "), count: 1 }, &ValidationContext::create()).unwrap_err();
        assert_eq!(errors.get("name"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_rules() {
        assert!(Rule::Email.accepts(&FieldValue::Text("ana@x.ro")));
        assert!(!Rule::Email.accepts(&FieldValue::Text("ana@x")));
        assert!(!Rule::Email.accepts(&FieldValue::Text("ana x@y.ro")));
        assert!(Rule::Digits { len: 10 }.accepts(&FieldValue::Text("0712345678")));
        assert!(!Rule::Digits { len: 10 }.accepts(&FieldValue::Text("07123-5678")));
        assert!(Rule::DecimalRange { min: 1.0, max: 10.0 }.accepts(&FieldValue::Integer(10)));
        assert!(!Rule::DecimalRange { min: 1.0, max: 10.0 }.accepts(&FieldValue::Decimal(10.5)));
        assert!(Rule::OneOf(&["a", "b"]).accepts(&FieldValue::Text("b")));
        assert!(!Rule::MinItems(1).accepts(&FieldValue::List(0)));
        assert!(!Rule::IntRange { min: 1, max: 2 }.accepts(&FieldValue::Text("1")));
    }

    #[test]
    fn test_field_errors_keep_first_message() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "first");
        errors.insert("email", "second");
        assert_eq!(errors.get("email"), Some("first"));
    }
}
