//! Form drafts with schema-style field rules.
//!
//! # Invariants
//! - Field errors are visible only for touched fields.
//! - `begin_submit` touches every field and refuses while any rule fails or
//!   a submit is already in flight.
//! - Validation errors never reach the notification sink.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// One check applied to a field value; the string is the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Fails on an empty value.
    Required(&'static str),
    /// Fails on a non-empty value that is not an email address.
    Email(&'static str),
    /// Fails on a non-empty value shorter than `n` characters.
    MinChars(usize, &'static str),
}

impl Check {
    fn failure(self, value: &str) -> Option<&'static str> {
        match self {
            Self::Required(message) => value.is_empty().then_some(message),
            Self::Email(message) => {
                (!value.is_empty() && !EMAIL_RE.is_match(value)).then_some(message)
            }
            Self::MinChars(min, message) => {
                (!value.is_empty() && value.chars().count() < min).then_some(message)
            }
        }
    }
}

/// Checks for one field, evaluated in order; the first failure wins.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub checks: &'static [Check],
}

/// Component-local form state.
#[derive(Debug, Clone)]
pub struct FormDraft {
    rules: &'static [FieldRule],
    values: BTreeMap<&'static str, String>,
    touched: BTreeSet<&'static str>,
    errors: BTreeMap<&'static str, &'static str>,
    submitting: bool,
}

impl FormDraft {
    /// Empty draft with one value slot per rule.
    pub fn new(rules: &'static [FieldRule]) -> Self {
        let mut draft = Self {
            rules,
            values: rules.iter().map(|rule| (rule.field, String::new())).collect(),
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
            submitting: false,
        };
        draft.validate_all();
        draft
    }

    /// Re-initializes values; touched state is reset.
    pub fn seed(&mut self, values: &[(&str, &str)]) {
        for value in self.values.values_mut() {
            value.clear();
        }
        for (field, value) in values {
            if let Some(slot) = self.values.get_mut(*field) {
                *slot = (*value).to_string();
            }
        }
        self.touched.clear();
        self.validate_all();
    }

    /// Updates a value; unknown fields are ignored.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let Some(rule) = self.rule(field) else {
            return false;
        };
        self.values.insert(rule.field, value.into());
        self.validate_field(rule);
        true
    }

    /// Marks a field touched and validates it.
    pub fn blur(&mut self, field: &str) -> bool {
        let Some(rule) = self.rule(field) else {
            return false;
        };
        self.touched.insert(rule.field);
        self.validate_field(rule);
        true
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Error text shown next to the field, if touched and invalid.
    pub fn visible_error(&self, field: &str) -> Option<&'static str> {
        if self.touched.contains(field) {
            self.errors.get(field).copied()
        } else {
            None
        }
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.field)
    }

    /// Touches and validates every field, then enters the submitting state
    /// when the draft is valid and idle.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        let rules = self.rules;
        self.touched.extend(rules.iter().map(|rule| rule.field));
        self.validate_all();
        if !self.is_valid() {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Leaves the submitting state; values stay as they were.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    fn rule(&self, field: &str) -> Option<FieldRule> {
        self.rules.iter().copied().find(|rule| rule.field == field)
    }

    fn validate_all(&mut self) {
        let rules = self.rules;
        for rule in rules {
            self.validate_field(*rule);
        }
    }

    fn validate_field(&mut self, rule: FieldRule) {
        let value = self.value(rule.field);
        match rule.checks.iter().find_map(|check| check.failure(value)) {
            Some(message) => {
                self.errors.insert(rule.field, message);
            }
            None => {
                self.errors.remove(rule.field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Check, FieldRule, FormDraft};

    const RULES: &[FieldRule] = &[
        FieldRule {
            field: "email",
            checks: &[
                Check::Required("Email is required"),
                Check::Email("Invalid email format"),
            ],
        },
        FieldRule {
            field: "password",
            checks: &[
                Check::Required("Password is required"),
                Check::MinChars(6, "Password must be at least 6 characters"),
            ],
        },
    ];

    #[test]
    fn errors_stay_hidden_until_touched() {
        let mut draft = FormDraft::new(RULES);
        assert!(!draft.is_valid());
        assert_eq!(draft.visible_error("email"), None);

        draft.blur("email");
        assert_eq!(draft.visible_error("email"), Some("Email is required"));

        draft.set("email", "not-an-email");
        assert_eq!(draft.visible_error("email"), Some("Invalid email format"));

        draft.set("email", "a@b.com");
        assert_eq!(draft.visible_error("email"), None);
    }

    #[test]
    fn min_chars_applies_after_required() {
        let mut draft = FormDraft::new(RULES);
        draft.blur("password");
        assert_eq!(draft.visible_error("password"), Some("Password is required"));
        draft.set("password", "abc");
        assert_eq!(
            draft.visible_error("password"),
            Some("Password must be at least 6 characters")
        );
        draft.set("password", "secret");
        assert_eq!(draft.visible_error("password"), None);
    }

    #[test]
    fn begin_submit_touches_everything_and_blocks_reentry() {
        let mut draft = FormDraft::new(RULES);
        assert!(!draft.begin_submit());
        assert!(draft.is_touched("email"));
        assert!(draft.is_touched("password"));

        draft.set("email", "a@b.com");
        draft.set("password", "secret");
        assert!(draft.begin_submit());
        assert!(!draft.begin_submit());

        draft.finish_submit();
        assert!(!draft.is_submitting());
        assert_eq!(draft.value("email"), "a@b.com");
    }

    #[test]
    fn seed_replaces_values_and_resets_touched() {
        let mut draft = FormDraft::new(RULES);
        draft.blur("email");
        draft.seed(&[("email", "x@y.io"), ("unknown", "ignored")]);
        assert_eq!(draft.value("email"), "x@y.io");
        assert_eq!(draft.value("password"), "");
        assert!(!draft.is_touched("email"));
        assert!(!draft.set("unknown", "v"));
    }
}
