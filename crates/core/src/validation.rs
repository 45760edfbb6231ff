//! Feedback schema: per-field rules and the field-error map they produce.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Category, FeedbackSubmission, Field, RawFeedback, Severity};

/// Subject length bounds, in UTF-16 code units.
pub const SUBJECT_LEN: (usize, usize) = (3, 30);
/// Message length bounds, in UTF-16 code units.
pub const MESSAGE_LEN: (usize, usize) = (10, 500);

/// Field name to the violation messages for that field.
///
/// Only failing fields are present. Serializes as a plain JSON object,
/// e.g. `{"subject": ["String must contain at least 3 character(s)"]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    /// No errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more message for `field`.
    pub fn push(&mut self, field: Field, msg: impl Into<String>) {
        self.0.entry(field).or_default().push(msg.into());
    }

    /// True when every field passed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when `field` has at least one message.
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Messages for `field`, empty if it passed.
    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First message for `field`; what the form shows under the input.
    pub fn first(&self, field: Field) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// Failing fields in form order, with their messages.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &[String])> {
        self.0.iter().map(|(f, m)| (*f, m.as_slice()))
    }

    /// Adds `other`'s messages for fields that have none here yet.
    fn fill_from(&mut self, other: FieldErrors) {
        for (field, msgs) in other.0 {
            self.0.entry(field).or_insert(msgs);
        }
    }
}

/// One per-field check.
pub trait Rule: Send + Sync {
    /// Field this rule reads.
    fn field(&self) -> Field;
    /// Violation messages for `value`; empty when it passes.
    fn check(&self, value: Option<&str>) -> Vec<String>;
}

/// Required text whose length must fall in `[min, max]`.
///
/// Length is counted in UTF-16 code units, the unit browsers use for
/// `minlength`/`maxlength`, so an emoji outside the BMP counts as two.
/// A missing value counts as the empty string.
pub struct LengthRule {
    field: Field,
    min: usize,
    max: usize,
}

impl LengthRule {
    /// Rule for `field` with inclusive bounds.
    pub fn new(field: Field, min: usize, max: usize) -> Self {
        Self { field, min, max }
    }
}

impl Rule for LengthRule {
    fn field(&self) -> Field {
        self.field
    }

    fn check(&self, value: Option<&str>) -> Vec<String> {
        let len = value.unwrap_or_default().encode_utf16().count();
        let mut out = vec![];
        if len < self.min {
            out.push(format!(
                "String must contain at least {} character(s)",
                self.min
            ));
        }
        if len > self.max {
            out.push(format!(
                "String must contain at most {} character(s)",
                self.max
            ));
        }
        out
    }
}

/// Optional value that, when present, must be one of `allowed`.
///
/// Missing and empty values both count as absent.
pub struct OneOfRule {
    field: Field,
    allowed: Vec<&'static str>,
}

impl OneOfRule {
    /// Rule for `field` accepting exactly the `allowed` values.
    pub fn new(field: Field, allowed: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            field,
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl Rule for OneOfRule {
    fn field(&self) -> Field {
        self.field
    }

    fn check(&self, value: Option<&str>) -> Vec<String> {
        let Some(value) = present(value) else {
            return vec![];
        };
        if self.allowed.contains(&value) {
            return vec![];
        }
        let expected = self
            .allowed
            .iter()
            .map(|a| format!("'{a}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        vec![format!(
            "Invalid enum value. Expected {expected}, received '{value}'"
        )]
    }
}

/// Ordered set of rules enforced on a raw submission.
///
/// The form handler, the JSON API and the validate-only endpoint all hold
/// the same [`Schema::feedback`] value.
pub struct Schema {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::feedback()
    }
}

impl Schema {
    /// Schema with no rules; see [`Schema::with_rule`].
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// The feedback form schema.
    pub fn feedback() -> Self {
        Self::empty()
            .with_rule(LengthRule::new(Field::Subject, SUBJECT_LEN.0, SUBJECT_LEN.1))
            .with_rule(LengthRule::new(Field::Message, MESSAGE_LEN.0, MESSAGE_LEN.1))
            .with_rule(OneOfRule::new(
                Field::Category,
                Category::ALL.map(Category::as_str),
            ))
            .with_rule(OneOfRule::new(
                Field::Severity,
                Severity::ALL.map(Severity::as_str),
            ))
    }

    /// Appends `rule`; rules run in insertion order.
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Runs every rule and collects every violation.
    pub fn check(&self, raw: &RawFeedback) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for rule in &self.rules {
            let field = rule.field();
            for msg in rule.check(raw.get(field)) {
                errors.push(field, msg);
            }
        }
        errors
    }

    /// Validates `raw` and builds the normalized record.
    ///
    /// Fail-soft: all fields are checked before returning, so the caller can
    /// show every error at once.
    pub fn validate(&self, raw: &RawFeedback) -> Result<FeedbackSubmission, FieldErrors> {
        let mut errors = self.check(raw);

        // Typed conversion still guards enums if a custom schema skipped them.
        let category = match present(raw.category.as_deref()).map(str::parse::<Category>) {
            Some(Ok(c)) => Some(c),
            Some(Err(e)) => {
                if !errors.contains(Field::Category) {
                    errors.push(Field::Category, e.to_string());
                }
                None
            }
            None => None,
        };
        let severity = match present(raw.severity.as_deref()).map(str::parse::<Severity>) {
            Some(Ok(s)) => Some(s),
            Some(Err(e)) => {
                if !errors.contains(Field::Severity) {
                    errors.push(Field::Severity, e.to_string());
                }
                None
            }
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(FeedbackSubmission {
            subject: raw.subject.clone().unwrap_or_default(),
            message: raw.message.clone().unwrap_or_default(),
            category,
            severity,
        })
    }

    /// [`Schema::check`] for an untyped JSON body.
    ///
    /// A field holding a non-string value reports only its type error.
    pub fn check_json(&self, body: &Value) -> FieldErrors {
        let (raw, mut errors) = RawFeedback::from_json(body);
        errors.fill_from(self.check(&raw));
        errors
    }

    /// [`Schema::validate`] for an untyped JSON body.
    pub fn validate_json(&self, body: &Value) -> Result<FeedbackSubmission, FieldErrors> {
        let (raw, mut errors) = RawFeedback::from_json(body);
        if errors.is_empty() {
            return self.validate(&raw);
        }
        errors.fill_from(self.check(&raw));
        Err(errors)
    }
}

impl RawFeedback {
    /// Reads the four form fields out of a JSON object.
    ///
    /// `null` counts as absent. Any other non-string value is left out of the
    /// raw record and reported as a type error for its field. A body that is
    /// not an object carries no fields at all.
    pub fn from_json(body: &Value) -> (RawFeedback, FieldErrors) {
        let mut raw = RawFeedback::default();
        let mut errors = FieldErrors::new();
        let Some(obj) = body.as_object() else {
            return (raw, errors);
        };
        for field in [Field::Subject, Field::Message, Field::Category, Field::Severity] {
            let value = match obj.get(field.as_str()) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) => s.clone(),
                Some(other) => {
                    errors.push(
                        field,
                        format!("Expected string, received {}", json_type(other)),
                    );
                    continue;
                }
            };
            match field {
                Field::Subject => raw.subject = Some(value),
                Field::Message => raw.message = Some(value),
                Field::Category => raw.category = Some(value),
                Field::Severity => raw.severity = Some(value),
            }
        }
        (raw, errors)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Unselected `<select>` inputs post an empty string.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
