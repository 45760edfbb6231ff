//! Form fields, their typed enums, and the stored submission record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Feedback category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Ideas for improvement.
    Suggestions,
    /// Something is broken.
    Bugs,
    /// Something is unpleasant.
    Complaints,
}

impl Category {
    /// Every category, in form display order.
    pub const ALL: [Category; 3] = [Self::Suggestions, Self::Bugs, Self::Complaints];

    /// Wire name, as posted by the form and written to the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Suggestions => "suggestions",
            Self::Bugs => "bugs",
            Self::Complaints => "complaints",
        }
    }
}

/// Feedback severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Can wait.
    Low,
    /// Default priority.
    Normal,
    /// Should be looked at soon.
    High,
    /// Needs attention now.
    Urgent,
}

impl Severity {
    /// Every severity, lowest first.
    pub const ALL: [Severity; 4] = [Self::Low, Self::Normal, Self::High, Self::Urgent];

    /// Wire name, as posted by the form and written to the store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Returned when a string names no known enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownValue(
    /// The rejected input.
    pub String,
);

impl FromStr for Category {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

impl FromStr for Severity {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the feedback form fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Short title, required.
    Subject,
    /// Free text body, required.
    Message,
    /// Optional [`Category`].
    Category,
    /// Optional [`Severity`].
    Severity,
}

impl Field {
    /// Form field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Message => "message",
            Self::Category => "category",
            Self::Severity => "severity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped form payload, exactly as posted.
///
/// Every field may be missing. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawFeedback {
    /// Posted `subject`.
    #[serde(default)]
    pub subject: Option<String>,
    /// Posted `message`.
    #[serde(default)]
    pub message: Option<String>,
    /// Posted `category`; empty when the select was left alone.
    #[serde(default)]
    pub category: Option<String>,
    /// Posted `severity`; empty when the select was left alone.
    #[serde(default)]
    pub severity: Option<String>,
}

impl RawFeedback {
    /// Raw value of `field`, if posted.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Subject => self.subject.as_deref(),
            Field::Message => self.message.as_deref(),
            Field::Category => self.category.as_deref(),
            Field::Severity => self.severity.as_deref(),
        }
    }
}

/// One feedback entry, as stored.
///
/// The type enforces only the enum fields. Length bounds hold for records
/// produced by [`crate::Schema::feedback`]; stores accept whatever they are
/// given, so a record built by hand or read from an edited file may break them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackSubmission {
    /// Short title.
    pub subject: String,
    /// Free text body.
    pub message: String,
    /// Omitted from the stored object when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Omitted from the stored object when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl From<&FeedbackSubmission> for RawFeedback {
    fn from(value: &FeedbackSubmission) -> Self {
        Self {
            subject: Some(value.subject.clone()),
            message: Some(value.message.clone()),
            category: value.category.map(|c| c.as_str().to_string()),
            severity: value.severity.map(|s| s.as_str().to_string()),
        }
    }
}
