//! Server-rendered HTML for the home page and the feedback form.

use askama::Template;
use feedback_core::{
    validation::{MESSAGE_LEN, SUBJECT_LEN},
    Category, FeedbackSubmission, Field, FieldErrors, RawFeedback, Severity,
};

struct HomeItem<'a> {
    subject: &'a str,
    message: &'a str,
    category: &'static str,
    severity: &'static str,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomePage<'a> {
    items: Vec<HomeItem<'a>>,
}

struct SelectOption {
    value: &'static str,
    label: String,
    selected: bool,
}

struct SelectInput<'a> {
    name: &'static str,
    label: &'static str,
    options: Vec<SelectOption>,
    error: &'a str,
}

#[derive(Template)]
#[template(path = "feedback.html")]
struct FeedbackPage<'a> {
    subject: &'a str,
    message: &'a str,
    subject_max: usize,
    message_min: usize,
    message_max: usize,
    subject_error: &'a str,
    message_error: &'a str,
    selects: Vec<SelectInput<'a>>,
}

#[derive(Template)]
#[template(path = "unavailable.html")]
struct UnavailablePage;

pub fn home(list: &[FeedbackSubmission]) -> askama::Result<String> {
    let items = list
        .iter()
        .map(|item| HomeItem {
            subject: &item.subject,
            message: &item.message,
            category: item.category.map(Category::as_str).unwrap_or_default(),
            severity: item.severity.map(Severity::as_str).unwrap_or_default(),
        })
        .collect();
    HomePage { items }.render()
}

/// The form, pre-filled with `raw` and showing the first error of each field.
pub fn feedback_form(raw: &RawFeedback, errors: &FieldErrors) -> askama::Result<String> {
    let first = |field: Field| errors.first(field).unwrap_or_default();
    FeedbackPage {
        subject: raw.subject.as_deref().unwrap_or_default(),
        message: raw.message.as_deref().unwrap_or_default(),
        subject_max: SUBJECT_LEN.1,
        message_min: MESSAGE_LEN.0,
        message_max: MESSAGE_LEN.1,
        subject_error: first(Field::Subject),
        message_error: first(Field::Message),
        selects: vec![
            select(
                Field::Category,
                "Category",
                &Category::ALL.map(Category::as_str),
                raw.category.as_deref(),
                first(Field::Category),
            ),
            select(
                Field::Severity,
                "Severity",
                &Severity::ALL.map(Severity::as_str),
                raw.severity.as_deref(),
                first(Field::Severity),
            ),
        ],
    }
    .render()
}

pub fn unavailable() -> askama::Result<String> {
    UnavailablePage.render()
}

fn select<'a>(
    field: Field,
    label: &'static str,
    values: &[&'static str],
    current: Option<&str>,
    error: &'a str,
) -> SelectInput<'a> {
    SelectInput {
        name: field.as_str(),
        label,
        options: values
            .iter()
            .map(|&value| SelectOption {
                value,
                label: capitalize(value),
                selected: current == Some(value),
            })
            .collect(),
        error,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
