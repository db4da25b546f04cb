//! crates/launchpad_core/src/validation.rs
//!
//! Structural checks on the public form payloads.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::domain::{IdeaSubmission, NewNewsletterSignup};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9._%+'-]+@",
        r"[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    ))
    .expect("email pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Validation error")]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_PATTERN.is_match(email)
}

pub fn validate_newsletter(signup: &NewNewsletterSignup) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if !is_valid_email(&signup.email) {
        errors.push("email", "Invalid email");
    }
    errors.into_result()
}

pub fn validate_idea_submission(submission: &IdeaSubmission) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if !is_valid_email(&submission.email) {
        errors.push("email", "Invalid email format");
    }
    if submission.idea.is_empty() {
        errors.push("idea", "Idea is required");
    }
    if submission.problem_statement.is_empty() {
        errors.push("problem_statement", "Problem statement is required");
    }
    if submission.target_audience.is_empty() {
        errors.push("target_audience", "Target audience is required");
    }
    errors.into_result()
}
