//! Submission records and form validation.
//!
//! A [`SubmissionInput`] is whatever the browser sent. [`NewSubmission::validate`]
//! turns it into a record that satisfies every column constraint, or reports
//! all failing fields in form order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Email, SubmissionId};

/// Maximum length (in characters) of the `name` and `email` columns.
pub const MAX_SHORT_TEXT: usize = 128;

/// Raw submission form data, exactly as posted.
///
/// Missing fields deserialize as empty strings so that they surface as
/// validation errors rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionInput {
    pub name: String,
    pub email: String,
    pub category: String,
    pub message: String,
}

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Category,
    Message,
}

impl Field {
    /// Form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Category => "category",
            Self::Message => "message",
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
    pub message: &'static str,
}

/// All validation failures for one submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    fn push(&mut self, field: Field, message: &'static str) {
        self.0.push(ValidationError { field, message });
    }

    /// The first failure; shown as the page-level notice.
    #[must_use]
    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    /// Message for a given field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", error.field.as_str(), error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A validated submission, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub name: String,
    pub email: Email,
    pub category: Category,
    pub message: String,
}

impl NewSubmission {
    /// Validate raw form input.
    ///
    /// Name and email are trimmed; the message is kept as entered but must
    /// contain something other than whitespace.
    ///
    /// # Errors
    ///
    /// Returns every failing field when any constraint is violated.
    pub fn validate(input: &SubmissionInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = input.name.trim();
        if name.is_empty() {
            errors.push(Field::Name, "Povinné pole");
        } else if name.chars().count() > MAX_SHORT_TEXT {
            errors.push(Field::Name, "Jméno může mít nejvýše 128 znaků");
        }

        let email_raw = input.email.trim();
        let email = if email_raw.is_empty() {
            errors.push(Field::Email, "Povinný email");
            None
        } else if email_raw.chars().count() > MAX_SHORT_TEXT {
            errors.push(Field::Email, "Email může mít nejvýše 128 znaků");
            None
        } else {
            match Email::parse(email_raw) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.push(Field::Email, "Neplatný email");
                    None
                }
            }
        };

        let category = match input.category.parse::<Category>() {
            Ok(category) => Some(category),
            Err(_) => {
                errors.push(Field::Category, "Vyberte platnou kategorii");
                None
            }
        };

        if input.message.trim().is_empty() {
            errors.push(Field::Message, "Povinné pole");
        }

        match (email, category) {
            (Some(email), Some(category)) if errors.is_empty() => Ok(Self {
                name: name.to_owned(),
                email,
                category,
                message: input.message.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// A persisted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub name: String,
    pub email: Email,
    pub category: Category,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
