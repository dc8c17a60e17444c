//! Public form intake: contact messages, training and job applications.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::info;

use crate::constants::patterns;
use crate::db::repositories::submissions::SubmissionKind;
use crate::db::{ContactInput, JobApplicationInput, Store, TrainingApplicationInput, WriteOutcome};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::EMAIL).expect("Invalid regex pattern defined in code"));

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::MOBILE).expect("Invalid regex pattern defined in code"));

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i32 },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for SubmissionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SubmissionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrainingForm {
    pub name: Option<String>,
    pub degree: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobForm {
    pub name: Option<String>,
    pub degree: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub position: Option<String>,
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[must_use]
pub fn is_valid_mobile(phone: &str) -> bool {
    MOBILE_RE.is_match(phone)
}

fn required(value: Option<String>, message: &str) -> Result<String, SubmissionError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SubmissionError::Validation(message.to_string())),
    }
}

fn optional(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn check_email(email: &str) -> Result<(), SubmissionError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(SubmissionError::Validation(
            "Please enter a valid email address".to_string(),
        ))
    }
}

/// Phone is optional; only a supplied number is checked.
fn check_phone(phone: &str) -> Result<(), SubmissionError> {
    if phone.is_empty() || is_valid_mobile(phone) {
        Ok(())
    } else {
        Err(SubmissionError::Validation(
            "Please enter a valid 11-digit mobile number".to_string(),
        ))
    }
}

impl ContactForm {
    pub fn validate(self) -> Result<ContactInput, SubmissionError> {
        const MISSING: &str = "Name, email and message are required";
        let input = ContactInput {
            name: required(self.name, MISSING)?,
            email: required(self.email, MISSING)?,
            subject: optional(self.subject),
            message: required(self.message, MISSING)?,
        };
        check_email(&input.email)?;
        Ok(input)
    }
}

impl TrainingForm {
    pub fn validate(self) -> Result<TrainingApplicationInput, SubmissionError> {
        const MISSING: &str = "Name and email are required";
        let input = TrainingApplicationInput {
            name: required(self.name, MISSING)?,
            degree: optional(self.degree),
            phone: optional(self.phone),
            email: required(self.email, MISSING)?,
            message: optional(self.message),
        };
        check_email(&input.email)?;
        check_phone(&input.phone)?;
        Ok(input)
    }
}

impl JobForm {
    pub fn validate(self) -> Result<JobApplicationInput, SubmissionError> {
        const MISSING: &str = "Name, email and position are required";
        let input = JobApplicationInput {
            name: required(self.name, MISSING)?,
            degree: optional(self.degree),
            phone: optional(self.phone),
            email: required(self.email, MISSING)?,
            message: optional(self.message),
            position: required(self.position, MISSING)?,
        };
        check_email(&input.email)?;
        check_phone(&input.phone)?;
        Ok(input)
    }
}

pub struct FormService {
    store: Store,
}

impl FormService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn submit_contact(&self, form: ContactForm) -> Result<i32, SubmissionError> {
        let input = form.validate()?;
        let id = self.store.submissions().add_contact(input).await?;
        info!(id, "Contact message received");
        Ok(id)
    }

    pub async fn submit_training(&self, form: TrainingForm) -> Result<i32, SubmissionError> {
        let input = form.validate()?;
        let id = self
            .store
            .submissions()
            .add_training_application(input)
            .await?;
        info!(id, "Training application received");
        Ok(id)
    }

    pub async fn submit_job(&self, form: JobForm) -> Result<i32, SubmissionError> {
        let input = form.validate()?;
        let id = self.store.submissions().add_job_application(input).await?;
        info!(id, "Job application received");
        Ok(id)
    }

    pub async fn delete(&self, kind: SubmissionKind, id: i32) -> Result<(), SubmissionError> {
        match self.store.submissions().delete(kind, id).await? {
            WriteOutcome::Updated => {
                info!(kind = kind.label(), id, "Submission deleted");
                Ok(())
            }
            WriteOutcome::NotFound => Err(SubmissionError::NotFound {
                kind: kind.label(),
                id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_mobile_pattern() {
        assert!(is_valid_mobile("13812345678"));
        assert!(is_valid_mobile("19912345678"));
        assert!(!is_valid_mobile("12812345678"));
        assert!(!is_valid_mobile("1381234567"));
        assert!(!is_valid_mobile("138123456789"));
        assert!(!is_valid_mobile("phone"));
    }

    #[test]
    fn test_contact_requires_fields() {
        let err = ContactForm {
            name: s("Ann"),
            email: s("ann@example.com"),
            ..ContactForm::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));

        let input = ContactForm {
            name: s(" Ann "),
            email: s("ann@example.com"),
            subject: None,
            message: s("Hello"),
        }
        .validate()
        .unwrap();
        assert_eq!(input.name, "Ann");
        assert_eq!(input.subject, "");
    }

    #[test]
    fn test_contact_rejects_bad_email() {
        let err = ContactForm {
            name: s("Ann"),
            email: s("not-an-email"),
            subject: None,
            message: s("Hello"),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");
    }

    #[test]
    fn test_phone_checked_only_when_supplied() {
        let base = || TrainingForm {
            name: s("Bo"),
            email: s("bo@example.com"),
            ..TrainingForm::default()
        };

        assert_eq!(base().validate().unwrap().phone, "");

        let ok = TrainingForm {
            phone: s("13912345678"),
            ..base()
        };
        assert!(ok.validate().is_ok());

        let bad = TrainingForm {
            phone: s("12345"),
            ..base()
        };
        assert!(matches!(
            bad.validate(),
            Err(SubmissionError::Validation(_))
        ));
    }

    #[test]
    fn test_job_requires_position() {
        let form = JobForm {
            name: s("Cy"),
            email: s("cy@example.com"),
            position: s("  "),
            ..JobForm::default()
        };
        assert!(matches!(
            form.validate(),
            Err(SubmissionError::Validation(_))
        ));
    }
}
