//! Account registration form.
//!
//! Checks every field the way the sign-up page does and, when the whole form passes,
//! builds the request the backend expects: the CPF as bare digits and the birth date as an
//! ISO 8601 instant.

mod error;

pub use error::{Field, FieldError, RegistrationErrors};

use crate::calendar_date::{to_machine_form, CalendarDate};
use crate::config::ValidationConfig;
use crate::secondary_validation::{CalendarDateChecker, Validator};
use crate::stats::FormMetrics;
use crate::tax_id::{is_formatted_tax_id, TaxId};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use tracing::debug;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(
        r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$"
    )
    .unwrap();
}

/// The registration form as typed by the user
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    /// `XXX.XXX.XXX-XX`
    pub cpf: String,
    /// `DD/MM/YYYY`
    pub birth_date: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body of the account creation request
#[derive(Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub cpf: TaxId,
    pub birth_date: String,
    pub password: String,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("cpf", &self.cpf)
            .field("birth_date", &self.birth_date)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

pub struct RegistrationValidator {
    min_password_length: usize,
    date_checker: CalendarDateChecker,
    metrics: FormMetrics,
}

impl RegistrationValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        let date_checker = match config.current_year {
            Some(year) => CalendarDateChecker::new(year),
            None => CalendarDateChecker::from_wall_clock(),
        };
        RegistrationValidator {
            min_password_length: config.min_password_length,
            date_checker,
            metrics: FormMetrics::new("registration"),
        }
    }

    /// Checks a single field, e.g. when it loses focus. Returns the first failing check.
    pub fn validate_field(&self, form: &RegistrationForm, field: Field) -> Option<FieldError> {
        match field {
            Field::Name => form.name.is_empty().then_some(FieldError::NameRequired),
            Field::Email => {
                if form.email.is_empty() {
                    Some(FieldError::EmailRequired)
                } else if !is_valid_email(&form.email) {
                    Some(FieldError::EmailInvalid)
                } else {
                    None
                }
            }
            Field::Cpf => {
                if form.cpf.is_empty() {
                    Some(FieldError::CpfRequired)
                } else if !is_formatted_tax_id(&form.cpf) {
                    Some(FieldError::CpfFormat)
                } else if form.cpf.parse::<TaxId>().is_err() {
                    Some(FieldError::CpfInvalid)
                } else {
                    None
                }
            }
            Field::BirthDate => {
                if form.birth_date.is_empty() {
                    Some(FieldError::BirthDateRequired)
                } else if CalendarDate::parse_display(&form.birth_date).is_none() {
                    Some(FieldError::BirthDateFormat)
                } else if !self.date_checker.is_valid(&form.birth_date) {
                    Some(FieldError::BirthDateInvalid)
                } else {
                    None
                }
            }
            // counted in UTF-16 units, like the browser form
            Field::Password => (form.password.encode_utf16().count() < self.min_password_length)
                .then_some(FieldError::PasswordTooShort(self.min_password_length)),
            Field::ConfirmPassword => {
                if form.confirm_password.is_empty() {
                    Some(FieldError::ConfirmPasswordRequired)
                } else if form.confirm_password != form.password {
                    Some(FieldError::PasswordMismatch)
                } else {
                    None
                }
            }
        }
    }

    /// Checks the whole form and builds the request when every field passes
    pub fn validate(
        &self,
        form: &RegistrationForm,
    ) -> Result<RegistrationRequest, RegistrationErrors> {
        self.metrics.submissions.increment(1);

        let errors: Vec<FieldError> = Field::iter()
            .filter_map(|field| self.validate_field(form, field))
            .collect();
        if !errors.is_empty() {
            return Err(self.reject(errors));
        }

        let (cpf, birth_date) = match (
            form.cpf.parse::<TaxId>(),
            to_machine_form(&form.birth_date),
        ) {
            (Ok(cpf), Ok(birth_date)) => (cpf, birth_date),
            (Err(_), _) => return Err(self.reject(vec![FieldError::CpfInvalid])),
            (_, Err(_)) => return Err(self.reject(vec![FieldError::BirthDateInvalid])),
        };

        self.metrics.accepted.increment(1);
        debug!("registration form accepted");
        Ok(RegistrationRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            cpf,
            birth_date,
            password: form.password.clone(),
        })
    }

    fn reject(&self, errors: Vec<FieldError>) -> RegistrationErrors {
        for err in &errors {
            self.metrics.record_rejection(err.field().into());
        }
        debug!(rejected_fields = errors.len(), "registration form rejected");
        RegistrationErrors::new(errors)
    }
}

/// Address shape check: a local part, an `@`, and dotted domain labels ending in a TLD of
/// at least two letters. Leading dots and `..` are refused in the whole address.
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_PATTERN.is_match(email)
}
