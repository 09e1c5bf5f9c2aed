use serde::Serialize;
use std::fmt;
use strum::{EnumIter, IntoStaticStr};
use thiserror::Error;

/// The fields of the registration form, in display order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Cpf,
    BirthDate,
    Password,
    ConfirmPassword,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into())
    }
}

/// A single field rejection. Messages are the ones shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Nome completo é obrigatório")]
    NameRequired,

    #[error("Email é obrigatório")]
    EmailRequired,
    #[error("Email inválido")]
    EmailInvalid,

    #[error("CPF é obrigatório")]
    CpfRequired,
    #[error("CPF deve estar no formato XXX.XXX.XXX-XX")]
    CpfFormat,
    #[error("CPF inválido")]
    CpfInvalid,

    #[error("Data de nascimento é obrigatória")]
    BirthDateRequired,
    #[error("Data deve estar no formato DD/MM/AAAA")]
    BirthDateFormat,
    #[error("Data inválida")]
    BirthDateInvalid,

    #[error("Senha deve ter no mínimo {0} caracteres")]
    PasswordTooShort(usize),

    #[error("Confirmação de senha é obrigatória")]
    ConfirmPasswordRequired,
    #[error("As senhas não coincidem")]
    PasswordMismatch,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::NameRequired => Field::Name,
            FieldError::EmailRequired | FieldError::EmailInvalid => Field::Email,
            FieldError::CpfRequired | FieldError::CpfFormat | FieldError::CpfInvalid => Field::Cpf,
            FieldError::BirthDateRequired
            | FieldError::BirthDateFormat
            | FieldError::BirthDateInvalid => Field::BirthDate,
            FieldError::PasswordTooShort(_) => Field::Password,
            FieldError::ConfirmPasswordRequired | FieldError::PasswordMismatch => {
                Field::ConfirmPassword
            }
        }
    }
}

/// Every rejected field of a registration form, at most one error per field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationErrors(Vec<FieldError>);

impl RegistrationErrors {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        RegistrationErrors(errors)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|err| err.field() == field)
    }

    /// `(field, message)` pairs, ready to be shown next to each input
    pub fn messages(&self) -> Vec<(Field, String)> {
        self.0
            .iter()
            .map(|err| (err.field(), err.to_string()))
            .collect()
    }
}

impl fmt::Display for RegistrationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registration rejected")?;
        for (i, err) in self.0.iter().enumerate() {
            let separator = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", separator, err.field(), err)?;
        }
        Ok(())
    }
}

impl std::error::Error for RegistrationErrors {}
