//! Brazilian individual taxpayer numbers (CPF).
//!
//! A CPF is 11 digits where the last two are mod-11 check digits. It is usually displayed
//! grouped as `XXX.XXX.XXX-XX` and sent to the backend as bare digits.

use crate::secondary_validation::{BrazilianCpfChecksum, Validator};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const TAX_ID_DIGIT_COUNT: usize = 11;

lazy_static! {
    static ref DISPLAY_TAX_ID_PATTERN: Regex =
        Regex::new(r"^[0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}$").unwrap();
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum TaxIdError {
    #[error("A CPF must have exactly 11 digits, found {0}")]
    WrongDigitCount(usize),

    #[error("The CPF check digits do not match")]
    InvalidChecksum,
}

/// Validates the check digits of a CPF, ignoring any non-digit characters.
pub fn validate_tax_id(input: &str) -> bool {
    BrazilianCpfChecksum.is_valid(input)
}

/// Removes everything but the ASCII digits. No validation is performed.
pub fn strip_formatting(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Whether `input` is exactly in the grouped `XXX.XXX.XXX-XX` form
pub fn is_formatted_tax_id(input: &str) -> bool {
    DISPLAY_TAX_ID_PATTERN.is_match(input)
}

/// Groups the digits of `input` as `XXX.XXX.XXX-XX`.
///
/// Works as an input mask: extra digits are dropped, and a partial number only gets the
/// separators it has reached (`"5299822"` becomes `"529.982.2"`).
pub fn format_tax_id(input: &str) -> String {
    let mut formatted = String::with_capacity(TAX_ID_DIGIT_COUNT + 3);
    for (i, digit) in input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(TAX_ID_DIGIT_COUNT)
        .enumerate()
    {
        match i {
            3 | 6 => formatted.push('.'),
            9 => formatted.push('-'),
            _ => {}
        }
        formatted.push(digit);
    }
    formatted
}

/// A CPF whose check digits are known to be correct
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxId(String);

impl TaxId {
    /// The 11 bare digits
    pub fn digits(&self) -> &str {
        &self.0
    }

    pub fn formatted(&self) -> String {
        format_tax_id(&self.0)
    }
}

impl FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = strip_formatting(input);
        if digits.len() != TAX_ID_DIGIT_COUNT {
            return Err(TaxIdError::WrongDigitCount(digits.len()));
        }
        if !validate_tax_id(&digits) {
            return Err(TaxIdError::InvalidChecksum);
        }
        Ok(TaxId(digits))
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl Serialize for TaxId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaxId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
