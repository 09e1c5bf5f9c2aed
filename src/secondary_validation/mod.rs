mod brazilian_cpf_checksum;
mod calendar_date_checker;

pub use crate::secondary_validation::brazilian_cpf_checksum::BrazilianCpfChecksum;
pub use crate::secondary_validation::calendar_date_checker::CalendarDateChecker;

/// A total check over free-form user input.
///
/// Implementations never panic: any string maps to a definite answer.
pub trait Validator: Send + Sync {
    fn is_valid(&self, input: &str) -> bool;
}

/// Collects the ASCII digits of `input`, skipping everything else.
fn collect_digits(input: &str) -> Vec<u32> {
    input.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Mod-11 check digit over `digits`, weighted from `digits.len() + 1` down to 2.
/// Results of 10 or 11 collapse to 0.
#[inline]
fn mod11_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let check_digit = 11 - (sum % 11);
    if check_digit >= 10 {
        0
    } else {
        check_digit
    }
}
