//! Splitting a gift price into quotas that several guests can fund.
//!
//! Amounts are rounded to whole cents once, up front, and every later step is integer
//! arithmetic on cents. Whatever does not divide evenly goes to a single final quota.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub const MIN_QUOTA_COUNT: u32 = 1;
/// Upper bound applied to any requested count, whatever the form allows
pub const MAX_QUOTA_COUNT: u32 = 100;

const CENTS_SCALE: u32 = 2;
/// Past this many powers of ten any non-zero amount has overflowed or vanished
const MAX_EXPONENT_STEPS: u64 = 64;

lazy_static! {
    static ref LEADING_NUMBER_PATTERN: Regex =
        Regex::new(r"^([+-]?)([0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE]([+-]?[0-9]+))?").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSplit {
    count: u32,
    base_cents: i64,
    last_cents: i64,
}

/// `quantity` quotas of `value` each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installment {
    pub quantity: u32,
    pub value: Decimal,
}

impl QuotaSplit {
    /// Number of quotas after clamping
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn base(&self) -> Decimal {
        Decimal::new(self.base_cents, CENTS_SCALE)
    }

    /// The final quota, which absorbs the whole remainder
    pub fn last(&self) -> Decimal {
        Decimal::new(self.last_cents, CENTS_SCALE)
    }

    pub fn base_cents(&self) -> i64 {
        self.base_cents
    }

    pub fn last_cents(&self) -> i64 {
        self.last_cents
    }

    pub fn has_remainder(&self) -> bool {
        self.base_cents != self.last_cents
    }

    /// Sum of every quota, in cents
    pub fn total_cents(&self) -> i64 {
        self.base_cents
            .saturating_mul(i64::from(self.count - 1))
            .saturating_add(self.last_cents)
    }

    /// How the split reads to a guest: `(count - 1)` quotas of `base` and one of `last`
    /// when there is a remainder, otherwise `count` quotas of `base`.
    pub fn installments(&self) -> Vec<Installment> {
        if self.has_remainder() {
            vec![
                Installment {
                    quantity: self.count - 1,
                    value: self.base(),
                },
                Installment {
                    quantity: 1,
                    value: self.last(),
                },
            ]
        } else {
            vec![Installment {
                quantity: self.count,
                value: self.base(),
            }]
        }
    }
}

/// Clamps a user-typed quota count into `MIN_QUOTA_COUNT..=MAX_QUOTA_COUNT`
pub fn clamp_quota_count(count: i64) -> u32 {
    // The clamped value always fits
    count.clamp(i64::from(MIN_QUOTA_COUNT), i64::from(MAX_QUOTA_COUNT)) as u32
}

/// Splits `amount` into `count` quotas.
///
/// `count` is clamped rather than rejected. A non-positive amount gives an all-zero split.
pub fn split(amount: Decimal, count: i64) -> QuotaSplit {
    let count = clamp_quota_count(count);
    if amount <= Decimal::ZERO {
        return QuotaSplit {
            count,
            base_cents: 0,
            last_cents: 0,
        };
    }

    let total_cents = to_cents(amount);
    let base_cents = total_cents / i64::from(count);
    let remainder_cents = total_cents - base_cents * i64::from(count);

    QuotaSplit {
        count,
        base_cents,
        last_cents: base_cents + remainder_cents,
    }
}

/// Rounds to the nearest cent, saturating at `i64::MAX` cents
fn to_cents(amount: Decimal) -> i64 {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .unwrap_or(i64::MAX)
}

/// Reads the leading number of a free-text price field.
///
/// Trailing garbage is ignored (`"12.5abc"` is 12.5) and text with no leading number is 0,
/// so the preview always has something to show.
pub fn parse_amount(text: &str) -> Decimal {
    read_amount(text).unwrap_or(Decimal::ZERO)
}

/// Like [parse_amount], but `None` when the text does not start with a number.
///
/// An exponent is honored (`"1e3"` is 1000). Amounts too large for a `Decimal` saturate at
/// `Decimal::MAX` (or `MIN`), amounts too small to represent become 0.
pub fn read_amount(text: &str) -> Option<Decimal> {
    let captures = LEADING_NUMBER_PATTERN.captures(text.trim_start())?;
    let negative = &captures[1] == "-";

    let mantissa = captures[2].trim_end_matches('.');
    let mantissa = match mantissa.strip_prefix('.') {
        Some(fraction) => format!("0.{fraction}"),
        None => mantissa.to_string(),
    };
    let Ok(mut amount) = Decimal::from_str(&mantissa) else {
        // only digits reach this point, so the integer part is too long
        return Some(saturated(negative));
    };

    if let Some(exponent) = captures.get(3) {
        let exponent = exponent.as_str();
        let exponent = exponent.parse::<i64>().unwrap_or(if exponent.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        });
        let steps = exponent.unsigned_abs().min(MAX_EXPONENT_STEPS);
        for _ in 0..steps {
            amount = if exponent > 0 {
                match amount.checked_mul(Decimal::TEN) {
                    Some(amount) => amount,
                    None => return Some(saturated(negative)),
                }
            } else {
                amount.checked_div(Decimal::TEN).unwrap_or(Decimal::ZERO)
            };
        }
    }

    Some(if negative { -amount } else { amount })
}

fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// A starting quota count for a gift being edited, since the count itself is not stored:
/// one quota per R$ 100, at least one.
pub fn suggested_quota_count(price: Decimal) -> u32 {
    if price <= Decimal::ZERO {
        return MIN_QUOTA_COUNT;
    }
    (price / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(u32::MAX)
        .max(MIN_QUOTA_COUNT)
}
