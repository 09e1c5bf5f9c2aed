//! Gift form of a list, and the progress summary shown on the public page.

use crate::config::ValidationConfig;
use crate::quota::{
    clamp_quota_count, parse_amount, read_amount, split, suggested_quota_count, QuotaSplit,
};
use crate::stats::{FormMetrics, QuotaMetrics};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum GiftValidationError {
    #[error("Nome do presente é obrigatório")]
    NameRequired,

    #[error("Valor é obrigatório")]
    PriceRequired,
    #[error("Valor inválido")]
    PriceInvalid,
    #[error("O valor máximo para um presente é de R$ {}", format_brl(.0))]
    PriceAboveMaximum(Decimal),

    #[error("O máximo de cotas é {0}")]
    QuotaCountAboveMaximum(u32),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GiftStatus {
    Available,
    Reserved,
    Purchased,
}

/// A gift as returned by the backend
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: GiftStatus,
    #[serde(default)]
    pub category: Option<String>,
}

/// The gift form as typed by the list owner
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GiftDraft {
    pub name: String,
    pub description: String,
    /// Free text, read with [read_amount]
    pub price: String,
    pub image_url: String,
    pub category: String,
    /// Only used for the preview, never sent
    pub quota_count: i64,
}

impl Default for GiftDraft {
    fn default() -> Self {
        GiftDraft {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            image_url: String::new(),
            category: String::new(),
            quota_count: 1,
        }
    }
}

/// Body of the gift create and update requests
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GiftPayload {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub category: String,
}

pub struct GiftValidator {
    max_gift_price: Decimal,
    max_form_quota_count: u32,
    default_category: String,
    metrics: FormMetrics,
    quota_metrics: QuotaMetrics,
}

impl GiftValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        GiftValidator {
            max_gift_price: config.max_gift_price,
            max_form_quota_count: config.max_form_quota_count,
            default_category: config.default_category.clone(),
            metrics: FormMetrics::new("gift"),
            quota_metrics: QuotaMetrics::new(),
        }
    }

    pub fn validate(&self, draft: &GiftDraft) -> Result<GiftPayload, GiftValidationError> {
        self.metrics.submissions.increment(1);

        if draft.name.trim().is_empty() {
            self.metrics.record_rejection("name");
            return Err(GiftValidationError::NameRequired);
        }
        if draft.price.trim().is_empty() {
            self.metrics.record_rejection("price");
            return Err(GiftValidationError::PriceRequired);
        }
        let Some(price) = read_amount(&draft.price) else {
            self.metrics.record_rejection("price");
            return Err(GiftValidationError::PriceInvalid);
        };
        if price > self.max_gift_price {
            self.metrics.record_rejection("price");
            return Err(GiftValidationError::PriceAboveMaximum(self.max_gift_price));
        }
        if draft.quota_count > i64::from(self.max_form_quota_count) {
            self.metrics.record_rejection("quotaCount");
            return Err(GiftValidationError::QuotaCountAboveMaximum(
                self.max_form_quota_count,
            ));
        }

        self.metrics.accepted.increment(1);
        Ok(GiftPayload {
            name: draft.name.clone(),
            description: draft.description.clone(),
            price,
            image_url: (!draft.image_url.is_empty()).then(|| draft.image_url.clone()),
            category: if draft.category.is_empty() {
                self.default_category.clone()
            } else {
                draft.category.clone()
            },
        })
    }

    /// The live quota preview for the draft's price and quota count
    pub fn preview(&self, draft: &GiftDraft) -> QuotaSplit {
        self.quota_metrics.previews.increment(1);
        if i64::from(clamp_quota_count(draft.quota_count)) != draft.quota_count {
            self.quota_metrics.clamped_counts.increment(1);
            debug!(requested = draft.quota_count, "quota count clamped");
        }
        split(parse_amount(&draft.price), draft.quota_count)
    }

    /// Fills the form to edit an existing gift. The quota count is not stored by the
    /// backend, so a count is suggested from the price.
    pub fn edit_draft(&self, gift: &Gift) -> GiftDraft {
        GiftDraft {
            name: gift.name.clone(),
            description: gift.description.clone().unwrap_or_default(),
            price: gift.price.to_string(),
            image_url: gift.image_url.clone().unwrap_or_default(),
            category: gift
                .category
                .clone()
                .unwrap_or_else(|| self.default_category.clone()),
            quota_count: i64::from(suggested_quota_count(gift.price)),
        }
    }
}

/// How far along a list is: gifts no longer available count as given. The raised value
/// saturates instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListProgress {
    pub total: usize,
    pub purchased: usize,
    pub raised: Decimal,
}

impl ListProgress {
    pub fn from_gifts(gifts: &[Gift]) -> Self {
        gifts.iter().fold(ListProgress::default(), |mut progress, gift| {
            progress.total += 1;
            if gift.status != GiftStatus::Available {
                progress.purchased += 1;
                progress.raised = progress.raised.saturating_add(gift.price);
            }
            progress
        })
    }
}

/// Formats an amount the Brazilian way, `1234567.8` as `1.234.567,80`
pub fn format_brl(amount: &Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{rounded:.2}");
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{fraction}")
}

#[cfg(test)]
mod test {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(price: &str, quota_count: i64) -> GiftDraft {
        GiftDraft {
            name: "Jogo de panelas".to_string(),
            price: price.to_string(),
            quota_count,
            ..GiftDraft::default()
        }
    }

    #[test]
    fn should_build_payload() {
        let validator = GiftValidator::new(&ValidationConfig::default());
        let payload = validator.validate(&draft("450.90", 3)).unwrap();
        assert_eq!(payload.price, dec!(450.90));
        assert_eq!(payload.category, "OUTROS");
        assert_eq!(payload.image_url, None);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "name": "Jogo de panelas",
                "description": "",
                "price": 450.9,
                "category": "OUTROS",
            })
        );

        let mut with_image = draft("10", 1);
        with_image.image_url = "https://img.example/p.png".to_string();
        with_image.category = "CASA".to_string();
        let payload = validator.validate(&with_image).unwrap();
        assert_eq!(payload.image_url.as_deref(), Some("https://img.example/p.png"));
        assert_eq!(payload.category, "CASA");
    }

    #[test]
    fn should_reject_price_above_maximum() {
        let validator = GiftValidator::new(&ValidationConfig::default());
        assert!(validator.validate(&draft("999999", 1)).is_ok());
        let err = validator.validate(&draft("999999.01", 1)).unwrap_err();
        assert_eq!(err, GiftValidationError::PriceAboveMaximum(dec!(999999.00)));
        assert_eq!(
            err.to_string(),
            "O valor máximo para um presente é de R$ 999.999,00"
        );
    }

    #[test]
    fn should_require_name_and_price() {
        let validator = GiftValidator::new(&ValidationConfig::default());
        let err = validator.validate(&GiftDraft::default()).unwrap_err();
        assert_eq!(err, GiftValidationError::NameRequired);
        assert_eq!(err.to_string(), "Nome do presente é obrigatório");

        let mut blank_name = draft("100", 1);
        blank_name.name = "   ".to_string();
        assert_eq!(
            validator.validate(&blank_name).unwrap_err(),
            GiftValidationError::NameRequired
        );

        let err = validator.validate(&draft("", 1)).unwrap_err();
        assert_eq!(err, GiftValidationError::PriceRequired);
        assert_eq!(err.to_string(), "Valor é obrigatório");
        assert_eq!(
            validator.validate(&draft("  ", 1)).unwrap_err(),
            GiftValidationError::PriceRequired
        );

        for price in ["abc", "R$ 10", "-", "."] {
            let err = validator.validate(&draft(price, 1)).unwrap_err();
            assert_eq!(err, GiftValidationError::PriceInvalid, "{price:?}");
            assert_eq!(err.to_string(), "Valor inválido");
        }

        // a zero price is still a price
        assert_eq!(validator.validate(&draft("0", 1)).unwrap().price, Decimal::ZERO);
    }

    #[test]
    fn exponent_prices_are_read_in_full() {
        let validator = GiftValidator::new(&ValidationConfig::default());
        assert_eq!(validator.validate(&draft("1e3", 1)).unwrap().price, dec!(1000));
        assert_eq!(
            validator.validate(&draft("1e7", 1)).unwrap_err(),
            GiftValidationError::PriceAboveMaximum(dec!(999999.00))
        );
        assert_eq!(
            validator.validate(&draft("1e400", 1)).unwrap_err(),
            GiftValidationError::PriceAboveMaximum(dec!(999999.00))
        );
    }

    #[test]
    fn should_reject_quota_count_above_form_maximum() {
        let validator = GiftValidator::new(&ValidationConfig::default());
        assert!(validator.validate(&draft("100", 30)).is_ok());
        let err = validator.validate(&draft("100", 31)).unwrap_err();
        assert_eq!(err, GiftValidationError::QuotaCountAboveMaximum(30));
        assert_eq!(err.to_string(), "O máximo de cotas é 30");
    }

    #[test]
    fn preview_follows_the_draft() {
        let validator = GiftValidator::new(&ValidationConfig::default());
        let quotas = validator.preview(&draft("100", 3));
        assert_eq!(quotas.base(), dec!(33.33));
        assert_eq!(quotas.last(), dec!(33.34));

        // unreadable price and count still give something to show
        let quotas = validator.preview(&draft("abc", 0));
        assert_eq!(quotas.count(), 1);
        assert_eq!(quotas.base(), Decimal::ZERO);
    }

    #[test]
    fn edit_draft_suggests_quota_count() {
        let validator = GiftValidator::new(&ValidationConfig::default());
        let gift: Gift = serde_json::from_str(
            r#"{"id": "g1", "name": "Viagem", "price": "1250.00", "status": "AVAILABLE"}"#,
        )
        .unwrap();
        let draft = validator.edit_draft(&gift);
        assert_eq!(draft.price, "1250.00");
        assert_eq!(draft.quota_count, 13);
        assert_eq!(draft.category, "OUTROS");
        assert_eq!(draft.description, "");
    }

    #[test]
    fn should_summarize_progress() {
        let gifts: Vec<Gift> = serde_json::from_str(
            r#"[
                {"id": "1", "name": "a", "price": 100, "status": "AVAILABLE"},
                {"id": "2", "name": "b", "price": "250.50", "status": "PURCHASED"},
                {"id": "3", "name": "c", "price": 49.5, "status": "RESERVED"}
            ]"#,
        )
        .unwrap();
        let progress = ListProgress::from_gifts(&gifts);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.purchased, 2);
        assert_eq!(progress.raised, dec!(300.00));

        assert_eq!(ListProgress::from_gifts(&[]), ListProgress::default());
    }

    #[test]
    fn raised_value_saturates() {
        let gifts: Vec<Gift> = serde_json::from_str(
            r#"[
                {"id": "1", "name": "a", "price": "50000000000000000000000000000", "status": "PURCHASED"},
                {"id": "2", "name": "b", "price": "50000000000000000000000000000", "status": "PURCHASED"},
                {"id": "3", "name": "c", "price": "10", "status": "RESERVED"}
            ]"#,
        )
        .unwrap();
        let progress = ListProgress::from_gifts(&gifts);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.purchased, 3);
        assert_eq!(progress.raised, Decimal::MAX);
    }

    #[test]
    fn should_format_brl() {
        assert_eq!(format_brl(&dec!(999999)), "999.999,00");
        assert_eq!(format_brl(&dec!(1234567.8)), "1.234.567,80");
        assert_eq!(format_brl(&dec!(33.335)), "33,34");
        assert_eq!(format_brl(&dec!(0)), "0,00");
        assert_eq!(format_brl(&dec!(100)), "100,00");
        assert_eq!(format_brl(&dec!(-1500)), "-1.500,00");
    }
}
