use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DisplayFromStr;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
pub const DEFAULT_MAX_FORM_QUOTA_COUNT: u32 = 30;
pub const DEFAULT_CATEGORY: &str = "OUTROS";

/// Limits applied by the registration and gift forms.
///
/// Missing fields take their default, so `{}` is a valid configuration. Prices are written
/// as strings (`"999999.00"`) to keep them exact.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_password_length: usize,

    /// Largest quota count the gift form accepts. The calculator itself clamps at 100.
    pub max_form_quota_count: u32,

    #[serde_as(as = "DisplayFromStr")]
    pub max_gift_price: Decimal,

    pub default_category: String,

    /// Pins the "current year" used to bound birth dates. `None` reads the wall clock.
    pub current_year: Option<i32>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            max_form_quota_count: DEFAULT_MAX_FORM_QUOTA_COUNT,
            max_gift_price: Decimal::new(999_999_00, 2),
            default_category: DEFAULT_CATEGORY.to_string(),
            current_year: None,
        }
    }
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_password_length(&self, min_password_length: usize) -> Self {
        self.mutate_clone(|x| x.min_password_length = min_password_length)
    }

    pub fn max_form_quota_count(&self, max_form_quota_count: u32) -> Self {
        self.mutate_clone(|x| x.max_form_quota_count = max_form_quota_count)
    }

    pub fn max_gift_price(&self, max_gift_price: Decimal) -> Self {
        self.mutate_clone(|x| x.max_gift_price = max_gift_price)
    }

    pub fn default_category(&self, default_category: &str) -> Self {
        self.mutate_clone(|x| x.default_category = default_category.to_owned())
    }

    pub fn current_year(&self, current_year: i32) -> Self {
        self.mutate_clone(|x| x.current_year = Some(current_year))
    }

    fn mutate_clone(&self, modify: impl FnOnce(&mut Self)) -> Self {
        let mut clone = self.clone();
        modify(&mut clone);
        clone
    }
}
