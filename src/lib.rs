// This blocks accidental use of `println`. If one is actually needed, you can
// override with `#[allow(clippy::print_stdout)]`.
#![deny(clippy::print_stdout)]

mod calendar_date;
mod config;
mod gift;
mod list;
mod quota;
mod registration;
mod secondary_validation;
mod session;
mod stats;
mod tax_id;

// This is the public API of the gift registry core library
pub use calendar_date::{
    days_in_month, is_leap_year, is_valid_date, is_valid_date_in_year, to_display_form,
    to_machine_form, CalendarDate, DateConversionError, MIN_YEAR,
};
pub use config::ValidationConfig;
pub use gift::{
    format_brl, Gift, GiftDraft, GiftPayload, GiftStatus, GiftValidationError, GiftValidator,
    ListProgress,
};
pub use list::{
    event_type_id, normalize_slug, Categories, Choice, EventTypes, ListDraft, ListPayload,
    ListValidationError, ListValidator,
};
pub use quota::{
    clamp_quota_count, parse_amount, read_amount, split, suggested_quota_count, Installment,
    QuotaSplit, MAX_QUOTA_COUNT, MIN_QUOTA_COUNT,
};
pub use registration::{
    is_valid_email, Field, FieldError, RegistrationErrors, RegistrationForm,
    RegistrationRequest, RegistrationValidator,
};
pub use secondary_validation::{BrazilianCpfChecksum, CalendarDateChecker, Validator};
pub use session::{Session, SessionContext, SessionError, User};
pub use tax_id::{
    format_tax_id, is_formatted_tax_id, strip_formatting, validate_tax_id, TaxId, TaxIdError,
};
