use metrics::{counter, Counter};

const FORM: &str = "form";
const FIELD: &str = "field";

/// Counters for one form. Handles are taken from the recorder installed when the form
/// validator is created.
pub struct FormMetrics {
    form: &'static str,
    pub submissions: Counter,
    pub accepted: Counter,
}

impl FormMetrics {
    pub fn new(form: &'static str) -> Self {
        FormMetrics {
            form,
            submissions: counter!("form.submissions", FORM => form),
            accepted: counter!("form.accepted", FORM => form),
        }
    }

    /// One rejected field of a submission
    pub fn record_rejection(&self, field: &'static str) {
        counter!("form.rejections", FORM => self.form, FIELD => field).increment(1);
    }
}

pub struct QuotaMetrics {
    pub previews: Counter,
    /// Previews whose requested count had to be clamped into range
    pub clamped_counts: Counter,
}

impl QuotaMetrics {
    pub fn new() -> Self {
        QuotaMetrics {
            previews: counter!("quota.previews"),
            clamped_counts: counter!("quota.clamped_counts"),
        }
    }
}

impl Default for QuotaMetrics {
    fn default() -> Self {
        QuotaMetrics::new()
    }
}
