use crate::calendar_date::is_valid_date_in_year;
use crate::secondary_validation::Validator;
use chrono::{Datelike, Utc};

/// Checks `DD/MM/YYYY` dates against a "current" year, either pinned or read from the wall
/// clock.
pub struct CalendarDateChecker {
    pinned_year: Option<i32>,
}

impl CalendarDateChecker {
    pub fn new(current_year: i32) -> Self {
        Self {
            pinned_year: Some(current_year),
        }
    }

    /// Reads the wall clock on every check, so a long-lived checker follows the new year
    pub fn from_wall_clock() -> Self {
        Self { pinned_year: None }
    }

    pub fn current_year(&self) -> i32 {
        self.pinned_year.unwrap_or_else(|| Utc::now().year())
    }
}

impl Validator for CalendarDateChecker {
    fn is_valid(&self, input: &str) -> bool {
        is_valid_date_in_year(input, self.current_year())
    }
}
