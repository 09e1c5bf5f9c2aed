//! Creating a gift list, and the pickers that grow with what the owner types.
//!
//! The slug is the list's public link, so it is normalized as it is typed: lowercase,
//! whitespace runs become `-`, anything else outside `[a-z0-9-]` is dropped.

use crate::gift::Gift;
use crate::stats::FormMetrics;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_SLUG_CHARACTER: Regex = Regex::new(r"[^a-z0-9-]").unwrap();
    static ref DEFAULT_EVENT_TYPES: Vec<Choice> = vec![
        Choice::new("CASAMENTO", "Casamento"),
        Choice::new("CHA_CASA_NOVA", "Chá de Casa Nova"),
        Choice::new("CHA_DE_BEBE", "Chá de Bebê"),
        Choice::new("ANIVERSARIO", "Aniversário"),
        Choice::new("OUTROS", "Outros"),
    ];
    static ref DEFAULT_CATEGORIES: Vec<Choice> = vec![
        Choice::new("VIAGEM", "Viagem"),
        Choice::new("CASA", "Casa"),
        Choice::new("EXPERIENCIA", "Experiência"),
        Choice::new("OUTROS", "Outros"),
    ];
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ListValidationError {
    #[error("Nome do evento é obrigatório")]
    TitleRequired,

    #[error("Link personalizado é obrigatório")]
    SlugRequired,

    #[error("Data do evento inválida")]
    EventDateInvalid,
}

pub fn normalize_slug(input: &str) -> String {
    let lowered = input.to_lowercase();
    let dashed = WHITESPACE_RUN.replace_all(&lowered, "-");
    NON_SLUG_CHARACTER.replace_all(&dashed, "").into_owned()
}

/// The id of a custom event type: `"  chá de panela "` becomes `"CHÁ_DE_PANELA"`
pub fn event_type_id(label: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&label.trim().to_uppercase(), "_")
        .into_owned()
}

/// One entry of a picker: the id sent to the backend and the label shown
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

impl Choice {
    pub fn new(id: &str, label: &str) -> Self {
        Choice {
            id: id.to_owned(),
            label: label.to_owned(),
        }
    }
}

/// Event types offered when creating a list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventTypes(Vec<Choice>);

impl Default for EventTypes {
    fn default() -> Self {
        EventTypes(DEFAULT_EVENT_TYPES.clone())
    }
}

impl EventTypes {
    pub fn choices(&self) -> &[Choice] {
        &self.0
    }

    /// Adds a typed event type unless its id is already offered, and returns the id to
    /// select. Blank input adds nothing.
    pub fn add_custom(&mut self, label: &str) -> Option<String> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let id = event_type_id(label);
        if !self.0.iter().any(|choice| choice.id == id) {
            self.0.push(Choice::new(&id, label));
        }
        Some(id)
    }
}

/// Gift categories offered by the gift form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Categories(Vec<Choice>);

impl Default for Categories {
    fn default() -> Self {
        Categories(DEFAULT_CATEGORIES.clone())
    }
}

impl Categories {
    /// The default categories plus every other category already used by a gift of the list
    pub fn from_gifts(gifts: &[Gift]) -> Self {
        let mut categories = Categories::default();
        for id in gifts.iter().filter_map(|gift| gift.category.as_deref()) {
            if !id.is_empty() && !categories.0.iter().any(|choice| choice.id == id) {
                categories.0.push(Choice::new(id, id));
            }
        }
        categories
    }

    pub fn choices(&self) -> &[Choice] {
        &self.0
    }

    /// Adds a typed category and returns the id to select. A category whose label matches,
    /// ignoring case, is reused instead of duplicated. Blank input adds nothing.
    pub fn add_custom(&mut self, label: &str) -> Option<String> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let wanted = label.to_lowercase();
        if let Some(existing) = self.0.iter().find(|c| c.label.to_lowercase() == wanted) {
            return Some(existing.id.clone());
        }
        self.0.push(Choice::new(label, label));
        Some(label.to_owned())
    }
}

/// The list creation form as typed by the owner
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ListDraft {
    pub title: String,
    pub slug: String,
    pub description: String,
    /// `YYYY-MM-DD`, as given by a date input
    pub event_date: String,
    pub event_type: String,
}

/// Body of the list creation request. Empty optional fields are left out.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListPayload {
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

pub struct ListValidator {
    metrics: FormMetrics,
}

impl Default for ListValidator {
    fn default() -> Self {
        ListValidator::new()
    }
}

impl ListValidator {
    pub fn new() -> Self {
        ListValidator {
            metrics: FormMetrics::new("list"),
        }
    }

    pub fn validate(&self, draft: &ListDraft) -> Result<ListPayload, ListValidationError> {
        self.metrics.submissions.increment(1);

        if draft.title.trim().is_empty() {
            self.metrics.record_rejection("title");
            return Err(ListValidationError::TitleRequired);
        }
        let slug = normalize_slug(&draft.slug);
        if slug.is_empty() {
            self.metrics.record_rejection("slug");
            return Err(ListValidationError::SlugRequired);
        }
        if !draft.event_date.is_empty()
            && NaiveDate::parse_from_str(&draft.event_date, EVENT_DATE_FORMAT).is_err()
        {
            self.metrics.record_rejection("eventDate");
            return Err(ListValidationError::EventDateInvalid);
        }

        self.metrics.accepted.increment(1);
        debug!(slug = slug.as_str(), "list form accepted");
        Ok(ListPayload {
            title: draft.title.clone(),
            slug,
            description: non_empty(&draft.description),
            event_date: non_empty(&draft.event_date),
            event_type: non_empty(&draft.event_type),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}
