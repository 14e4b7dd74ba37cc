//! Session state and the transitions between pages.
//!
//! A [`Session`] is a plain value. Every user interaction is an [`Action`] and
//! [`Session::reduce`] turns the current session plus an action into the next session,
//! so a whole interaction sequence can be replayed without a terminal.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::catalog::{EventRecord, RecordSet};
use crate::engine::Engine;
use crate::filters::{apply_filters, FilterSelection};
use crate::retrieval::retrieve;

pub const NEED_RECOMMENDATIONS: &str = "Please get recommendations first before applying filters.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
  #[default]
  Recommendations,
  Filtering,
  EventDetails,
}

impl fmt::Display for Page {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Page::Recommendations => "recommendations",
      Page::Filtering => "filtering",
      Page::EventDetails => "event_details",
    };
    f.write_str(name)
  }
}

/// A user interaction
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  /// Ask for recommendations matching a description
  Search(String),
  /// Move to the filter page
  OpenFilters,
  /// Recompute the displayed set from the unfiltered recommendations
  ApplyFilters(FilterSelection),
  /// Open the detail page for the displayed event at a 1-based position
  ViewEvent(usize),
  /// Leave the current page
  Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  Info,
  Warning,
  Error,
}

/// A message for the user produced by a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
  pub severity: Severity,
  pub message: String,
}

impl Notice {
  pub fn info(message: impl Into<String>) -> Self {
    Self { severity: Severity::Info, message: message.into() }
  }

  pub fn warning(message: impl Into<String>) -> Self {
    Self { severity: Severity::Warning, message: message.into() }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self { severity: Severity::Error, message: message.into() }
  }
}

/// State of one user's interaction sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
  pub page: Page,
  /// Unfiltered result of the last retrieval
  pub original: Option<RecordSet>,
  /// What the current page lists
  pub display: Option<RecordSet>,
  pub filters: FilterSelection,
  pub selected: Option<Arc<EventRecord>>,
  pub started_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Result of applying an action
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
  pub session: Session,
  pub notice: Option<Notice>,
}

impl Default for Session {
  fn default() -> Self {
    Self::new()
  }
}

impl Session {
  pub fn new() -> Self {
    let now = Utc::now();
    Self {
      page: Page::Recommendations,
      original: None,
      display: None,
      filters: FilterSelection::default(),
      selected: None,
      started_at: now,
      updated_at: now,
    }
  }

  /// Apply one action; the previous session is consumed
  pub fn reduce(self, action: Action, engine: &Engine) -> Transition {
    tracing::debug!(page = %self.page, ?action, "reducing action");

    match action {
      Action::Search(query) => self.search(&query, engine),
      Action::OpenFilters => self.open_filters(),
      Action::ApplyFilters(selection) => self.apply_filters(selection),
      Action::ViewEvent(position) => self.view_event(position),
      Action::Back => self.back(),
    }
  }

  fn search(self, query: &str, engine: &Engine) -> Transition {
    match retrieve(query, engine.catalog(), engine.recommender(), engine.display_limit()) {
      Some(retrieval) => {
        let notice = retrieval
          .display
          .is_empty()
          .then(|| Notice::info(format!("No events matched \"{}\".", query.trim())));
        let session = Session {
          page: Page::Recommendations,
          original: Some(retrieval.original),
          display: Some(retrieval.display),
          filters: FilterSelection::default(),
          selected: None,
          ..self
        }
        .touched();
        Transition { session, notice }
      }
      None => self.unchanged(None),
    }
  }

  /// The filter page lists the current selection applied to the whole unfiltered set
  fn open_filters(self) -> Transition {
    let display = match (&self.original, &self.display) {
      (Some(original), Some(_)) => apply_filters(original, &self.filters),
      _ => return self.unchanged(Some(Notice::warning(NEED_RECOMMENDATIONS))),
    };

    let session = Session { page: Page::Filtering, display: Some(display), ..self }.touched();
    Transition { session, notice: None }
  }

  fn apply_filters(self, selection: FilterSelection) -> Transition {
    let display = match &self.original {
      Some(original) => apply_filters(original, &selection),
      None => return self.unchanged(Some(Notice::warning(NEED_RECOMMENDATIONS))),
    };

    let session = Session {
      page: Page::Filtering,
      display: Some(display),
      filters: selection,
      selected: None,
      ..self
    }
    .touched();
    Transition { session, notice: None }
  }

  fn view_event(self, position: usize) -> Transition {
    let record = position
      .checked_sub(1)
      .and_then(|index| self.display.as_ref().and_then(|display| display.get(index)))
      .cloned();

    match record {
      Some(record) => {
        let session =
          Session { page: Page::EventDetails, selected: Some(record), ..self }.touched();
        Transition { session, notice: None }
      }
      None => {
        let shown = self.display.as_ref().map_or(0, RecordSet::len);
        self.unchanged(Some(Notice::error(format!(
          "No event at position {position}; {shown} event(s) are listed."
        ))))
      }
    }
  }

  fn back(self) -> Transition {
    let session = match self.page {
      Page::Recommendations => return self.unchanged(None),
      // Leaving the filter page starts a fresh search; the unfiltered set is kept
      Page::Filtering => Session { page: Page::Recommendations, display: None, ..self },
      Page::EventDetails => Session { page: Page::Recommendations, selected: None, ..self },
    };
    Transition { session: session.touched(), notice: None }
  }

  fn unchanged(self, notice: Option<Notice>) -> Transition {
    Transition { session: self, notice }
  }

  fn touched(mut self) -> Self {
    self.updated_at = Utc::now();
    self
  }
}
