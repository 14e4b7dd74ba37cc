//! Page rendering: turn the session into a description of what each page shows.
//!
//! Views are plain serializable data; the terminal renderer and `--json` output both
//! consume them.

use serde::Serialize;

use crate::catalog::{EventRecord, RecordSet};
use crate::detail::{format_detail, format_price, DetailView};
use crate::engine::Engine;
use crate::error::Result;
use crate::filters::{FilterOptions, FilterSelection};
use crate::session::{Page, Session};

pub const RECOMMENDATIONS_TITLE: &str = "Event Recommendation System";
pub const FILTERING_TITLE: &str = "Filtered Event Recommendations";
pub const PROMPT_MESSAGE: &str = "Please enter a description to get recommendations.";
pub const EMPTY_MESSAGE: &str = "No events to show.";

/// One event in a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
  /// 1-based position used to open the event
  pub position: usize,
  pub event_id: String,
  pub name: String,
  pub image_link: String,
  pub event_type: String,
  pub province: String,
  pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationsView {
  pub title: String,
  /// `None` until a search has produced a listing
  pub cards: Option<Vec<Card>>,
  pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteringView {
  pub title: String,
  pub options: FilterOptions,
  pub selection: FilterSelection,
  pub cards: Vec<Card>,
  pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum View {
  Recommendations(RecommendationsView),
  Filtering(FilteringView),
  EventDetails(DetailView),
}

impl View {
  pub fn page(&self) -> Page {
    match self {
      View::Recommendations(_) => Page::Recommendations,
      View::Filtering(_) => Page::Filtering,
      View::EventDetails(_) => Page::EventDetails,
    }
  }
}

/// Render the page the session is on
pub fn render(session: &Session, engine: &Engine) -> Result<View> {
  match session.page {
    Page::Recommendations => Ok(View::Recommendations(recommendations_view(session, engine))),
    Page::Filtering => Ok(View::Filtering(filtering_view(session, engine))),
    Page::EventDetails => match &session.selected {
      Some(record) => Ok(View::EventDetails(format_detail(record, engine.detail_options())?)),
      None => Ok(View::Recommendations(recommendations_view(session, engine))),
    },
  }
}

fn recommendations_view(session: &Session, engine: &Engine) -> RecommendationsView {
  let cards = session.display.as_ref().map(|display| cards(display, engine));
  let message = match &cards {
    None => Some(PROMPT_MESSAGE.to_string()),
    Some(cards) if cards.is_empty() => Some(EMPTY_MESSAGE.to_string()),
    Some(_) => None,
  };

  RecommendationsView { title: RECOMMENDATIONS_TITLE.to_string(), cards, message }
}

fn filtering_view(session: &Session, engine: &Engine) -> FilteringView {
  let cards = session.display.as_ref().map(|display| cards(display, engine)).unwrap_or_default();
  let message = cards.is_empty().then(|| EMPTY_MESSAGE.to_string());

  FilteringView {
    title: FILTERING_TITLE.to_string(),
    options: engine.filter_options().clone(),
    selection: session.filters.clone(),
    cards,
    message,
  }
}

pub fn cards(records: &RecordSet, engine: &Engine) -> Vec<Card> {
  records.iter().enumerate().map(|(index, record)| card(index + 1, record, engine)).collect()
}

fn card(position: usize, record: &EventRecord, engine: &Engine) -> Card {
  Card {
    position,
    event_id: record.event_id.clone(),
    name: record.name.clone(),
    image_link: record.image_link.clone(),
    event_type: record.event_type.clone(),
    province: record.province.clone(),
    price: record.price.map(|price| format_price(price, &engine.detail_options().currency)),
  }
}
