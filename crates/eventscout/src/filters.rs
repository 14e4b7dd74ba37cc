//! Filter and sort pipeline over a recommendation set.
//!
//! Filtering always starts again from the unfiltered set, so a selection produces the
//! same result no matter what was shown before it.

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::{self, Catalog, EventRecord, RecordSet};

/// A categorical column the user can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
  Province,
  EventType,
  Day,
  TimePeriod,
  DayOfWeek,
}

impl Dimension {
  pub const ALL: [Dimension; 5] = [
    Dimension::Province,
    Dimension::EventType,
    Dimension::Day,
    Dimension::TimePeriod,
    Dimension::DayOfWeek,
  ];

  pub fn value_of<'a>(&self, record: &'a EventRecord) -> &'a str {
    match self {
      Dimension::Province => &record.province,
      Dimension::EventType => &record.event_type,
      Dimension::Day => &record.day,
      Dimension::TimePeriod => &record.time_period,
      Dimension::DayOfWeek => &record.day_of_week,
    }
  }

  pub fn column(&self) -> &'static str {
    match self {
      Dimension::Province => catalog::PROVINCE,
      Dimension::EventType => catalog::EVENT_TYPE,
      Dimension::Day => catalog::DAY,
      Dimension::TimePeriod => catalog::TIME_PERIOD,
      Dimension::DayOfWeek => catalog::DAY_OF_WEEK,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Dimension::Province => "Location Province",
      Dimension::EventType => "Event Type",
      Dimension::Day => "Day",
      Dimension::TimePeriod => "Time Period",
      Dimension::DayOfWeek => "Day of the Week",
    }
  }
}

/// How price affects the filtered set; applied after the categorical filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
  #[default]
  None,
  Ascending,
  Descending,
  /// Keep only events with a price of exactly zero
  #[value(name = "free")]
  FreeEvents,
}

impl PriceMode {
  pub const ALL: [PriceMode; 4] =
    [PriceMode::None, PriceMode::Ascending, PriceMode::Descending, PriceMode::FreeEvents];
}

impl fmt::Display for PriceMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      PriceMode::None => "None",
      PriceMode::Ascending => "Ascending",
      PriceMode::Descending => "Descending",
      PriceMode::FreeEvents => "Free Events",
    };
    f.write_str(label)
  }
}

/// The user's chosen values per dimension plus a price mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
  #[serde(default)]
  values: BTreeMap<Dimension, Vec<String>>,
  #[serde(default)]
  pub price: PriceMode,
}

impl FilterSelection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder form of [`FilterSelection::set`]
  pub fn with<I, S>(mut self, dimension: Dimension, values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.set(dimension, values);
    self
  }

  pub fn with_price(mut self, price: PriceMode) -> Self {
    self.price = price;
    self
  }

  /// Replace the accepted values for a dimension; an empty list removes the constraint
  pub fn set<I, S>(&mut self, dimension: Dimension, values: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
      self.values.remove(&dimension);
    } else {
      self.values.insert(dimension, values);
    }
  }

  pub fn values(&self, dimension: Dimension) -> &[String] {
    self.values.get(&dimension).map(Vec::as_slice).unwrap_or_default()
  }

  /// True when nothing would be filtered or reordered
  pub fn is_empty(&self) -> bool {
    self.values.is_empty() && self.price == PriceMode::None
  }

  fn accepts(&self, record: &EventRecord) -> bool {
    self.values.iter().all(|(dimension, accepted)| {
      let value = dimension.value_of(record);
      accepted.iter().any(|candidate| candidate == value)
    })
  }
}

/// Filter flags shared by `recommend` and the shell's `apply`
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
  /// Keep events in this province (repeatable)
  #[arg(long, value_name = "PROVINCE")]
  pub province: Vec<String>,
  /// Keep events of this type (repeatable)
  #[arg(long = "event-type", value_name = "TYPE")]
  pub event_type: Vec<String>,
  /// Keep events on this day (repeatable)
  #[arg(long, value_name = "DAY")]
  pub day: Vec<String>,
  /// Keep events in this time period (repeatable)
  #[arg(long = "time-period", value_name = "PERIOD")]
  pub time_period: Vec<String>,
  /// Keep events on this day of the week (repeatable)
  #[arg(long = "day-of-week", value_name = "WEEKDAY")]
  pub day_of_week: Vec<String>,
  /// Sort by price, or keep only free events
  #[arg(long, value_enum, default_value = "none")]
  pub price: PriceMode,
}

impl From<&FilterArgs> for FilterSelection {
  fn from(args: &FilterArgs) -> Self {
    FilterSelection::new()
      .with(Dimension::Province, args.province.iter().cloned())
      .with(Dimension::EventType, args.event_type.iter().cloned())
      .with(Dimension::Day, args.day.iter().cloned())
      .with(Dimension::TimePeriod, args.time_period.iter().cloned())
      .with(Dimension::DayOfWeek, args.day_of_week.iter().cloned())
      .with_price(args.price)
  }
}

/// Derive the display set from the unfiltered recommendation set
pub fn apply_filters(original: &RecordSet, selection: &FilterSelection) -> RecordSet {
  let mut filtered = original.clone();
  filtered.retain(|record| selection.accepts(record));

  match selection.price {
    PriceMode::None => {}
    PriceMode::Ascending => filtered.sort_by(|a, b| compare_price(a.price, b.price, false)),
    PriceMode::Descending => filtered.sort_by(|a, b| compare_price(a.price, b.price, true)),
    PriceMode::FreeEvents => filtered.retain(|record| record.price == Some(0.0)),
  }

  tracing::debug!(before = original.len(), after = filtered.len(), "applied filters");
  filtered
}

/// Events without a price go last whichever way the set is sorted
fn compare_price(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => {
      let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
      if descending {
        ordering.reverse()
      } else {
        ordering
      }
    }
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Selectable values for one dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionOptions {
  pub dimension: Dimension,
  pub label: String,
  pub values: Vec<String>,
}

/// Everything the filter page offers, drawn from the whole catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
  pub dimensions: Vec<DimensionOptions>,
  pub price_modes: Vec<String>,
}

impl FilterOptions {
  pub fn values(&self, dimension: Dimension) -> &[String] {
    self
      .dimensions
      .iter()
      .find(|options| options.dimension == dimension)
      .map(|options| options.values.as_slice())
      .unwrap_or_default()
  }
}

/// Distinct values per dimension in order of first appearance
pub fn filter_options(catalog: &Catalog) -> FilterOptions {
  let dimensions = Dimension::ALL
    .iter()
    .map(|&dimension| {
      let mut values: Vec<String> = Vec::new();
      for record in catalog.records() {
        let value = dimension.value_of(record);
        if !values.iter().any(|seen| seen == value) {
          values.push(value.to_string());
        }
      }
      DimensionOptions { dimension, label: dimension.label().to_string(), values }
    })
    .collect();

  FilterOptions {
    dimensions,
    price_modes: PriceMode::ALL.iter().map(ToString::to_string).collect(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  fn event(id: &str, province: &str, event_type: &str, price: Option<f64>) -> Arc<EventRecord> {
    Arc::new(EventRecord {
      province: province.to_string(),
      event_type: event_type.to_string(),
      price,
      ..EventRecord::new(id, format!("Event {id}"))
    })
  }

  fn original() -> RecordSet {
    RecordSet::new(vec![
      event("1", "A", "Music", Some(100.0)),
      event("2", "A", "Sport", Some(0.0)),
      event("3", "B", "Music", Some(50.0)),
      event("4", "C", "Food", None),
      event("5", "A", "Music", Some(0.0)),
    ])
  }

  #[test]
  fn test_empty_selection_is_identity() {
    let original = original();
    assert_eq!(apply_filters(&original, &FilterSelection::new()), original);
  }

  #[test]
  fn test_province_filter_keeps_relative_order() {
    let selection = FilterSelection::new().with(Dimension::Province, ["A"]);
    let filtered = apply_filters(&original(), &selection);
    assert_eq!(filtered.ids(), vec!["1", "2", "5"]);
  }

  #[test]
  fn test_multiple_values_in_one_dimension() {
    let selection = FilterSelection::new().with(Dimension::Province, ["B", "C"]);
    let filtered = apply_filters(&original(), &selection);
    assert_eq!(filtered.ids(), vec!["3", "4"]);
  }

  #[test]
  fn test_dimensions_are_conjunctive_and_commute() {
    let province_first = FilterSelection::new()
      .with(Dimension::Province, ["A"])
      .with(Dimension::EventType, ["Music"]);
    let type_first = FilterSelection::new()
      .with(Dimension::EventType, ["Music"])
      .with(Dimension::Province, ["A"]);

    let a = apply_filters(&original(), &province_first);
    let b = apply_filters(&original(), &type_first);
    assert_eq!(a.ids(), vec!["1", "5"]);
    assert_eq!(a, b);
  }

  #[test]
  fn test_filters_are_idempotent() {
    let selection = FilterSelection::new()
      .with(Dimension::EventType, ["Music", "Sport"])
      .with_price(PriceMode::Descending);
    let once = apply_filters(&original(), &selection);
    let twice = apply_filters(&once, &selection);
    assert_eq!(once, twice);
  }

  #[test]
  fn test_price_ascending_is_stable_with_missing_last() {
    let selection = FilterSelection::new().with_price(PriceMode::Ascending);
    let filtered = apply_filters(&original(), &selection);
    assert_eq!(filtered.ids(), vec!["2", "5", "3", "1", "4"]);
  }

  #[test]
  fn test_price_descending_keeps_missing_last() {
    let selection = FilterSelection::new().with_price(PriceMode::Descending);
    let filtered = apply_filters(&original(), &selection);
    assert_eq!(filtered.ids(), vec!["1", "3", "2", "5", "4"]);
  }

  #[test]
  fn test_free_events_only_zero_price() {
    let selection = FilterSelection::new()
      .with(Dimension::EventType, ["Music", "Sport"])
      .with_price(PriceMode::FreeEvents);
    let filtered = apply_filters(&original(), &selection);
    assert_eq!(filtered.ids(), vec!["2", "5"]);
    assert!(filtered.iter().all(|record| record.price == Some(0.0)));
  }

  #[test]
  fn test_original_is_untouched() {
    let original = original();
    let selection = FilterSelection::new().with(Dimension::Province, ["Z"]);
    let filtered = apply_filters(&original, &selection);
    assert!(filtered.is_empty());
    assert_eq!(original.len(), 5);
  }

  #[test]
  fn test_set_empty_removes_constraint() {
    let mut selection = FilterSelection::new().with(Dimension::Province, ["A"]);
    selection.set(Dimension::Province, Vec::<String>::new());
    assert!(selection.is_empty());
    assert!(selection.values(Dimension::Province).is_empty());
  }

  #[test]
  fn test_filter_args_to_selection() {
    let args = FilterArgs {
      province: vec!["Gauteng".to_string()],
      day_of_week: vec!["Friday".to_string(), "Saturday".to_string()],
      price: PriceMode::FreeEvents,
      ..Default::default()
    };
    let selection = FilterSelection::from(&args);
    assert_eq!(selection.values(Dimension::Province), ["Gauteng"]);
    assert_eq!(selection.values(Dimension::DayOfWeek), ["Friday", "Saturday"]);
    assert!(selection.values(Dimension::EventType).is_empty());
    assert_eq!(selection.price, PriceMode::FreeEvents);
  }

  #[test]
  fn test_filter_options_first_appearance_order() {
    let catalog = Catalog::from_records(
      original().iter().map(|record| record.as_ref().clone()).collect(),
    );
    let options = filter_options(&catalog);
    assert_eq!(options.values(Dimension::Province), ["A", "B", "C"]);
    assert_eq!(options.values(Dimension::EventType), ["Music", "Sport", "Food"]);
    assert_eq!(options.price_modes, vec!["None", "Ascending", "Descending", "Free Events"]);
  }
}
