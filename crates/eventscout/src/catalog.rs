//! Event catalog: the static reference table every recommendation is joined against.
//!
//! The catalog is read once from a CSV file whose header names the columns. A small
//! set of columns is parsed into typed fields; every other column is kept verbatim so
//! the detail page can show it.

use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};

pub const EVENT_ID: &str = "Event_id";
pub const EVENT_NAME: &str = "Event_name";
pub const CONTENT: &str = "Content";
pub const EVENT_TYPE: &str = "Event_type";
pub const PROVINCE: &str = "Location_Province";
pub const ADDRESS: &str = "Address";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const PRICE: &str = "Price";
pub const IMAGE_LINK: &str = "Image_link";
pub const DAY: &str = "day";
pub const DAY_OF_WEEK: &str = "day_of_the_week";
pub const TIME_PERIOD: &str = "time_period";
pub const MONTH: &str = "Month";

const REQUIRED_COLUMNS: &[&str] = &[EVENT_ID, EVENT_NAME];

const TYPED_COLUMNS: [&str; 14] = [
  EVENT_ID,
  EVENT_NAME,
  CONTENT,
  EVENT_TYPE,
  PROVINCE,
  ADDRESS,
  LATITUDE,
  LONGITUDE,
  PRICE,
  IMAGE_LINK,
  DAY,
  DAY_OF_WEEK,
  TIME_PERIOD,
  MONTH,
];

/// One event from the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventRecord {
  pub event_id: String,
  pub name: String,
  pub content: String,
  pub event_type: String,
  pub province: String,
  pub address: String,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub price: Option<f64>,
  pub image_link: String,
  pub day: String,
  pub day_of_week: String,
  pub time_period: String,
  pub month: String,
  /// Columns without a typed field, in file order
  #[serde(skip)]
  pub extra: Vec<(String, String)>,
  /// Header order of the file the record came from
  #[serde(skip)]
  pub columns: Option<Arc<Vec<String>>>,
}

impl EventRecord {
  pub fn new(event_id: impl Into<String>, name: impl Into<String>) -> Self {
    Self { event_id: event_id.into(), name: name.into(), ..Default::default() }
  }

  /// Every column of the record as (column name, raw value) pairs.
  ///
  /// Records loaded from a file follow its header order. Records built in code list the
  /// typed columns first, then the untyped ones.
  pub fn fields(&self) -> Vec<(String, String)> {
    match &self.columns {
      Some(columns) => columns
        .iter()
        .filter_map(|column| self.value(column).map(|value| (column.clone(), value)))
        .collect(),
      None => TYPED_COLUMNS
        .iter()
        .map(|column| (column.to_string(), self.value(column).unwrap_or_default()))
        .chain(self.extra.iter().cloned())
        .collect(),
    }
  }

  /// Raw value of a column, or `None` when the record has no such column
  pub fn value(&self, column: &str) -> Option<String> {
    let value = match column {
      EVENT_ID => self.event_id.clone(),
      EVENT_NAME => self.name.clone(),
      CONTENT => self.content.clone(),
      EVENT_TYPE => self.event_type.clone(),
      PROVINCE => self.province.clone(),
      ADDRESS => self.address.clone(),
      LATITUDE => format_optional(self.latitude),
      LONGITUDE => format_optional(self.longitude),
      PRICE => format_optional(self.price),
      IMAGE_LINK => self.image_link.clone(),
      DAY => self.day.clone(),
      DAY_OF_WEEK => self.day_of_week.clone(),
      TIME_PERIOD => self.time_period.clone(),
      MONTH => self.month.clone(),
      other => return self.extra.iter().find(|(name, _)| name == other).map(|(_, value)| value.clone()),
    };
    Some(value)
  }

  /// Text fed to the similarity model
  pub fn document(&self) -> &str {
    if self.content.trim().is_empty() {
      &self.name
    } else {
      &self.content
    }
  }
}

fn format_optional(value: Option<f64>) -> String {
  value.map(|v| v.to_string()).unwrap_or_default()
}

/// An ordered set of catalog records.
///
/// Records are shared with the catalog, so copying a set is cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet(Vec<Arc<EventRecord>>);

impl RecordSet {
  pub fn new(records: Vec<Arc<EventRecord>>) -> Self {
    Self(records)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Arc<EventRecord>> {
    self.0.iter()
  }

  /// Record at a zero-based index
  pub fn get(&self, index: usize) -> Option<&Arc<EventRecord>> {
    self.0.get(index)
  }

  /// The first `limit` records, in order
  pub fn head(&self, limit: usize) -> RecordSet {
    RecordSet(self.0.iter().take(limit).cloned().collect())
  }

  pub fn ids(&self) -> Vec<&str> {
    self.0.iter().map(|record| record.event_id.as_str()).collect()
  }

  pub fn contains(&self, event_id: &str) -> bool {
    self.0.iter().any(|record| record.event_id == event_id)
  }

  pub fn retain<F>(&mut self, keep: F)
  where
    F: FnMut(&Arc<EventRecord>) -> bool,
  {
    self.0.retain(keep);
  }

  pub fn sort_by<F>(&mut self, compare: F)
  where
    F: FnMut(&Arc<EventRecord>, &Arc<EventRecord>) -> std::cmp::Ordering,
  {
    self.0.sort_by(compare);
  }
}

impl FromIterator<Arc<EventRecord>> for RecordSet {
  fn from_iter<I: IntoIterator<Item = Arc<EventRecord>>>(iter: I) -> Self {
    RecordSet(iter.into_iter().collect())
  }
}

/// The static reference table of events
#[derive(Debug, Default)]
pub struct Catalog {
  records: Vec<Arc<EventRecord>>,
  by_id: HashMap<String, usize>,
  source: Option<PathBuf>,
}

impl Catalog {
  /// Build a catalog from already-parsed records
  pub fn from_records(records: Vec<EventRecord>) -> Self {
    let mut by_id = HashMap::new();
    let records: Vec<Arc<EventRecord>> = records.into_iter().map(Arc::new).collect();

    for (position, record) in records.iter().enumerate() {
      if by_id.contains_key(&record.event_id) {
        tracing::warn!(event_id = %record.event_id, "duplicate event id in catalog, keeping first");
        continue;
      }
      by_id.insert(record.event_id.clone(), position);
    }

    Self { records, by_id, source: None }
  }

  /// Load the catalog from a CSV file
  pub fn load(path: &Path) -> Result<Self> {
    let file = std::fs::File::open(path)?;
    let mut catalog = Self::from_reader(file, path)?;
    catalog.source = Some(path.to_path_buf());
    tracing::info!(path = %path.display(), events = catalog.len(), "loaded event catalog");
    Ok(catalog)
  }

  /// Parse CSV content; `origin` is only used in error messages
  pub fn from_reader<R: io::Read>(reader: R, origin: &Path) -> Result<Self> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    for required in REQUIRED_COLUMNS {
      if !headers.iter().any(|h| h == required) {
        return Err(Error::MissingColumn { path: origin.to_path_buf(), column: required.to_string() });
      }
    }

    let columns: Arc<Vec<String>> = Arc::new(
      headers
        .iter()
        .enumerate()
        .filter(|(position, header)| !(header.is_empty() && *position == 0))
        .map(|(_, header)| header.clone())
        .collect(),
    );

    let mut records = Vec::new();
    for (row, row_result) in csv_reader.records().enumerate() {
      let row_values = row_result?;
      let mut record = parse_row(&headers, &row_values, origin, row + 1)?;
      record.columns = Some(Arc::clone(&columns));
      records.push(record);
    }

    Ok(Self::from_records(records))
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn records(&self) -> &[Arc<EventRecord>] {
    &self.records
  }

  pub fn get(&self, event_id: &str) -> Option<&Arc<EventRecord>> {
    self.by_id.get(event_id).map(|&position| &self.records[position])
  }

  pub fn source(&self) -> Option<&Path> {
    self.source.as_deref()
  }
}

fn parse_row(
  headers: &[String],
  values: &csv::StringRecord,
  origin: &Path,
  row: usize,
) -> Result<EventRecord> {
  let mut record = EventRecord::default();

  for (position, header) in headers.iter().enumerate() {
    let value = values.get(position).unwrap_or_default().to_string();

    // A leading unnamed column is the dataframe index the file was exported with
    if header.is_empty() && position == 0 {
      continue;
    }

    match header.as_str() {
      EVENT_ID => record.event_id = value,
      EVENT_NAME => record.name = value,
      CONTENT => record.content = value,
      EVENT_TYPE => record.event_type = value,
      PROVINCE => record.province = value,
      ADDRESS => record.address = value,
      LATITUDE => record.latitude = parse_number(&value, origin, LATITUDE, row)?,
      LONGITUDE => record.longitude = parse_number(&value, origin, LONGITUDE, row)?,
      PRICE => record.price = parse_number(&value, origin, PRICE, row)?,
      IMAGE_LINK => record.image_link = value,
      DAY => record.day = value,
      DAY_OF_WEEK => record.day_of_week = value,
      TIME_PERIOD => record.time_period = value,
      MONTH => record.month = value,
      other => record.extra.push((other.to_string(), value)),
    }
  }

  Ok(record)
}

/// Parse a numeric cell; blanks and NaN markers are missing values
fn parse_number(raw: &str, origin: &Path, column: &str, row: usize) -> Result<Option<f64>> {
  let trimmed = raw.trim();
  if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
    return Ok(None);
  }

  trimmed.parse::<f64>().map(Some).map_err(|_| Error::InvalidValue {
    path: origin.to_path_buf(),
    column: column.to_string(),
    row,
    value: raw.to_string(),
  })
}
