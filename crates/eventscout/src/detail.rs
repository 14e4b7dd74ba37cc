//! Detail page formatting for a single event.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::catalog::{self, EventRecord};
use crate::error::Result;

const MAP_EMBED_URL: &str = "https://www.openstreetmap.org/export/embed.html";
const DIRECTIONS_URL: &str = "https://www.openstreetmap.org/directions";

/// Columns never shown in the field listing: internal, technical, or shown elsewhere
pub const HIDDEN_FIELDS: &[&str] = &[
  catalog::LONGITUDE,
  catalog::LATITUDE,
  "index",
  catalog::EVENT_ID,
  "Unnamed: 0",
  catalog::IMAGE_LINK,
  catalog::EVENT_NAME,
  catalog::PROVINCE,
  catalog::MONTH,
  catalog::CONTENT,
  catalog::PRICE,
  catalog::TIME_PERIOD,
  catalog::DAY_OF_WEEK,
  catalog::DAY,
];

static COORDINATE_SUFFIX: Lazy<Regex> =
  Lazy::new(|| Regex::new(r" - Lat: [\-\d.]+, Lon: [\-\d.]+").expect("valid coordinate pattern"));

/// Presentation knobs for the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailOptions {
  /// Marker placed before formatted prices
  pub currency: String,
  /// Degrees added on each side of the event when framing the map
  pub map_margin: f64,
}

impl Default for DetailOptions {
  fn default() -> Self {
    Self { currency: "R".to_string(), map_margin: 0.01 }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailField {
  pub label: String,
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
  pub latitude: f64,
  pub longitude: f64,
  pub map_url: String,
  pub directions_url: String,
}

/// Everything the detail page shows for one event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
  pub event_id: String,
  pub title: String,
  pub image_link: String,
  pub price: Option<String>,
  pub fields: Vec<DetailField>,
  pub location: Option<Location>,
}

pub fn format_detail(record: &EventRecord, options: &DetailOptions) -> Result<DetailView> {
  let fields = record
    .fields()
    .into_iter()
    .filter(|(column, _)| !HIDDEN_FIELDS.contains(&column.as_str()))
    .map(|(column, value)| {
      let value = if column == catalog::ADDRESS { clean_address(&value) } else { value };
      DetailField { label: format_label(&column), value }
    })
    .collect();

  let location = match (record.latitude, record.longitude) {
    (Some(latitude), Some(longitude)) => Some(Location {
      latitude,
      longitude,
      map_url: map_url(latitude, longitude, options.map_margin)?,
      directions_url: directions_url(latitude, longitude)?,
    }),
    _ => None,
  };

  let title = if record.name.is_empty() { "No Name".to_string() } else { record.name.clone() };

  Ok(DetailView {
    event_id: record.event_id.clone(),
    title,
    image_link: record.image_link.clone(),
    price: record.price.map(|price| format_price(price, &options.currency)),
    fields,
    location,
  })
}

/// Strip the ` - Lat: <n>, Lon: <n>` suffix some addresses carry
pub fn clean_address(address: &str) -> String {
  COORDINATE_SUFFIX.replace_all(address, "").into_owned()
}

/// Column name to display label: underscores become spaces, then title case
pub fn format_label(column: &str) -> String {
  let mut label = String::with_capacity(column.len());
  let mut at_word_start = true;

  for ch in column.replace('_', " ").chars() {
    if ch.is_alphabetic() {
      if at_word_start {
        label.extend(ch.to_uppercase());
      } else {
        label.extend(ch.to_lowercase());
      }
      at_word_start = false;
    } else {
      label.push(ch);
      at_word_start = true;
    }
  }

  label
}

/// Two decimals with thousands separators, e.g. `R 1,250.00`
pub fn format_price(price: f64, currency: &str) -> String {
  let fixed = format!("{:.2}", price.abs());
  let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
  format!("{currency} {sign}{grouped}.{fraction}")
}

/// Embeddable map framing the event with `margin` degrees on every side
pub fn map_url(latitude: f64, longitude: f64, margin: f64) -> Result<String> {
  let mut url = Url::parse(MAP_EMBED_URL)?;
  url.set_query(Some(&format!(
    "bbox={},{},{},{}&layer=mapnik",
    round(longitude - margin),
    round(latitude - margin),
    round(longitude + margin),
    round(latitude + margin)
  )));
  Ok(url.into())
}

pub fn directions_url(latitude: f64, longitude: f64) -> Result<String> {
  let mut url = Url::parse(DIRECTIONS_URL)?;
  url.set_query(Some(&format!("from=&to={latitude},{longitude}")));
  Ok(url.into())
}

/// Trim float noise from bounding box arithmetic
fn round(value: f64) -> f64 {
  (value * 1e6).round() / 1e6
}
