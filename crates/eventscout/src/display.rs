//! Display formatting utilities for terminal output

use colored::*;

use crate::detail::DetailView;
use crate::filters::{FilterOptions, FilterSelection};
use crate::session::{Notice, Severity};
use crate::views::{Card, FilteringView, RecommendationsView, View};

const DEFAULT_WIDTH: usize = 80;
const CARD_WIDTH: usize = 26;
const MAX_COLUMNS: usize = 3;

/// Terminal width, or a sane default when not attached to a terminal
pub fn terminal_width() -> usize {
  let term = console::Term::stdout();
  if term.is_term() {
    term.size().1 as usize
  } else {
    DEFAULT_WIDTH
  }
}

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.len() + 1 + word.len() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(current_line);
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

pub fn render_notice(notice: &Notice) -> String {
  match notice.severity {
    Severity::Info => format!("{} {}", "ℹ".blue(), notice.message),
    Severity::Warning => format!("{} {}", "⚠".yellow(), notice.message.yellow()),
    Severity::Error => format!("{} {}", "✗".red(), notice.message.red()),
  }
}

pub fn render_view(view: &View, width: usize) -> String {
  match view {
    View::Recommendations(page) => render_recommendations(page, width),
    View::Filtering(page) => render_filtering(page, width),
    View::EventDetails(detail) => render_detail(detail, width),
  }
}

fn heading(title: &str, width: usize) -> String {
  let rule = "=".repeat(width.min(title.chars().count() + 8));
  format!("{}\n{}\n", title.bright_white().bold(), rule.dimmed())
}

fn render_recommendations(page: &RecommendationsView, width: usize) -> String {
  let mut output = heading(&page.title, width);

  if let Some(cards) = &page.cards {
    if !cards.is_empty() {
      output.push_str(&format!("{}\n", "Recommended events".cyan().bold()));
      output.push_str(&render_cards(cards, width));
    }
  }

  if let Some(message) = &page.message {
    output.push_str(&format!("{}\n", message.yellow()));
  }

  output
}

fn render_filtering(page: &FilteringView, width: usize) -> String {
  let mut output = heading(&page.title, width);
  output.push_str(&render_selection(&page.selection, &page.options));
  output.push('\n');
  output.push_str(&render_cards(&page.cards, width));

  if let Some(message) = &page.message {
    output.push_str(&format!("{}\n", message.yellow()));
  }

  output
}

/// Active filters, one line per dimension
pub fn render_selection(selection: &FilterSelection, options: &FilterOptions) -> String {
  let mut output = String::new();

  for dimension in &options.dimensions {
    let chosen = selection.values(dimension.dimension);
    let shown = if chosen.is_empty() { "any".dimmed().to_string() } else { chosen.join(", ") };
    output.push_str(&format!("  {:<18} {}\n", format!("{}:", dimension.label).cyan(), shown));
  }
  output.push_str(&format!("  {:<18} {}\n", "Sort by Price:".cyan(), selection.price));

  output
}

/// All selectable filter values
pub fn render_options(options: &FilterOptions, width: usize) -> String {
  let mut output = heading("Filters", width);

  for dimension in &options.dimensions {
    output.push_str(&format!("{}\n", dimension.label.cyan().bold()));
    for line in wrap_text(&dimension.values.join(", "), width.saturating_sub(2)) {
      output.push_str(&format!("  {line}\n"));
    }
  }
  output.push_str(&format!("{}\n  {}\n", "Sort by Price".cyan().bold(), options.price_modes.join(", ")));

  output
}

/// Cards laid out in up to three columns
pub fn render_cards(cards: &[Card], width: usize) -> String {
  let columns = (width / (CARD_WIDTH + 2)).clamp(1, MAX_COLUMNS);
  let mut output = String::new();

  for row in cards.chunks(columns) {
    let cells: Vec<Vec<String>> = row.iter().map(card_lines).collect();
    let height = cells.iter().map(Vec::len).max().unwrap_or(0);

    for line in 0..height {
      let rendered: Vec<String> = cells
        .iter()
        .map(|cell| {
          let text = cell.get(line).map(String::as_str).unwrap_or("");
          format!("{:<width$}", text, width = CARD_WIDTH)
        })
        .collect();
      output.push_str(rendered.join("  ").trim_end());
      output.push('\n');
    }
    output.push_str(&format!("{}\n", "-".repeat((CARD_WIDTH + 2) * row.len()).dimmed()));
  }

  output
}

fn card_lines(card: &Card) -> Vec<String> {
  let mut lines = vec![format!("[{}]", card.position)];
  lines.extend(wrap_text(&card.name, CARD_WIDTH).into_iter().map(|line| truncate(&line, CARD_WIDTH)));

  let meta: Vec<&str> =
    [card.event_type.as_str(), card.province.as_str()].into_iter().filter(|s| !s.is_empty()).collect();
  if !meta.is_empty() {
    lines.push(truncate(&meta.join(" · "), CARD_WIDTH));
  }
  if let Some(price) = &card.price {
    lines.push(price.clone());
  }

  lines
}

fn truncate(text: &str, width: usize) -> String {
  if text.chars().count() <= width {
    text.to_string()
  } else {
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{cut}…")
  }
}

pub fn render_detail(detail: &DetailView, width: usize) -> String {
  let mut output = heading("Event Details", width);

  output.push_str(&format!("{}\n", detail.title.bright_white().bold()));
  if !detail.image_link.is_empty() {
    output.push_str(&format!("{} {}\n", "Image:".dimmed(), detail.image_link));
  }
  if let Some(price) = &detail.price {
    output.push_str(&format!("{} {}\n", "Price:".bold(), price.green()));
  }

  for field in &detail.fields {
    let label = format!("{}:", field.label);
    let wrapped = wrap_text(&field.value, width.saturating_sub(label.len() + 1).max(20));
    let mut lines = wrapped.iter();
    let first = lines.next().map(String::as_str).unwrap_or("");
    output.push_str(&format!("{} {}\n", label.bold(), first));
    for line in lines {
      output.push_str(&format!("{:indent$}{}\n", "", line, indent = label.len() + 1));
    }
  }

  if let Some(location) = &detail.location {
    output.push_str(&format!("\n{}\n", "Location".cyan().bold()));
    output.push_str(&format!("  {} {}\n", "Map:".dimmed(), location.map_url));
    output.push_str(&format!("  {} {}\n", "Get Directions:".dimmed(), location.directions_url));
  }

  output
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::detail::{DetailField, Location};

  fn card(position: usize, name: &str) -> Card {
    Card {
      position,
      event_id: position.to_string(),
      name: name.to_string(),
      image_link: String::new(),
      event_type: "Music".to_string(),
      province: "Gauteng".to_string(),
      price: Some("R 10.00".to_string()),
    }
  }

  #[test]
  fn test_wrap_text() {
    let lines = wrap_text("one two three four", 9);
    assert_eq!(lines, vec!["one two", "three", "four"]);
  }

  #[test]
  fn test_wrap_text_keeps_blank_paragraphs() {
    let lines = wrap_text("first\n\nsecond", 80);
    assert_eq!(lines, vec!["first", "", "second"]);
  }

  #[test]
  fn test_truncate_long_text() {
    assert_eq!(truncate("abcdef", 4), "abc…");
    assert_eq!(truncate("abc", 4), "abc");
  }

  #[test]
  fn test_cards_show_positions_and_names() {
    colored::control::set_override(false);
    let output = render_cards(&[card(1, "Jazz Night"), card(2, "Park Run")], 80);
    assert!(output.contains("[1]"));
    assert!(output.contains("[2]"));
    assert!(output.contains("Jazz Night"));
    assert!(output.contains("Music · Gauteng"));
  }

  #[test]
  fn test_narrow_terminal_uses_one_column() {
    colored::control::set_override(false);
    let output = render_cards(&[card(1, "Jazz Night"), card(2, "Park Run")], 30);
    let first_line = output.lines().next().unwrap();
    assert_eq!(first_line, "[1]");
  }

  #[test]
  fn test_detail_lists_fields_and_links() {
    colored::control::set_override(false);
    let detail = DetailView {
      event_id: "1".to_string(),
      title: "Jazz Night".to_string(),
      image_link: String::new(),
      price: Some("R 150.50".to_string()),
      fields: vec![DetailField { label: "Address".to_string(), value: "123 Main St".to_string() }],
      location: Some(Location {
        latitude: -26.2,
        longitude: 28.0,
        map_url: "https://map".to_string(),
        directions_url: "https://directions".to_string(),
      }),
    };

    let output = render_detail(&detail, 80);
    assert!(output.contains("Price: R 150.50"));
    assert!(output.contains("Address: 123 Main St"));
    assert!(output.contains("Get Directions: https://directions"));
  }
}
