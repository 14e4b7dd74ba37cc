use colored::*;

use crate::config::Config;
use crate::detail::format_detail;
use crate::display;
use crate::engine::{build_model, Engine};
use crate::error::{Error, Result};
use crate::filters::{FilterArgs, FilterSelection};
use crate::session::{Action, Notice, Session};
use crate::views::{self, View};

/// Retrieve recommendations for a description and optionally narrow them
pub fn recommend(engine: &Engine, terms: &[String], filters: &FilterArgs, json: bool) -> Result<()> {
  let query = terms.join(" ");
  let transition = Session::new().reduce(Action::Search(query), engine);
  report(transition.notice.as_ref());
  let mut session = transition.session;

  let selection = FilterSelection::from(filters);
  if !selection.is_empty() {
    let transition = session.reduce(Action::ApplyFilters(selection), engine);
    report(transition.notice.as_ref());
    session = transition.session;
  }

  print_view(&views::render(&session, engine)?, json)
}

/// Show the detail page for a catalog event
pub fn show(engine: &Engine, event_id: &str, json: bool) -> Result<()> {
  let record =
    engine.catalog().get(event_id).ok_or_else(|| Error::UnknownEvent(event_id.to_string()))?;
  let detail = format_detail(record, engine.detail_options())?;
  print_view(&View::EventDetails(detail), json)
}

/// List the selectable filter values
pub fn options(engine: &Engine, json: bool) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(engine.filter_options())?);
  } else {
    print!("{}", display::render_options(engine.filter_options(), display::terminal_width()));
  }
  Ok(())
}

/// Fit the vectorizer over the dataset and save the model artifact
pub fn index(config: &Config, force: bool) -> Result<()> {
  let path = config.model.clone().unwrap_or_default();

  match build_model(config, force)? {
    Some(vectorizer) => println!(
      "{} Saved model to {} ({} terms from {} events)",
      "✓".green(),
      path.display().to_string().cyan(),
      vectorizer.vocabulary_size(),
      vectorizer.documents()
    ),
    None => println!(
      "{} Model already exists at {} (use --force to rebuild)",
      "ℹ".blue(),
      path.display().to_string().cyan()
    ),
  }

  Ok(())
}

fn report(notice: Option<&Notice>) {
  if let Some(notice) = notice {
    eprintln!("{}", display::render_notice(notice));
  }
}

fn print_view(view: &View, json: bool) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(view)?);
  } else {
    print!("{}", display::render_view(view, display::terminal_width()));
  }
  Ok(())
}
