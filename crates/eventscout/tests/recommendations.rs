use std::path::Path;

use eventscout::catalog::{Catalog, EventRecord};
use eventscout::config::Config;
use eventscout::engine::Engine;
use eventscout::filters::{apply_filters, Dimension, FilterSelection, PriceMode};
use eventscout::recommender::{ContentRecommender, RecommenderSettings};
use eventscout::retrieval::{join, retrieve, DEFAULT_DISPLAY_LIMIT};
use eventscout::session::{Action, Page, Session};

const PROVINCES: [&str; 3] = ["Gauteng", "Western Cape", "Limpopo"];

/// Sixty festivals; every third one is free and the rest cost more the later they appear
fn festival_catalog() -> Catalog {
  Catalog::from_records(
    (0..60)
      .map(|i| EventRecord {
        content: format!("Summer festival number {i} with food stalls and {} music", ["jazz", "rock"][i % 2]),
        province: PROVINCES[i % 3].to_string(),
        event_type: ["Music", "Food"][i % 2].to_string(),
        price: if i % 3 == 0 { Some(0.0) } else { Some(i as f64 * 5.0) },
        ..EventRecord::new(format!("E{i}"), format!("Festival {i}"))
      })
      .collect(),
  )
}

fn engine() -> Engine {
  let catalog = festival_catalog();
  let recommender = ContentRecommender::fit(&catalog, RecommenderSettings::default());
  Engine::new(catalog, Box::new(recommender), &Config::default())
}

#[test]
fn test_display_is_capped_and_drawn_from_catalog() {
  let engine = engine();

  let retrieval =
    retrieve("festival food", engine.catalog(), engine.recommender(), DEFAULT_DISPLAY_LIMIT).unwrap();

  assert_eq!(retrieval.display.len(), DEFAULT_DISPLAY_LIMIT);
  assert_eq!(retrieval.original.len(), RecommenderSettings::default().top_k);
  assert!(retrieval.display.iter().all(|record| engine.catalog().get(&record.event_id).is_some()));
  assert_eq!(retrieval.display.ids(), retrieval.original.head(DEFAULT_DISPLAY_LIMIT).ids());
}

#[test]
fn test_join_keeps_recommender_order() {
  let engine = engine();

  let ids = engine.recommender().recommend("jazz", engine.catalog());
  let joined = join(engine.catalog(), &ids);

  assert_eq!(joined.ids(), ids.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_blank_query_leaves_session_unchanged() {
  let engine = engine();
  let session = Session::new().reduce(Action::Search("rock".to_string()), &engine).session;

  let transition = session.clone().reduce(Action::Search("   ".to_string()), &engine);

  assert_eq!(transition.session, session);
  assert!(transition.notice.is_none());
}

#[test]
fn test_filters_always_start_from_original() {
  let engine = engine();
  let session = Session::new()
    .reduce(Action::Search("festival".to_string()), &engine)
    .session
    .reduce(Action::OpenFilters, &engine)
    .session;
  let original = session.original.clone().unwrap();

  let narrowed = session
    .reduce(Action::ApplyFilters(FilterSelection::new().with(Dimension::Province, ["Limpopo"])), &engine)
    .session;
  assert!(narrowed.display.as_ref().unwrap().iter().all(|record| record.province == "Limpopo"));

  let widened = narrowed.reduce(Action::ApplyFilters(FilterSelection::new()), &engine).session;
  assert_eq!(widened.page, Page::Filtering);
  assert_eq!(widened.display.unwrap(), original);
}

#[test]
fn test_free_events_ignore_sort_and_keep_other_filters() {
  let engine = engine();
  let retrieval = retrieve("festival", engine.catalog(), engine.recommender(), DEFAULT_DISPLAY_LIMIT).unwrap();

  let selection =
    FilterSelection::new().with(Dimension::EventType, ["Music"]).with_price(PriceMode::FreeEvents);
  let free = apply_filters(&retrieval.original, &selection);

  assert!(!free.is_empty());
  assert!(free.iter().all(|record| record.price == Some(0.0) && record.event_type == "Music"));
}

#[test]
fn test_sample_dataset_loads() {
  let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_events.csv");
  let catalog = Catalog::load(&path).unwrap();

  assert_eq!(catalog.len(), 12);
  assert_eq!(catalog.source(), Some(path.as_path()));
  assert_eq!(catalog.get("1006").unwrap().price, None);
}
