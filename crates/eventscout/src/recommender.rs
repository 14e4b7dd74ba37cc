//! The scoring seam: a query and the catalog in, ranked event identifiers out.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::catalog::Catalog;
use crate::similarity::cosine_similarity;
use crate::vectorizer::TfidfVectorizer;

/// Maps a free-text query to catalog event identifiers, best match first
#[cfg_attr(test, mockall::automock)]
pub trait Recommender {
  fn recommend(&self, query: &str, catalog: &Catalog) -> Vec<String>;
}

/// Tuning for [`ContentRecommender`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderSettings {
  /// Maximum number of identifiers returned per query
  #[serde(default = "default_top_k")]
  pub top_k: usize,
  /// Events must score strictly above this similarity to be returned
  #[serde(default)]
  pub min_similarity: f32,
}

fn default_top_k() -> usize {
  50
}

impl Default for RecommenderSettings {
  fn default() -> Self {
    Self { top_k: default_top_k(), min_similarity: 0.0 }
  }
}

/// Ranks events by cosine similarity between TF-IDF vectors of the query and each
/// event's description
#[derive(Debug, Clone)]
pub struct ContentRecommender {
  vectorizer: TfidfVectorizer,
  settings: RecommenderSettings,
}

impl ContentRecommender {
  pub fn new(vectorizer: TfidfVectorizer, settings: RecommenderSettings) -> Self {
    Self { vectorizer, settings }
  }

  /// Fit a fresh vectorizer over the catalog descriptions
  pub fn fit(catalog: &Catalog, settings: RecommenderSettings) -> Self {
    let vectorizer = TfidfVectorizer::fit(catalog.records().iter().map(|record| record.document()));
    tracing::debug!(
      vocabulary = vectorizer.vocabulary_size(),
      documents = vectorizer.documents(),
      "fitted vectorizer"
    );
    Self::new(vectorizer, settings)
  }

  pub fn vectorizer(&self) -> &TfidfVectorizer {
    &self.vectorizer
  }
}

impl Recommender for ContentRecommender {
  fn recommend(&self, query: &str, catalog: &Catalog) -> Vec<String> {
    let query_vector = self.vectorizer.transform(query);
    if query_vector.is_empty() {
      tracing::debug!(query, "query shares no vocabulary with the catalog");
      return Vec::new();
    }

    let mut scored: Vec<(usize, f32)> = catalog
      .records()
      .iter()
      .enumerate()
      .map(|(position, record)| {
        (position, cosine_similarity(&query_vector, &self.vectorizer.transform(record.document())))
      })
      .filter(|(_, score)| *score > self.settings.min_similarity)
      .collect();

    // Best score first; catalog order breaks ties
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(self.settings.top_k);

    tracing::debug!(query, matches = scored.len(), "scored catalog");

    let records = catalog.records();
    scored.into_iter().map(|(position, _)| records[position].event_id.clone()).collect()
  }
}
