//! Process-wide, read-only collaborators: the catalog, the recommender and the
//! presentation settings. Loaded once and shared by every page.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::detail::DetailOptions;
use crate::error::Result;
use crate::filters::{filter_options, FilterOptions};
use crate::recommender::{ContentRecommender, Recommender};
use crate::vectorizer::TfidfVectorizer;

pub struct Engine {
  catalog: Catalog,
  recommender: Box<dyn Recommender>,
  filter_options: FilterOptions,
  detail_options: DetailOptions,
  display_limit: usize,
}

impl Engine {
  pub fn new(catalog: Catalog, recommender: Box<dyn Recommender>, config: &Config) -> Self {
    let filter_options = filter_options(&catalog);
    Self {
      catalog,
      recommender,
      filter_options,
      detail_options: config.detail_options(),
      display_limit: config.display_limit,
    }
  }

  /// Load the catalog and the model artifact named by the configuration.
  ///
  /// Without a saved artifact the vectorizer is fitted over the catalog in memory.
  pub fn from_config(config: &Config) -> Result<Self> {
    config.validate()?;
    let catalog = Catalog::load(&config.dataset)?;

    let recommender = match config.model.as_deref().filter(|path| path.exists()) {
      Some(path) => {
        let vectorizer = TfidfVectorizer::load(path)?;
        tracing::info!(path = %path.display(), vocabulary = vectorizer.vocabulary_size(), "loaded model");
        ContentRecommender::new(vectorizer, config.recommender.clone())
      }
      None => {
        tracing::info!("no saved model, fitting vectorizer over the catalog");
        ContentRecommender::fit(&catalog, config.recommender.clone())
      }
    };

    Ok(Self::new(catalog, Box::new(recommender), config))
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn recommender(&self) -> &dyn Recommender {
    self.recommender.as_ref()
  }

  pub fn filter_options(&self) -> &FilterOptions {
    &self.filter_options
  }

  pub fn detail_options(&self) -> &DetailOptions {
    &self.detail_options
  }

  pub fn display_limit(&self) -> usize {
    self.display_limit
  }
}

/// Fit a vectorizer over the configured catalog and write it to the model path.
///
/// Returns the fitted vectorizer, or `None` when an artifact already exists and
/// `force` is not set.
pub fn build_model(config: &Config, force: bool) -> Result<Option<TfidfVectorizer>> {
  let path = config
    .model
    .as_deref()
    .ok_or_else(|| crate::error::Error::Config("no model path configured".to_string()))?;

  if path.exists() && !force {
    tracing::info!(path = %path.display(), "model already exists, skipping");
    return Ok(None);
  }

  let catalog = Catalog::load(&config.dataset)?;
  let vectorizer = TfidfVectorizer::fit(catalog.records().iter().map(|record| record.document()));
  vectorizer.save(path)?;
  tracing::info!(path = %path.display(), vocabulary = vectorizer.vocabulary_size(), "saved model");

  Ok(Some(vectorizer))
}
