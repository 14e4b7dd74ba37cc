//! Recommendation retrieval: query the recommender, join its identifiers back to the
//! catalog and split the result into the unfiltered set and the capped display set.

use std::collections::HashSet;

use crate::catalog::{Catalog, RecordSet};
use crate::recommender::Recommender;

/// Number of recommendations shown right after a search
pub const DEFAULT_DISPLAY_LIMIT: usize = 20;

/// Outcome of one retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
  /// Every joined recommendation, kept as the basis for filtering
  pub original: RecordSet,
  /// The first `display_limit` recommendations
  pub display: RecordSet,
}

/// Run a retrieval for `query`.
///
/// Returns `None` without consulting the recommender when the query is blank.
pub fn retrieve(
  query: &str,
  catalog: &Catalog,
  recommender: &dyn Recommender,
  display_limit: usize,
) -> Option<Retrieval> {
  let query = query.trim();
  if query.is_empty() {
    return None;
  }

  let ids = recommender.recommend(query, catalog);
  let original = join(catalog, &ids);
  let shown = original.head(display_limit);

  tracing::info!(
    query,
    recommended = ids.len(),
    joined = original.len(),
    shown = shown.len(),
    "retrieved recommendations"
  );

  Some(Retrieval { original, display: shown })
}

/// Resolve identifiers against the catalog in the order given.
///
/// Identifiers the catalog does not know are skipped; repeats keep their first position.
pub fn join(catalog: &Catalog, ids: &[String]) -> RecordSet {
  let mut seen = HashSet::new();

  ids
    .iter()
    .filter(|id| seen.insert(id.as_str()))
    .filter_map(|id| {
      let record = catalog.get(id);
      if record.is_none() {
        tracing::warn!(event_id = %id, "recommender returned an id missing from the catalog");
      }
      record.cloned()
    })
    .collect()
}
