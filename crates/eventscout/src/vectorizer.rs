//! TF-IDF vectorizer used to compare a free-text query with event descriptions.
//!
//! Tokens are lowercase runs of two or more word characters with common English stop
//! words removed. IDF is smoothed (`ln((1 + n) / (1 + df)) + 1`) and every vector is
//! L2-normalized, so cosine similarity reduces to a dot product.
//!
//! A fitted vectorizer is the model artifact: it can be written to JSON once and loaded
//! on later runs instead of refitting.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use crate::error::{Error, Result};
use crate::similarity::{magnitude, SparseVector};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Common English stop words to filter out
const STOP_WORDS: &[&str] = &[
  // Articles and determiners
  "the", "a", "an", "this", "that", "these", "those", // Conjunctions
  "and", "or", "but", // Prepositions
  "in", "on", "at", "to", "for", "of", "with", "by", "over", "from", "into", // Common verbs
  "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
  "would", "could", "should", "can", // Pronouns
  "you", "your", "we", "our", "us", "they", "them", "their", "it", "its", "me", "my",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Split text into lowercase tokens, dropping stop words
pub fn tokenize(text: &str) -> Vec<String> {
  let lowered = text.to_lowercase();
  TOKEN
    .find_iter(&lowered)
    .map(|m| m.as_str())
    .filter(|token| !STOP_WORD_SET.contains(token))
    .map(str::to_string)
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
  /// Token to feature index, indices assigned in alphabetical order
  vocabulary: BTreeMap<String, usize>,
  /// Inverse document frequency per feature index
  idf: Vec<f32>,
  /// Number of documents the vectorizer was fitted on
  documents: usize,
}

impl TfidfVectorizer {
  /// Fit vocabulary and IDF weights on a corpus
  pub fn fit<'a, I>(corpus: I) -> Self
  where
    I: IntoIterator<Item = &'a str>,
  {
    let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
    let mut documents = 0;

    for document in corpus {
      documents += 1;
      let unique: BTreeSet<String> = tokenize(document).into_iter().collect();
      for token in unique {
        *document_frequency.entry(token).or_insert(0) += 1;
      }
    }

    let n = documents as f32;
    let mut vocabulary = BTreeMap::new();
    let mut idf = Vec::with_capacity(document_frequency.len());

    for (index, (token, frequency)) in document_frequency.into_iter().enumerate() {
      vocabulary.insert(token, index);
      idf.push(((1.0 + n) / (1.0 + frequency as f32)).ln() + 1.0);
    }

    Self { vocabulary, idf, documents }
  }

  /// Map text to an L2-normalized TF-IDF vector; unknown tokens are ignored
  pub fn transform(&self, text: &str) -> SparseVector {
    let mut vector = SparseVector::new();

    for token in tokenize(text) {
      if let Some(&index) = self.vocabulary.get(&token) {
        *vector.entry(index).or_insert(0.0) += 1.0;
      }
    }

    for (index, weight) in vector.iter_mut() {
      *weight *= self.idf[*index];
    }

    let norm = magnitude(&vector);
    if norm > 0.0 {
      for weight in vector.values_mut() {
        *weight /= norm;
      }
    }

    vector
  }

  pub fn vocabulary_size(&self) -> usize {
    self.vocabulary.len()
  }

  pub fn documents(&self) -> usize {
    self.documents
  }

  /// Write the fitted vectorizer as JSON
  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
      }
    }
    let content = serde_json::to_string(self)?;
    std::fs::write(path, content)?;
    Ok(())
  }

  /// Read a vectorizer written by [`TfidfVectorizer::save`]
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let vectorizer: TfidfVectorizer = serde_json::from_str(&content)?;
    vectorizer.validate(path)?;
    Ok(vectorizer)
  }

  fn validate(&self, path: &Path) -> Result<()> {
    let unusable = |reason: String| Error::Model { path: path.to_path_buf(), reason };

    if self.idf.len() != self.vocabulary.len() {
      return Err(unusable(format!(
        "{} idf weights for {} vocabulary entries",
        self.idf.len(),
        self.vocabulary.len()
      )));
    }

    if let Some((token, index)) = self.vocabulary.iter().find(|(_, index)| **index >= self.idf.len()) {
      return Err(unusable(format!("token '{token}' points past the idf table ({index})")));
    }

    Ok(())
  }
}
