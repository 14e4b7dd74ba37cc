use std::collections::BTreeMap;

/// Sparse term-weight vector keyed by vocabulary index
pub type SparseVector = BTreeMap<usize, f32>;

/// Calculate cosine similarity between two sparse vectors
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
  let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

  let dot_product: f32 =
    shorter.iter().filter_map(|(index, x)| longer.get(index).map(|y| x * y)).sum();
  let magnitude_a = magnitude(a);
  let magnitude_b = magnitude(b);

  if magnitude_a == 0.0 || magnitude_b == 0.0 {
    0.0
  } else {
    dot_product / (magnitude_a * magnitude_b)
  }
}

pub fn magnitude(vector: &SparseVector) -> f32 {
  vector.values().map(|x| x * x).sum::<f32>().sqrt()
}
