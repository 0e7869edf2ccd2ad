//! Evaluation metrics: Precision@K, NDCG@K, reciprocal rank and category diversity.
//!
//! All metrics use binary relevance over assessment ids and return values in `[0, 1]`.

use std::collections::{BTreeSet, HashSet};

/// Precision at K: (relevant count in top-K) / K. If k is 0, returns 0.0.
///
/// The denominator is K even when fewer than K items were recommended.
pub fn precision_at_k(recommended: &[&str], relevant: &HashSet<&str>, k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = recommended
        .iter()
        .take(k)
        .filter(|id| relevant.contains(*id))
        .count();
    hits as f64 / k as f64
}

/// Normalized Discounted Cumulative Gain at K.
///
/// DCG sums `1 / log2(i + 1)` over 1-indexed positions `i` holding a relevant
/// item; IDCG is the DCG of `min(K, |relevant|)` relevant items placed first.
/// Returns 0.0 when IDCG is 0 (empty relevant set or k = 0).
pub fn ndcg_at_k(recommended: &[&str], relevant: &HashSet<&str>, k: usize) -> f64 {
    let ideal_hits = k.min(relevant.len());
    if ideal_hits == 0 {
        return 0.0;
    }

    let dcg: f64 = recommended
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, id)| relevant.contains(*id))
        .map(|(i, _)| discount(i))
        .sum();
    let idcg: f64 = (0..ideal_hits).map(discount).sum();

    (dcg / idcg).clamp(0.0, 1.0)
}

/// 1 / log2(position + 1) for a 0-indexed slot.
fn discount(index: usize) -> f64 {
    1.0 / (index as f64 + 2.0).log2()
}

/// Reciprocal rank of the first relevant item within the top-K; 0.0 if none.
pub fn reciprocal_rank(recommended: &[&str], relevant: &HashSet<&str>, k: usize) -> f64 {
    recommended
        .iter()
        .take(k)
        .position(|id| relevant.contains(id))
        .map(|pos| 1.0 / (pos + 1) as f64)
        .unwrap_or(0.0)
}

/// Variety of categories across a recommended list.
///
/// `categories[i]` holds the category values of the i-th recommendation
/// (several for multi-valued attributes such as job levels) and `available`
/// is the number of distinct categories in the whole catalog. With `d`
/// distinct categories present and `cap = min(len, available)`:
/// `(min(d, cap) - 1) / (cap - 1)`. A list confined to one category scores
/// 0; a list with no room for variety (`cap <= 1`) also scores 0.
pub fn diversity(categories: &[Vec<&str>], available: usize) -> f64 {
    let cap = categories.len().min(available);
    if cap <= 1 {
        return 0.0;
    }
    let distinct: BTreeSet<&str> = categories.iter().flatten().copied().collect();
    if distinct.is_empty() {
        return 0.0;
    }
    let present = distinct.len().min(cap);
    (present - 1) as f64 / (cap - 1) as f64
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
