//! # Similarity
//!
//! Cosine similarity between user rows.
//!
//! A zero-length row is divided by `1.0` instead of its norm, so any
//! similarity involving an all-zero row is `0.0` rather than NaN.

use crate::matrix::UserItemMatrix;

/// Euclidean length of a row.
#[must_use]
pub fn norm(row: &[f64]) -> f64 {
    row.iter().map(|v| v * v).sum::<f64>().sqrt()
}

fn safe_norm(row: &[f64]) -> f64 {
    let n = norm(row);
    if n == 0.0 { 1.0 } else { n }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine similarity of two rows of equal length.
#[must_use]
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    dot(a, b) / (safe_norm(a) * safe_norm(b))
}

/// Cosine similarity of one user's row against every row, in user order.
///
/// The entry for `user` itself is included (normally `1.0`); callers that
/// rank neighbours zero it out. Returns an empty vector when `user` is
/// out of range.
#[must_use]
pub fn cosine_to_all(matrix: &UserItemMatrix, user: usize) -> Vec<f64> {
    if user >= matrix.user_count() {
        return Vec::new();
    }
    let target = matrix.row(user);
    let target_norm = safe_norm(target);

    matrix
        .rows()
        .map(|other| dot(target, other) / (target_norm * safe_norm(other)))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
