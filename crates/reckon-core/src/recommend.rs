//! # Recommend
//!
//! User-based collaborative filtering over a [`UserItemMatrix`].
//!
//! For a target user `t` with similarity vector `sim` (cosine, `sim[t] = 0`):
//!
//! ```text
//! num[j]   = Σ_u sim[u] · r[u][j]
//! den[j]   = |{ u : sim[u] > 0 and r[u][j] > 0 }|   (0 is replaced by 1)
//! score[j] = num[j] / den[j]
//! ```
//!
//! Negative similarities still pull `num` down; only positive neighbours
//! that actually rated the item are counted in `den`. Items the target
//! already rated are dropped unless [`RecommendOptions::exclude_seen`] is
//! off, and only finite scores above zero are returned.

use crate::error::{CoreError, Result};
use crate::matrix::UserItemMatrix;
use crate::similarity::cosine_to_all;
use crate::{DEFAULT_TOP_N, Scored, UserId, rank_and_truncate};
use serde::{Deserialize, Serialize};

/// Knobs for [`recommend_for_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendOptions {
    /// Maximum number of items returned.
    pub top_n: usize,

    /// Drop items the target user has already rated above zero.
    pub exclude_seen: bool,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            exclude_seen: true,
        }
    }
}

impl RecommendOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_exclude_seen(mut self, exclude_seen: bool) -> Self {
        self.exclude_seen = exclude_seen;
        self
    }
}

/// Rank unseen items for `user`.
///
/// Fails only when `user` is not in the matrix. A user without any
/// positively similar neighbour gets an empty list.
pub fn recommend_for_user(
    matrix: &UserItemMatrix,
    user: &UserId,
    options: &RecommendOptions,
) -> Result<Vec<Scored>> {
    let target = matrix
        .user_index(user)
        .ok_or_else(|| CoreError::UnknownUser(user.clone()))?;

    let mut sim = cosine_to_all(matrix, target);
    if let Some(own) = sim.get_mut(target) {
        *own = 0.0;
    }

    let seen = matrix.row(target);
    let candidates = weighted_scores(matrix, &sim)
        .into_iter()
        .zip(matrix.items())
        .zip(seen)
        .filter(|&(_, &own)| !(options.exclude_seen && own > 0.0))
        .filter_map(|((score, item), _)| {
            (score.is_finite() && score > 0.0).then(|| Scored::new(item.clone(), score))
        })
        .collect();

    Ok(rank_and_truncate(candidates, options.top_n))
}

/// Similarity-weighted score of every item, in column order.
///
/// `sim` holds one weight per user in row order; missing weights count
/// as zero.
#[must_use]
pub fn weighted_scores(matrix: &UserItemMatrix, sim: &[f64]) -> Vec<f64> {
    let width = matrix.item_count();
    let mut num = vec![0.0_f64; width];
    let mut den = vec![0u32; width];

    for (row, &weight) in matrix.rows().zip(sim) {
        if weight == 0.0 {
            continue;
        }
        for (j, &rating) in row.iter().enumerate() {
            num[j] += weight * rating;
            if weight > 0.0 && rating > 0.0 {
                den[j] = den[j].saturating_add(1);
            }
        }
    }

    num.into_iter()
        .zip(den)
        .map(|(n, d)| if d == 0 { n } else { n / f64::from(d) })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Interaction, ItemId};

    const EPS: f64 = 1e-12;

    fn matrix(rows: &[(&str, &str, f64)]) -> UserItemMatrix {
        let interactions: Vec<_> = rows
            .iter()
            .map(|&(u, i, r)| Interaction::new(u, i, r))
            .collect();
        UserItemMatrix::from_interactions(&interactions)
    }

    fn items(recs: &[Scored]) -> Vec<&str> {
        recs.iter().map(|s| s.item.as_str()).collect()
    }

    #[test]
    fn unknown_user_is_an_error() {
        let m = matrix(&[("a", "x", 1.0)]);
        let err = recommend_for_user(&m, &UserId::new("ghost"), &RecommendOptions::default());
        assert!(matches!(err, Err(CoreError::UnknownUser(u)) if u.as_str() == "ghost"));
    }

    #[test]
    fn single_neighbour_score() {
        let m = matrix(&[
            ("a", "x", 1.0),
            ("b", "x", 1.0),
            ("b", "z", 2.0),
            ("c", "y", 1.0),
            ("c", "w", 3.0),
        ]);
        let recs = recommend_for_user(&m, &UserId::new("a"), &RecommendOptions::default()).unwrap();

        assert_eq!(items(&recs), vec!["z"]);
        let expected = 2.0 / 5.0_f64.sqrt();
        assert!((recs[0].score - expected).abs() < EPS);
    }

    #[test]
    fn include_seen_keeps_rated_items() {
        let m = matrix(&[("a", "x", 1.0), ("b", "x", 1.0), ("b", "z", 2.0)]);
        let options = RecommendOptions::default().with_exclude_seen(false);
        let recs = recommend_for_user(&m, &UserId::new("a"), &options).unwrap();

        assert_eq!(items(&recs), vec!["z", "x"]);
        assert!((recs[1].score - 1.0 / 5.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn denominator_counts_positive_raters() {
        let m = matrix(&[
            ("a", "x", 1.0),
            ("b", "x", 1.0),
            ("b", "z", 4.0),
            ("c", "x", 1.0),
            ("c", "z", 2.0),
        ]);
        let recs = recommend_for_user(&m, &UserId::new("a"), &RecommendOptions::default()).unwrap();

        let expected = (4.0 / 17.0_f64.sqrt() + 2.0 / 5.0_f64.sqrt()) / 2.0;
        assert_eq!(items(&recs), vec!["z"]);
        assert!((recs[0].score - expected).abs() < EPS);
    }

    #[test]
    fn negative_neighbours_pull_scores_down() {
        let m = matrix(&[
            ("a", "x", 1.0),
            ("a", "y", 1.0),
            ("b", "x", 1.0),
            ("b", "z", 1.0),
            ("c", "x", -1.0),
            ("c", "z", 1.0),
        ]);
        let recs = recommend_for_user(&m, &UserId::new("a"), &RecommendOptions::default()).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn user_without_neighbours_gets_nothing() {
        let m = matrix(&[("a", "x", 1.0), ("b", "y", 1.0)]);
        let recs = recommend_for_user(&m, &UserId::new("a"), &RecommendOptions::default()).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn top_n_truncates_and_zero_is_empty() {
        let m = matrix(&[
            ("a", "x", 1.0),
            ("b", "x", 1.0),
            ("b", "p", 1.0),
            ("b", "q", 2.0),
            ("b", "r", 3.0),
        ]);
        let user = UserId::new("a");

        let two = recommend_for_user(&m, &user, &RecommendOptions::new().with_top_n(2)).unwrap();
        assert_eq!(items(&two), vec!["r", "q"]);

        let none = recommend_for_user(&m, &user, &RecommendOptions::new().with_top_n(0)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn ties_break_by_item_id() {
        let m = matrix(&[
            ("a", "x", 1.0),
            ("b", "x", 1.0),
            ("b", "m", 1.0),
            ("b", "c", 1.0),
        ]);
        let recs = recommend_for_user(&m, &UserId::new("a"), &RecommendOptions::default()).unwrap();
        assert_eq!(items(&recs), vec!["c", "m"]);
    }

    #[test]
    fn weighted_scores_ignores_zero_weights() {
        let m = matrix(&[("a", "x", 3.0), ("b", "x", 5.0)]);
        let scores = weighted_scores(&m, &[0.0, 0.5]);
        assert_eq!(scores, vec![2.5]);
        assert_eq!(m.item_index(&ItemId::new("x")), Some(0));
    }
}
