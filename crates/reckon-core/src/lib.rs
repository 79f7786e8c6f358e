//! # Reckon Core
//!
//! The deterministic recommendation engine for Reckon.
//!
//! This crate turns a list of user/item interactions into ranked item
//! suggestions using user-based collaborative filtering:
//!
//! ```text
//! CSV ──► formats ──► Vec<Interaction> ──┬──► UserItemMatrix ──► recommend ──► Vec<Scored>
//!                                        └──► popularity ─────────────────────► Vec<Scored>
//! ```
//!
//! ## Constraints
//!
//! - No I/O beyond reading from a caller-supplied `std::io::Read`
//! - `BTreeMap` for every id index, so output never depends on hash seeds
//! - Equal scores are ordered by item id

pub mod error;
pub mod formats;
pub mod matrix;
pub mod popularity;
pub mod recommend;
pub mod similarity;

pub use error::{CoreError, Result};
pub use formats::{parse_interactions, parse_interactions_str};
pub use matrix::UserItemMatrix;
pub use popularity::popular_items;
pub use recommend::{RecommendOptions, recommend_for_user};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Number of results returned when the caller does not ask for a count.
pub const DEFAULT_TOP_N: usize = 5;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque user identifier, taken verbatim (trimmed) from the input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque item identifier, taken verbatim (trimmed) from the input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// INTERACTION
// =============================================================================

/// A single observed rating of an item by a user.
///
/// The same (user, item) pair may appear several times; the matrix
/// averages them and the popularity ranking sums them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user: UserId,
    pub item: ItemId,
    pub rating: f64,
}

impl Interaction {
    #[must_use]
    pub fn new(user: impl Into<String>, item: impl Into<String>, rating: f64) -> Self {
        Self {
            user: UserId::new(user),
            item: ItemId::new(item),
            rating,
        }
    }
}

// =============================================================================
// SCORED ITEM
// =============================================================================

/// One row of a ranked result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored {
    pub item: ItemId,
    pub score: f64,
}

impl Scored {
    #[must_use]
    pub fn new(item: ItemId, score: f64) -> Self {
        Self { item, score }
    }

    /// Ranking order: higher score first, then item id ascending.
    ///
    /// Scores are compared with `total_cmp`, so the order is total even
    /// if a NaN slips through.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.item.cmp(&other.item))
    }
}

/// Sort by [`Scored::rank_cmp`] and keep at most `top_n` rows.
pub(crate) fn rank_and_truncate(mut rows: Vec<Scored>, top_n: usize) -> Vec<Scored> {
    rows.sort_by(Scored::rank_cmp);
    rows.truncate(top_n);
    rows
}

// =============================================================================
// TESTS
// =============================================================================
