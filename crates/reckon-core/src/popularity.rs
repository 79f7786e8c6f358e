//! # Popularity
//!
//! Non-personalised fallback: items ranked by the sum of all their ratings.
//!
//! Used when no target user is given, e.g. for brand-new users.

use crate::{Interaction, ItemId, Scored, rank_and_truncate};
use std::collections::BTreeMap;

/// Total rating per item, summed over every interaction.
#[must_use]
pub fn item_totals(interactions: &[Interaction]) -> BTreeMap<ItemId, f64> {
    let mut totals: BTreeMap<ItemId, f64> = BTreeMap::new();
    for r in interactions {
        *totals.entry(r.item.clone()).or_insert(0.0) += r.rating;
    }
    totals
}

/// The `top_n` items with the highest total rating.
///
/// Repeated ratings are summed, not averaged. Items with zero or negative
/// totals are kept; they simply rank last.
#[must_use]
pub fn popular_items(interactions: &[Interaction], top_n: usize) -> Vec<Scored> {
    let rows = item_totals(interactions)
        .into_iter()
        .map(|(item, total)| Scored::new(item, total))
        .collect();
    rank_and_truncate(rows, top_n)
}
