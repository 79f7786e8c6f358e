//! # User-Item Matrix
//!
//! Dense rating matrix with one row per user and one column per item.
//!
//! Users and items are indexed in ascending id order, so two matrices
//! built from the same interactions (in any order) are identical.

use crate::{Interaction, ItemId, UserId};
use std::collections::BTreeMap;

/// Dense user × item rating matrix.
///
/// A cell holds the mean of every rating the user gave the item, or
/// `0.0` if the user never rated it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserItemMatrix {
    /// Users in ascending order; row `u` belongs to `users[u]`.
    users: Vec<UserId>,

    /// Items in ascending order; column `i` belongs to `items[i]`.
    items: Vec<ItemId>,

    /// Reverse lookup: UserId -> row
    user_index: BTreeMap<UserId, usize>,

    /// Reverse lookup: ItemId -> column
    item_index: BTreeMap<ItemId, usize>,

    /// Row-major cells, `users.len() * items.len()` long.
    cells: Vec<f64>,
}

impl UserItemMatrix {
    /// Build the matrix, averaging repeated (user, item) ratings.
    #[must_use]
    pub fn from_interactions(interactions: &[Interaction]) -> Self {
        let user_index = index_of(interactions.iter().map(|r| &r.user));
        let item_index = index_of(interactions.iter().map(|r| &r.item));

        let n_items = item_index.len();
        let size = user_index.len().saturating_mul(n_items);
        let mut sums = vec![0.0_f64; size];
        let mut counts = vec![0u32; size];

        for r in interactions {
            let (Some(&u), Some(&i)) = (user_index.get(&r.user), item_index.get(&r.item)) else {
                continue;
            };
            let cell = u * n_items + i;
            sums[cell] += r.rating;
            counts[cell] = counts[cell].saturating_add(1);
        }

        let cells = sums
            .into_iter()
            .zip(counts)
            .map(|(sum, n)| if n > 0 { sum / f64::from(n) } else { 0.0 })
            .collect();

        Self {
            users: user_index.keys().cloned().collect(),
            items: item_index.keys().cloned().collect(),
            user_index,
            item_index,
            cells,
        }
    }

    /// Users in row order.
    #[must_use]
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Items in column order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row index of a user.
    #[must_use]
    pub fn user_index(&self, user: &UserId) -> Option<usize> {
        self.user_index.get(user).copied()
    }

    /// Column index of an item.
    #[must_use]
    pub fn item_index(&self, item: &ItemId) -> Option<usize> {
        self.item_index.get(item).copied()
    }

    /// Cell value, or `None` when either index is out of range.
    #[must_use]
    pub fn get(&self, user: usize, item: usize) -> Option<f64> {
        if user >= self.user_count() || item >= self.item_count() {
            return None;
        }
        self.cells.get(user * self.item_count() + item).copied()
    }

    /// All ratings of one user, in column order. Empty when out of range.
    #[must_use]
    pub fn row(&self, user: usize) -> &[f64] {
        let width = self.item_count();
        let start = user.saturating_mul(width);
        self.cells.get(start..start.saturating_add(width)).unwrap_or(&[])
    }

    /// Iterate rows in user order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0, and a 0-width matrix has no cells anyway
        self.cells.chunks_exact(self.item_count().max(1))
    }
}

/// Sorted distinct ids mapped to their position.
fn index_of<'a, K: Ord + Clone + 'a>(ids: impl Iterator<Item = &'a K>) -> BTreeMap<K, usize> {
    let mut index: BTreeMap<K, usize> = ids.map(|id| (id.clone(), 0)).collect();
    for (pos, slot) in index.values_mut().enumerate() {
        *slot = pos;
    }
    index
}

// =============================================================================
// TESTS
// =============================================================================
