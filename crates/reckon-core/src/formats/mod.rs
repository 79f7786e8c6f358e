//! # Formats Module
//!
//! Input format handling for Reckon.
//!
//! This module contains:
//! - CSV interaction parsing (`user_id,item_id[,rating]`)
//!
//! Note: opening files remains in the app layer (apps/reckon).
//! This module only turns bytes into interactions.

mod interactions;

pub use interactions::*;
