//! # Reckon Library
//!
//! This library exposes the Reckon command layer for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;

// Re-export reckon_core for convenience
pub use reckon_core;
