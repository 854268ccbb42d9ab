//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All human-facing output goes through this module to ensure consistent
//! formatting and proper handling of quiet mode.

pub mod output;
