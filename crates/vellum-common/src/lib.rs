//! Shared utilities for the Vellum renderer.
//!
//! This crate holds the pieces every other crate may need without pulling
//! in style, layout, or PDF machinery: deduplicated warning output.

pub mod warning;

pub use warning::{clear_warnings, warn_once};
