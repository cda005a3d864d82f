//! Report generator implementations.
//!
//! This module provides a reference implementation of the `ReportGenerator`
//! trait. Users can use it directly or implement their own.

mod gemini;

pub use gemini::{GeminiGenerator, DEFAULT_MODEL};
