//! Data types shared across the research library.

pub mod content;
pub mod report;
