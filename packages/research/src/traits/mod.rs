//! Core trait abstractions for the research library.
//!
//! These traits define the seams where applications plug in transport,
//! search, extraction, generation and storage.

pub mod generator;
pub mod searcher;
pub mod store;
pub mod strategy;
pub mod transport;
