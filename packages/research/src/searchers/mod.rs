//! Web search implementations.
//!
//! - `GoogleSearcher` - Google Custom Search JSON API with pagination

mod google;

pub use google::{GoogleSearcher, DEFAULT_ENDPOINT, MAX_RESULTS, PAGE_SIZE};

// Re-export from traits for convenience
pub use crate::traits::searcher::{
    MockWebSearcher, SearchOutcome, SearchResult, SearchStop, TimeWindow, WebSearcher,
};
