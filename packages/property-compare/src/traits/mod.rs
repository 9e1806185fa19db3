//! Core trait abstractions: the three capability seams of the pipeline.

pub mod ai;
pub mod scraper;
pub mod searcher;

pub use ai::PropertyAi;
pub use scraper::ListingScraper;
pub use searcher::{ListingSearcher, MockSearcher, SearchHit, TavilySearcher};
