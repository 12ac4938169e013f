//! Error types for the letitgo repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
