//! Core types for the persistence layer.
//!
//! - [`SearchParams`] - Raw query parameters
//! - [`SearchCriteria`], [`SearchCriterion`] - The parsed, matchable form

mod search_params;

pub use search_params::{SearchCriteria, SearchCriterion, SearchParams};
