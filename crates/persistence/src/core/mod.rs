//! Core storage traits and abstractions.
//!
//! - [`ResourceStore`] - CRUD and search over the resources of one type
//!
//! Implementations live in [`crate::backends`].

mod store;

pub use store::ResourceStore;
