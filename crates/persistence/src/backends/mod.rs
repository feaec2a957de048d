//! Storage backend implementations.
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`memory`] | Process-local `HashMap` per resource type; nothing is persisted |
//!
//! Durable backends implement [`crate::core::ResourceStore`] with the same
//! identity and versioning rules.

pub mod memory;
