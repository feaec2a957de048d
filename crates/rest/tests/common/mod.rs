//! Common test utilities for REST API testing.
//!
//! - [`harness`] - REST API test harness

pub mod harness;
