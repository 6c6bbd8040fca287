//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: logging
//! initialization, unique test data, and assertions on the error contract.

pub mod error_body;
pub mod logging;
pub mod unique_helpers;
