// Not every test binary uses every helper.
#![allow(dead_code)]

pub mod app_builder;
pub mod auth;
pub mod factory;
pub mod media;

pub use app_builder::{build_test_state, create_test_app};
