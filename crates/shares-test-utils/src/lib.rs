//! Test utilities for the share service client and integration suite.
//!
//! Provides an in-process mock of the share service v2 API with
//! scriptable status transitions, and a harness that serves it on a
//! random local port. The client crate's integration tests run entirely
//! against this mock, so the default `cargo test` needs no live backend.

pub mod mock_share_service;
pub mod server_harness;

pub use mock_share_service::{
    MockShareService, MockShareServiceBuilder, API_EXPERIMENTAL_HEADER, API_MICROVERSION_HEADER,
    REQUEST_ID_HEADER,
};
pub use server_harness::TestShareServer;
