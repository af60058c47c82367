//! Integration test suite for the file-share service API.
//!
//! Tests exercise create/read/update/delete and asynchronous
//! state-transition workflows (shares, snapshots, replicas, share
//! servers, share groups, quotas, access rules) against a live
//! deployment through the `shares-client` crate.
//!
//! # Features
//!
//! - `smoke`: version negotiation and quota reads (fast)
//! - `flows`: share/snapshot/access CRUD and transitions
//! - `replication`: share replica lifecycle
//! - `groups`: share group and group snapshot lifecycle
//! - `admin`: admin-only surfaces (share servers, quota writes, messages)
//! - `all`: enable every category
//!
//! # Prerequisites
//!
//! 1. A reachable deployment; point `SHARES_API_URL` at its versioned
//!    endpoint (default `http://localhost:8786/v2`).
//! 2. `SHARES_API_TOKEN` if the deployment requires authentication.
//! 3. For `admin`, credentials with admin privileges.
//!
//! # Usage
//!
//! ```bash
//! # From repo root - runs 0 live env-tests (no default features)
//! cargo test
//!
//! # Smoke tests only
//! cargo test -p env-tests --features smoke
//!
//! # Smoke + share flows
//! cargo test -p env-tests --features smoke,flows
//!
//! # Pre-release validation - full suite
//! cargo test -p env-tests --features all
//! ```
//!
//! Every test owns a [`fixtures::TestScope`]; resources provisioned
//! through it are registered on a LIFO cleanup ledger and torn down at
//! scope teardown, tolerating already-gone resources.

pub mod cleanup;
pub mod config;
pub mod fixtures;

/// Initialize console logging for suite debugging, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
