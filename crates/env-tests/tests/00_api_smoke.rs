//! Smoke tests: version negotiation and read-only quota checks.
//!
//! These run in under a minute against any reachable deployment and
//! gate the rest of the suite: if negotiation fails here, nothing else
//! is worth running.

#![cfg(feature = "smoke")]

use env_tests::fixtures::TestScope;
use shares_client::microversion::Microversion;
use shares_client::QuotaScope;

/// Helper to connect a scope for tests.
async fn scope() -> TestScope {
    TestScope::connect()
        .await
        .expect("Failed to reach the share service - check SHARES_API_URL and SHARES_API_TOKEN")
}

#[tokio::test]
async fn test_version_discovery_lists_supported_range() {
    let scope = scope().await;

    let versions = scope
        .client()
        .list_api_versions()
        .await
        .expect("Version discovery should succeed");

    assert!(!versions.is_empty(), "Discovery document should list at least one version");
    let current = versions
        .iter()
        .find(|version| version.status == "CURRENT")
        .expect("One version should be CURRENT");

    let max: Microversion = current
        .version
        .as_deref()
        .expect("CURRENT version should carry a max microversion")
        .parse()
        .expect("Max microversion should parse");
    let min: Microversion = current
        .min_version
        .as_deref()
        .expect("CURRENT version should carry a min microversion")
        .parse()
        .expect("Min microversion should parse");

    assert!(min <= max, "Version range should be ordered: {min} <= {max}");
}

#[tokio::test]
async fn test_negotiation_probe_accepts_supported_version() {
    let scope = scope().await;

    let (status, body) = scope
        .client()
        .discover_versions(Some(scope.client().default_version()))
        .await
        .expect("Negotiation probe should succeed");

    assert!(
        status.is_success(),
        "Probe with the negotiated version should be accepted, got {status}: {body}"
    );
}

#[tokio::test]
async fn test_negotiation_probe_without_header_uses_baseline() {
    let scope = scope().await;

    // Omitting the version header entirely must still answer: clients
    // predating microversions see the baseline behavior.
    let (status, _) = scope
        .client()
        .discover_versions(None)
        .await
        .expect("Unversioned probe should succeed");

    assert!(status.is_success(), "Unversioned probe should be accepted, got {status}");
}

#[tokio::test]
async fn test_default_quotas_are_visible() {
    let scope = scope().await;
    let project_id = scope
        .config()
        .project_id
        .clone()
        .expect("SHARES_PROJECT_ID must be set for quota tests");

    let defaults = scope
        .client()
        .default_quotas(&project_id)
        .await
        .expect("Default quotas should be readable");

    // Defaults are positive or explicitly unlimited (-1).
    for (name, value) in [
        ("shares", defaults.shares),
        ("gigabytes", defaults.gigabytes),
        ("snapshots", defaults.snapshots),
        ("snapshot_gigabytes", defaults.snapshot_gigabytes),
        ("share_networks", defaults.share_networks),
    ] {
        assert!(value > 0 || value == -1, "Default quota {name} should be positive or -1, got {value}");
    }
}

#[tokio::test]
async fn test_project_quotas_match_shape_of_defaults() {
    let scope = scope().await;
    let project_id = scope
        .config()
        .project_id
        .clone()
        .expect("SHARES_PROJECT_ID must be set for quota tests");

    let quotas = scope
        .client()
        .show_quotas(&project_id, QuotaScope::default())
        .await
        .expect("Project quotas should be readable");

    assert!(quotas.shares > 0 || quotas.shares == -1);
    assert!(quotas.gigabytes > 0 || quotas.gigabytes == -1);
}
