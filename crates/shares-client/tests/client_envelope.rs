//! Envelope behavior against the in-process mock service: microversion
//! header injection, correlation-id validation, and status-code mapping.

use reqwest::StatusCode;
use shares_client::error::ApiError;
use shares_client::microversion::Microversion;
use shares_client::rest::{RequestOpts, RestClient};
use shares_client::wait::WaitConfig;
use shares_client::{CreateShareRequest, SharesClient};
use shares_test_utils::{MockShareService, TestShareServer};

fn fast_wait() -> WaitConfig {
    WaitConfig {
        interval: std::time::Duration::from_millis(20),
        timeout: std::time::Duration::from_secs(30),
    }
}

fn client_for(server: &TestShareServer, version: Microversion) -> SharesClient {
    SharesClient::new(server.url(), None, version, fast_wait()).expect("client should build")
}

#[tokio::test]
async fn test_default_microversion_header_sent_on_every_call() {
    let server = TestShareServer::spawn(MockShareService::available())
        .await
        .expect("mock should spawn");
    let client = client_for(&server, Microversion::new(2, 55));

    client
        .create_share(&CreateShareRequest::new("nfs", 1))
        .await
        .expect("create should succeed");
    assert_eq!(server.service().last_microversion().as_deref(), Some("2.55"));

    client.list_shares().await.expect("list should succeed");
    assert_eq!(server.service().last_microversion().as_deref(), Some("2.55"));
}

#[tokio::test]
async fn test_configured_version_overrides_default_header() {
    let server = TestShareServer::spawn(MockShareService::available())
        .await
        .expect("mock should spawn");
    let client = client_for(&server, Microversion::new(2, 6));

    let share = client
        .create_share(&CreateShareRequest::new("nfs", 1))
        .await
        .expect("create should succeed");
    assert_eq!(server.service().last_microversion().as_deref(), Some("2.6"));

    // Pre-2.7 versions use the legacy os- prefixed action names; the
    // backend accepts them the same way.
    client
        .reset_share_status(&share.id, "error")
        .await
        .expect("reset should succeed");
    client
        .wait_for_share_status(&share.id, "error")
        .await
        .expect("share should report the pinned status");
}

#[tokio::test]
async fn test_missing_request_id_fails_the_call() {
    let server = TestShareServer::spawn(MockShareService::builder().without_request_id().build())
        .await
        .expect("mock should spawn");
    let client = client_for(&server, Microversion::new(2, 55));

    let err = client.list_shares().await.expect_err("call should fail");
    assert!(
        matches!(err, ApiError::MissingRequestId { .. }),
        "expected MissingRequestId, got {err:?}"
    );
}

#[tokio::test]
async fn test_unknown_resource_maps_to_not_found() {
    let server = TestShareServer::spawn(MockShareService::available())
        .await
        .expect("mock should spawn");
    let client = client_for(&server, Microversion::new(2, 55));

    let err = client
        .get_share("no-such-share")
        .await
        .expect_err("get should fail");
    assert!(err.is_gone(), "expected a gone-class error, got {err:?}");
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn test_status_mismatch_maps_to_unexpected_status() {
    let server = TestShareServer::spawn(MockShareService::available())
        .await
        .expect("mock should spawn");
    let rest = RestClient::new(server.url(), None, Microversion::new(2, 55))
        .expect("rest client should build");

    let err = rest
        .get("shares", StatusCode::ACCEPTED, RequestOpts::default())
        .await
        .expect_err("expectation mismatch should fail");
    match err {
        ApiError::UnexpectedStatus { expected, actual, .. } => {
            assert_eq!(expected, 202);
            assert_eq!(actual, 200);
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_version_discovery_with_and_without_header() {
    let server = TestShareServer::spawn(MockShareService::available())
        .await
        .expect("mock should spawn");
    let client = client_for(&server, Microversion::new(2, 55));

    // Without the header: the root document lists the supported range.
    let versions = client.list_api_versions().await.expect("discovery should succeed");
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].status, "CURRENT");
    assert_eq!(versions[0].version.as_deref(), Some("2.55"));
    assert!(server.service().last_microversion().is_none());

    // With the header: the probe carries it through.
    let (status, _) = client
        .discover_versions(Some(Microversion::new(2, 40)))
        .await
        .expect("probe should succeed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.service().last_microversion().as_deref(), Some("2.40"));
}
