//! End-to-end share, snapshot, and access-rule workflows against the
//! in-process mock service, exercising the waiters over scripted status
//! transitions.

use shares_client::microversion::Microversion;
use shares_client::wait::{WaitConfig, WaitError};
use shares_client::{CreateShareRequest, SharesClient};
use shares_test_utils::{MockShareService, TestShareServer};
use std::time::Duration;

fn fast_wait() -> WaitConfig {
    WaitConfig {
        interval: Duration::from_millis(20),
        timeout: Duration::from_secs(30),
    }
}

fn client_for(server: &TestShareServer) -> SharesClient {
    SharesClient::new(server.url(), None, Microversion::new(2, 55), fast_wait())
        .expect("client should build")
}

#[tokio::test]
async fn test_share_create_wait_delete_lifecycle() {
    let service = MockShareService::builder()
        .share_status_script(["creating", "creating", "available"])
        .build();
    let server = TestShareServer::spawn(service).await.expect("mock should spawn");
    let client = client_for(&server);

    let share = client
        .create_share(&CreateShareRequest::new("nfs", 1).with_name("lifecycle-share"))
        .await
        .expect("create should succeed");
    assert_eq!(share.status, "creating");

    client
        .wait_for_share_status(&share.id, "available")
        .await
        .expect("share should become available");

    let fetched = client.get_share(&share.id).await.expect("get should succeed");
    assert_eq!(fetched.name.as_deref(), Some("lifecycle-share"));
    assert_eq!(fetched.status, "available");

    client
        .delete_share(&share.id, None)
        .await
        .expect("delete should succeed");
    client
        .wait_for_share_deletion(&share.id)
        .await
        .expect("share should disappear");
    assert_eq!(server.service().live_shares(), 0);
}

#[tokio::test]
async fn test_share_landing_in_error_fails_fast() {
    let service = MockShareService::builder()
        .share_status_script(["creating", "error"])
        .build();
    let server = TestShareServer::spawn(service).await.expect("mock should spawn");
    let client = client_for(&server);

    let share = client
        .create_share(&CreateShareRequest::new("nfs", 1))
        .await
        .expect("create should succeed");

    let err = client
        .wait_for_share_status(&share.id, "available")
        .await
        .expect_err("wait should fail fast");
    match err {
        WaitError::BuildError { status, .. } => assert_eq!(status, "error"),
        other => panic!("expected BuildError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wait_times_out_on_stuck_share() {
    let service = MockShareService::builder()
        .share_status_script(["creating"])
        .build();
    let server = TestShareServer::spawn(service).await.expect("mock should spawn");
    let config = WaitConfig {
        interval: Duration::from_millis(100),
        timeout: Duration::from_secs(1),
    };
    let client = SharesClient::new(server.url(), None, Microversion::new(2, 55), config)
        .expect("client should build");

    let share = client
        .create_share(&CreateShareRequest::new("nfs", 1))
        .await
        .expect("create should succeed");

    let err = client
        .wait_for_share_status(&share.id, "available")
        .await
        .expect_err("wait should time out");
    match err {
        WaitError::Timeout { last_status, .. } => assert_eq!(last_status, "creating"),
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_access_rule_grant_wait_revoke() {
    let server = TestShareServer::spawn(MockShareService::available())
        .await
        .expect("mock should spawn");
    let client = client_for(&server);

    let share = client
        .create_share(&CreateShareRequest::new("nfs", 1))
        .await
        .expect("create should succeed");
    client
        .wait_for_share_status(&share.id, "available")
        .await
        .expect("share should become available");

    let rule = client
        .grant_access(&share.id, "ip", "10.0.0.0/24", "rw")
        .await
        .expect("grant should succeed");
    assert_eq!(rule.access_type, "ip");
    assert_eq!(rule.access_to, "10.0.0.0/24");

    client
        .wait_for_access_rule_status(&share.id, &rule.id, "active")
        .await
        .expect("rule should activate");

    client
        .revoke_access(&share.id, &rule.id)
        .await
        .expect("revoke should succeed");
    let rules = client
        .list_access_rules(&share.id)
        .await
        .expect("list should succeed");
    assert!(rules.is_empty(), "revoked rule should be gone");
}

#[tokio::test]
async fn test_snapshot_lifecycle_and_force_cleanup() {
    let service = MockShareService::builder()
        .snapshot_status_script(["creating", "available"])
        .build();
    let server = TestShareServer::spawn(service).await.expect("mock should spawn");
    let client = client_for(&server);

    let share = client
        .create_share(&CreateShareRequest::new("nfs", 1))
        .await
        .expect("create should succeed");
    client
        .wait_for_share_status(&share.id, "available")
        .await
        .expect("share should become available");

    let snapshot = client
        .create_snapshot(&share.id, Some("snap-of-share"), false)
        .await
        .expect("snapshot create should succeed");
    assert_eq!(snapshot.share_id, share.id);

    client
        .wait_for_snapshot_status(&snapshot.id, "available")
        .await
        .expect("snapshot should become available");

    client
        .delete_snapshot(&snapshot.id)
        .await
        .expect("delete should succeed");
    client
        .wait_for_snapshot_deletion(&snapshot.id)
        .await
        .expect("snapshot should disappear");

    // Admin path: reset to error, then force delete.
    client
        .reset_share_status(&share.id, "error")
        .await
        .expect("reset should succeed");
    client
        .wait_for_share_status(&share.id, "error")
        .await
        .expect("waiting for the error status itself must succeed");
    client
        .force_delete_share(&share.id)
        .await
        .expect("force delete should succeed");
    client
        .wait_for_share_deletion(&share.id)
        .await
        .expect("share should disappear");
}

#[tokio::test]
async fn test_extend_updates_reported_size() {
    let server = TestShareServer::spawn(MockShareService::available())
        .await
        .expect("mock should spawn");
    let client = client_for(&server);

    let share = client
        .create_share(&CreateShareRequest::new("nfs", 1))
        .await
        .expect("create should succeed");
    client
        .extend_share(&share.id, 3)
        .await
        .expect("extend should succeed");

    let fetched = client.get_share(&share.id).await.expect("get should succeed");
    assert_eq!(fetched.size, Some(3));
}
