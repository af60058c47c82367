//! Share replica lifecycle: create, sync, promote, delete.
//!
//! Requires a deployment with a replication-capable backend.

#![cfg(feature = "replication")]

use env_tests::fixtures::TestScope;
use shares_client::ReplicaAttr;

async fn scope() -> TestScope {
    TestScope::connect()
        .await
        .expect("Failed to reach the share service - check SHARES_API_URL and SHARES_API_TOKEN")
}

#[tokio::test]
async fn test_replica_create_sync_delete() {
    let scope = scope().await;

    let share = scope
        .create_share(scope.share_request())
        .await
        .expect("Share should build");

    let replica = scope
        .create_share_replica(&share.id)
        .await
        .expect("Replica should build");
    assert_eq!(replica.share_id, share.id);

    // Replication health is tracked by replica_state, separately from
    // the lifecycle status.
    scope
        .client()
        .wait_for_share_replica_status(&replica.id, ReplicaAttr::ReplicaState, "in_sync")
        .await
        .expect("Replica should reach in_sync");

    let listed = scope
        .client()
        .list_share_replicas(Some(&share.id))
        .await
        .expect("Listing should succeed");
    assert!(listed.iter().any(|entry| entry.id == replica.id));

    scope
        .client()
        .delete_share_replica(&replica.id)
        .await
        .expect("Delete should be accepted");
    scope
        .client()
        .wait_for_share_replica_deletion(&replica.id)
        .await
        .expect("Replica should disappear");

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}

#[tokio::test]
async fn test_promote_switches_active_replica() {
    let scope = scope().await;

    let share = scope
        .create_share(scope.share_request())
        .await
        .expect("Share should build");
    let replica = scope
        .create_share_replica(&share.id)
        .await
        .expect("Replica should build");

    scope
        .client()
        .wait_for_share_replica_status(&replica.id, ReplicaAttr::ReplicaState, "in_sync")
        .await
        .expect("Replica should reach in_sync before promotion");

    scope
        .client()
        .promote_share_replica(&replica.id)
        .await
        .expect("Promote should be accepted");
    scope
        .client()
        .wait_for_share_replica_status(&replica.id, ReplicaAttr::ReplicaState, "active")
        .await
        .expect("Promoted replica should become active");

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}
