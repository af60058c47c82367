//! Share CRUD flows: create, read, list, resize, delete.

#![cfg(feature = "flows")]

use env_tests::fixtures::TestScope;
use std::collections::HashMap;

async fn scope() -> TestScope {
    TestScope::connect()
        .await
        .expect("Failed to reach the share service - check SHARES_API_URL and SHARES_API_TOKEN")
}

#[tokio::test]
async fn test_create_get_list_delete_share() {
    let scope = scope().await;

    let request = scope.share_request().with_name("crud-share");
    let share = scope
        .create_share(request)
        .await
        .expect("Share should build");

    // Read it back.
    let fetched = scope
        .client()
        .get_share(&share.id)
        .await
        .expect("Share should be readable");
    assert_eq!(fetched.id, share.id);
    assert_eq!(fetched.name.as_deref(), Some("crud-share"));
    assert_eq!(fetched.status, "available");

    // It appears in the detailed listing filtered by name.
    let listed = scope
        .client()
        .list_shares_detailed(&[("name", "crud-share")])
        .await
        .expect("Listing should succeed");
    assert!(
        listed.iter().any(|entry| entry.id == share.id),
        "Created share should appear in the filtered listing"
    );

    // Explicit delete; the ledger entry then sees NotFound and stays quiet.
    scope
        .client()
        .delete_share(&share.id, None)
        .await
        .expect("Delete should be accepted");
    scope
        .client()
        .wait_for_share_deletion(&share.id)
        .await
        .expect("Share should disappear");

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}

#[tokio::test]
async fn test_create_share_with_metadata() {
    let scope = scope().await;

    let metadata = HashMap::from([
        ("purpose".to_string(), "integration".to_string()),
        ("owner".to_string(), "env-tests".to_string()),
    ]);
    let request = scope.share_request().with_metadata(metadata.clone());
    let share = scope
        .create_share(request)
        .await
        .expect("Share should build");

    let fetched = scope
        .client()
        .get_share(&share.id)
        .await
        .expect("Share should be readable");
    for (key, value) in &metadata {
        assert_eq!(
            fetched.metadata.get(key),
            Some(value),
            "Metadata key {key} should round-trip"
        );
    }

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}

#[tokio::test]
async fn test_batch_share_creation_builds_every_share() {
    let scope = scope().await;

    let requests = vec![
        scope.share_request().with_name("batch-share-0"),
        scope.share_request().with_name("batch-share-1"),
        scope.share_request().with_name("batch-share-2"),
    ];
    let shares = scope
        .create_shares(requests)
        .await
        .expect("Every share in the batch should build");

    assert_eq!(shares.len(), 3);
    for share in &shares {
        let fetched = scope
            .client()
            .get_share(&share.id)
            .await
            .expect("Share should be readable");
        assert_eq!(fetched.status, "available");
    }

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}

#[tokio::test]
async fn test_extend_then_shrink_share() {
    let scope = scope().await;

    let share = scope
        .create_share(scope.share_request())
        .await
        .expect("Share should build");
    let original_size = scope.config().share_size_gb;

    scope
        .client()
        .extend_share(&share.id, original_size + 1)
        .await
        .expect("Extend should be accepted");
    scope
        .client()
        .wait_for_share_status(&share.id, "available")
        .await
        .expect("Share should settle after extend");
    let extended = scope
        .client()
        .get_share(&share.id)
        .await
        .expect("Share should be readable");
    assert_eq!(extended.size, Some(original_size + 1));

    scope
        .client()
        .shrink_share(&share.id, original_size)
        .await
        .expect("Shrink should be accepted");
    scope
        .client()
        .wait_for_share_status(&share.id, "available")
        .await
        .expect("Share should settle after shrink");
    let shrunk = scope
        .client()
        .get_share(&share.id)
        .await
        .expect("Share should be readable");
    assert_eq!(shrunk.size, Some(original_size));

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}

#[tokio::test]
async fn test_export_locations_present_once_available() {
    let scope = scope().await;

    let share = scope
        .create_share(scope.share_request())
        .await
        .expect("Share should build");

    let locations = scope
        .client()
        .list_share_export_locations(&share.id)
        .await
        .expect("Export locations should be listable");
    assert!(
        !locations.is_empty(),
        "An available share should expose at least one export location"
    );
    for location in &locations {
        assert!(!location.path.is_empty(), "Export path should be non-empty");
    }

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}
