//! Access rule flows: grant, activate, list, revoke.

#![cfg(feature = "flows")]

use env_tests::fixtures::TestScope;

async fn scope() -> TestScope {
    TestScope::connect()
        .await
        .expect("Failed to reach the share service - check SHARES_API_URL and SHARES_API_TOKEN")
}

#[tokio::test]
async fn test_ip_rule_grant_activate_revoke() {
    let scope = scope().await;

    let share = scope
        .create_share(scope.share_request())
        .await
        .expect("Share should build");

    let rule = scope
        .client()
        .grant_access(&share.id, "ip", "10.1.0.0/24", "rw")
        .await
        .expect("Grant should be accepted");
    assert_eq!(rule.access_type, "ip");
    assert_eq!(rule.access_to, "10.1.0.0/24");

    scope
        .client()
        .wait_for_access_rule_status(&share.id, &rule.id, "active")
        .await
        .expect("Rule should activate");

    let rules = scope
        .client()
        .list_access_rules(&share.id)
        .await
        .expect("Listing should succeed");
    assert!(rules.iter().any(|entry| entry.id == rule.id));

    scope
        .client()
        .revoke_access(&share.id, &rule.id)
        .await
        .expect("Revoke should be accepted");

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}

#[tokio::test]
async fn test_read_only_rule_keeps_its_level() {
    let scope = scope().await;

    let share = scope
        .create_share(scope.share_request())
        .await
        .expect("Share should build");

    let rule = scope
        .client()
        .grant_access(&share.id, "ip", "10.2.0.10", "ro")
        .await
        .expect("Grant should be accepted");
    scope
        .client()
        .wait_for_access_rule_status(&share.id, &rule.id, "active")
        .await
        .expect("Rule should activate");

    let rules = scope
        .client()
        .list_access_rules(&share.id)
        .await
        .expect("Listing should succeed");
    let listed = rules
        .iter()
        .find(|entry| entry.id == rule.id)
        .expect("Granted rule should be listed");
    assert_eq!(listed.access_level.as_deref(), Some("ro"));

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}

#[tokio::test]
async fn test_duplicate_grant_is_rejected() {
    let scope = scope().await;

    let share = scope
        .create_share(scope.share_request())
        .await
        .expect("Share should build");

    let rule = scope
        .client()
        .grant_access(&share.id, "ip", "10.3.0.0/24", "rw")
        .await
        .expect("First grant should be accepted");
    scope
        .client()
        .wait_for_access_rule_status(&share.id, &rule.id, "active")
        .await
        .expect("Rule should activate");

    let duplicate = scope
        .client()
        .grant_access(&share.id, "ip", "10.3.0.0/24", "rw")
        .await;
    assert!(duplicate.is_err(), "Granting the same address twice should be rejected");

    let failures = scope.teardown().await;
    assert!(failures.is_empty(), "cleanup failures: {failures:?}");
}
