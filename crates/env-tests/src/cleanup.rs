//! Teardown ledger for provisioned resources.
//!
//! Every fixture that provisions a resource registers a cleanup entry at
//! creation time. Entries are prepended, so the stored order is already
//! LIFO and dependent resources (snapshots, replicas, grouped shares)
//! tear down before the resources they depend on.
//!
//! Failure policy per entry:
//!
//! - NotFound / Forbidden are always swallowed: the resource is already
//!   gone or access was already revoked, both acceptable end states.
//! - Any other failure is swallowed only when the suite-level
//!   `suppress_cleanup_errors` flag is set; it is logged either way.
//! - Each entry runs in isolation. An unsuppressed failure never stops
//!   the remaining entries from being attempted: it is collected and
//!   reported after the full pass, so one reluctant deletion cannot leak
//!   every resource registered before it.
//!
//! An entry is processed at most once: the `deleted` flag flips after
//! the attempt regardless of outcome, and a second [`CleanupLedger::run`]
//! performs no work.

use async_trait::async_trait;
use shares_client::wait::WaitError;
use shares_client::SharesClient;
use std::sync::Arc;
use thiserror::Error;

/// Teardown capability each provisioned resource kind implements.
///
/// `delete` issues the deletion; `wait_gone` blocks until the backend
/// has actually released the resource, so dependency chains (a share
/// network referenced by a share server, a group referenced by its
/// members) unwind cleanly.
#[async_trait]
pub trait ScopedResource: Send + Sync {
    fn kind(&self) -> &'static str;
    fn id(&self) -> &str;
    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError>;
    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError>;
}

/// An unsuppressed teardown failure, reported after the full pass.
#[derive(Debug, Error)]
#[error("cleanup of {kind} {id} failed: {error}")]
pub struct CleanupFailure {
    pub kind: &'static str,
    pub id: String,
    #[source]
    pub error: WaitError,
}

struct CleanupEntry {
    resource: Box<dyn ScopedResource>,
    client: Arc<SharesClient>,
    deleted: bool,
}

/// LIFO ledger of pending teardown actions.
pub struct CleanupLedger {
    entries: Vec<CleanupEntry>,
    suppress_errors: bool,
}

impl CleanupLedger {
    pub fn new(suppress_errors: bool) -> Self {
        Self {
            entries: Vec::new(),
            suppress_errors,
        }
    }

    /// Prepend an entry; teardown order is reverse registration order.
    pub fn register(
        &mut self,
        client: Arc<SharesClient>,
        resource: impl ScopedResource + 'static,
    ) {
        self.entries.insert(
            0,
            CleanupEntry {
                resource: Box::new(resource),
                client,
                deleted: false,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tear down every entry not yet processed, in stored (LIFO) order.
    ///
    /// Returns the unsuppressed failures; an empty vector means every
    /// resource is gone or its absence was acceptable.
    pub async fn run(&mut self) -> Vec<CleanupFailure> {
        let mut failures = Vec::new();
        for entry in &mut self.entries {
            if entry.deleted {
                continue;
            }
            let kind = entry.resource.kind();
            let id = entry.resource.id().to_string();
            let result = teardown(entry).await;
            entry.deleted = true;

            match result {
                Ok(()) => {
                    tracing::debug!(kind, id = %id, "cleaned up");
                }
                Err(error) if is_already_gone(&error) => {
                    tracing::debug!(kind, id = %id, %error, "resource already gone");
                }
                Err(error) if self.suppress_errors => {
                    tracing::error!(kind, id = %id, %error, "suppressed cleanup failure");
                }
                Err(error) => {
                    tracing::error!(kind, id = %id, %error, "cleanup failed");
                    failures.push(CleanupFailure { kind, id, error });
                }
            }
        }
        failures
    }
}

async fn teardown(entry: &CleanupEntry) -> Result<(), WaitError> {
    entry.resource.delete(&entry.client).await?;
    entry.resource.wait_gone(&entry.client).await
}

/// NotFound and Forbidden are acceptable end states for cleanup.
fn is_already_gone(error: &WaitError) -> bool {
    matches!(error, WaitError::Api(api) if api.is_gone())
}

// Resource kinds. Each pairs the family's delete call with its deletion
// waiter; the ledger only ever sees the trait.

/// A share; grouped shares must name their group on deletion, everything
/// else is force-deleted so errored shares cannot wedge teardown.
pub struct ShareResource {
    pub id: String,
    pub share_group_id: Option<String>,
}

#[async_trait]
impl ScopedResource for ShareResource {
    fn kind(&self) -> &'static str {
        "share"
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError> {
        match &self.share_group_id {
            Some(group_id) => client.delete_share(&self.id, Some(group_id)).await?,
            None => client.force_delete_share(&self.id).await?,
        }
        Ok(())
    }

    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.wait_for_share_deletion(&self.id).await
    }
}

pub struct SnapshotResource {
    pub id: String,
}

#[async_trait]
impl ScopedResource for SnapshotResource {
    fn kind(&self) -> &'static str {
        "snapshot"
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.delete_snapshot(&self.id).await?;
        Ok(())
    }

    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.wait_for_snapshot_deletion(&self.id).await
    }
}

pub struct ShareNetworkResource {
    pub id: String,
}

#[async_trait]
impl ScopedResource for ShareNetworkResource {
    fn kind(&self) -> &'static str {
        "share network"
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.delete_share_network(&self.id).await?;
        Ok(())
    }

    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.wait_for_share_network_deletion(&self.id).await
    }
}

pub struct SecurityServiceResource {
    pub id: String,
}

#[async_trait]
impl ScopedResource for SecurityServiceResource {
    fn kind(&self) -> &'static str {
        "security service"
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.delete_security_service(&self.id).await?;
        Ok(())
    }

    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.wait_for_security_service_deletion(&self.id).await
    }
}

pub struct ShareTypeResource {
    pub id: String,
}

#[async_trait]
impl ScopedResource for ShareTypeResource {
    fn kind(&self) -> &'static str {
        "share type"
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.delete_share_type(&self.id).await?;
        Ok(())
    }

    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.wait_for_share_type_deletion(&self.id).await
    }
}

pub struct ShareGroupResource {
    pub id: String,
}

#[async_trait]
impl ScopedResource for ShareGroupResource {
    fn kind(&self) -> &'static str {
        "share group"
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.delete_share_group(&self.id).await?;
        Ok(())
    }

    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.wait_for_share_group_deletion(&self.id).await
    }
}

pub struct ShareGroupSnapshotResource {
    pub id: String,
}

#[async_trait]
impl ScopedResource for ShareGroupSnapshotResource {
    fn kind(&self) -> &'static str {
        "share group snapshot"
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.delete_share_group_snapshot(&self.id).await?;
        Ok(())
    }

    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.wait_for_share_group_snapshot_deletion(&self.id).await
    }
}

pub struct ReplicaResource {
    pub id: String,
}

#[async_trait]
impl ScopedResource for ReplicaResource {
    fn kind(&self) -> &'static str {
        "share replica"
    }

    fn id(&self) -> &str {
        &self.id
    }

    async fn delete(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.delete_share_replica(&self.id).await?;
        Ok(())
    }

    async fn wait_gone(&self, client: &SharesClient) -> Result<(), WaitError> {
        client.wait_for_share_replica_deletion(&self.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shares_client::ApiError;
    use std::sync::Mutex;

    /// What a recording resource's delete call should do.
    enum Outcome {
        Succeed,
        NotFound,
        Forbidden,
        Unexpected,
    }

    struct RecordingResource {
        name: &'static str,
        outcome: Outcome,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ScopedResource for RecordingResource {
        fn kind(&self) -> &'static str {
            "recording"
        }

        fn id(&self) -> &str {
            self.name
        }

        async fn delete(&self, _client: &SharesClient) -> Result<(), WaitError> {
            self.log.lock().unwrap().push(self.name.to_string());
            match self.outcome {
                Outcome::Succeed => Ok(()),
                Outcome::NotFound => Err(WaitError::Api(ApiError::NotFound {
                    method: "DELETE".to_string(),
                    url: format!("http://backend/v2/shares/{}", self.name),
                    body: String::new(),
                })),
                Outcome::Forbidden => Err(WaitError::Api(ApiError::Forbidden {
                    method: "DELETE".to_string(),
                    url: format!("http://backend/v2/shares/{}", self.name),
                    body: String::new(),
                })),
                Outcome::Unexpected => Err(WaitError::BuildError {
                    resource: format!("share {}", self.name),
                    status: "error_deleting".to_string(),
                }),
            }
        }

        async fn wait_gone(&self, _client: &SharesClient) -> Result<(), WaitError> {
            Ok(())
        }
    }

    fn offline_client() -> Arc<SharesClient> {
        // Never contacted by RecordingResource.
        Arc::new(SharesClient::connect("http://127.0.0.1:1/v2").expect("client should build"))
    }

    fn ledger_with(
        names: &[&'static str],
        outcome_for: impl Fn(&str) -> Outcome,
        suppress: bool,
    ) -> (CleanupLedger, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let client = offline_client();
        let mut ledger = CleanupLedger::new(suppress);
        for name in names {
            ledger.register(
                client.clone(),
                RecordingResource {
                    name,
                    outcome: outcome_for(name),
                    log: log.clone(),
                },
            );
        }
        (ledger, log)
    }

    #[tokio::test]
    async fn test_run_unwinds_in_reverse_registration_order() {
        let (mut ledger, log) = ledger_with(&["a", "b", "c"], |_| Outcome::Succeed, false);

        let failures = ledger.run().await;

        assert!(failures.is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_second_run_performs_no_callbacks() {
        let (mut ledger, log) = ledger_with(&["a", "b"], |_| Outcome::Succeed, false);

        ledger.run().await;
        assert_eq!(log.lock().unwrap().len(), 2);

        let failures = ledger.run().await;
        assert!(failures.is_empty());
        assert_eq!(log.lock().unwrap().len(), 2, "second run must be a no-op");
    }

    #[tokio::test]
    async fn test_not_found_and_forbidden_never_surface() {
        let (mut ledger, log) = ledger_with(
            &["gone", "revoked"],
            |name| {
                if name == "gone" {
                    Outcome::NotFound
                } else {
                    Outcome::Forbidden
                }
            },
            false,
        );

        let failures = ledger.run().await;

        assert!(failures.is_empty());
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unsuppressed_failure_does_not_block_remaining_entries() {
        // Registration order a, b, c → teardown order c, b, a with b failing.
        let (mut ledger, log) = ledger_with(
            &["a", "b", "c"],
            |name| {
                if name == "b" {
                    Outcome::Unexpected
                } else {
                    Outcome::Succeed
                }
            },
            false,
        );

        let failures = ledger.run().await;

        assert_eq!(*log.lock().unwrap(), vec!["c", "b", "a"], "a must still run after b fails");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].id, "b");
    }

    #[tokio::test]
    async fn test_suppress_flag_swallows_unexpected_failures() {
        let (mut ledger, _log) = ledger_with(&["a"], |_| Outcome::Unexpected, true);

        let failures = ledger.run().await;

        assert!(failures.is_empty());
    }
}
