//! Test scope: one client, one cleanup ledger, provisioning helpers.
//!
//! A [`TestScope`] is created per test (or shared per test file for
//! expensive setups) and owns the cleanup ledger. Every `create_*`
//! helper registers the resource's teardown entry *before* waiting for
//! the ready state, so a wait failure still leaves the resource on the
//! ledger. Call [`TestScope::teardown`] at the end of the test; it
//! drains the ledger in reverse creation order and fails the test on
//! unsuppressed cleanup errors.

use shares_client::wait::WaitError;
use shares_client::{
    CreateShareRequest, SecurityService, SecurityServiceSpec, Share, ShareGroup, ShareNetwork,
    ShareNetworkSpec, ShareReplica, SharesClient, Snapshot,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cleanup::{
    CleanupFailure, CleanupLedger, ReplicaResource, ScopedResource, SecurityServiceResource,
    ShareGroupResource, ShareNetworkResource, ShareResource, ShareTypeResource, SnapshotResource,
};
use crate::config::TestConfig;

/// Per-test context owning the client and the cleanup ledger.
pub struct TestScope {
    config: TestConfig,
    client: Arc<SharesClient>,
    ledger: Mutex<CleanupLedger>,
}

impl TestScope {
    /// Connect using configuration from the environment and verify the
    /// endpoint answers version discovery before any test runs.
    pub async fn connect() -> Result<Self, WaitError> {
        Self::with_config(TestConfig::from_env()).await
    }

    /// Connect with explicit configuration.
    pub async fn with_config(config: TestConfig) -> Result<Self, WaitError> {
        crate::init_logging();
        let client = SharesClient::new(
            &config.api_url,
            config.auth_token.clone(),
            config.negotiated_version(),
            config.wait_config(),
        )?;
        // Endpoint gate: fail early with an actionable error instead of
        // timing out inside the first test body.
        client.list_api_versions().await?;

        let ledger = CleanupLedger::new(config.suppress_cleanup_errors);
        Ok(Self {
            config,
            client: Arc::new(client),
            ledger: Mutex::new(ledger),
        })
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn client(&self) -> &SharesClient {
        &self.client
    }

    /// Register a teardown entry for a resource provisioned outside the
    /// `create_*` helpers.
    pub async fn register(&self, resource: impl ScopedResource + 'static) {
        self.ledger.lock().await.register(self.client.clone(), resource);
    }

    /// Share creation request with the suite's protocol and size.
    pub fn share_request(&self) -> CreateShareRequest {
        CreateShareRequest::new(self.config.protocol(), self.config.share_size_gb)
    }

    /// Create one share and wait for `available`. Retries if allowed.
    pub async fn create_share(&self, request: CreateShareRequest) -> Result<Share, WaitError> {
        let mut shares = self.create_shares(vec![request]).await?;
        Ok(shares.remove(0))
    }

    /// Create several shares, then round-robin one wait check across all
    /// of them in this task. A share that lands in an error state (or
    /// times out) is recreated up to the configured retry count; the
    /// errored original stays on the ledger and is reaped at teardown.
    pub async fn create_shares(
        &self,
        requests: Vec<CreateShareRequest>,
    ) -> Result<Vec<Share>, WaitError> {
        struct Slot {
            request: CreateShareRequest,
            share: Share,
            attempts: u32,
            available: bool,
        }

        let mut slots = Vec::with_capacity(requests.len());
        for request in requests {
            let share = self.client.create_share(&request).await?;
            self.register(ShareResource {
                id: share.id.clone(),
                share_group_id: request.share_group_id.clone(),
            })
            .await;
            slots.push(Slot {
                request,
                share,
                attempts: 0,
                available: false,
            });
        }

        while slots.iter().any(|slot| !slot.available) {
            for slot in &mut slots {
                if slot.available {
                    continue;
                }
                match self
                    .client
                    .wait_for_share_status(&slot.share.id, "available")
                    .await
                {
                    Ok(()) => slot.available = true,
                    Err(error @ (WaitError::BuildError { .. } | WaitError::Timeout { .. })) => {
                        if slot.attempts >= self.config.share_creation_retry_number {
                            return Err(error);
                        }
                        slot.attempts += 1;
                        tracing::error!(
                            share_id = %slot.share.id,
                            %error,
                            "share failed to build, creating another"
                        );
                        if let Some(group_id) = slot.request.share_group_id.as_deref() {
                            // A wedged member blocks its group's teardown;
                            // reap it now rather than at scope exit.
                            let _ = self.client.delete_share(&slot.share.id, Some(group_id)).await;
                            let _ = self.client.wait_for_share_deletion(&slot.share.id).await;
                        }
                        slot.share = self.client.create_share(&slot.request).await?;
                        self.register(ShareResource {
                            id: slot.share.id.clone(),
                            share_group_id: slot.request.share_group_id.clone(),
                        })
                        .await;
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        Ok(slots.into_iter().map(|slot| slot.share).collect())
    }

    /// Create a snapshot and wait for `available`.
    pub async fn create_snapshot(&self, share_id: &str) -> Result<Snapshot, WaitError> {
        let snapshot = self.client.create_snapshot(share_id, None, false).await?;
        self.register(SnapshotResource {
            id: snapshot.id.clone(),
        })
        .await;
        self.client
            .wait_for_snapshot_status(&snapshot.id, "available")
            .await?;
        Ok(snapshot)
    }

    /// Create a share network from a generated spec.
    pub async fn create_share_network(&self) -> Result<ShareNetwork, WaitError> {
        let network = self
            .client
            .create_share_network(&ShareNetworkSpec::generated())
            .await?;
        self.register(ShareNetworkResource {
            id: network.id.clone(),
        })
        .await;
        Ok(network)
    }

    /// Create an LDAP security service from a generated spec.
    pub async fn create_security_service(&self) -> Result<SecurityService, WaitError> {
        let service = self
            .client
            .create_security_service(&SecurityServiceSpec::generated_ldap())
            .await?;
        self.register(SecurityServiceResource {
            id: service.id.clone(),
        })
        .await;
        Ok(service)
    }

    /// Create a share type (admin).
    pub async fn create_share_type(
        &self,
        driver_handles_share_servers: bool,
    ) -> Result<shares_client::ShareType, WaitError> {
        let share_type = self
            .client
            .create_share_type(None, true, driver_handles_share_servers, HashMap::new())
            .await?;
        self.register(ShareTypeResource {
            id: share_type.id.clone(),
        })
        .await;
        Ok(share_type)
    }

    /// Create a share group and wait for `available`.
    pub async fn create_share_group(&self) -> Result<ShareGroup, WaitError> {
        let group = self.client.create_share_group(None, None).await?;
        self.register(ShareGroupResource {
            id: group.id.clone(),
        })
        .await;
        self.client
            .wait_for_share_group_status(&group.id, "available")
            .await?;
        Ok(group)
    }

    /// Create a share replica and wait for `available`.
    pub async fn create_share_replica(&self, share_id: &str) -> Result<ShareReplica, WaitError> {
        let replica = self.client.create_share_replica(share_id, None).await?;
        self.register(ReplicaResource {
            id: replica.id.clone(),
        })
        .await;
        self.client
            .wait_for_share_replica_status(
                &replica.id,
                shares_client::ReplicaAttr::Status,
                "available",
            )
            .await?;
        Ok(replica)
    }

    /// Drain the cleanup ledger. Returns the unsuppressed failures so
    /// callers can assert the scope closed clean.
    pub async fn teardown(&self) -> Vec<CleanupFailure> {
        self.ledger.lock().await.run().await
    }
}
