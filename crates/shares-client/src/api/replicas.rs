//! Share replica lifecycle and waiters.
//!
//! Replica APIs are experimental at the negotiated versions this client
//! targets, so every call opts into the experimental header.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{ReplicaEnvelope, ReplicasEnvelope, ShareReplica};
use crate::wait::{self, WaitError};
use crate::SharesClient;

/// Which replica attribute a wait tracks.
///
/// `status` covers create/delete transitions; `replica_state` covers
/// replication health (`in_sync`, `out_of_sync`, `active`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaAttr {
    Status,
    ReplicaState,
}

impl SharesClient {
    /// `POST /share-replicas`
    pub async fn create_share_replica(
        &self,
        share_id: &str,
        availability_zone: Option<&str>,
    ) -> Result<ShareReplica, ApiError> {
        let mut replica = serde_json::json!({ "share_id": share_id });
        if let Some(zone) = availability_zone {
            replica["availability_zone"] = serde_json::json!(zone);
        }
        let raw = self
            .rest
            .post(
                "share-replicas",
                serde_json::json!({ "share_replica": replica }),
                StatusCode::ACCEPTED,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(serde_json::from_str::<ReplicaEnvelope>(&raw)?.share_replica)
    }

    /// `GET /share-replicas/{id}`
    pub async fn get_share_replica(&self, replica_id: &str) -> Result<ShareReplica, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("share-replicas/{replica_id}"),
                StatusCode::OK,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(serde_json::from_str::<ReplicaEnvelope>(&raw)?.share_replica)
    }

    /// `GET /share-replicas/detail`, optionally filtered to one share.
    pub async fn list_share_replicas(
        &self,
        share_id: Option<&str>,
    ) -> Result<Vec<ShareReplica>, ApiError> {
        let mut opts = RequestOpts::experimental();
        if let Some(share_id) = share_id {
            opts = opts.with_query("share_id", share_id);
        }
        let raw = self
            .rest
            .get("share-replicas/detail", StatusCode::OK, opts)
            .await?;
        Ok(serde_json::from_str::<ReplicasEnvelope>(&raw)?.share_replicas)
    }

    /// `DELETE /share-replicas/{id}`
    pub async fn delete_share_replica(&self, replica_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("share-replicas/{replica_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(())
    }

    /// Promote a secondary replica to the active one.
    pub async fn promote_share_replica(&self, replica_id: &str) -> Result<(), ApiError> {
        self.replica_action(replica_id, "promote", serde_json::Value::Null).await
    }

    /// Ask the backend to resynchronize an out-of-sync replica.
    pub async fn resync_share_replica(&self, replica_id: &str) -> Result<(), ApiError> {
        self.replica_action(replica_id, "resync", serde_json::Value::Null).await
    }

    /// Admin action: force the replica's status attribute.
    pub async fn reset_share_replica_status(
        &self,
        replica_id: &str,
        status: &str,
    ) -> Result<(), ApiError> {
        self.replica_action(replica_id, "reset_status", serde_json::json!({ "status": status }))
            .await
    }

    /// Admin action: force the replica's `replica_state` attribute.
    pub async fn reset_share_replica_state(
        &self,
        replica_id: &str,
        replica_state: &str,
    ) -> Result<(), ApiError> {
        self.replica_action(
            replica_id,
            "reset_replica_state",
            serde_json::json!({ "replica_state": replica_state }),
        )
        .await
    }

    /// Admin action: delete a replica regardless of its state.
    pub async fn force_delete_share_replica(&self, replica_id: &str) -> Result<(), ApiError> {
        self.force_delete_action("share-replicas", replica_id, true).await
    }

    async fn replica_action(
        &self,
        replica_id: &str,
        action: &str,
        payload: serde_json::Value,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ action: payload });
        self.rest
            .post(
                &format!("share-replicas/{replica_id}/action"),
                body,
                StatusCode::ACCEPTED,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(())
    }

    /// Block until the tracked replica attribute reaches `target`.
    ///
    /// A missing `replica_state` reads as `out_of_sync`: the backend
    /// omits the attribute until the first sync cycle runs.
    pub async fn wait_for_share_replica_status(
        &self,
        replica_id: &str,
        attr: ReplicaAttr,
        target: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_status(
            &format!("share replica {replica_id}"),
            &[target],
            self.wait_config(),
            move || async move {
                let replica = self.get_share_replica(replica_id).await?;
                Ok(match attr {
                    ReplicaAttr::Status => replica.status,
                    ReplicaAttr::ReplicaState => replica
                        .replica_state
                        .unwrap_or_else(|| "out_of_sync".to_string()),
                })
            },
        )
        .await?;
        Ok(())
    }

    /// Whether the replica no longer exists.
    pub async fn share_replica_deleted(&self, replica_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_share_replica(replica_id).await.map(|_| ()))
    }

    /// Block until the replica no longer exists.
    pub async fn wait_for_share_replica_deletion(&self, replica_id: &str) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("share replica {replica_id}"),
            self.wait_config(),
            move || async move { self.share_replica_deleted(replica_id).await },
        )
        .await
    }
}
