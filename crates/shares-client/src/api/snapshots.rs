//! Snapshot CRUD, actions, and waiters.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{unique_name, Snapshot, SnapshotEnvelope, SnapshotsEnvelope};
use crate::wait::{self, WaitError};
use crate::SharesClient;

impl SharesClient {
    /// `POST /snapshots`: returns the snapshot in `creating` state.
    pub async fn create_snapshot(
        &self,
        share_id: &str,
        name: Option<&str>,
        force: bool,
    ) -> Result<Snapshot, ApiError> {
        let name = name.map(str::to_string).unwrap_or_else(|| unique_name("snap"));
        let body = serde_json::json!({
            "snapshot": {
                "share_id": share_id,
                "name": name,
                "description": unique_name("snap-desc"),
                "force": force,
            }
        });
        let raw = self
            .rest
            .post("snapshots", body, StatusCode::ACCEPTED, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<SnapshotEnvelope>(&raw)?.snapshot)
    }

    /// `GET /snapshots/{id}`
    pub async fn get_snapshot(&self, snapshot_id: &str) -> Result<Snapshot, ApiError> {
        let raw = self
            .rest
            .get(&format!("snapshots/{snapshot_id}"), StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<SnapshotEnvelope>(&raw)?.snapshot)
    }

    /// `GET /snapshots/detail`, optionally filtered to one share.
    pub async fn list_snapshots(&self, share_id: Option<&str>) -> Result<Vec<Snapshot>, ApiError> {
        let mut opts = RequestOpts::default();
        if let Some(share_id) = share_id {
            opts = opts.with_query("share_id", share_id);
        }
        let raw = self.rest.get("snapshots/detail", StatusCode::OK, opts).await?;
        Ok(serde_json::from_str::<SnapshotsEnvelope>(&raw)?.snapshots)
    }

    /// `DELETE /snapshots/{id}`
    pub async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("snapshots/{snapshot_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Admin action: force the snapshot status.
    pub async fn reset_snapshot_status(
        &self,
        snapshot_id: &str,
        status: &str,
    ) -> Result<(), ApiError> {
        self.reset_status_action("snapshots", snapshot_id, status, false).await
    }

    /// Admin action: delete a snapshot regardless of its state.
    pub async fn force_delete_snapshot(&self, snapshot_id: &str) -> Result<(), ApiError> {
        self.force_delete_action("snapshots", snapshot_id, false).await
    }

    /// Block until the snapshot's status reaches `target`.
    pub async fn wait_for_snapshot_status(
        &self,
        snapshot_id: &str,
        target: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_status(
            &format!("snapshot {snapshot_id}"),
            &[target],
            self.wait_config(),
            move || async move { Ok(self.get_snapshot(snapshot_id).await?.status) },
        )
        .await?;
        Ok(())
    }

    /// Whether the snapshot no longer exists.
    pub async fn snapshot_deleted(&self, snapshot_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_snapshot(snapshot_id).await.map(|_| ()))
    }

    /// Block until the snapshot no longer exists.
    pub async fn wait_for_snapshot_deletion(&self, snapshot_id: &str) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("snapshot {snapshot_id}"),
            self.wait_config(),
            move || async move { self.snapshot_deleted(snapshot_id).await },
        )
        .await
    }
}
