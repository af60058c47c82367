//! Share group and share-group-snapshot lifecycle.
//!
//! Group APIs are experimental; every call opts into the experimental
//! header.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{
    unique_name, ShareGroup, ShareGroupEnvelope, ShareGroupSnapshot, ShareGroupSnapshotEnvelope,
    ShareGroupSnapshotsEnvelope, ShareGroupsEnvelope,
};
use crate::wait::{self, WaitError};
use crate::SharesClient;

impl SharesClient {
    /// `POST /share-groups`
    pub async fn create_share_group(
        &self,
        share_network_id: Option<&str>,
        source_share_group_snapshot_id: Option<&str>,
    ) -> Result<ShareGroup, ApiError> {
        let mut group = serde_json::json!({
            "name": unique_name("sg"),
            "description": unique_name("sg-desc"),
        });
        if let Some(network_id) = share_network_id {
            group["share_network_id"] = serde_json::json!(network_id);
        }
        if let Some(snapshot_id) = source_share_group_snapshot_id {
            group["source_share_group_snapshot_id"] = serde_json::json!(snapshot_id);
        }
        let raw = self
            .rest
            .post(
                "share-groups",
                serde_json::json!({ "share_group": group }),
                StatusCode::ACCEPTED,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareGroupEnvelope>(&raw)?.share_group)
    }

    /// `GET /share-groups/{id}`
    pub async fn get_share_group(&self, group_id: &str) -> Result<ShareGroup, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("share-groups/{group_id}"),
                StatusCode::OK,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareGroupEnvelope>(&raw)?.share_group)
    }

    /// `GET /share-groups/detail`
    pub async fn list_share_groups(&self) -> Result<Vec<ShareGroup>, ApiError> {
        let raw = self
            .rest
            .get("share-groups/detail", StatusCode::OK, RequestOpts::experimental())
            .await?;
        Ok(serde_json::from_str::<ShareGroupsEnvelope>(&raw)?.share_groups)
    }

    /// `PUT /share-groups/{id}`: rename or re-describe.
    pub async fn update_share_group(
        &self,
        group_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<ShareGroup, ApiError> {
        let mut group = serde_json::Map::new();
        if let Some(name) = name {
            group.insert("name".to_string(), serde_json::json!(name));
        }
        if let Some(description) = description {
            group.insert("description".to_string(), serde_json::json!(description));
        }
        let raw = self
            .rest
            .put(
                &format!("share-groups/{group_id}"),
                serde_json::json!({ "share_group": group }),
                StatusCode::OK,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareGroupEnvelope>(&raw)?.share_group)
    }

    /// `DELETE /share-groups/{id}`
    pub async fn delete_share_group(&self, group_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("share-groups/{group_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(())
    }

    /// Admin action: force the group's status attribute.
    pub async fn reset_share_group_status(
        &self,
        group_id: &str,
        status: &str,
    ) -> Result<(), ApiError> {
        self.reset_status_action("share-groups", group_id, status, true).await
    }

    /// Admin action: delete a group regardless of its state.
    pub async fn force_delete_share_group(&self, group_id: &str) -> Result<(), ApiError> {
        self.force_delete_action("share-groups", group_id, true).await
    }

    /// Block until the group's status reaches `target`.
    pub async fn wait_for_share_group_status(
        &self,
        group_id: &str,
        target: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_status(
            &format!("share group {group_id}"),
            &[target],
            self.wait_config(),
            move || async move { Ok(self.get_share_group(group_id).await?.status) },
        )
        .await?;
        Ok(())
    }

    /// Whether the group no longer exists.
    pub async fn share_group_deleted(&self, group_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_share_group(group_id).await.map(|_| ()))
    }

    /// Block until the group no longer exists.
    pub async fn wait_for_share_group_deletion(&self, group_id: &str) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("share group {group_id}"),
            self.wait_config(),
            move || async move { self.share_group_deleted(group_id).await },
        )
        .await
    }

    /// `POST /share-group-snapshots`
    pub async fn create_share_group_snapshot(
        &self,
        group_id: &str,
    ) -> Result<ShareGroupSnapshot, ApiError> {
        let body = serde_json::json!({
            "share_group_snapshot": {
                "share_group_id": group_id,
                "name": unique_name("sg-snap"),
                "description": unique_name("sg-snap-desc"),
            }
        });
        let raw = self
            .rest
            .post(
                "share-group-snapshots",
                body,
                StatusCode::ACCEPTED,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareGroupSnapshotEnvelope>(&raw)?.share_group_snapshot)
    }

    /// `GET /share-group-snapshots/{id}`
    pub async fn get_share_group_snapshot(
        &self,
        snapshot_id: &str,
    ) -> Result<ShareGroupSnapshot, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("share-group-snapshots/{snapshot_id}"),
                StatusCode::OK,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareGroupSnapshotEnvelope>(&raw)?.share_group_snapshot)
    }

    /// `GET /share-group-snapshots/detail`
    pub async fn list_share_group_snapshots(
        &self,
    ) -> Result<Vec<ShareGroupSnapshot>, ApiError> {
        let raw = self
            .rest
            .get(
                "share-group-snapshots/detail",
                StatusCode::OK,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareGroupSnapshotsEnvelope>(&raw)?.share_group_snapshots)
    }

    /// `DELETE /share-group-snapshots/{id}`
    pub async fn delete_share_group_snapshot(&self, snapshot_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("share-group-snapshots/{snapshot_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::experimental(),
            )
            .await?;
        Ok(())
    }

    /// Admin action: force the group snapshot's status attribute.
    pub async fn reset_share_group_snapshot_status(
        &self,
        snapshot_id: &str,
        status: &str,
    ) -> Result<(), ApiError> {
        self.reset_status_action("share-group-snapshots", snapshot_id, status, true)
            .await
    }

    /// Block until the group snapshot's status reaches `target`.
    pub async fn wait_for_share_group_snapshot_status(
        &self,
        snapshot_id: &str,
        target: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_status(
            &format!("share group snapshot {snapshot_id}"),
            &[target],
            self.wait_config(),
            move || async move { Ok(self.get_share_group_snapshot(snapshot_id).await?.status) },
        )
        .await?;
        Ok(())
    }

    /// Whether the group snapshot no longer exists.
    pub async fn share_group_snapshot_deleted(
        &self,
        snapshot_id: &str,
    ) -> Result<bool, ApiError> {
        Self::gone(self.get_share_group_snapshot(snapshot_id).await.map(|_| ()))
    }

    /// Block until the group snapshot no longer exists.
    pub async fn wait_for_share_group_snapshot_deletion(
        &self,
        snapshot_id: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("share group snapshot {snapshot_id}"),
            self.wait_config(),
            move || async move { self.share_group_snapshot_deleted(snapshot_id).await },
        )
        .await
    }
}
