//! Share CRUD, actions, and waiters.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{
    CreateShareRequest, ExportLocation, ExportLocationsEnvelope, Share, ShareEnvelope,
    SharesEnvelope,
};
use crate::wait::{self, WaitError};
use crate::SharesClient;

impl SharesClient {
    /// `POST /shares`: returns the share in `creating` state; pair with
    /// [`Self::wait_for_share_status`].
    pub async fn create_share(&self, request: &CreateShareRequest) -> Result<Share, ApiError> {
        let body = serde_json::json!({ "share": request });
        let raw = self
            .rest
            .post("shares", body, StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareEnvelope>(&raw)?.share)
    }

    /// `GET /shares/{id}`
    pub async fn get_share(&self, share_id: &str) -> Result<Share, ApiError> {
        let raw = self
            .rest
            .get(&format!("shares/{share_id}"), StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareEnvelope>(&raw)?.share)
    }

    /// `GET /shares`: summary listing.
    pub async fn list_shares(&self) -> Result<Vec<Share>, ApiError> {
        let raw = self
            .rest
            .get("shares", StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<SharesEnvelope>(&raw)?.shares)
    }

    /// `GET /shares/detail` with optional query filters
    /// (`name`, `status`, `share_group_id`, ...).
    pub async fn list_shares_detailed(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<Share>, ApiError> {
        let mut opts = RequestOpts::default();
        for (key, value) in query {
            opts = opts.with_query(*key, *value);
        }
        let raw = self.rest.get("shares/detail", StatusCode::OK, opts).await?;
        Ok(serde_json::from_str::<SharesEnvelope>(&raw)?.shares)
    }

    /// `DELETE /shares/{id}`; shares belonging to a group must name it.
    pub async fn delete_share(
        &self,
        share_id: &str,
        share_group_id: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut opts = RequestOpts::default();
        if let Some(group_id) = share_group_id {
            opts = opts.with_query("share_group_id", group_id);
        }
        self.rest
            .delete(&format!("shares/{share_id}"), None, StatusCode::ACCEPTED, opts)
            .await?;
        Ok(())
    }

    /// Grow a share to `new_size` gigabytes.
    pub async fn extend_share(&self, share_id: &str, new_size: u64) -> Result<(), ApiError> {
        self.share_size_action(share_id, "extend", new_size).await
    }

    /// Shrink a share to `new_size` gigabytes.
    pub async fn shrink_share(&self, share_id: &str, new_size: u64) -> Result<(), ApiError> {
        self.share_size_action(share_id, "shrink", new_size).await
    }

    async fn share_size_action(
        &self,
        share_id: &str,
        action: &str,
        new_size: u64,
    ) -> Result<(), ApiError> {
        let action = self.default_version().action_name(action);
        let body = serde_json::json!({ action: { "new_size": new_size } });
        self.rest
            .post(
                &format!("shares/{share_id}/action"),
                body,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Admin action: force the status attribute to an arbitrary value.
    pub async fn reset_share_status(&self, share_id: &str, status: &str) -> Result<(), ApiError> {
        self.reset_status_action("shares", share_id, status, false).await
    }

    /// Admin action: delete a share regardless of its state.
    pub async fn force_delete_share(&self, share_id: &str) -> Result<(), ApiError> {
        self.force_delete_action("shares", share_id, false).await
    }

    /// `GET /shares/{id}/export_locations` (2.9+).
    pub async fn list_share_export_locations(
        &self,
        share_id: &str,
    ) -> Result<Vec<ExportLocation>, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("shares/{share_id}/export_locations"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<ExportLocationsEnvelope>(&raw)?.export_locations)
    }

    /// Block until the share's status reaches `target`.
    pub async fn wait_for_share_status(
        &self,
        share_id: &str,
        target: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_status(
            &format!("share {share_id}"),
            &[target],
            self.wait_config(),
            move || async move { Ok(self.get_share(share_id).await?.status) },
        )
        .await?;
        Ok(())
    }

    /// Whether the share no longer exists.
    pub async fn share_deleted(&self, share_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_share(share_id).await.map(|_| ()))
    }

    /// Block until the share no longer exists.
    pub async fn wait_for_share_deletion(&self, share_id: &str) -> Result<(), WaitError> {
        wait::wait_for_deletion(&format!("share {share_id}"), self.wait_config(), move || async move {
            self.share_deleted(share_id).await
        })
        .await
    }
}
