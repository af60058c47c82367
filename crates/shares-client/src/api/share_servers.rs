//! Share server admin operations and waiters.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{ShareServer, ShareServerEnvelope, ShareServersEnvelope};
use crate::wait::{self, WaitError};
use crate::SharesClient;

impl SharesClient {
    /// `GET /share-servers` (admin).
    pub async fn list_share_servers(&self) -> Result<Vec<ShareServer>, ApiError> {
        let raw = self
            .rest
            .get("share-servers", StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareServersEnvelope>(&raw)?.share_servers)
    }

    /// `GET /share-servers/{id}` (admin).
    pub async fn get_share_server(&self, server_id: &str) -> Result<ShareServer, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("share-servers/{server_id}"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareServerEnvelope>(&raw)?.share_server)
    }

    /// `DELETE /share-servers/{id}` (admin).
    pub async fn delete_share_server(&self, server_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("share-servers/{server_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Bring an existing backend server under service management (admin).
    pub async fn manage_share_server(
        &self,
        host: &str,
        share_network_id: &str,
        identifier: &str,
    ) -> Result<ShareServer, ApiError> {
        let body = serde_json::json!({
            "share_server": {
                "host": host,
                "share_network_id": share_network_id,
                "identifier": identifier,
            }
        });
        let raw = self
            .rest
            .post("share-servers/manage", body, StatusCode::ACCEPTED, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareServerEnvelope>(&raw)?.share_server)
    }

    /// Release a server from service management without destroying it (admin).
    pub async fn unmanage_share_server(&self, server_id: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "unmanage": serde_json::Value::Null });
        self.rest
            .post(
                &format!("share-servers/{server_id}/action"),
                body,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Admin action: force the server's status attribute.
    pub async fn reset_share_server_status(
        &self,
        server_id: &str,
        status: &str,
    ) -> Result<(), ApiError> {
        self.reset_status_action("share-servers", server_id, status, false).await
    }

    /// Block until the server's status reaches `target`.
    pub async fn wait_for_share_server_status(
        &self,
        server_id: &str,
        target: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_status(
            &format!("share server {server_id}"),
            &[target],
            self.wait_config(),
            move || async move { Ok(self.get_share_server(server_id).await?.status) },
        )
        .await?;
        Ok(())
    }

    /// Whether the server no longer exists.
    pub async fn share_server_deleted(&self, server_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_share_server(server_id).await.map(|_| ()))
    }

    /// Block until the server no longer exists.
    pub async fn wait_for_share_server_deletion(&self, server_id: &str) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("share server {server_id}"),
            self.wait_config(),
            move || async move { self.share_server_deleted(server_id).await },
        )
        .await
    }
}
