//! Share network CRUD.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{ShareNetwork, ShareNetworkEnvelope, ShareNetworkSpec, ShareNetworksEnvelope};
use crate::wait::{self, WaitError};
use crate::SharesClient;

impl SharesClient {
    /// `POST /share-networks`
    pub async fn create_share_network(
        &self,
        spec: &ShareNetworkSpec,
    ) -> Result<ShareNetwork, ApiError> {
        let raw = self
            .rest
            .post(
                "share-networks",
                serde_json::json!({ "share_network": spec }),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareNetworkEnvelope>(&raw)?.share_network)
    }

    /// `GET /share-networks/{id}`
    pub async fn get_share_network(&self, network_id: &str) -> Result<ShareNetwork, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("share-networks/{network_id}"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareNetworkEnvelope>(&raw)?.share_network)
    }

    /// `GET /share-networks`, optionally with query filters.
    pub async fn list_share_networks(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Vec<ShareNetwork>, ApiError> {
        let mut opts = RequestOpts::default();
        for (key, value) in query {
            opts = opts.with_query(*key, *value);
        }
        let raw = self.rest.get("share-networks", StatusCode::OK, opts).await?;
        Ok(serde_json::from_str::<ShareNetworksEnvelope>(&raw)?.share_networks)
    }

    /// `GET /share-networks/detail`
    pub async fn list_share_networks_detailed(&self) -> Result<Vec<ShareNetwork>, ApiError> {
        let raw = self
            .rest
            .get("share-networks/detail", StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareNetworksEnvelope>(&raw)?.share_networks)
    }

    /// `PUT /share-networks/{id}`
    pub async fn update_share_network(
        &self,
        network_id: &str,
        spec: &ShareNetworkSpec,
    ) -> Result<ShareNetwork, ApiError> {
        let raw = self
            .rest
            .put(
                &format!("share-networks/{network_id}"),
                serde_json::json!({ "share_network": spec }),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<ShareNetworkEnvelope>(&raw)?.share_network)
    }

    /// `DELETE /share-networks/{id}`
    pub async fn delete_share_network(&self, network_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("share-networks/{network_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Whether the share network no longer exists.
    pub async fn share_network_deleted(&self, network_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_share_network(network_id).await.map(|_| ()))
    }

    /// Block until the share network no longer exists.
    pub async fn wait_for_share_network_deletion(
        &self,
        network_id: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("share network {network_id}"),
            self.wait_config(),
            move || async move { self.share_network_deleted(network_id).await },
        )
        .await
    }
}
