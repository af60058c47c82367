//! Share type CRUD, extra specs, and project access.

use reqwest::StatusCode;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{unique_name, ExtraSpecsEnvelope, ShareType, ShareTypeEnvelope, ShareTypesEnvelope};
use crate::wait::{self, WaitError};
use crate::SharesClient;

impl SharesClient {
    /// `POST /types` (admin).
    ///
    /// The `driver_handles_share_servers` extra spec is mandatory; it is
    /// always present in `extra_specs` on the way out.
    pub async fn create_share_type(
        &self,
        name: Option<&str>,
        is_public: bool,
        driver_handles_share_servers: bool,
        extra_specs: HashMap<String, String>,
    ) -> Result<ShareType, ApiError> {
        let name = name.map(str::to_string).unwrap_or_else(|| unique_name("share-type"));
        let mut specs = extra_specs;
        specs.insert(
            "driver_handles_share_servers".to_string(),
            driver_handles_share_servers.to_string(),
        );
        let body = serde_json::json!({
            "share_type": {
                "name": name,
                "share_type_access:is_public": is_public,
                "extra_specs": specs,
            }
        });
        let raw = self
            .rest
            .post("types", body, StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareTypeEnvelope>(&raw)?.share_type)
    }

    /// `GET /types/{id}`
    pub async fn get_share_type(&self, type_id: &str) -> Result<ShareType, ApiError> {
        let raw = self
            .rest
            .get(&format!("types/{type_id}"), StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareTypeEnvelope>(&raw)?.share_type)
    }

    /// `GET /types`
    pub async fn list_share_types(&self) -> Result<Vec<ShareType>, ApiError> {
        let raw = self
            .rest
            .get("types", StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareTypesEnvelope>(&raw)?.share_types)
    }

    /// `GET /types/default`
    pub async fn get_default_share_type(&self) -> Result<ShareType, ApiError> {
        let raw = self
            .rest
            .get("types/default", StatusCode::OK, RequestOpts::default())
            .await?;
        Ok(serde_json::from_str::<ShareTypeEnvelope>(&raw)?.share_type)
    }

    /// `DELETE /types/{id}` (admin).
    pub async fn delete_share_type(&self, type_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("types/{type_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// `POST /types/{id}/extra_specs` (admin).
    pub async fn create_share_type_extra_specs(
        &self,
        type_id: &str,
        extra_specs: &HashMap<String, String>,
    ) -> Result<HashMap<String, String>, ApiError> {
        let raw = self
            .rest
            .post(
                &format!("types/{type_id}/extra_specs"),
                serde_json::json!({ "extra_specs": extra_specs }),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<ExtraSpecsEnvelope>(&raw)?.extra_specs)
    }

    /// `GET /types/{id}/extra_specs`
    pub async fn get_share_type_extra_specs(
        &self,
        type_id: &str,
    ) -> Result<HashMap<String, String>, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("types/{type_id}/extra_specs"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<ExtraSpecsEnvelope>(&raw)?.extra_specs)
    }

    /// `GET /types/{id}/extra_specs/{key}`: single-key object.
    pub async fn get_share_type_extra_spec(
        &self,
        type_id: &str,
        key: &str,
    ) -> Result<HashMap<String, String>, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("types/{type_id}/extra_specs/{key}"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// `PUT /types/{id}/extra_specs/{key}` (admin).
    pub async fn update_share_type_extra_spec(
        &self,
        type_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), ApiError> {
        self.rest
            .put(
                &format!("types/{type_id}/extra_specs/{key}"),
                serde_json::json!({ key: value }),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// `DELETE /types/{id}/extra_specs/{key}` (admin).
    pub async fn delete_share_type_extra_spec(
        &self,
        type_id: &str,
        key: &str,
    ) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("types/{type_id}/extra_specs/{key}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Grant a project access to a private share type (admin).
    pub async fn add_share_type_access(
        &self,
        type_id: &str,
        project_id: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "addProjectAccess": { "project": project_id } });
        self.rest
            .post(
                &format!("types/{type_id}/action"),
                body,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Revoke a project's access to a private share type (admin).
    pub async fn remove_share_type_access(
        &self,
        type_id: &str,
        project_id: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "removeProjectAccess": { "project": project_id } });
        self.rest
            .post(
                &format!("types/{type_id}/action"),
                body,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// `GET /types/{id}/access`: project ids granted to a private type.
    pub async fn list_share_type_access(&self, type_id: &str) -> Result<Vec<String>, ApiError> {
        #[derive(serde::Deserialize)]
        struct AccessEntry {
            project_id: String,
        }
        #[derive(serde::Deserialize)]
        struct Envelope {
            share_type_access: Vec<AccessEntry>,
        }
        let raw = self
            .rest
            .get(&format!("types/{type_id}/access"), StatusCode::OK, RequestOpts::default())
            .await?;
        let envelope: Envelope = serde_json::from_str(&raw)?;
        Ok(envelope
            .share_type_access
            .into_iter()
            .map(|entry| entry.project_id)
            .collect())
    }

    /// Whether the share type no longer exists.
    pub async fn share_type_deleted(&self, type_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_share_type(type_id).await.map(|_| ()))
    }

    /// Block until the share type no longer exists.
    pub async fn wait_for_share_type_deletion(&self, type_id: &str) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("share type {type_id}"),
            self.wait_config(),
            move || async move { self.share_type_deleted(type_id).await },
        )
        .await
    }
}
