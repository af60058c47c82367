//! Security service CRUD.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::rest::RequestOpts;
use crate::types::{
    SecurityService, SecurityServiceEnvelope, SecurityServiceSpec, SecurityServicesEnvelope,
};
use crate::wait::{self, WaitError};
use crate::SharesClient;

impl SharesClient {
    /// `POST /security-services`
    pub async fn create_security_service(
        &self,
        spec: &SecurityServiceSpec,
    ) -> Result<SecurityService, ApiError> {
        let raw = self
            .rest
            .post(
                "security-services",
                serde_json::json!({ "security_service": spec }),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<SecurityServiceEnvelope>(&raw)?.security_service)
    }

    /// `GET /security-services/{id}`
    pub async fn get_security_service(
        &self,
        service_id: &str,
    ) -> Result<SecurityService, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("security-services/{service_id}"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<SecurityServiceEnvelope>(&raw)?.security_service)
    }

    /// `GET /security-services` (summary) or `/detail`.
    pub async fn list_security_services(
        &self,
        detailed: bool,
    ) -> Result<Vec<SecurityService>, ApiError> {
        let path = if detailed {
            "security-services/detail"
        } else {
            "security-services"
        };
        let raw = self.rest.get(path, StatusCode::OK, RequestOpts::default()).await?;
        Ok(serde_json::from_str::<SecurityServicesEnvelope>(&raw)?.security_services)
    }

    /// `PUT /security-services/{id}`
    pub async fn update_security_service(
        &self,
        service_id: &str,
        spec: &SecurityServiceSpec,
    ) -> Result<SecurityService, ApiError> {
        let raw = self
            .rest
            .put(
                &format!("security-services/{service_id}"),
                serde_json::json!({ "security_service": spec }),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<SecurityServiceEnvelope>(&raw)?.security_service)
    }

    /// `DELETE /security-services/{id}`
    pub async fn delete_security_service(&self, service_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(
                &format!("security-services/{service_id}"),
                None,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// Whether the security service no longer exists.
    pub async fn security_service_deleted(&self, service_id: &str) -> Result<bool, ApiError> {
        Self::gone(self.get_security_service(service_id).await.map(|_| ()))
    }

    /// Block until the security service no longer exists.
    pub async fn wait_for_security_service_deletion(
        &self,
        service_id: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("security service {service_id}"),
            self.wait_config(),
            move || async move { self.security_service_deleted(service_id).await },
        )
        .await
    }
}
