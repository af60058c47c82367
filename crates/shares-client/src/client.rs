//! Client handle for the file-share service v2 API.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::microversion::{Microversion, MAX_SUPPORTED};
use crate::rest::{RequestOpts, RestClient};
use crate::types::{ApiVersion, VersionsEnvelope};
use crate::wait::WaitConfig;

/// REST client for the file-share service.
///
/// Carries the negotiated default microversion and the wait pacing used
/// by every `wait_for_*` method. Resource methods live in the [`crate::api`]
/// modules, one per resource family.
#[derive(Debug, Clone)]
pub struct SharesClient {
    pub(crate) rest: RestClient,
    wait_config: WaitConfig,
}

impl SharesClient {
    /// Client against a versioned endpoint (e.g. `http://host:8786/v2`).
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        default_version: Microversion,
        wait_config: WaitConfig,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            rest: RestClient::new(base_url, auth_token, default_version)?,
            wait_config,
        })
    }

    /// Client with the newest supported microversion and default pacing.
    pub fn connect(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::new(base_url, None, MAX_SUPPORTED, WaitConfig::default())
    }

    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    pub fn default_version(&self) -> Microversion {
        self.rest.default_version()
    }

    pub fn wait_config(&self) -> WaitConfig {
        self.wait_config
    }

    /// Raw microversion negotiation probe against the service root.
    ///
    /// Sends the version header only when `version` is given, and does
    /// not judge the response status: negotiation tests assert on it.
    pub async fn discover_versions(
        &self,
        version: Option<Microversion>,
    ) -> Result<(StatusCode, String), ApiError> {
        self.rest.discover_versions(version).await
    }

    /// Parsed version discovery document.
    pub async fn list_api_versions(&self) -> Result<Vec<ApiVersion>, ApiError> {
        let (_, body) = self.rest.discover_versions(None).await?;
        let envelope: VersionsEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.versions)
    }

    /// Admin action: reset the status attribute of any resource kind,
    /// e.g. `shares`, `snapshots`, `share-groups`.
    ///
    /// The action name carries the legacy `os-` prefix below
    /// microversion 2.7.
    pub(crate) async fn reset_status_action(
        &self,
        collection: &str,
        id: &str,
        status: &str,
        experimental: bool,
    ) -> Result<(), ApiError> {
        let action = self.default_version().action_name("reset_status");
        let body = serde_json::json!({ action: { "status": status } });
        let opts = RequestOpts {
            experimental,
            ..Default::default()
        };
        self.rest
            .post(&format!("{collection}/{id}/action"), body, StatusCode::ACCEPTED, opts)
            .await?;
        Ok(())
    }

    /// Admin action: delete a resource regardless of its state.
    pub(crate) async fn force_delete_action(
        &self,
        collection: &str,
        id: &str,
        experimental: bool,
    ) -> Result<(), ApiError> {
        let action = self.default_version().action_name("force_delete");
        let body = serde_json::json!({ action: serde_json::Value::Null });
        let opts = RequestOpts {
            experimental,
            ..Default::default()
        };
        self.rest
            .post(&format!("{collection}/{id}/action"), body, StatusCode::ACCEPTED, opts)
            .await?;
        Ok(())
    }

    /// Map a GET probe into an "is it gone" answer for deletion waits.
    pub(crate) fn gone(result: Result<(), ApiError>) -> Result<bool, ApiError> {
        match result {
            Ok(()) => Ok(false),
            Err(err) if err.is_gone() => Ok(true),
            Err(err) => Err(err),
        }
    }
}
