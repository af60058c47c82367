//! Project quota operations.
//!
//! The quota URL segment renamed at microversion 2.7 and the
//! `user_id`/`share_type` query arguments gate at 2.39; both switches
//! key off the client's negotiated version.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::microversion::QUOTA_ARGS;
use crate::rest::RequestOpts;
use crate::types::{QuotaSet, QuotaSetDetail, QuotaSetDetailEnvelope, QuotaSetEnvelope, QuotaUpdate};
use crate::SharesClient;

/// Quota query scope: whole project, one user, or one share type.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotaScope<'a> {
    pub user_id: Option<&'a str>,
    pub share_type: Option<&'a str>,
}

impl<'a> QuotaScope<'a> {
    pub fn user(user_id: &'a str) -> Self {
        Self {
            user_id: Some(user_id),
            share_type: None,
        }
    }

    pub fn share_type(share_type: &'a str) -> Self {
        Self {
            user_id: None,
            share_type: Some(share_type),
        }
    }
}

impl SharesClient {
    fn quota_opts(&self, scope: QuotaScope<'_>) -> RequestOpts {
        let mut opts = RequestOpts::default();
        if self.default_version() >= QUOTA_ARGS {
            if let Some(user_id) = scope.user_id {
                opts = opts.with_query("user_id", user_id);
            }
            if let Some(share_type) = scope.share_type {
                opts = opts.with_query("share_type", share_type);
            }
        }
        opts
    }

    fn quota_path(&self, project_id: &str, suffix: &str) -> String {
        let segment = self.default_version().quota_url_segment();
        format!("{segment}/{project_id}{suffix}")
    }

    /// `GET /quota-sets/{project}/defaults`
    pub async fn default_quotas(&self, project_id: &str) -> Result<QuotaSet, ApiError> {
        let raw = self
            .rest
            .get(
                &self.quota_path(project_id, "/defaults"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<QuotaSetEnvelope>(&raw)?.quota_set)
    }

    /// `GET /quota-sets/{project}`
    pub async fn show_quotas(
        &self,
        project_id: &str,
        scope: QuotaScope<'_>,
    ) -> Result<QuotaSet, ApiError> {
        let raw = self
            .rest
            .get(
                &self.quota_path(project_id, ""),
                StatusCode::OK,
                self.quota_opts(scope),
            )
            .await?;
        Ok(serde_json::from_str::<QuotaSetEnvelope>(&raw)?.quota_set)
    }

    /// `GET /quota-sets/{project}/detail`: per-dimension usage (2.25+).
    pub async fn detail_quotas(
        &self,
        project_id: &str,
        scope: QuotaScope<'_>,
    ) -> Result<QuotaSetDetail, ApiError> {
        let raw = self
            .rest
            .get(
                &self.quota_path(project_id, "/detail"),
                StatusCode::OK,
                self.quota_opts(scope),
            )
            .await?;
        Ok(serde_json::from_str::<QuotaSetDetailEnvelope>(&raw)?.quota_set)
    }

    /// `PUT /quota-sets/{project}` (admin).
    pub async fn update_quotas(
        &self,
        project_id: &str,
        scope: QuotaScope<'_>,
        update: &QuotaUpdate,
    ) -> Result<QuotaSet, ApiError> {
        let raw = self
            .rest
            .put(
                &self.quota_path(project_id, ""),
                serde_json::json!({ "quota_set": update }),
                StatusCode::OK,
                self.quota_opts(scope),
            )
            .await?;
        Ok(serde_json::from_str::<QuotaSetEnvelope>(&raw)?.quota_set)
    }

    /// `DELETE /quota-sets/{project}`: revert to defaults (admin).
    pub async fn reset_quotas(
        &self,
        project_id: &str,
        scope: QuotaScope<'_>,
    ) -> Result<(), ApiError> {
        self.rest
            .delete(
                &self.quota_path(project_id, ""),
                None,
                StatusCode::ACCEPTED,
                self.quota_opts(scope),
            )
            .await?;
        Ok(())
    }
}
