//! Share and snapshot access rules.
//!
//! Rules are granted and revoked through share actions. Listing moved
//! from the `access_list` action to the dedicated `share-access-rules`
//! endpoint at microversion 2.45; both paths are supported and selected
//! by the client's negotiated version.

use reqwest::StatusCode;

use crate::error::ApiError;
use crate::microversion::Microversion;
use crate::rest::RequestOpts;
use crate::types::{AccessEnvelope, AccessListEnvelope, AccessRule};
use crate::wait::{self, WaitError};
use crate::SharesClient;

/// Version at which the dedicated access-rules endpoint appeared.
const ACCESS_RULES_ENDPOINT: Microversion = Microversion::new(2, 45);

impl SharesClient {
    /// Grant access to a share.
    ///
    /// `access_type` is one of `ip`, `user`, `cert`, `cephx`;
    /// `access_level` is `rw` or `ro`.
    pub async fn grant_access(
        &self,
        share_id: &str,
        access_type: &str,
        access_to: &str,
        access_level: &str,
    ) -> Result<AccessRule, ApiError> {
        let action = self.default_version().action_name("allow_access");
        let body = serde_json::json!({
            action: {
                "access_type": access_type,
                "access_to": access_to,
                "access_level": access_level,
            }
        });
        let raw = self
            .rest
            .post(
                &format!("shares/{share_id}/action"),
                body,
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<AccessEnvelope>(&raw)?.access)
    }

    /// Revoke a previously granted rule.
    pub async fn revoke_access(&self, share_id: &str, rule_id: &str) -> Result<(), ApiError> {
        let action = self.default_version().action_name("deny_access");
        let body = serde_json::json!({ action: { "access_id": rule_id } });
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

    /// List the rules on a share.
    pub async fn list_access_rules(&self, share_id: &str) -> Result<Vec<AccessRule>, ApiError> {
        if self.default_version() >= ACCESS_RULES_ENDPOINT {
            let opts = RequestOpts::default().with_query("share_id", share_id);
            let raw = self.rest.get("share-access-rules", StatusCode::OK, opts).await?;
            Ok(serde_json::from_str::<AccessListEnvelope>(&raw)?.access_list)
        } else {
            let action = self.default_version().action_name("access_list");
            let body = serde_json::json!({ action: serde_json::Value::Null });
            let raw = self
                .rest
                .post(
                    &format!("shares/{share_id}/action"),
                    body,
                    StatusCode::OK,
                    RequestOpts::default(),
                )
                .await?;
            Ok(serde_json::from_str::<AccessListEnvelope>(&raw)?.access_list)
        }
    }

    /// `GET /share-access-rules/{id}` (2.45+).
    pub async fn get_access_rule(&self, rule_id: &str) -> Result<AccessRule, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("share-access-rules/{rule_id}"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<AccessEnvelope>(&raw)?.access)
    }

    /// Block until the rule's state reaches `target` (usually `active`).
    ///
    /// Polls the share's rule list so it works across the 2.45 endpoint
    /// switch; a rule that disappears mid-wait reads as an error state.
    pub async fn wait_for_access_rule_status(
        &self,
        share_id: &str,
        rule_id: &str,
        target: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_status(
            &format!("access rule {rule_id}"),
            &[target],
            self.wait_config(),
            move || async move {
                let rules = self.list_access_rules(share_id).await?;
                Ok(rules
                    .into_iter()
                    .find(|rule| rule.id == rule_id)
                    .and_then(|rule| rule.state)
                    .unwrap_or_else(|| "error_missing_rule".to_string()))
            },
        )
        .await?;
        Ok(())
    }

    /// Grant access to a snapshot (mountable snapshots).
    pub async fn grant_snapshot_access(
        &self,
        snapshot_id: &str,
        access_type: &str,
        access_to: &str,
    ) -> Result<AccessRule, ApiError> {
        let body = serde_json::json!({
            "allow_access": {
                "access_type": access_type,
                "access_to": access_to,
            }
        });
        let raw = self
            .rest
            .post(
                &format!("snapshots/{snapshot_id}/action"),
                body,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<AccessEnvelope>(&raw)?.access)
    }

    /// Revoke a snapshot access rule.
    pub async fn revoke_snapshot_access(
        &self,
        snapshot_id: &str,
        rule_id: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "deny_access": { "access_id": rule_id } });
        self.rest
            .post(
                &format!("snapshots/{snapshot_id}/action"),
                body,
                StatusCode::ACCEPTED,
                RequestOpts::default(),
            )
            .await?;
        Ok(())
    }

    /// `GET /snapshots/{id}/access-list`
    pub async fn list_snapshot_access_rules(
        &self,
        snapshot_id: &str,
    ) -> Result<Vec<AccessRule>, ApiError> {
        let raw = self
            .rest
            .get(
                &format!("snapshots/{snapshot_id}/access-list"),
                StatusCode::OK,
                RequestOpts::default(),
            )
            .await?;
        Ok(serde_json::from_str::<AccessListEnvelope>(&raw)?.access_list)
    }

    /// Block until a snapshot rule's state reaches `target`.
    pub async fn wait_for_snapshot_access_rule_status(
        &self,
        snapshot_id: &str,
        rule_id: &str,
        target: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_status(
            &format!("snapshot access rule {rule_id}"),
            &[target],
            self.wait_config(),
            move || async move {
                let rules = self.list_snapshot_access_rules(snapshot_id).await?;
                Ok(rules
                    .into_iter()
                    .find(|rule| rule.id == rule_id)
                    .and_then(|rule| rule.state)
                    .unwrap_or_else(|| "error_missing_rule".to_string()))
            },
        )
        .await?;
        Ok(())
    }

    /// Block until a snapshot rule disappears from the access list.
    pub async fn wait_for_snapshot_access_rule_deletion(
        &self,
        snapshot_id: &str,
        rule_id: &str,
    ) -> Result<(), WaitError> {
        wait::wait_for_deletion(
            &format!("snapshot access rule {rule_id}"),
            self.wait_config(),
            move || async move {
                let rules = self.list_snapshot_access_rules(snapshot_id).await?;
                Ok(!rules.iter().any(|rule| rule.id == rule_id))
            },
        )
        .await
    }
}
