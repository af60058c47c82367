//! Request and response models for the share service v2 API.
//!
//! Response structs lean on `#[serde(default)]` for fields the backend
//! only exposes at newer microversions, so one model deserializes across
//! the whole negotiated range.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique resource name with a readable prefix, e.g. `share-8f14e45f`.
///
/// Uses a UUID fragment to prevent collisions across test runs.
pub fn unique_name(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &id[..8])
}

/// The primary provisioned network-file-share resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Share {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub share_proto: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub share_network_id: Option<String>,
    #[serde(default)]
    pub share_type: Option<String>,
    #[serde(default)]
    pub share_group_id: Option<String>,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Admin-visible share-manager host; populated for admin callers only.
    #[serde(default)]
    pub host: Option<String>,
    /// Migration progress attribute; present at 2.5+.
    #[serde(default)]
    pub task_state: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Share creation request body (`{"share": {...}}`).
#[derive(Debug, Clone, Serialize)]
pub struct CreateShareRequest {
    pub share_proto: String,
    pub size: u64,
    pub name: String,
    pub description: String,
    pub metadata: HashMap<String, String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

impl CreateShareRequest {
    /// Minimal request with generated name and description.
    pub fn new(share_proto: impl Into<String>, size: u64) -> Self {
        Self {
            share_proto: share_proto.into(),
            size,
            name: unique_name("share"),
            description: unique_name("share-desc"),
            metadata: HashMap::new(),
            is_public: false,
            snapshot_id: None,
            share_network_id: None,
            share_type: None,
            share_group_id: None,
            availability_zone: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn in_share_network(mut self, share_network_id: impl Into<String>) -> Self {
        self.share_network_id = Some(share_network_id.into());
        self
    }

    pub fn with_share_type(mut self, share_type: impl Into<String>) -> Self {
        self.share_type = Some(share_type.into());
        self
    }

    pub fn in_share_group(mut self, share_group_id: impl Into<String>) -> Self {
        self.share_group_id = Some(share_group_id.into());
        self
    }

    pub fn from_snapshot(mut self, snapshot_id: impl Into<String>) -> Self {
        self.snapshot_id = Some(snapshot_id.into());
        self
    }
}

/// Point-in-time copy of a share.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub share_id: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub provider_location: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Permission grant allowing a client to mount a share or snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessRule {
    pub id: String,
    pub access_type: String,
    pub access_to: String,
    #[serde(default)]
    pub access_level: Option<String>,
    /// Rule status attribute; named `state` on the wire.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Secondary copy of a share maintained for replication/failover.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareReplica {
    pub id: String,
    pub share_id: String,
    pub status: String,
    #[serde(default)]
    pub replica_state: Option<String>,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
}

/// Backend-managed network endpoint construct for a share network.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareServer {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub share_network_id: Option<String>,
    #[serde(default)]
    pub share_network_name: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    /// Backend-specific identifier used when managing an existing server.
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Grouping of shares with consistent-snapshot semantics.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareGroup {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub share_group_type_id: Option<String>,
    #[serde(default)]
    pub share_network_id: Option<String>,
    #[serde(default)]
    pub source_share_group_snapshot_id: Option<String>,
}

/// Snapshot of every member of a share group.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareGroupSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    pub share_group_id: String,
    #[serde(default)]
    pub members: Vec<serde_json::Value>,
}

/// Logical network a share server plugs into.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareNetwork {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub neutron_net_id: Option<String>,
    #[serde(default)]
    pub neutron_subnet_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Payload for creating or updating a share network.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShareNetworkSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutron_net_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutron_subnet_id: Option<String>,
}

impl ShareNetworkSpec {
    /// Spec with generated names and opaque net/subnet ids.
    pub fn generated() -> Self {
        Self {
            name: Some(unique_name("sn-name")),
            description: Some(unique_name("sn-desc")),
            neutron_net_id: Some(unique_name("net-id")),
            neutron_subnet_id: Some(unique_name("subnet-id")),
        }
    }
}

/// Directory/authentication service attached to a share network.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityService {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub dns_ip: Option<String>,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Payload for creating or updating a security service.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecurityServiceSpec {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
}

impl SecurityServiceSpec {
    /// LDAP spec with generated fields, the common default in tests.
    pub fn generated_ldap() -> Self {
        Self {
            service_type: Some("ldap".to_string()),
            name: Some(unique_name("ss-name")),
            description: Some(unique_name("ss-desc")),
            dns_ip: Some("1.1.1.1".to_string()),
            server: Some("2.2.2.2".to_string()),
            domain: Some(unique_name("ss-domain")),
            user: Some(unique_name("ss-user")),
            password: Some(unique_name("ss-password")),
            ou: None,
        }
    }
}

/// Provisioning template gating which backends can host a share.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareType {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "share_type_access:is_public")]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub extra_specs: HashMap<String, String>,
    #[serde(default)]
    pub is_default: Option<bool>,
}

/// Absolute resource limits for a project.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaSet {
    #[serde(default)]
    pub id: Option<String>,
    pub shares: i64,
    pub gigabytes: i64,
    pub snapshots: i64,
    pub snapshot_gigabytes: i64,
    pub share_networks: i64,
}

/// One quota dimension with usage breakdown (detail view).
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaUsage {
    pub limit: i64,
    #[serde(default)]
    pub in_use: i64,
    #[serde(default)]
    pub reserved: i64,
}

/// Per-dimension quota detail for a project.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaSetDetail {
    pub shares: QuotaUsage,
    pub gigabytes: QuotaUsage,
    pub snapshots: QuotaUsage,
    pub snapshot_gigabytes: QuotaUsage,
    pub share_networks: QuotaUsage,
}

/// Requested quota changes; `None` dimensions are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuotaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gigabytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_gigabytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_networks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

/// Asynchronous user-facing fault message recorded by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub message_level: Option<String>,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Mountable endpoint exported for a share or snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportLocation {
    #[serde(default)]
    pub id: Option<String>,
    pub path: String,
    #[serde(default)]
    pub preferred: bool,
    #[serde(default)]
    pub is_admin_only: Option<bool>,
}

/// One entry in the service-root version discovery document.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiVersion {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub min_version: Option<String>,
}

// JSON envelopes. The API wraps every resource in a single-key object
// ({"share": {...}}, {"shares": [...]}), so each family gets a pair.

#[derive(Debug, Deserialize)]
pub(crate) struct ShareEnvelope {
    pub share: Share,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SharesEnvelope {
    pub shares: Vec<Share>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotEnvelope {
    pub snapshot: Snapshot,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotsEnvelope {
    pub snapshots: Vec<Snapshot>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccessEnvelope {
    pub access: AccessRule,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccessListEnvelope {
    pub access_list: Vec<AccessRule>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplicaEnvelope {
    pub share_replica: ShareReplica,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplicasEnvelope {
    pub share_replicas: Vec<ShareReplica>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareServerEnvelope {
    pub share_server: ShareServer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareServersEnvelope {
    pub share_servers: Vec<ShareServer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareGroupEnvelope {
    pub share_group: ShareGroup,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareGroupsEnvelope {
    pub share_groups: Vec<ShareGroup>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareGroupSnapshotEnvelope {
    pub share_group_snapshot: ShareGroupSnapshot,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareGroupSnapshotsEnvelope {
    pub share_group_snapshots: Vec<ShareGroupSnapshot>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareNetworkEnvelope {
    pub share_network: ShareNetwork,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareNetworksEnvelope {
    pub share_networks: Vec<ShareNetwork>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecurityServiceEnvelope {
    pub security_service: SecurityService,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecurityServicesEnvelope {
    pub security_services: Vec<SecurityService>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareTypeEnvelope {
    pub share_type: ShareType,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareTypesEnvelope {
    pub share_types: Vec<ShareType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtraSpecsEnvelope {
    pub extra_specs: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuotaSetEnvelope {
    pub quota_set: QuotaSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuotaSetDetailEnvelope {
    pub quota_set: QuotaSetDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageEnvelope {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesEnvelope {
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportLocationsEnvelope {
    pub export_locations: Vec<ExportLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VersionsEnvelope {
    pub versions: Vec<ApiVersion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_is_prefixed_and_unique() {
        let a = unique_name("share");
        let b = unique_name("share");
        assert!(a.starts_with("share-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_create_share_request_skips_unset_fields() {
        let request = CreateShareRequest::new("nfs", 1);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["share_proto"], "nfs");
        assert_eq!(body["size"], 1);
        assert!(body.get("snapshot_id").is_none());
        assert!(body.get("share_group_id").is_none());
    }

    #[test]
    fn test_share_deserializes_with_minimal_fields() {
        let share: Share = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "status": "creating"
        }))
        .unwrap();
        assert_eq!(share.id, "s1");
        assert_eq!(share.status, "creating");
        assert!(share.metadata.is_empty());
        assert!(!share.is_public);
    }

    #[test]
    fn test_security_service_type_field_renames() {
        let ss: SecurityService = serde_json::from_value(serde_json::json!({
            "id": "ss1",
            "type": "ldap"
        }))
        .unwrap();
        assert_eq!(ss.service_type, "ldap");

        let spec = SecurityServiceSpec::generated_ldap();
        let body = serde_json::to_value(&spec).unwrap();
        assert_eq!(body["type"], "ldap");
    }
}
