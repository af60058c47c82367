//! REST API client for the file-share service v2 API.
//!
//! The service provisions network file shares asynchronously: every
//! mutating call returns immediately and the resource transitions through
//! statuses (`creating` → `available`, `deleting` → gone) in the
//! background. This crate wraps the HTTP verb layer with microversion
//! negotiation and pairs each resource family with bounded waiters.
//!
//! # Layers
//!
//! - [`rest`]: verb methods with microversion header injection,
//!   request-correlation-id validation, and expected-status checking.
//! - [`wait`]: the generic poll-until-status / poll-until-gone
//!   primitives with fast-fail on error states.
//! - [`api`]: per-resource-family methods on [`SharesClient`]: shares,
//!   snapshots, access rules, replicas, share servers, share groups,
//!   share networks, security services, share types, quotas, messages.
//!
//! # Example
//!
//! ```no_run
//! use shares_client::{CreateShareRequest, SharesClient};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = SharesClient::connect("http://localhost:8786/v2")?;
//! let share = client.create_share(&CreateShareRequest::new("nfs", 1)).await?;
//! client.wait_for_share_status(&share.id, "available").await?;
//! client.delete_share(&share.id, None).await?;
//! client.wait_for_share_deletion(&share.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod client;
pub mod error;
pub mod microversion;
pub mod rest;
pub mod types;
pub mod wait;

pub use client::SharesClient;
pub use error::ApiError;
pub use microversion::Microversion;
pub use rest::{RequestOpts, API_EXPERIMENTAL_HEADER, API_MICROVERSION_HEADER, REQUEST_ID_HEADER};
pub use types::{
    AccessRule, ApiVersion, CreateShareRequest, ExportLocation, Message, QuotaSet, QuotaSetDetail,
    QuotaUpdate, SecurityService, SecurityServiceSpec, Share, ShareGroup, ShareGroupSnapshot,
    ShareNetwork, ShareNetworkSpec, ShareReplica, ShareServer, ShareType, Snapshot,
};
pub use wait::{WaitConfig, WaitError};

pub use api::{QuotaScope, ReplicaAttr};
