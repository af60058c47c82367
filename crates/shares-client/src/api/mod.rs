//! Resource API surface, one module per resource family.
//!
//! Every module extends [`crate::SharesClient`] with the family's CRUD
//! calls, admin actions, and waiters. Expected HTTP status codes follow
//! the service API documentation and are enforced by the REST envelope.

mod access;
mod messages;
mod quotas;
mod replicas;
mod security_services;
mod share_groups;
mod share_networks;
mod share_servers;
mod share_types;
mod shares;
mod snapshots;

pub use quotas::QuotaScope;
pub use replicas::ReplicaAttr;
