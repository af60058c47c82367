//! Test fixtures for provisioning resources against the deployment.

pub mod scope;

pub use scope::TestScope;
