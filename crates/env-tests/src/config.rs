//! Suite configuration.
//!
//! Configuration is loaded from environment variables with defaults
//! suitable for a local devstack-style deployment. The auth token is
//! redacted in Debug output.

use shares_client::microversion::{self, Microversion};
use shares_client::wait::WaitConfig;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

/// Default versioned API endpoint.
pub const DEFAULT_API_URL: &str = "http://localhost:8786/v2";

/// Default share size in gigabytes.
pub const DEFAULT_SHARE_SIZE_GB: u64 = 1;

/// Default seconds between status polls.
pub const DEFAULT_BUILD_INTERVAL_SECS: u64 = 3;

/// Default total wait budget for one resource transition.
pub const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 300;

/// Default number of recreate attempts for a share that fails to build.
pub const DEFAULT_SHARE_CREATION_RETRIES: u32 = 2;

/// Suite configuration, loaded from environment variables.
#[derive(Clone)]
pub struct TestConfig {
    /// Versioned API endpoint (e.g. `http://host:8786/v2`).
    pub api_url: String,

    /// Pre-issued auth token sent as `x-auth-token`; absent for
    /// unauthenticated deployments.
    pub auth_token: Option<String>,

    /// Project whose quotas the admin suites inspect and mutate.
    pub project_id: Option<String>,

    /// Newest microversion the deployment under test supports. The
    /// client speaks the lesser of this and its own maximum.
    pub max_api_microversion: Microversion,

    /// Protocols the deployment has enabled, in preference order.
    pub enabled_protocols: Vec<String>,

    /// Size for provisioned test shares.
    pub share_size_gb: u64,

    /// Seconds between status polls.
    pub build_interval_secs: u64,

    /// Total wait budget for one resource transition, in seconds.
    pub build_timeout_secs: u64,

    /// Recreate attempts for shares that land in an error state during
    /// batch creation.
    pub share_creation_retry_number: u32,

    /// Swallow unexpected cleanup failures instead of failing teardown.
    pub suppress_cleanup_errors: bool,
}

impl fmt::Debug for TestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestConfig")
            .field("api_url", &self.api_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("project_id", &self.project_id)
            .field("max_api_microversion", &self.max_api_microversion)
            .field("enabled_protocols", &self.enabled_protocols)
            .field("share_size_gb", &self.share_size_gb)
            .field("build_interval_secs", &self.build_interval_secs)
            .field("build_timeout_secs", &self.build_timeout_secs)
            .field("share_creation_retry_number", &self.share_creation_retry_number)
            .field("suppress_cleanup_errors", &self.suppress_cleanup_errors)
            .finish()
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            project_id: None,
            max_api_microversion: microversion::MAX_SUPPORTED,
            enabled_protocols: vec!["nfs".to_string(), "cifs".to_string()],
            share_size_gb: DEFAULT_SHARE_SIZE_GB,
            build_interval_secs: DEFAULT_BUILD_INTERVAL_SECS,
            build_timeout_secs: DEFAULT_BUILD_TIMEOUT_SECS,
            share_creation_retry_number: DEFAULT_SHARE_CREATION_RETRIES,
            suppress_cleanup_errors: false,
        }
    }
}

impl TestConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// Unset or unparseable variables fall back to defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        let enabled_protocols = vars
            .get("SHARES_ENABLED_PROTOCOLS")
            .map(|value| {
                value
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.enabled_protocols);

        Self {
            api_url: vars
                .get("SHARES_API_URL")
                .cloned()
                .unwrap_or(defaults.api_url),
            auth_token: vars.get("SHARES_API_TOKEN").cloned(),
            project_id: vars.get("SHARES_PROJECT_ID").cloned(),
            max_api_microversion: vars
                .get("SHARES_MAX_API_MICROVERSION")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.max_api_microversion),
            enabled_protocols,
            share_size_gb: vars
                .get("SHARES_SHARE_SIZE_GB")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.share_size_gb),
            build_interval_secs: vars
                .get("SHARES_BUILD_INTERVAL_SECS")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.build_interval_secs),
            build_timeout_secs: vars
                .get("SHARES_BUILD_TIMEOUT_SECS")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.build_timeout_secs),
            share_creation_retry_number: vars
                .get("SHARES_CREATION_RETRY_NUMBER")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.share_creation_retry_number),
            suppress_cleanup_errors: vars
                .get("SHARES_SUPPRESS_CLEANUP_ERRORS")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.suppress_cleanup_errors),
        }
    }

    /// Preferred protocol for provisioned shares.
    pub fn protocol(&self) -> &str {
        self.enabled_protocols
            .first()
            .map(String::as_str)
            .unwrap_or("nfs")
    }

    /// Microversion the suite's client should speak: the lesser of the
    /// deployment maximum and the client's own maximum.
    pub fn negotiated_version(&self) -> Microversion {
        self.max_api_microversion.min(microversion::MAX_SUPPORTED)
    }

    /// Wait pacing derived from the build interval/timeout settings.
    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig {
            interval: Duration::from_secs(self.build_interval_secs),
            timeout: Duration::from_secs(self.build_timeout_secs),
        }
    }
}
