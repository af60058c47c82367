//! Typed API microversion tokens.
//!
//! The share service gates fields, paths, and action names on a
//! monotonically increasing `major.minor` version sent in the
//! `x-shares-api-version` request header. This module provides the typed
//! form with full ordering so callers compare versions instead of strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Oldest microversion this client knows how to speak.
pub const MIN_SUPPORTED: Microversion = Microversion { major: 2, minor: 0 };

/// Newest microversion this client knows how to speak.
///
/// The effective default for a client instance is the lesser of this and
/// the suite-configured maximum.
pub const MAX_SUPPORTED: Microversion = Microversion { major: 2, minor: 55 };

/// Version at which action names dropped their legacy `os-` prefix and
/// quota URLs moved from `os-quota-sets` to `quota-sets`.
pub const ACTION_RENAME: Microversion = Microversion { major: 2, minor: 7 };

/// Version at which quota show/update/reset accept `user_id` and
/// `share_type` query arguments.
pub const QUOTA_ARGS: Microversion = Microversion { major: 2, minor: 39 };

/// A `major.minor` API version token.
///
/// Ordering is numeric on major then minor, so `2.9 < 2.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Microversion {
    pub major: u32,
    pub minor: u32,
}

impl Microversion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether a request at this version uses the legacy `os-` prefixed
    /// action names.
    pub fn uses_legacy_action_names(&self) -> bool {
        *self < ACTION_RENAME
    }

    /// Resolve an action name for this version, e.g. `reset_status` vs
    /// `os-reset_status`.
    pub fn action_name(&self, name: &str) -> String {
        if self.uses_legacy_action_names() {
            format!("os-{name}")
        } else {
            name.to_string()
        }
    }

    /// Quota-set URL segment for this version.
    pub fn quota_url_segment(&self) -> &'static str {
        if *self < ACTION_RENAME {
            "os-quota-sets"
        } else {
            "quota-sets"
        }
    }
}

impl fmt::Display for Microversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Microversion {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ApiError::InvalidMicroversion(s.to_string());
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for Microversion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Microversion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        let v: Microversion = "2.42".parse().unwrap();
        assert_eq!(v, Microversion::new(2, 42));
        assert_eq!(v.to_string(), "2.42");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("2".parse::<Microversion>().is_err());
        assert!("2.".parse::<Microversion>().is_err());
        assert!("v2.1".parse::<Microversion>().is_err());
        assert!("2.1.3".parse::<Microversion>().is_err());
    }

    #[test]
    fn test_ordering_is_numeric_not_lexical() {
        let small: Microversion = "2.9".parse().unwrap();
        let large: Microversion = "2.10".parse().unwrap();
        assert!(small < large);
        assert!(Microversion::new(1, 99) < Microversion::new(2, 0));
    }

    #[test]
    fn test_action_name_gating() {
        assert_eq!(Microversion::new(2, 6).action_name("reset_status"), "os-reset_status");
        assert_eq!(Microversion::new(2, 7).action_name("reset_status"), "reset_status");
        assert_eq!(Microversion::new(2, 6).quota_url_segment(), "os-quota-sets");
        assert_eq!(Microversion::new(2, 40).quota_url_segment(), "quota-sets");
    }
}
