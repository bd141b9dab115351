use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a user owning one or more monitored hosts.
pub type UserId = String;

/// Lifecycle status of a monitored host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Active,
    Retired,
}

impl std::fmt::Display for HostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostStatus::Active => write!(f, "active"),
            HostStatus::Retired => write!(f, "retired"),
        }
    }
}

/// A single certificate observed in a host's verified chain.
///
/// `expire_hours` is the whole-hour distance from scan time to `not_after`,
/// truncated toward zero; it goes negative once the certificate has expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertFact {
    pub common_name: String,
    pub is_ca: bool,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub expire_hours: i64,
}

/// A host under certificate observation.
///
/// `hostname` is the unique key among active hosts. `users` is never empty
/// while the host is active: removing the last owning user removes the host
/// itself. `certs` holds the most recent scan results in chain order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoredHost {
    pub hostname: String,
    pub port: u16,
    pub users: Vec<UserId>,
    pub status: HostStatus,
    pub certs: Vec<CertFact>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonitoredHost {
    pub fn is_active(&self) -> bool {
        self.status == HostStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_status_display() {
        assert_eq!(HostStatus::Active.to_string(), "active");
        assert_eq!(HostStatus::Retired.to_string(), "retired");
    }

    #[test]
    fn host_status_serde_roundtrip() {
        let json = serde_json::to_string(&HostStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
        let back: HostStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HostStatus::Active);
    }
}
