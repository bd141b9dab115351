use crate::types::CertFact;
use serde::{Deserialize, Serialize};

/// Warning horizons by certificate kind, in hours remaining.
///
/// CA certificates sit higher in the chain and take longer to rotate, so they
/// warn five months out; end-entity certificates warn one month out. A fact
/// qualifies when its `expire_hours` is at or below the applicable horizon,
/// which includes already-expired certificates (negative hours).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExpiryPolicy {
    pub ca_warn_hours: i64,
    pub leaf_warn_hours: i64,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            ca_warn_hours: 5 * 30 * 24,
            leaf_warn_hours: 30 * 24,
        }
    }
}

impl ExpiryPolicy {
    pub fn new(ca_warn_hours: i64, leaf_warn_hours: i64) -> Self {
        Self {
            ca_warn_hours,
            leaf_warn_hours,
        }
    }

    /// The warning horizon applicable to a certificate of the given kind.
    pub fn horizon_hours(&self, is_ca: bool) -> i64 {
        if is_ca {
            self.ca_warn_hours
        } else {
            self.leaf_warn_hours
        }
    }

    /// Whether the fact is close enough to expiry to warrant a notification.
    pub fn should_warn(&self, fact: &CertFact) -> bool {
        fact.expire_hours <= self.horizon_hours(fact.is_ca)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn make_fact(is_ca: bool, expire_hours: i64) -> CertFact {
        let now = Utc::now();
        CertFact {
            common_name: "example.test".to_string(),
            is_ca,
            not_before: now - Duration::days(30),
            not_after: now + Duration::hours(expire_hours),
            expire_hours,
        }
    }

    #[test]
    fn default_horizons() {
        let policy = ExpiryPolicy::default();
        assert_eq!(policy.horizon_hours(true), 3600);
        assert_eq!(policy.horizon_hours(false), 720);
    }

    #[test]
    fn ca_boundary() {
        let policy = ExpiryPolicy::default();
        assert!(policy.should_warn(&make_fact(true, 3600)));
        assert!(!policy.should_warn(&make_fact(true, 3601)));
    }

    #[test]
    fn leaf_boundary() {
        let policy = ExpiryPolicy::default();
        assert!(policy.should_warn(&make_fact(false, 720)));
        assert!(!policy.should_warn(&make_fact(false, 721)));
    }

    #[test]
    fn expired_cert_warns() {
        let policy = ExpiryPolicy::default();
        assert!(policy.should_warn(&make_fact(false, -12)));
        assert!(policy.should_warn(&make_fact(true, -12)));
    }

    #[test]
    fn leaf_inside_ca_horizon_does_not_warn() {
        // 4000 hours is inside nothing; 3000 is inside the CA horizon only.
        let policy = ExpiryPolicy::default();
        assert!(!policy.should_warn(&make_fact(false, 3000)));
        assert!(policy.should_warn(&make_fact(true, 3000)));
    }
}
