//! Identity claim carried inside session tokens.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Signed payload of a session token.
///
/// `expires_at` is always strictly greater than `issued_at`; the codec
/// refuses to mint or accept anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaim {
    /// Opaque subject identifier (users.sub)
    pub subject_id: String,
    /// Seconds since the Unix epoch
    pub issued_at: i64,
    /// Seconds since the Unix epoch
    pub expires_at: i64,
}

impl IdentityClaim {
    pub fn new(subject_id: impl Into<String>, now: SystemTime, ttl: Duration) -> Self {
        let issued_at = unix_secs(now);
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            subject_id: subject_id.into(),
            issued_at,
            expires_at: issued_at.saturating_add(ttl),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        !self.subject_id.is_empty() && self.expires_at > self.issued_at
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        unix_secs(now) >= self.expires_at
    }
}

/// Whole seconds since the Unix epoch; clocks before 1970 read as 0.
pub fn unix_secs(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let claim = IdentityClaim {
            subject_id: "u1".into(),
            issued_at: 10,
            expires_at: 20,
        };
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"subjectId": "u1", "issuedAt": 10, "expiresAt": 20})
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let t0 = UNIX_EPOCH + Duration::from_secs(1_000);
        let claim = IdentityClaim::new("u1", t0, Duration::from_secs(60));
        assert!(claim.is_well_formed());
        assert!(!claim.is_expired_at(t0 + Duration::from_secs(59)));
        assert!(claim.is_expired_at(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_ttl_is_not_well_formed() {
        let claim = IdentityClaim::new("u1", SystemTime::now(), Duration::ZERO);
        assert!(!claim.is_well_formed());
    }
}
