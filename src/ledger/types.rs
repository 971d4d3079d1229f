use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ledger reference attached to a completed run
///
/// The token is display-only. It carries no on-chain meaning and cannot be
/// resolved against any real ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReference {
    /// When the reference was issued
    pub anchored_at: DateTime<Utc>,

    /// Opaque token, 0x-prefixed hex
    pub token: String,
}

impl LedgerReference {
    /// Token shape check used by display surfaces (0x + 64 hex chars)
    pub fn is_well_formed(&self) -> bool {
        self.token.len() == 66
            && self.token.starts_with("0x")
            && self.token[2..].chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_serialization() {
        let reference = LedgerReference {
            anchored_at: Utc::now(),
            token: format!("0x{}", "ab".repeat(32)),
        };

        let json = serde_json::to_string(&reference).unwrap();
        let deserialized: LedgerReference = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.token, reference.token);
    }

    #[test]
    fn test_well_formed_token() {
        let good = LedgerReference {
            anchored_at: Utc::now(),
            token: format!("0x{}", "0f".repeat(32)),
        };
        assert!(good.is_well_formed());

        let bad = LedgerReference {
            anchored_at: Utc::now(),
            token: "0xnothex".to_string(),
        };
        assert!(!bad.is_well_formed());
    }
}
