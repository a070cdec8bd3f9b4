//! User roles.
//!
//! The marketplace knows exactly three roles. Keeping this a closed enum
//! means role checks are exhaustive matches at the router boundary rather
//! than string comparisons scattered through command handlers.

use serde::{Deserialize, Serialize};

/// Account role, as reported by the server's `user_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Buys products, owns a cart.
    Customer,
    /// Sells products, sees orders for their own products.
    Farmer,
    /// Validates products, sees every order and the statistics board.
    Admin,
}

impl Role {
    /// Canonical wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Farmer => "farmer",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "farmer" => Ok(Self::Farmer),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The server reported a role this client does not know. A session is
/// never established for an unknown role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn known_roles_parse() {
        assert_eq!(Role::from_str("customer").unwrap(), Role::Customer);
        assert_eq!(Role::from_str("farmer").unwrap(), Role::Farmer);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = Role::from_str("merchant").unwrap_err();
        assert_eq!(err.0, "merchant");
        assert!(Role::from_str("").is_err());
        assert!(Role::from_str("Admin").is_err());
    }

    #[test]
    fn serde_roundtrip_uses_lowercase() {
        let json = serde_json::to_string(&Role::Farmer).unwrap();
        assert_eq!(json, "\"farmer\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::Farmer);
    }

    #[test]
    fn serde_rejects_unknown_role() {
        assert!(serde_json::from_str::<Role>("\"merchant\"").is_err());
    }
}
