use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Coarse-grained account role.
///
/// Roles are flat: no role implies another. A route that should admit
/// administrators must list `Admin` explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Reader,
    Author,
    Admin,
}

/// Error for role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0} (expected READER, AUTHOR or ADMIN)")]
    Unknown(String),
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Reader, Role::Author, Role::Admin];

    /// Canonical upper-case name, as stored and as carried in tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "READER",
            Role::Author => "AUTHOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Whether an account may request this role for itself at registration.
    pub fn is_self_assignable(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RoleError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("author".parse::<Role>(), Ok(Role::Author));
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" Reader ".parse::<Role>(), Ok(Role::Reader));
    }

    #[test]
    fn test_parse_unknown_role() {
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(RoleError::Unknown(_))
        ));
    }

    #[test]
    fn test_serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Role::Author).unwrap();
        assert_eq!(json, "\"AUTHOR\"");

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_admin_is_not_self_assignable() {
        assert!(Role::Reader.is_self_assignable());
        assert!(Role::Author.is_self_assignable());
        assert!(!Role::Admin.is_self_assignable());
    }
}
