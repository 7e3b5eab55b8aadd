use std::collections::HashSet;

use crate::jwt::Principal;
use crate::role::Role;

/// Per-route capability descriptor.
///
/// Attached to a route when it is registered and read by the guard as plain
/// data. An empty `allowed_roles` admits any caller the authentication step
/// let through; otherwise the principal's role must be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAccess {
    pub requires_auth: bool,
    pub allowed_roles: HashSet<Role>,
}

impl RouteAccess {
    /// Anyone may call; a valid token is still resolved if presented.
    pub fn public() -> Self {
        Self {
            requires_auth: false,
            allowed_roles: HashSet::new(),
        }
    }

    /// Any authenticated caller, whatever the role.
    pub fn authenticated() -> Self {
        Self {
            requires_auth: true,
            allowed_roles: HashSet::new(),
        }
    }

    /// Authenticated callers holding one of `roles`.
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            requires_auth: true,
            allowed_roles: roles.into_iter().collect(),
        }
    }

    /// Role decision for an already-authenticated (or anonymous) caller.
    pub fn permits(&self, principal: Option<&Principal>) -> bool {
        if self.allowed_roles.is_empty() {
            return true;
        }

        principal.map_or(false, |p| self.allowed_roles.contains(&p.role))
    }
}

impl Default for RouteAccess {
    fn default() -> Self {
        Self::authenticated()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            subject_id: "user123".to_string(),
            email: "carol@example.com".to_string(),
            role,
            issued_at: Utc::now(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_declared_roles_admits_everyone() {
        let access = RouteAccess::authenticated();

        assert!(access.permits(Some(&principal(Role::Reader))));
        assert!(access.permits(Some(&principal(Role::Admin))));
        assert!(RouteAccess::public().permits(None));
    }

    #[test]
    fn test_reader_rejected_from_author_or_admin() {
        let access = RouteAccess::roles([Role::Author, Role::Admin]);

        assert!(!access.permits(Some(&principal(Role::Reader))));
        assert!(access.permits(Some(&principal(Role::Author))));
        assert!(access.permits(Some(&principal(Role::Admin))));
    }

    #[test]
    fn test_admin_has_no_implicit_author_rights() {
        let access = RouteAccess::roles([Role::Author]);

        assert!(!access.permits(Some(&principal(Role::Admin))));
        assert!(access.permits(Some(&principal(Role::Author))));
    }

    #[test]
    fn test_declared_roles_require_a_principal() {
        let access = RouteAccess {
            requires_auth: false,
            allowed_roles: HashSet::from([Role::Reader]),
        };

        assert!(!access.permits(None));
    }
}
