use auth::Role;

use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: String,
    pub requested_role: Option<Role>,
}

impl RegisterCommand {
    pub fn new(
        name: DisplayName,
        email: EmailAddress,
        password: String,
        requested_role: Option<Role>,
    ) -> Self {
        Self {
            name,
            email,
            password,
            requested_role,
        }
    }

    /// Role the new account actually receives.
    ///
    /// Self-registration never grants `Admin`; an absent or administrative
    /// request falls back to `Reader`.
    pub fn granted_role(&self) -> Role {
        match self.requested_role {
            Some(role) if role.is_self_assignable() => role,
            _ => Role::Reader,
        }
    }
}

/// Command to log in.
///
/// The email is kept raw: a malformed address must fail exactly like an
/// unknown one.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}
