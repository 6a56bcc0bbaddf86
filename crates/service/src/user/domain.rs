use std::fmt;

use uuid::Uuid;

use crate::errors::ServiceError;

/// Stored user. `password_hash` is an argon2 PHC string and must never be
/// serialized to a client.
#[derive(Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        Self { id: m.id, email: m.email, name: m.name, password_hash: m.password }
    }
}

/// Insert payload. The identifier is assigned by the repository.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser").field("email", &self.email).field("name", &self.name).finish_non_exhaustive()
    }
}

/// Column widths of the `users` table.
pub const EMAIL_MAX_LEN: usize = 255;
pub const NAME_MAX_LEN: usize = 128;

pub(crate) fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ServiceError::invalid("username is invalid"));
    }
    Ok(())
}

/// Canonical stored form of an email: surrounding whitespace removed.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_string()
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && email.len() <= EMAIL_MAX_LEN
        }
        None => false,
    }
}

#[derive(Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterInput {
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if !is_valid_email(self.email.trim()) {
            return Err(ServiceError::invalid("email is invalid"));
        }
        if self.password.is_empty() {
            return Err(ServiceError::invalid("password is required"));
        }
        validate_name(&self.name)
    }
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput").field("email", &self.email).field("name", &self.name).finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput").field("email", &self.email).finish_non_exhaustive()
    }
}

/// Partial update. Only the display name is mutable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool { self.name.is_none() }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), password: password.into(), name: String::new() }
    }

    #[test]
    fn registration_checks() {
        assert!(input("a@x.com", "p1").validate().is_ok());
        assert!(input("", "p1").validate().is_err());
        assert!(input("no-at-sign", "p1").validate().is_err());
        assert!(input("@", "p1").validate().is_err());
        assert!(input("@x.com", "p1").validate().is_err());
        assert!(input("a@", "p1").validate().is_err());
        assert!(input("a@b@c", "p1").validate().is_err());
        assert!(input("a@x.com", "").validate().is_err());
        let mut long_name = input("a@x.com", "p1");
        long_name.name = "n".repeat(NAME_MAX_LEN + 1);
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn normalization_trims_email() {
        let reg = input("  a@x.com\t", "p1").normalized();
        assert_eq!(reg.email, "a@x.com");
        assert!(reg.validate().is_ok());
        assert_eq!(normalize_email(" b@y.org "), "b@y.org");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let user = User { id: Uuid::nil(), email: "a@x.com".into(), name: "A".into(), password_hash: "$argon2id$secret".into() };
        let login = LoginInput { email: "a@x.com".into(), password: "hunter2".into() };
        let reg = input("a@x.com", "hunter2");
        assert!(!format!("{user:?}").contains("secret"));
        assert!(!format!("{login:?}").contains("hunter2"));
        assert!(!format!("{reg:?}").contains("hunter2"));
    }
}
