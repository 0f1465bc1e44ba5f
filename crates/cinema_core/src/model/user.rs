//! Users and their roles.

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type RoleId = i64;

/// Named permission level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub role_id: Option<RoleId>,
    pub name: String,
    pub permission_level: i64,
}

impl UserRole {
    pub fn new(name: impl Into<String>, permission_level: i64) -> Self {
        Self {
            role_id: None,
            name: name.into(),
            permission_level,
        }
    }
}

/// Application user.
///
/// `role` is only populated by role wiring; storage keeps `role_id` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: Option<UserId>,
    pub login: String,
    /// Opaque credential, stored and compared as given.
    #[serde(default, skip_serializing)]
    pub password: String,
    pub role_id: RoleId,
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl User {
    pub fn new(login: impl Into<String>, password: impl Into<String>, role_id: RoleId) -> Self {
        Self {
            user_id: None,
            login: login.into(),
            password: password.into(),
            role_id,
            role: None,
        }
    }
}
