use sqlx::FromRow;

use crate::api::payloads::PublicUser;

pub const USER_PROFILE: &str = "user";

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Identity fields only, as acknowledged by signup.
    pub fn summary(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: None,
            last_name: None,
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            ..self.summary()
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub user_id: String,
    pub profile_type: String,
    pub preferences: Option<String>,
}
