use serde::{Deserialize, Serialize};

use crate::store::EntityKind;

/// User record as stored: `id` and `email` are immutable after creation,
/// `password` holds the SHA-256 hex hash and never leaves the store layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl EntityKind for User {
    const ENTITY_NAME: &'static str = "user";
    const INDEX_NAME: &'static str = "users";

    fn key_of(&self) -> String {
        self.id.clone()
    }

    fn initial_state(id: &str) -> Self {
        User {
            id: id.to_string(),
            name: String::new(),
            email: String::new(),
            password: None,
        }
    }
}

/// Client-facing user shape; structurally cannot carry the password hash
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Email uniqueness record, stored under `user:email:<email>`
///
/// Written once at registration, after the primary User write, and never
/// updated (emails are immutable). Looked up by email at login to resolve
/// the canonical user ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRef {
    pub email: String,
    pub id: String,
}

impl EntityKind for EmailRef {
    const ENTITY_NAME: &'static str = "user:email";
    // Uniqueness records are looked up, never enumerated; they are written
    // with `put`, so this index stays empty.
    const INDEX_NAME: &'static str = "user_emails";

    fn key_of(&self) -> String {
        self.email.clone()
    }

    fn initial_state(email: &str) -> Self {
        EmailRef {
            email: email.to_string(),
            id: String::new(),
        }
    }
}
