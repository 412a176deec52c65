use chrono::{DateTime, Utc};
use limacentro_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A directory account.
///
/// `external_id` is the identity provider's subject and is NULL for accounts
/// created locally (the bootstrapped admin) until their first federated
/// login links it.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub external_id: Option<String>,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == limacentro_core::roles::ROLE_ADMIN
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub external_id: Option<String>,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: String,
}
