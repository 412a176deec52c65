use limacentro_core::types::DbId;
use sqlx::PgPool;

use crate::models::{CreateUser, User};

const COLUMNS: &str =
    "id, external_id, email, display_name, avatar_url, role, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, user: &CreateUser) -> Result<User, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (external_id, email, display_name, avatar_url, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.external_id)
            .bind(&user.email)
            .bind(&user.display_name)
            .bind(&user.avatar_url)
            .bind(&user.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE external_id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Attach a provider subject to an existing account and refresh the
    /// profile fields it carries. The role column is deliberately left alone.
    pub async fn link_identity(
        pool: &PgPool,
        id: DbId,
        external_id: &str,
        display_name: &str,
        avatar_url: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let sql = format!(
            "UPDATE users
             SET external_id = $2, display_name = $3, avatar_url = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(external_id)
            .bind(display_name)
            .bind(avatar_url)
            .fetch_one(pool)
            .await
    }

    /// Sync mutable profile fields from a fresh identity assertion. The
    /// email write covers provider-side address changes; `uq_users_email`
    /// still arbitrates collisions.
    pub async fn refresh_profile(
        pool: &PgPool,
        id: DbId,
        email: &str,
        display_name: &str,
        avatar_url: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let sql = format!(
            "UPDATE users
             SET email = $2, display_name = $3, avatar_url = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(email)
            .bind(display_name)
            .bind(avatar_url)
            .fetch_one(pool)
            .await
    }

    /// Idempotent startup upsert for the configured admin account. An
    /// existing row keeps its profile and identity link; only the role is
    /// forced to ADMIN.
    pub async fn bootstrap_admin(pool: &PgPool, email: &str) -> Result<User, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (email, display_name, role)
             VALUES ($1, 'Administrador', 'ADMIN')
             ON CONFLICT ON CONSTRAINT uq_users_email
             DO UPDATE SET role = 'ADMIN', updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_one(pool)
            .await
    }
}
