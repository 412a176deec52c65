//! Dual-key identity reconciliation.
//!
//! Maps a verified [`IdentityAssertion`] to a local user row. Email is the
//! primary key of the mapping: an account that already exists under the
//! asserted email is linked to the provider subject rather than duplicated,
//! which is what keeps a pre-provisioned admin account an admin after their
//! first federated login.

use std::time::Duration;

use limacentro_core::error::CoreError;
use limacentro_core::identity::IdentityAssertion;
use limacentro_core::roles::ROLE_MEMBER;
use limacentro_db::models::{CreateUser, User};
use limacentro_db::repositories::UserRepo;
use limacentro_db::DbPool;

use crate::error::{AppError, AppResult};

/// Resolve an assertion to a local user, creating one on first contact.
///
/// The whole operation runs under `db_timeout` so a stalled database turns
/// into a 503 instead of hanging the login path.
pub async fn reconcile_user(
    pool: &DbPool,
    assertion: &IdentityAssertion,
    db_timeout: Duration,
) -> AppResult<User> {
    tokio::time::timeout(db_timeout, reconcile_inner(pool, assertion))
        .await
        .map_err(|_| {
            AppError::Core(CoreError::Transient(
                "identity reconciliation timed out".into(),
            ))
        })?
}

async fn reconcile_inner(pool: &DbPool, assertion: &IdentityAssertion) -> AppResult<User> {
    let email = assertion.required_email()?;

    // Email match wins over subject match so provider migrations cannot
    // fork an account.
    if let Some(user) = UserRepo::find_by_email(pool, email).await? {
        if user.external_id.as_deref() == Some(assertion.external_id.as_str()) {
            return Ok(UserRepo::refresh_profile(
                pool,
                user.id,
                email,
                &assertion.display_name,
                assertion.avatar_url.as_deref(),
            )
            .await?);
        }
        return Ok(UserRepo::link_identity(
            pool,
            user.id,
            &assertion.external_id,
            &assertion.display_name,
            assertion.avatar_url.as_deref(),
        )
        .await?);
    }

    if let Some(user) = UserRepo::find_by_external_id(pool, &assertion.external_id).await? {
        return Ok(UserRepo::refresh_profile(
            pool,
            user.id,
            email,
            &assertion.display_name,
            assertion.avatar_url.as_deref(),
        )
        .await?);
    }

    // First contact: create a MEMBER row. A concurrent login for the same
    // identity can beat us to the insert; the unique constraints turn that
    // race into a 23505, after which the row exists and a re-lookup wins.
    let create = CreateUser {
        external_id: Some(assertion.external_id.clone()),
        email: email.to_string(),
        display_name: assertion.display_name.clone(),
        avatar_url: assertion.avatar_url.clone(),
        role: ROLE_MEMBER.to_string(),
    };
    match UserRepo::create(pool, &create).await {
        Ok(user) => Ok(user),
        Err(err) if is_unique_violation(&err) => {
            tracing::debug!(email, "lost identity creation race, re-resolving");
            match UserRepo::find_by_email(pool, email).await? {
                Some(user) => Ok(user),
                // The violated constraint guarantees a row existed a moment
                // ago; not finding one now is an invariant breach.
                None => Err(AppError::Core(CoreError::Internal(format!(
                    "no user row found after unique violation: {err}"
                )))),
            }
        }
        Err(err) => Err(err.into()),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
