//! Bearer-token authentication extractors for Axum handlers.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use limacentro_core::error::CoreError;
use limacentro_db::models::User;

use crate::auth::reconcile::reconcile_user;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer token in the `Authorization`
/// header.
///
/// Verification and identity reconciliation both run here, so a handler
/// taking this extractor always sees an up-to-date local user row:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.0.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let assertion = state.identity.verify(token).await?;
        let user = reconcile_user(
            &state.pool,
            &assertion,
            Duration::from_secs(state.config.db_timeout_secs),
        )
        .await?;

        Ok(AuthUser(user))
    }
}

/// Optional variant of [`AuthUser`] for endpoints that serve both anonymous
/// and authenticated callers. A missing or invalid token degrades to
/// anonymous instead of rejecting the request.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(user)) => Ok(MaybeAuthUser(Some(user))),
            Err(AppError::Core(CoreError::Unauthorized(_))) => Ok(MaybeAuthUser(None)),
            Err(err) => Err(err),
        }
    }
}
