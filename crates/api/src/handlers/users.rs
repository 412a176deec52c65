use axum::Json;
use limacentro_db::models::User;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// `GET /users/me` — the reconciled local account for the presented token.
///
/// Reconciliation already ran in the extractor, so this is a pure echo of
/// the up-to-date row.
pub async fn get_me(user: AuthUser) -> AppResult<Json<User>> {
    Ok(Json(user.0))
}
