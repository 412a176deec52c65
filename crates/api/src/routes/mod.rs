pub mod businesses;
pub mod health;
pub mod presence;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// ```text
/// /health                 liveness probe (public)
///
/// /businesses             list/search (public), create (auth)
/// /businesses/{id}        get (public), update, delete (owner/admin)
///
/// /users/me               current reconciled account (auth)
///
/// /presence/ping          heartbeat (public)
/// /presence/count         online counter (public)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/businesses", businesses::router())
        .nest("/users", users::router())
        .nest("/presence", presence::router())
}
