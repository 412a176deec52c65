use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(users::get_me))
}
