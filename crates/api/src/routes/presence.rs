use axum::routing::{get, post};
use axum::Router;

use crate::handlers::presence;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", post(presence::ping))
        .route("/count", get(presence::count))
}
