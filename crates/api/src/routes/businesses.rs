use axum::routing::get;
use axum::Router;

use crate::handlers::businesses;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(businesses::list_businesses).post(businesses::create_business),
        )
        .route(
            "/{id}",
            get(businesses::get_business)
                .put(businesses::update_business)
                .delete(businesses::delete_business),
        )
}
