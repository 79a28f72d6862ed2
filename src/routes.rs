use super::{controllers, middleware, models};
use axum::{
    middleware::from_fn,
    routing::{get, Router},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    Router::new()
        .route("/notes", get(controllers::list_notes)
            .post(controllers::create_note)
            .fallback(controllers::method_not_allowed))
        .route("/notes/:id", get(controllers::get_note)
            .patch(controllers::update_note)
            .delete(controllers::delete_note)
            .fallback(controllers::method_not_allowed))
        .fallback(controllers::no_route)
}

/// The full service: routes, request tracing and JSON headers, bound to
/// `state`.
pub fn app(state: models::AppState) -> Router {
    get_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(middleware::json_headers)),
        )
        .with_state(state)
}
