use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;
use crate::routes::quotes::SharedStore;

pub mod quotes;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Build the full application router: health, the `/api` quote surface, and
/// the catch-all that feeds unmatched requests into the terminal error stage.
pub fn build_router(store: SharedStore, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route(
            "/quotes",
            get(quotes::list_quotes).post(quotes::create_quote),
        )
        .route("/quotes/quote/random", get(quotes::random_quote))
        .route(
            "/quotes/:id",
            get(quotes::get_quote)
                .put(quotes::update_quote)
                .delete(quotes::delete_quote),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(route_not_found)
        .with_state(store)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
