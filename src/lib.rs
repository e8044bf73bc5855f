pub mod config;
pub mod error;
pub mod pipeline;
pub mod reference;
pub mod routes;
pub mod samples;
pub mod state;
pub mod types;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .merge(routes::health::router())
        .merge(routes::upload::router())
        .merge(routes::rides::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
