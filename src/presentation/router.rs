use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{CaptionEngine, CompletionClient, SpeechEngine, TranscriptionEngine};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{health_handler, narrate_handler};
use crate::presentation::state::AppState;

// Generous enough for a phone photo plus a short voice clip.
const UPLOAD_LIMIT_BYTES: usize = 32 * 1024 * 1024;

pub fn create_router<T, C, L, S>(state: AppState<T, C, L, S>) -> Router
where
    T: TranscriptionEngine + 'static,
    C: CaptionEngine + 'static,
    L: CompletionClient + 'static,
    S: SpeechEngine + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/master",
            post(narrate_handler::<T, C, L, S>).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
