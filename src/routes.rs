//! Defines the routes for the application and wires them to their handlers.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    api::{handle_get, handle_post},
    state::AppState,
    store::RecordStore,
};

/// Return a router with all the app's routes.
///
/// The whole API lives behind a single endpoint: the action name inside the
/// request selects the operation, not the path.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: RecordStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api", get(handle_get::<S>).post(handle_post::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
