pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;
use crate::trace::propagate_trace_id;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/generate/routine",
            post(handlers::handle_generate_routine),
        )
        .route("/generate/prep", post(handlers::handle_generate_prep))
        .route("/reroll/:section", post(handlers::handle_reroll))
        .layer(middleware::from_fn(propagate_trace_id))
        .with_state(state)
}
