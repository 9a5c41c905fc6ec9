pub mod boards;
pub mod system;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;

pub fn system_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", axum::routing::get(system::health))
}

pub fn board_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", axum::routing::get(boards::index))
        .route("/leaderboards", axum::routing::get(boards::index))
        .route(
            "/leaderboards/{board_type}/{column}",
            axum::routing::get(boards::named),
        )
}

/// Every route with state attached; layers are added by the binary.
pub fn app(state: Arc<AppState>) -> Router {
    system_routes().merge(board_routes()).with_state(state)
}
