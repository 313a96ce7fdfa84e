//! Avatar route definitions

use axum::{routing::get, Router};

use crate::handlers::get_terms;
use crate::state::AppState;

pub fn avatar_routes() -> Router<AppState> {
    Router::new().route("/api/avatar/get-terms", get(get_terms))
}
