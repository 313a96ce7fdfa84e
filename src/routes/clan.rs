//! Clan route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn clan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/clan", post(create_clan).get(list_clans))
        .route("/api/clan/by-name", get(load_clan_by_name))
        .route(
            "/api/clan/:clan_id",
            get(load_clan).put(update_clan).delete(delete_clan),
        )
        .route("/api/clan/:clan_id/members", get(get_clan_members))
        .route("/api/clan/:clan_id/inventory", get(get_clan_inventory))
        .route(
            "/api/clan/:clan_id/members/:avatar_id",
            post(add_clan_member).delete(remove_clan_member),
        )
}
