//! Settings route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/settings/get-all-settings-for-current-logged-in-avatar",
            get(get_all_settings),
        )
        .route(
            "/api/settings/hyperdrive-settings",
            get(get_hyperdrive_settings).put(update_hyperdrive_settings),
        )
        .route(
            "/api/settings/system-settings",
            get(get_system_settings).put(update_system_settings),
        )
        .route(
            "/api/settings/subscription-settings",
            get(get_subscription_settings).put(update_subscription_settings),
        )
        .route(
            "/api/settings/notification-preferences",
            get(get_notification_preferences).put(update_notification_preferences),
        )
        .route(
            "/api/settings/privacy-settings",
            get(get_privacy_settings).put(update_privacy_settings),
        )
        .route("/api/settings/version", get(get_version))
}
