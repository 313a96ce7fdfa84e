//! Avatar settings endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::write_status;
use crate::envelope::ResultEnvelope;
use crate::error::ApiError;
use crate::fallback::Placeholder;
use crate::managers::{
    HYPERDRIVE_CATEGORY, NOTIFICATION_CATEGORY, PRIVACY_CATEGORY, SUBSCRIPTION_CATEGORY,
    SYSTEM_CATEGORY,
};
use crate::middleware::AvatarId;
use crate::models::SettingsMap;
use crate::response::{self, EnvelopeResponse};
use crate::state::AppState;

type SettingsResponse<T> = Result<EnvelopeResponse<T>, ApiError>;

/// Stored settings category and how it reads in messages
struct Category {
    key: &'static str,
    /// "HyperDrive settings", used mid-sentence
    name: &'static str,
    /// "HyperDrive settings", used at the start of a message
    title: &'static str,
}

const HYPERDRIVE: Category = Category {
    key: HYPERDRIVE_CATEGORY,
    name: "HyperDrive settings",
    title: "HyperDrive settings",
};

const SYSTEM: Category = Category {
    key: SYSTEM_CATEGORY,
    name: "system settings",
    title: "System settings",
};

const SUBSCRIPTION: Category = Category {
    key: SUBSCRIPTION_CATEGORY,
    name: "subscription settings",
    title: "Subscription settings",
};

const NOTIFICATION: Category = Category {
    key: NOTIFICATION_CATEGORY,
    name: "notification preferences",
    title: "Notification preferences",
};

const PRIVACY: Category = Category {
    key: PRIVACY_CATEGORY,
    name: "privacy settings",
    title: "Privacy settings",
};

async fn load_category(
    app_state: AppState,
    avatar_id: uuid::Uuid,
    category: &Category,
) -> EnvelopeResponse<SettingsMap> {
    let policy = app_state
        .executor
        .policy(format!("retrieving {}", category.name))
        .with_placeholder(Placeholder::new(
            format!("{} retrieved successfully", category.title),
            SettingsMap::new,
        ));

    let manager = app_state.settings_manager.clone();
    let envelope = app_state
        .executor
        .run(policy, || manager.category_settings(avatar_id, category.key))
        .await;

    let status = write_status(&envelope);
    response::map(envelope, status)
}

async fn replace_category(
    app_state: AppState,
    avatar_id: uuid::Uuid,
    category: &Category,
    body: Result<Json<SettingsMap>, JsonRejection>,
) -> SettingsResponse<bool> {
    let Json(settings) = body.map_err(|_| {
        ApiError::Validation(format!(
            "The request body is required. Please provide a valid JSON object with {}.",
            category.name
        ))
    })?;

    let manager = app_state.settings_manager.clone();
    let envelope = app_state
        .executor
        .run(
            app_state.executor.policy(format!("updating {}", category.name)),
            || manager.replace_category_settings(avatar_id, category.key, settings),
        )
        .await;

    let status = write_status(&envelope);
    Ok(response::map(envelope, status))
}

/// GET /api/settings/get-all-settings-for-current-logged-in-avatar
pub async fn get_all_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
) -> SettingsResponse<SettingsMap> {
    let policy = app_state
        .executor
        .policy("retrieving settings")
        .with_placeholder(Placeholder::new(
            "Settings retrieved successfully",
            SettingsMap::new,
        ));

    let manager = app_state.settings_manager.clone();
    let envelope = app_state
        .executor
        .run(policy, || manager.all_settings(avatar_id))
        .await;

    let status = write_status(&envelope);
    Ok(response::map(envelope, status))
}

/// GET /api/settings/hyperdrive-settings
pub async fn get_hyperdrive_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
) -> SettingsResponse<SettingsMap> {
    Ok(load_category(app_state, avatar_id, &HYPERDRIVE).await)
}

/// PUT /api/settings/hyperdrive-settings
pub async fn update_hyperdrive_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
    body: Result<Json<SettingsMap>, JsonRejection>,
) -> SettingsResponse<bool> {
    replace_category(app_state, avatar_id, &HYPERDRIVE, body).await
}

/// GET /api/settings/system-settings
pub async fn get_system_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
) -> SettingsResponse<SettingsMap> {
    Ok(load_category(app_state, avatar_id, &SYSTEM).await)
}

/// PUT /api/settings/system-settings
pub async fn update_system_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
    body: Result<Json<SettingsMap>, JsonRejection>,
) -> SettingsResponse<bool> {
    replace_category(app_state, avatar_id, &SYSTEM, body).await
}

/// GET /api/settings/subscription-settings
pub async fn get_subscription_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
) -> SettingsResponse<SettingsMap> {
    Ok(load_category(app_state, avatar_id, &SUBSCRIPTION).await)
}

/// PUT /api/settings/subscription-settings
pub async fn update_subscription_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
    body: Result<Json<SettingsMap>, JsonRejection>,
) -> SettingsResponse<bool> {
    replace_category(app_state, avatar_id, &SUBSCRIPTION, body).await
}

/// GET /api/settings/notification-preferences
pub async fn get_notification_preferences(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
) -> SettingsResponse<SettingsMap> {
    Ok(load_category(app_state, avatar_id, &NOTIFICATION).await)
}

/// PUT /api/settings/notification-preferences
pub async fn update_notification_preferences(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
    body: Result<Json<SettingsMap>, JsonRejection>,
) -> SettingsResponse<bool> {
    replace_category(app_state, avatar_id, &NOTIFICATION, body).await
}

/// GET /api/settings/privacy-settings
pub async fn get_privacy_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
) -> SettingsResponse<SettingsMap> {
    Ok(load_category(app_state, avatar_id, &PRIVACY).await)
}

/// PUT /api/settings/privacy-settings
pub async fn update_privacy_settings(
    State(app_state): State<AppState>,
    AvatarId(avatar_id): AvatarId,
    body: Result<Json<SettingsMap>, JsonRejection>,
) -> SettingsResponse<bool> {
    replace_category(app_state, avatar_id, &PRIVACY, body).await
}

/// GET /api/settings/version
pub async fn get_version() -> EnvelopeResponse<String> {
    response::map(
        ResultEnvelope::success(
            format!("OASIS API {}", env!("CARGO_PKG_VERSION")),
            "Version retrieved successfully",
        ),
        None,
    )
}
