//! Clan endpoints: create, update, load, list, delete, membership

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::{parse_id, read_status, write_status};
use crate::envelope::ResultEnvelope;
use crate::error::ApiError;
use crate::fallback::Placeholder;
use crate::middleware::AvatarId;
use crate::models::{
    Clan, ClanNameQuery, CreateClanRequest, InventoryItem, ListClansQuery, UpdateClanRequest,
};
use crate::response::{self, EnvelopeResponse};
use crate::state::AppState;

type ClanResponse<T> = Result<EnvelopeResponse<T>, ApiError>;

const CLAN_NOT_FOUND: &str = "Clan not found.";

fn body_required(_: JsonRejection) -> ApiError {
    ApiError::Validation(
        "The request body is required. Please provide a valid JSON object.".to_string(),
    )
}

fn require_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Clan name is required.".to_string()));
    }
    Ok(name.to_string())
}

/// POST /api/clan - Create a clan owned by the calling avatar
pub async fn create_clan(
    State(app_state): State<AppState>,
    AvatarId(owner_avatar_id): AvatarId,
    body: Result<Json<CreateClanRequest>, JsonRejection>,
) -> ClanResponse<Clan> {
    let Json(request) = body.map_err(body_required)?;
    request.validate()?;
    let name = require_name(&request.name)?;
    let description = request.description.as_deref().map(str::trim);

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(app_state.executor.policy("creating clan"), || {
            manager.create_clan(owner_avatar_id, &name, description)
        })
        .await;

    let status = write_status(&envelope);
    Ok(response::map(envelope, status))
}

/// PUT /api/clan/:clan_id - Update name and description
pub async fn update_clan(
    State(app_state): State<AppState>,
    Path(clan_id): Path<String>,
    body: Result<Json<UpdateClanRequest>, JsonRejection>,
) -> ClanResponse<Clan> {
    let clan_id = parse_id(&clan_id, "clanId")?;
    let Json(request) = body.map_err(body_required)?;
    request.validate()?;
    let name = require_name(&request.name)?;
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let manager = app_state.clan_manager.clone();
    let loaded = app_state
        .executor
        .run(app_state.executor.policy("loading clan"), || {
            manager.load_clan(clan_id)
        })
        .await;

    if loaded.is_dependency_failure() {
        return Ok(response::map(loaded, Some(StatusCode::INTERNAL_SERVER_ERROR)));
    }
    if loaded.is_error || !loaded.has_value() {
        let message = if loaded.is_error && !loaded.message.is_empty() {
            loaded.message
        } else {
            CLAN_NOT_FOUND.to_string()
        };
        return Ok(response::map(
            ResultEnvelope::failure(message),
            Some(StatusCode::NOT_FOUND),
        ));
    }

    let envelope = app_state
        .executor
        .run(app_state.executor.policy("updating clan"), || {
            manager.update_clan(clan_id, &name, &description)
        })
        .await;

    let status = write_status(&envelope);
    Ok(response::map(envelope, status))
}

/// GET /api/clan/:clan_id - Load a clan
pub async fn load_clan(
    State(app_state): State<AppState>,
    Path(clan_id): Path<String>,
) -> ClanResponse<Clan> {
    let clan_id = parse_id(&clan_id, "clanId")?;

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(app_state.executor.policy("loading clan"), || {
            manager.load_clan(clan_id)
        })
        .await;

    let status = read_status(&envelope);
    Ok(response::map(envelope, status))
}

/// GET /api/clan/by-name?name= - Load a clan by name (case-insensitive)
pub async fn load_clan_by_name(
    State(app_state): State<AppState>,
    query: Result<Query<ClanNameQuery>, QueryRejection>,
) -> ClanResponse<Clan> {
    let name = query
        .ok()
        .and_then(|Query(q)| q.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::Validation("Clan name (query 'name') is required.".to_string()))?;

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(app_state.executor.policy("loading clan"), || {
            manager.load_clan_by_name(&name)
        })
        .await;

    let status = read_status(&envelope);
    Ok(response::map(envelope, status))
}

/// GET /api/clan - List clans, optionally filtered by owner
pub async fn list_clans(
    State(app_state): State<AppState>,
    query: Result<Query<ListClansQuery>, QueryRejection>,
) -> ClanResponse<Vec<Clan>> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;

    let policy = app_state
        .executor
        .policy("listing clans")
        .with_placeholder(Placeholder::new("Clans retrieved successfully", Vec::new));

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(policy, || manager.list_clans(query.owner_avatar_id))
        .await;

    let status = write_status(&envelope);
    Ok(response::map(envelope, status))
}

/// DELETE /api/clan/:clan_id - Delete a clan
pub async fn delete_clan(
    State(app_state): State<AppState>,
    _caller: AvatarId,
    Path(clan_id): Path<String>,
) -> ClanResponse<bool> {
    let clan_id = parse_id(&clan_id, "clanId")?;

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(app_state.executor.policy("deleting clan"), || {
            manager.delete_clan(clan_id)
        })
        .await;

    let status = read_status(&envelope);
    Ok(response::map(envelope, status))
}

fn member_ids(clan_id: &str, avatar_id: &str) -> Result<(Uuid, Uuid), ApiError> {
    Ok((parse_id(clan_id, "clanId")?, parse_id(avatar_id, "avatarId")?))
}

/// POST /api/clan/:clan_id/members/:avatar_id - Add an avatar to a clan
pub async fn add_clan_member(
    State(app_state): State<AppState>,
    _caller: AvatarId,
    Path((clan_id, avatar_id)): Path<(String, String)>,
) -> ClanResponse<bool> {
    let (clan_id, avatar_id) = member_ids(&clan_id, &avatar_id)?;

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(app_state.executor.policy("adding avatar to clan"), || {
            manager.add_member(clan_id, avatar_id)
        })
        .await;

    let status = write_status(&envelope);
    Ok(response::map(envelope, status))
}

/// DELETE /api/clan/:clan_id/members/:avatar_id - Remove an avatar from a clan
pub async fn remove_clan_member(
    State(app_state): State<AppState>,
    _caller: AvatarId,
    Path((clan_id, avatar_id)): Path<(String, String)>,
) -> ClanResponse<bool> {
    let (clan_id, avatar_id) = member_ids(&clan_id, &avatar_id)?;

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(app_state.executor.policy("removing avatar from clan"), || {
            manager.remove_member(clan_id, avatar_id)
        })
        .await;

    let status = write_status(&envelope);
    Ok(response::map(envelope, status))
}

/// GET /api/clan/:clan_id/members - Member avatar ids
pub async fn get_clan_members(
    State(app_state): State<AppState>,
    Path(clan_id): Path<String>,
) -> ClanResponse<Vec<Uuid>> {
    let clan_id = parse_id(&clan_id, "clanId")?;

    let policy = app_state
        .executor
        .policy("loading clan members")
        .with_placeholder(Placeholder::new(
            "Clan members retrieved successfully",
            Vec::new,
        ));

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(policy, || manager.members(clan_id))
        .await;

    let status = read_status(&envelope);
    Ok(response::map(envelope, status))
}

/// GET /api/clan/:clan_id/inventory - Clan treasury
pub async fn get_clan_inventory(
    State(app_state): State<AppState>,
    Path(clan_id): Path<String>,
) -> ClanResponse<Vec<InventoryItem>> {
    let clan_id = parse_id(&clan_id, "clanId")?;

    let manager = app_state.clan_manager.clone();
    let envelope = app_state
        .executor
        .run(app_state.executor.policy("loading clan inventory"), || {
            manager.inventory(clan_id)
        })
        .await;

    let status = read_status(&envelope);
    Ok(response::map(envelope, status))
}
