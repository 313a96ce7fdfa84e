//! Data models for the OASIS API gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Free-form settings document stored per avatar and category
pub type SettingsMap = serde_json::Map<String, serde_json::Value>;

/// Clan (guild) of avatars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Clan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_avatar_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item held in a clan's shared treasury
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub clan_id: Uuid,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

/// Request DTO for creating a clan
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClanRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "Clan name must be at most 100 characters."))]
    pub name: String,
    #[validate(length(max = 1000, message = "Clan description must be at most 1000 characters."))]
    pub description: Option<String>,
}

/// Request DTO for updating a clan
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClanRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "Clan name must be at most 100 characters."))]
    pub name: String,
    #[validate(length(max = 1000, message = "Clan description must be at most 1000 characters."))]
    pub description: Option<String>,
}

/// Query for listing clans
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClansQuery {
    pub owner_avatar_id: Option<Uuid>,
}

/// Query for loading a clan by name
#[derive(Debug, Default, Deserialize)]
pub struct ClanNameQuery {
    pub name: Option<String>,
}
