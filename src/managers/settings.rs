use axum::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ManagerResult, SettingsManager};
use crate::envelope::ResultEnvelope;
use crate::models::SettingsMap;

/// Category under which HyperDrive (provider auto-failover/replication)
/// preferences are stored.
pub const HYPERDRIVE_CATEGORY: &str = "hyperdrive";
pub const SYSTEM_CATEGORY: &str = "system";
pub const SUBSCRIPTION_CATEGORY: &str = "subscription";
pub const NOTIFICATION_CATEGORY: &str = "notification";
pub const PRIVACY_CATEGORY: &str = "privacy";

/// Settings manager backed by PostgreSQL (`avatar_settings` table)
#[derive(Clone)]
pub struct PgSettingsManager {
    db_pool: PgPool,
}

impl PgSettingsManager {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SettingsManager for PgSettingsManager {
    async fn all_settings(&self, avatar_id: Uuid) -> ManagerResult<SettingsMap> {
        let rows: Vec<(String, Json<SettingsMap>)> = sqlx::query_as(
            "SELECT category, settings FROM avatar_settings WHERE avatar_id = $1 ORDER BY category",
        )
        .bind(avatar_id)
        .fetch_all(&self.db_pool)
        .await?;

        if rows.is_empty() {
            return Ok(ResultEnvelope::empty("No settings found for avatar."));
        }

        let settings: SettingsMap = rows
            .into_iter()
            .map(|(category, Json(values))| (category, serde_json::Value::Object(values)))
            .collect();

        Ok(ResultEnvelope::success(settings, "Settings retrieved successfully"))
    }

    async fn category_settings(
        &self,
        avatar_id: Uuid,
        category: &str,
    ) -> ManagerResult<SettingsMap> {
        let row: Option<(Json<SettingsMap>,)> = sqlx::query_as(
            "SELECT settings FROM avatar_settings WHERE avatar_id = $1 AND category = $2",
        )
        .bind(avatar_id)
        .bind(category)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(match row {
            Some((Json(settings),)) => ResultEnvelope::success(
                settings,
                format!("{} settings retrieved successfully", category),
            ),
            None => ResultEnvelope::empty(format!("No {} settings found for avatar.", category)),
        })
    }

    async fn replace_category_settings(
        &self,
        avatar_id: Uuid,
        category: &str,
        settings: SettingsMap,
    ) -> ManagerResult<bool> {
        sqlx::query(
            r#"
            INSERT INTO avatar_settings (avatar_id, category, settings, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (avatar_id, category)
            DO UPDATE SET settings = EXCLUDED.settings, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(avatar_id)
        .bind(category)
        .bind(Json(settings))
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?;

        tracing::info!(avatar_id = %avatar_id, category = %category, "Settings updated");

        Ok(ResultEnvelope::success(
            true,
            format!("{} settings updated successfully", category),
        ))
    }
}
