use axum::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ClanManager, ManagerResult};
use crate::envelope::ResultEnvelope;
use crate::models::{Clan, InventoryItem};

const CLAN_NOT_FOUND: &str = "Clan not found.";
const DUPLICATE_NAME: &str = "A clan with that name already exists.";

/// A write that lost the race on the unique name index is a business
/// failure, not a storage outage.
fn name_conflict<T>(err: sqlx::Error) -> ManagerResult<T> {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return Ok(ResultEnvelope::failure(DUPLICATE_NAME));
        }
    }
    Err(err.into())
}

/// Clan manager backed by PostgreSQL
#[derive(Clone)]
pub struct PgClanManager {
    db_pool: PgPool,
}

impl PgClanManager {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    async fn find_clan(&self, clan_id: Uuid) -> Result<Option<Clan>, sqlx::Error> {
        sqlx::query_as::<_, Clan>("SELECT * FROM clans WHERE id = $1")
            .bind(clan_id)
            .fetch_optional(&self.db_pool)
            .await
    }

    async fn is_member(&self, clan_id: Uuid, avatar_id: Uuid) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT avatar_id FROM clan_members WHERE clan_id = $1 AND avatar_id = $2",
        )
        .bind(clan_id)
        .bind(avatar_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.is_some())
    }
}

#[async_trait]
impl ClanManager for PgClanManager {
    async fn create_clan(
        &self,
        owner_avatar_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> ManagerResult<Clan> {
        if name.trim().is_empty() {
            return Ok(ResultEnvelope::failure("Clan name is required."));
        }

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM clans WHERE LOWER(name) = LOWER($1)")
                .bind(name)
                .fetch_optional(&self.db_pool)
                .await?;
        if existing.is_some() {
            return Ok(ResultEnvelope::failure(DUPLICATE_NAME));
        }

        let now = Utc::now();
        let mut tx = self.db_pool.begin().await?;

        let inserted = sqlx::query_as::<_, Clan>(
            r#"
            INSERT INTO clans (id, name, description, owner_avatar_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description.unwrap_or_default())
        .bind(owner_avatar_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        let clan = match inserted {
            Ok(clan) => clan,
            Err(e) => return name_conflict(e),
        };

        sqlx::query("INSERT INTO clan_members (clan_id, avatar_id, joined_at) VALUES ($1, $2, $3)")
            .bind(clan.id)
            .bind(owner_avatar_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(clan_id = %clan.id, owner = %owner_avatar_id, "Clan created");

        Ok(ResultEnvelope::success(clan, "Clan created."))
    }

    async fn update_clan(
        &self,
        clan_id: Uuid,
        name: &str,
        description: &str,
    ) -> ManagerResult<Clan> {
        let taken: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM clans WHERE LOWER(name) = LOWER($1) AND id <> $2")
                .bind(name)
                .bind(clan_id)
                .fetch_optional(&self.db_pool)
                .await?;
        if taken.is_some() {
            return Ok(ResultEnvelope::failure(DUPLICATE_NAME));
        }

        let updated = sqlx::query_as::<_, Clan>(
            r#"
            UPDATE clans
            SET name = $2, description = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(clan_id)
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .fetch_optional(&self.db_pool)
        .await;

        let clan = match updated {
            Ok(clan) => clan,
            Err(e) => return name_conflict(e),
        };

        Ok(match clan {
            Some(clan) => ResultEnvelope::success(clan, "Clan updated."),
            None => ResultEnvelope::failure(CLAN_NOT_FOUND),
        })
    }

    async fn load_clan(&self, clan_id: Uuid) -> ManagerResult<Clan> {
        Ok(match self.find_clan(clan_id).await? {
            Some(clan) => ResultEnvelope::success(clan, "Clan loaded."),
            None => ResultEnvelope::failure(CLAN_NOT_FOUND),
        })
    }

    async fn load_clan_by_name(&self, name: &str) -> ManagerResult<Clan> {
        let clan = sqlx::query_as::<_, Clan>("SELECT * FROM clans WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(match clan {
            Some(clan) => ResultEnvelope::success(clan, "Clan loaded."),
            None => ResultEnvelope::failure(CLAN_NOT_FOUND),
        })
    }

    async fn list_clans(&self, owner_avatar_id: Option<Uuid>) -> ManagerResult<Vec<Clan>> {
        let clans = sqlx::query_as::<_, Clan>(
            r#"
            SELECT * FROM clans
            WHERE ($1::uuid IS NULL OR owner_avatar_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_avatar_id)
        .fetch_all(&self.db_pool)
        .await?;

        let message = format!("{} clans loaded.", clans.len());
        Ok(ResultEnvelope::success(clans, message))
    }

    async fn delete_clan(&self, clan_id: Uuid) -> ManagerResult<bool> {
        let deleted = sqlx::query("DELETE FROM clans WHERE id = $1")
            .bind(clan_id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Ok(ResultEnvelope::failure(CLAN_NOT_FOUND));
        }

        tracing::info!(clan_id = %clan_id, "Clan deleted");
        Ok(ResultEnvelope::success(true, "Clan deleted."))
    }

    async fn add_member(&self, clan_id: Uuid, avatar_id: Uuid) -> ManagerResult<bool> {
        if self.find_clan(clan_id).await?.is_none() {
            return Ok(ResultEnvelope::failure(CLAN_NOT_FOUND));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO clan_members (clan_id, avatar_id, joined_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (clan_id, avatar_id) DO NOTHING
            "#,
        )
        .bind(clan_id)
        .bind(avatar_id)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Ok(ResultEnvelope::success(true, "Avatar is already a member."));
        }

        Ok(ResultEnvelope::success(true, "Avatar added to clan."))
    }

    async fn remove_member(&self, clan_id: Uuid, avatar_id: Uuid) -> ManagerResult<bool> {
        let clan = match self.find_clan(clan_id).await? {
            Some(clan) => clan,
            None => return Ok(ResultEnvelope::failure(CLAN_NOT_FOUND)),
        };

        if clan.owner_avatar_id == avatar_id {
            return Ok(ResultEnvelope::failure(
                "The clan owner cannot be removed from the clan.",
            ));
        }

        if !self.is_member(clan_id, avatar_id).await? {
            return Ok(ResultEnvelope::success(false, "Avatar is not a member."));
        }

        sqlx::query("DELETE FROM clan_members WHERE clan_id = $1 AND avatar_id = $2")
            .bind(clan_id)
            .bind(avatar_id)
            .execute(&self.db_pool)
            .await?;

        Ok(ResultEnvelope::success(true, "Avatar removed from clan."))
    }

    async fn members(&self, clan_id: Uuid) -> ManagerResult<Vec<Uuid>> {
        if self.find_clan(clan_id).await?.is_none() {
            return Ok(ResultEnvelope::failure(CLAN_NOT_FOUND));
        }

        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT avatar_id FROM clan_members WHERE clan_id = $1 ORDER BY joined_at",
        )
        .bind(clan_id)
        .fetch_all(&self.db_pool)
        .await?;

        let members: Vec<Uuid> = rows.into_iter().map(|(id,)| id).collect();
        let message = format!("{} members loaded.", members.len());
        Ok(ResultEnvelope::success(members, message))
    }

    async fn inventory(&self, clan_id: Uuid) -> ManagerResult<Vec<InventoryItem>> {
        if self.find_clan(clan_id).await?.is_none() {
            return Ok(ResultEnvelope::failure(CLAN_NOT_FOUND));
        }

        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM clan_inventory_items WHERE clan_id = $1 ORDER BY added_at",
        )
        .bind(clan_id)
        .fetch_all(&self.db_pool)
        .await?;

        let message = format!("Clan inventory: {} items.", items.len());
        Ok(ResultEnvelope::success(items, message))
    }
}
