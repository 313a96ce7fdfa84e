//! Business collaborators behind the controllers
//!
//! Controllers never talk to storage directly. They hold trait objects for
//! the managers below and hand their calls to the executor; every method
//! reports business outcomes inside the envelope and infrastructure trouble
//! as an [`OperationError`].

use axum::async_trait;
use uuid::Uuid;

use crate::envelope::ResultEnvelope;
use crate::error::OperationError;
use crate::models::{Clan, InventoryItem, SettingsMap};

mod clan;
mod settings;

pub use clan::PgClanManager;
pub use settings::{
    PgSettingsManager, HYPERDRIVE_CATEGORY, NOTIFICATION_CATEGORY, PRIVACY_CATEGORY,
    SUBSCRIPTION_CATEGORY, SYSTEM_CATEGORY,
};

/// Shorthand for what every manager call returns
pub type ManagerResult<T> = Result<ResultEnvelope<T>, OperationError>;

/// Clan management
#[async_trait]
pub trait ClanManager: Send + Sync {
    /// Create a clan; the owner becomes its first member.
    async fn create_clan(
        &self,
        owner_avatar_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> ManagerResult<Clan>;

    async fn update_clan(
        &self,
        clan_id: Uuid,
        name: &str,
        description: &str,
    ) -> ManagerResult<Clan>;

    async fn load_clan(&self, clan_id: Uuid) -> ManagerResult<Clan>;

    /// Case-insensitive lookup
    async fn load_clan_by_name(&self, name: &str) -> ManagerResult<Clan>;

    async fn list_clans(&self, owner_avatar_id: Option<Uuid>) -> ManagerResult<Vec<Clan>>;

    async fn delete_clan(&self, clan_id: Uuid) -> ManagerResult<bool>;

    async fn add_member(&self, clan_id: Uuid, avatar_id: Uuid) -> ManagerResult<bool>;

    /// The owner cannot be removed.
    async fn remove_member(&self, clan_id: Uuid, avatar_id: Uuid) -> ManagerResult<bool>;

    async fn members(&self, clan_id: Uuid) -> ManagerResult<Vec<Uuid>>;

    /// Treasury items; "Clan not found." when the clan does not exist.
    async fn inventory(&self, clan_id: Uuid) -> ManagerResult<Vec<InventoryItem>>;
}

/// Per-avatar settings
#[async_trait]
pub trait SettingsManager: Send + Sync {
    /// All categories merged into one document keyed by category
    async fn all_settings(&self, avatar_id: Uuid) -> ManagerResult<SettingsMap>;

    async fn category_settings(&self, avatar_id: Uuid, category: &str)
        -> ManagerResult<SettingsMap>;

    async fn replace_category_settings(
        &self,
        avatar_id: Uuid,
        category: &str,
        settings: SettingsMap,
    ) -> ManagerResult<bool>;
}
