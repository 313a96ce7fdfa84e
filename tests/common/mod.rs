//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{async_trait, body::Body, http::Request, Router};
use chrono::Utc;
use uuid::Uuid;

use oasis_api_gateway::app::create_app;
use oasis_api_gateway::envelope::ResultEnvelope;
use oasis_api_gateway::error::OperationError;
use oasis_api_gateway::executor::Executor;
use oasis_api_gateway::fallback::ToggleSwitch;
use oasis_api_gateway::managers::{ClanManager, ManagerResult, SettingsManager};
use oasis_api_gateway::models::{Clan, InventoryItem, SettingsMap};
use oasis_api_gateway::state::AppState;
use tower_http::cors::CorsLayer;

/// How the fake storage behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Online,
    ConnectionRefused,
    Timeout,
}

impl Storage {
    fn check(self) -> Result<(), OperationError> {
        match self {
            Storage::Online => Ok(()),
            Storage::ConnectionRefused => Err(OperationError::ConnectionRefused(
                "127.0.0.1:5432".to_string(),
            )),
            Storage::Timeout => Err(OperationError::Timeout("30s".to_string())),
        }
    }
}

/// In-memory clan manager that counts every call
pub struct FakeClanManager {
    storage: Storage,
    clans: Mutex<HashMap<Uuid, Clan>>,
    members: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    inventory: Mutex<HashMap<Uuid, Vec<InventoryItem>>>,
    load_empty: AtomicBool,
    calls: AtomicUsize,
}

impl FakeClanManager {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            clans: Mutex::new(HashMap::new()),
            members: Mutex::new(HashMap::new()),
            inventory: Mutex::new(HashMap::new()),
            load_empty: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make `load_clan` answer a success envelope without a clan
    pub fn set_load_empty(&self, empty: bool) {
        self.load_empty.store(empty, Ordering::SeqCst);
    }

    pub fn stock(&self, clan_id: Uuid, name: &str, quantity: i32) -> InventoryItem {
        let item = InventoryItem {
            id: Uuid::new_v4(),
            clan_id,
            name: name.to_string(),
            description: String::new(),
            quantity,
            added_at: Utc::now(),
        };
        self.inventory
            .lock()
            .unwrap()
            .entry(clan_id)
            .or_default()
            .push(item.clone());
        item
    }

    pub fn seed(&self, name: &str, owner: Uuid) -> Clan {
        let now = Utc::now();
        let clan = Clan {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            owner_avatar_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.clans.lock().unwrap().insert(clan.id, clan.clone());
        self.members.lock().unwrap().insert(clan.id, vec![owner]);
        clan
    }

    fn enter(&self) -> Result<(), OperationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.storage.check()
    }
}

#[async_trait]
impl ClanManager for FakeClanManager {
    async fn create_clan(
        &self,
        owner_avatar_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> ManagerResult<Clan> {
        self.enter()?;
        let taken = self
            .clans
            .lock()
            .unwrap()
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(name));
        if taken {
            return Ok(ResultEnvelope::failure("A clan with that name already exists."));
        }
        let mut clan = self.seed(name, owner_avatar_id);
        clan.description = description.unwrap_or_default().to_string();
        self.clans.lock().unwrap().insert(clan.id, clan.clone());
        Ok(ResultEnvelope::success(clan, "Clan created."))
    }

    async fn update_clan(
        &self,
        clan_id: Uuid,
        name: &str,
        description: &str,
    ) -> ManagerResult<Clan> {
        self.enter()?;
        let mut clans = self.clans.lock().unwrap();
        let taken = clans
            .values()
            .any(|c| c.id != clan_id && c.name.eq_ignore_ascii_case(name));
        if taken {
            return Ok(ResultEnvelope::failure("A clan with that name already exists."));
        }
        Ok(match clans.get_mut(&clan_id) {
            Some(clan) => {
                clan.name = name.to_string();
                clan.description = description.to_string();
                ResultEnvelope::success(clan.clone(), "Clan updated.")
            }
            None => ResultEnvelope::failure("Clan not found."),
        })
    }

    async fn load_clan(&self, clan_id: Uuid) -> ManagerResult<Clan> {
        self.enter()?;
        if self.load_empty.load(Ordering::SeqCst) {
            return Ok(ResultEnvelope::empty("Nothing loaded."));
        }
        Ok(match self.clans.lock().unwrap().get(&clan_id) {
            Some(clan) => ResultEnvelope::success(clan.clone(), "Clan loaded."),
            None => ResultEnvelope::failure("Clan not found."),
        })
    }

    async fn load_clan_by_name(&self, name: &str) -> ManagerResult<Clan> {
        self.enter()?;
        let clans = self.clans.lock().unwrap();
        Ok(match clans.values().find(|c| c.name.eq_ignore_ascii_case(name)) {
            Some(clan) => ResultEnvelope::success(clan.clone(), "Clan loaded."),
            None => ResultEnvelope::failure("Clan not found."),
        })
    }

    async fn list_clans(&self, owner_avatar_id: Option<Uuid>) -> ManagerResult<Vec<Clan>> {
        self.enter()?;
        let clans: Vec<Clan> = self
            .clans
            .lock()
            .unwrap()
            .values()
            .filter(|c| owner_avatar_id.map_or(true, |o| c.owner_avatar_id == o))
            .cloned()
            .collect();
        let message = format!("{} clans loaded.", clans.len());
        Ok(ResultEnvelope::success(clans, message))
    }

    async fn delete_clan(&self, clan_id: Uuid) -> ManagerResult<bool> {
        self.enter()?;
        Ok(match self.clans.lock().unwrap().remove(&clan_id) {
            Some(_) => ResultEnvelope::success(true, "Clan deleted."),
            None => ResultEnvelope::failure("Clan not found."),
        })
    }

    async fn add_member(&self, clan_id: Uuid, avatar_id: Uuid) -> ManagerResult<bool> {
        self.enter()?;
        let mut members = self.members.lock().unwrap();
        let Some(list) = members.get_mut(&clan_id) else {
            return Ok(ResultEnvelope::failure("Clan not found."));
        };
        if list.contains(&avatar_id) {
            return Ok(ResultEnvelope::success(true, "Avatar is already a member."));
        }
        list.push(avatar_id);
        Ok(ResultEnvelope::success(true, "Avatar added to clan."))
    }

    async fn remove_member(&self, clan_id: Uuid, avatar_id: Uuid) -> ManagerResult<bool> {
        self.enter()?;
        let owner = match self.clans.lock().unwrap().get(&clan_id) {
            Some(clan) => clan.owner_avatar_id,
            None => return Ok(ResultEnvelope::failure("Clan not found.")),
        };
        if owner == avatar_id {
            return Ok(ResultEnvelope::failure(
                "The clan owner cannot be removed from the clan.",
            ));
        }
        let mut members = self.members.lock().unwrap();
        let list = members.entry(clan_id).or_default();
        if !list.contains(&avatar_id) {
            return Ok(ResultEnvelope::success(false, "Avatar is not a member."));
        }
        list.retain(|id| *id != avatar_id);
        Ok(ResultEnvelope::success(true, "Avatar removed from clan."))
    }

    async fn members(&self, clan_id: Uuid) -> ManagerResult<Vec<Uuid>> {
        self.enter()?;
        Ok(match self.members.lock().unwrap().get(&clan_id) {
            Some(list) => ResultEnvelope::success(list.clone(), "Members loaded."),
            None => ResultEnvelope::failure("Clan not found."),
        })
    }

    async fn inventory(&self, clan_id: Uuid) -> ManagerResult<Vec<InventoryItem>> {
        self.enter()?;
        if !self.clans.lock().unwrap().contains_key(&clan_id) {
            return Ok(ResultEnvelope::failure("Clan not found."));
        }
        let items = self
            .inventory
            .lock()
            .unwrap()
            .get(&clan_id)
            .cloned()
            .unwrap_or_default();
        let message = format!("Clan inventory: {} items.", items.len());
        Ok(ResultEnvelope::success(items, message))
    }
}

/// In-memory settings manager
pub struct FakeSettingsManager {
    storage: Storage,
    settings: Mutex<HashMap<(Uuid, String), SettingsMap>>,
    calls: AtomicUsize,
}

impl FakeSettingsManager {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            settings: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), OperationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.storage.check()
    }
}

#[async_trait]
impl SettingsManager for FakeSettingsManager {
    async fn all_settings(&self, avatar_id: Uuid) -> ManagerResult<SettingsMap> {
        self.enter()?;
        let all: SettingsMap = self
            .settings
            .lock()
            .unwrap()
            .iter()
            .filter(|((id, _), _)| *id == avatar_id)
            .map(|((_, category), values)| {
                (category.clone(), serde_json::Value::Object(values.clone()))
            })
            .collect();
        if all.is_empty() {
            return Ok(ResultEnvelope::empty("No settings found for avatar."));
        }
        Ok(ResultEnvelope::success(all, "Settings retrieved successfully"))
    }

    async fn category_settings(
        &self,
        avatar_id: Uuid,
        category: &str,
    ) -> ManagerResult<SettingsMap> {
        self.enter()?;
        Ok(
            match self
                .settings
                .lock()
                .unwrap()
                .get(&(avatar_id, category.to_string()))
            {
                Some(values) => ResultEnvelope::success(values.clone(), "Settings loaded."),
                None => ResultEnvelope::empty("No settings found for avatar."),
            },
        )
    }

    async fn replace_category_settings(
        &self,
        avatar_id: Uuid,
        category: &str,
        settings: SettingsMap,
    ) -> ManagerResult<bool> {
        self.enter()?;
        self.settings
            .lock()
            .unwrap()
            .insert((avatar_id, category.to_string()), settings);
        Ok(ResultEnvelope::success(true, "Settings updated."))
    }
}

/// Router plus handles on its fakes
pub struct TestApp {
    pub router: Router,
    pub clans: Arc<FakeClanManager>,
    pub settings: Arc<FakeSettingsManager>,
    pub switch: Arc<ToggleSwitch>,
}

pub fn test_app(storage: Storage, test_data: bool) -> TestApp {
    test_app_with_terms(storage, test_data, None)
}

pub fn test_app_with_terms(storage: Storage, test_data: bool, terms: Option<&str>) -> TestApp {
    let clans = Arc::new(FakeClanManager::new(storage));
    let settings = Arc::new(FakeSettingsManager::new(storage));
    let switch = Arc::new(ToggleSwitch::new(test_data));

    let state = AppState::new(
        Executor::new(switch.clone()),
        clans.clone(),
        settings.clone(),
    )
    .with_terms(terms.map(str::to_string));

    TestApp {
        router: create_app(state, CorsLayer::permissive()),
        clans,
        settings,
        switch,
    }
}

pub fn request(method: &str, uri: &str, avatar: Option<Uuid>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(avatar) = avatar {
        builder = builder.header("x-avatar-id", avatar.to_string());
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
