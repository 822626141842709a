//! Local fallback store.
//!
//! A browser-style key/value store: each collection is one JSON string under a
//! fixed key. Nothing is indexed and nothing is locked.

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{Row, SqlitePool};

use super::{BackendKind, IncrementGuarantee, PortalBackend, StoreError, StoreResult};
use crate::models::{default_interns, Intern, Reward};

/// Key holding the serialized intern collection.
pub const INTERNS_KEY: &str = "internsData";
/// Key holding the serialized rewards collection.
pub const REWARDS_KEY: &str = "rewardsData";

#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Raw value stored under `key`, if any.
    pub async fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Overwrite the value stored under `key`.
    pub async fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Stored interns, or the default roster when nothing has been saved yet.
    /// Reading does not persist the defaults.
    pub async fn load_interns(&self) -> StoreResult<Vec<Intern>> {
        match self.get_item(INTERNS_KEY).await? {
            Some(raw) => parse_collection(INTERNS_KEY, &raw),
            None => Ok(default_interns()),
        }
    }

    pub async fn save_interns(&self, interns: &[Intern]) -> StoreResult<()> {
        self.set_collection(INTERNS_KEY, interns).await
    }

    /// Stored rewards, or an empty list. Unlike interns there is no default set.
    pub async fn load_rewards(&self) -> StoreResult<Vec<Reward>> {
        match self.get_item(REWARDS_KEY).await? {
            Some(raw) => parse_collection(REWARDS_KEY, &raw),
            None => Ok(Vec::new()),
        }
    }

    pub async fn save_rewards(&self, rewards: &[Reward]) -> StoreResult<()> {
        self.set_collection(REWARDS_KEY, rewards).await
    }

    async fn set_collection<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(items)
            .map_err(|e| StoreError::InvalidInput(format!("{}: {}", key, e)))?;
        self.set_item(key, &raw).await
    }
}

fn parse_collection<T: DeserializeOwned>(key: &str, raw: &str) -> StoreResult<Vec<T>> {
    serde_json::from_str(raw).map_err(|e| StoreError::MalformedData(format!("{}: {}", key, e)))
}

#[async_trait]
impl PortalBackend for LocalStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn increment_guarantee(&self) -> IncrementGuarantee {
        IncrementGuarantee::Unsynchronized
    }

    async fn save_intern(&self, intern: &Intern) -> StoreResult<()> {
        let mut interns = self.load_interns().await?;
        match interns.iter_mut().find(|i| i.id == intern.id) {
            Some(existing) => *existing = intern.clone(),
            None => interns.push(intern.clone()),
        }
        self.save_interns(&interns).await
    }

    async fn list_interns(&self) -> StoreResult<Vec<Intern>> {
        self.load_interns().await
    }

    async fn increment_donations(&self, id: i64, amount: i64) -> StoreResult<Option<Intern>> {
        let mut interns = self.load_interns().await?;
        let Some(intern) = interns.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };

        intern.donations_raised = intern
            .donations_raised
            .checked_add(amount)
            .ok_or_else(|| StoreError::InvalidInput(format!("donations for intern {} overflow", id)))?;
        intern.last_updated = Some(Utc::now().to_rfc3339());
        let updated = intern.clone();

        self.save_interns(&interns).await?;
        Ok(Some(updated))
    }

    async fn save_rewards(&self, rewards: &[Reward]) -> StoreResult<()> {
        LocalStore::save_rewards(self, rewards).await
    }

    async fn load_rewards(&self) -> StoreResult<Vec<Reward>> {
        LocalStore::load_rewards(self).await
    }
}
