//! The capability both persistence backends expose to the facade.

use async_trait::async_trait;
use serde::Serialize;

use super::{StoreError, StoreResult};
use crate::models::{Intern, Reward};

/// Which store answers a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Remote,
    Local,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Remote => "remote store",
            BackendKind::Local => "local storage",
        }
    }
}

/// Consistency of [`PortalBackend::increment_donations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncrementGuarantee {
    /// Read-modify-write is atomic per document; concurrent increments all land.
    Atomic,
    /// Load, add, save with no lock. Concurrent increments on the same
    /// collection can overwrite each other and lose an update.
    Unsynchronized,
}

#[async_trait]
pub trait PortalBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn increment_guarantee(&self) -> IncrementGuarantee;

    /// Insert or replace by id. Last write wins.
    async fn save_intern(&self, intern: &Intern) -> StoreResult<()>;

    /// Every intern in the collection, in no guaranteed order.
    async fn list_interns(&self) -> StoreResult<Vec<Intern>>;

    /// Look one intern up by scanning the collection.
    async fn find_intern(&self, id: i64) -> StoreResult<Intern> {
        self.list_interns()
            .await?
            .into_iter()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("intern {}", id)))
    }

    /// Add `amount` to an intern's donations and stamp `lastUpdated`.
    ///
    /// Returns the updated intern, or `None` without writing anything when the
    /// id is unknown.
    async fn increment_donations(&self, id: i64, amount: i64) -> StoreResult<Option<Intern>>;

    /// Replace the whole rewards collection.
    async fn save_rewards(&self, rewards: &[Reward]) -> StoreResult<()>;

    async fn load_rewards(&self) -> StoreResult<Vec<Reward>>;
}
