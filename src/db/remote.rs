//! Remote store adapter.
//!
//! Maps portal records onto a collection-oriented document store: interns live
//! in the `interns` collection keyed by id, rewards in the single document
//! `rewards/all` as `{ "rewards": [...] }`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};

use super::{BackendKind, IncrementGuarantee, PortalBackend, StoreError, StoreResult};
use crate::models::{Intern, Reward};

pub const INTERNS_COLLECTION: &str = "interns";
pub const REWARDS_COLLECTION: &str = "rewards";
pub const REWARDS_DOCUMENT: &str = "all";

/// A document database driver.
///
/// Documents are JSON objects addressed by `(collection, id)`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Driver name for logs (e.g. "mongodb", "memory").
    fn backend_type(&self) -> &'static str;

    /// Round-trip to the server; used once at startup.
    async fn ping(&self) -> StoreResult<()>;

    /// Create or overwrite a document.
    async fn set_document(&self, collection: &str, id: &str, document: Value) -> StoreResult<()>;

    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Full scan of a collection.
    async fn list_documents(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// Atomically add `amount` to the integer `field` (absent counts as 0) and
    /// merge `set` into the same document.
    ///
    /// Returns the document after the update, or `None` when it does not exist,
    /// in which case nothing is written.
    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        amount: i64,
        set: Map<String, Value>,
    ) -> StoreResult<Option<Value>>;
}

/// [`PortalBackend`] over any [`DocumentStore`].
#[derive(Clone)]
pub struct RemoteStore {
    documents: Arc<dyn DocumentStore>,
}

impl RemoteStore {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

fn decode<T: serde::de::DeserializeOwned>(what: &str, value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::MalformedData(format!("{}: {}", what, e)))
}

#[async_trait]
impl PortalBackend for RemoteStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn increment_guarantee(&self) -> IncrementGuarantee {
        IncrementGuarantee::Atomic
    }

    async fn save_intern(&self, intern: &Intern) -> StoreResult<()> {
        let document = serde_json::to_value(intern)
            .map_err(|e| StoreError::InvalidInput(format!("intern {}: {}", intern.id, e)))?;
        self.documents
            .set_document(INTERNS_COLLECTION, &intern.id.to_string(), document)
            .await
    }

    async fn list_interns(&self) -> StoreResult<Vec<Intern>> {
        self.documents
            .list_documents(INTERNS_COLLECTION)
            .await?
            .into_iter()
            .map(|doc| decode(INTERNS_COLLECTION, doc))
            .collect()
    }

    async fn increment_donations(&self, id: i64, amount: i64) -> StoreResult<Option<Intern>> {
        let mut set = Map::new();
        set.insert("lastUpdated".to_string(), json!(Utc::now().to_rfc3339()));

        let updated = self
            .documents
            .increment_field(INTERNS_COLLECTION, &id.to_string(), "donationsRaised", amount, set)
            .await?;

        updated.map(|doc| decode(INTERNS_COLLECTION, doc)).transpose()
    }

    async fn save_rewards(&self, rewards: &[Reward]) -> StoreResult<()> {
        self.documents
            .set_document(REWARDS_COLLECTION, REWARDS_DOCUMENT, json!({ "rewards": rewards }))
            .await
    }

    async fn load_rewards(&self) -> StoreResult<Vec<Reward>> {
        let document = self
            .documents
            .get_document(REWARDS_COLLECTION, REWARDS_DOCUMENT)
            .await?;

        match document.and_then(|mut doc| doc.get_mut("rewards").map(Value::take)) {
            Some(rewards) => decode(REWARDS_COLLECTION, rewards),
            None => Ok(Vec::new()),
        }
    }
}
