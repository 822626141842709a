//! In-process document store.
//!
//! Behaves like a remote document database without a server. Selected with a
//! `memory://` remote URL and used throughout the tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError, StoreResult};

type Collection = BTreeMap<String, Map<String, Value>>;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn set_document(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        let Value::Object(fields) = document else {
            return Err(StoreError::InvalidInput(format!(
                "document {}/{} is not an object",
                collection, id
            )));
        };

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|fields| Value::Object(fields.clone())))
    }

    async fn list_documents(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| c.values().cloned().map(Value::Object).collect())
            .unwrap_or_default())
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        amount: i64,
        set: Map<String, Value>,
    ) -> StoreResult<Option<Value>> {
        // The write lock spans the read and the write.
        let mut collections = self.collections.write().await;
        let Some(fields) = collections.get_mut(collection).and_then(|c| c.get_mut(id)) else {
            return Ok(None);
        };

        let current = match fields.get(field) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_i64().ok_or_else(|| {
                StoreError::MalformedData(format!("{}/{}.{} is not an integer", collection, id, field))
            })?,
        };

        let total = current.checked_add(amount).ok_or_else(|| {
            StoreError::InvalidInput(format!("{}/{}.{} would overflow", collection, id, field))
        })?;
        fields.insert(field.to_string(), Value::from(total));
        fields.extend(set);

        Ok(Some(Value::Object(fields.clone())))
    }
}
