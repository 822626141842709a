//! MongoDB document store driver.
//!
//! Each document is stored with its string id as `_id`; the field is stripped
//! again on the way out so callers only ever see their own JSON.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::{ClientOptions, ReturnDocument},
    Client, Collection, Database,
};
use serde_json::{Map, Value};

use super::{DocumentStore, StoreError, StoreResult};

pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    /// Build a client for `connection_string`. No traffic happens until the
    /// first operation; call [`DocumentStore::ping`] to verify reachability.
    pub async fn connect(connection_string: &str, database: &str) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(connection_string)
            .await
            .map_err(backend_error)?;
        options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(options).map_err(backend_error)?;

        Ok(Self {
            database: client.database(database),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

fn backend_error(err: mongodb::error::Error) -> StoreError {
    StoreError::BackendUnavailable(err.to_string())
}

fn to_document(id: &str, value: Value) -> StoreResult<Document> {
    let mut document =
        bson::to_document(&value).map_err(|e| StoreError::InvalidInput(e.to_string()))?;
    document.insert("_id", id);
    Ok(document)
}

fn from_document(mut document: Document) -> StoreResult<Value> {
    document.remove("_id");
    bson::from_document(document).map_err(|e| StoreError::MalformedData(e.to_string()))
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn backend_type(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn set_document(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        let document = to_document(id, document)?;
        self.collection(collection)
            .replace_one(doc! { "_id": id }, document)
            .upsert(true)
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.collection(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(backend_error)?
            .map(from_document)
            .transpose()
    }

    async fn list_documents(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let mut cursor = self
            .collection(collection)
            .find(doc! {})
            .await
            .map_err(backend_error)?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(backend_error)? {
            documents.push(from_document(document)?);
        }
        Ok(documents)
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        amount: i64,
        set: Map<String, Value>,
    ) -> StoreResult<Option<Value>> {
        // `$inc` treats a missing field as zero and is atomic on one document.
        let mut inc = Document::new();
        inc.insert(field, amount);

        let mut update = doc! { "$inc": inc };
        if !set.is_empty() {
            let set = bson::to_document(&Value::Object(set))
                .map_err(|e| StoreError::InvalidInput(e.to_string()))?;
            update.insert("$set", set);
        }

        self.collection(collection)
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(backend_error)?
            .map(from_document)
            .transpose()
    }
}
