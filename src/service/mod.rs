//! Persistence facade.
//!
//! [`PortalService`] is the only way the rest of the application touches
//! storage. Each call runs against exactly one backend: the remote store when
//! one was connected at startup, the local store otherwise. Export and import
//! are the exception and always use the local store.

mod result;

pub use result::*;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use crate::db::{
    BackendKind, BackendMode, DocumentStore, IncrementGuarantee, LocalStore, PortalBackend, RemoteStore,
    StoreError,
};
use crate::models::{
    default_rewards, DashboardStats, ExportSnapshot, ImportPayload, Intern, Reward,
};

pub struct PortalService {
    local: LocalStore,
    remote: Option<RemoteStore>,
}

impl PortalService {
    /// `remote` is the store resolved at startup; `None` selects local fallback.
    pub fn new(local: LocalStore, remote: Option<Arc<dyn DocumentStore>>) -> Self {
        Self {
            local,
            remote: remote.map(RemoteStore::new),
        }
    }

    pub fn mode(&self) -> BackendMode {
        match self.remote {
            Some(_) => BackendMode::Connected,
            None => BackendMode::LocalFallback,
        }
    }

    /// Consistency of `update_donations` on the active backend.
    pub fn increment_guarantee(&self) -> IncrementGuarantee {
        self.active().increment_guarantee()
    }

    fn active(&self) -> &dyn PortalBackend {
        match &self.remote {
            Some(remote) => remote,
            None => &self.local,
        }
    }

    fn failure<T>(backend: BackendKind, context: &str, err: StoreError) -> PersistenceResult<T> {
        tracing::error!(backend = backend.label(), "{}: {}", context, err);
        PersistenceResult::failure(ErrorKind::from(&err), context)
    }

    pub async fn save_intern(&self, intern: Intern) -> PersistenceResult<Intern> {
        let backend = self.active();
        match backend.save_intern(&intern).await {
            Ok(()) => {
                let message = format!("Intern saved to {}", backend.kind().label());
                PersistenceResult::ok_with_message(intern, message)
            }
            Err(e) => Self::failure(backend.kind(), "Failed to save intern", e),
        }
    }

    pub async fn get_interns(&self) -> PersistenceResult<Vec<Intern>> {
        match self.active().list_interns().await {
            Ok(interns) => PersistenceResult::ok(interns),
            Err(e) => Self::failure(self.active().kind(), "Failed to load interns", e),
        }
    }

    pub async fn get_intern(&self, id: i64) -> PersistenceResult<Intern> {
        match self.active().find_intern(id).await {
            Ok(intern) => PersistenceResult::ok(intern),
            Err(StoreError::NotFound(_)) => {
                PersistenceResult::failure(ErrorKind::NotFound, "Intern not found")
            }
            Err(e) => Self::failure(self.active().kind(), "Failed to load interns", e),
        }
    }

    /// Add a positive `amount` to one intern's donations.
    ///
    /// On the remote store this is an atomic per-document increment. On the
    /// local store it is load-add-save with no lock, so two concurrent calls
    /// may lose one of the updates. An unknown id fails and writes nothing.
    pub async fn update_donations(&self, id: i64, amount: i64) -> PersistenceResult<Intern> {
        if amount <= 0 {
            return PersistenceResult::failure(
                ErrorKind::InvalidInput,
                "Donation amount must be a positive number",
            );
        }

        let backend = self.active();
        match backend.increment_donations(id, amount).await {
            Ok(Some(intern)) => {
                tracing::debug!(id, amount, total = intern.donations_raised, "Donations updated");
                let message = format!("Donations updated in {}", backend.kind().label());
                PersistenceResult::ok_with_message(intern, message)
            }
            Ok(None) => PersistenceResult::failure(ErrorKind::NotFound, "Intern not found"),
            Err(e) => Self::failure(backend.kind(), "Failed to update donations", e),
        }
    }

    pub async fn save_rewards(&self, rewards: Vec<Reward>) -> PersistenceResult<Vec<Reward>> {
        let backend = self.active();
        match backend.save_rewards(&rewards).await {
            Ok(()) => {
                let message = format!("Rewards saved to {}", backend.kind().label());
                PersistenceResult::ok_with_message(rewards, message)
            }
            Err(e) => Self::failure(backend.kind(), "Failed to save rewards", e),
        }
    }

    pub async fn get_rewards(&self) -> PersistenceResult<Vec<Reward>> {
        match self.active().load_rewards().await {
            Ok(rewards) => PersistenceResult::ok(rewards),
            Err(e) => Self::failure(self.active().kind(), "Failed to load rewards", e),
        }
    }

    pub async fn dashboard(&self) -> PersistenceResult<DashboardStats> {
        self.get_interns()
            .await
            .map(|interns| DashboardStats::from_interns(&interns))
    }

    /// Snapshot of the local store.
    ///
    /// Always reads local storage, even when a remote store is connected, so
    /// the snapshot does not reflect remote state.
    pub async fn export_data(&self) -> PersistenceResult<ExportSnapshot> {
        let snapshot = async {
            Ok::<_, StoreError>(ExportSnapshot {
                interns: self.local.load_interns().await?,
                rewards: self.local.load_rewards().await?,
                exported_at: Utc::now(),
            })
        }
        .await;

        match snapshot {
            Ok(snapshot) => PersistenceResult::ok(snapshot),
            Err(e) => Self::failure(BackendKind::Local, "Failed to export data", e),
        }
    }

    /// Write [`Self::export_data`] as pretty JSON into `dir` and return the path.
    pub async fn export_to_dir(&self, dir: &Path) -> PersistenceResult<PathBuf> {
        let (snapshot, _) = match self.export_data().await.into_result() {
            Ok(exported) => exported,
            Err((kind, message)) => return PersistenceResult::failure(kind, message),
        };

        let path = dir.join(snapshot.file_name());
        let written = async {
            let json = serde_json::to_string_pretty(&snapshot)
                .map_err(|e| StoreError::InvalidInput(e.to_string()))?;
            tokio::fs::write(&path, json).await?;
            Ok::<_, StoreError>(())
        }
        .await;

        match written {
            Ok(()) => {
                tracing::info!("Exported data to {}", path.display());
                PersistenceResult::ok(path)
            }
            Err(e) => Self::failure(BackendKind::Local, "Failed to export data", e),
        }
    }

    /// Overwrite local collections from an exported JSON document.
    ///
    /// Only the collections present in the document are replaced. Writes go to
    /// local storage only; a connected remote store is never touched.
    pub async fn import_data(&self, bytes: &[u8]) -> PersistenceResult<()> {
        let payload: ImportPayload = match serde_json::from_slice(bytes) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Rejected import: {}", e);
                return PersistenceResult::failure(ErrorKind::InvalidInput, "Invalid JSON file");
            }
        };

        let imported = async {
            if let Some(interns) = &payload.interns {
                self.local.save_interns(interns).await?;
            }
            if let Some(rewards) = &payload.rewards {
                self.local.save_rewards(rewards).await?;
            }
            Ok::<_, StoreError>(())
        }
        .await;

        match imported {
            Ok(()) => PersistenceResult::ok_with_message((), "Data imported successfully"),
            Err(e) => Self::failure(BackendKind::Local, "Failed to import data", e),
        }
    }

    /// Read `path` and pass its contents to [`Self::import_data`].
    pub async fn import_file(&self, path: &Path) -> PersistenceResult<()> {
        match tokio::fs::read(path).await {
            Ok(bytes) => self.import_data(&bytes).await,
            Err(e) => {
                tracing::warn!("Cannot read import file {}: {}", path.display(), e);
                PersistenceResult::failure(ErrorKind::InvalidInput, "Unable to read import file")
            }
        }
    }
}

/// Save the default rewards catalog when the active backend has none.
///
/// Returns whether anything was written.
pub async fn seed_default_rewards(portal: &PortalService) -> PersistenceResult<bool> {
    let (existing, _) = match portal.get_rewards().await.into_result() {
        Ok(rewards) => rewards,
        Err((kind, message)) => return PersistenceResult::failure(kind, message),
    };
    if !existing.is_empty() {
        return PersistenceResult::ok(false);
    }

    tracing::info!("Seeding default rewards catalog");
    portal.save_rewards(default_rewards()).await.map(|_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_database, MemoryDocumentStore, INTERNS_KEY};
    use crate::models::default_interns;
    use tempfile::TempDir;

    async fn local_service() -> (PortalService, LocalStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("portal.sqlite"))
            .await
            .expect("Failed to init DB");
        let local = LocalStore::new(pool);
        (PortalService::new(local.clone(), None), local, temp_dir)
    }

    async fn connected_service() -> (PortalService, LocalStore, TempDir) {
        let (_, local, temp_dir) = local_service().await;
        let remote: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let service = PortalService::new(local.clone(), Some(remote));
        for intern in default_interns() {
            assert!(service.save_intern(intern).await.success);
        }
        (service, local, temp_dir)
    }

    fn sorted(mut interns: Vec<Intern>) -> Vec<Intern> {
        interns.sort_by_key(|i| i.id);
        interns
    }

    #[tokio::test]
    async fn test_mode_reflects_startup_selection() {
        let (local, _, _dir) = local_service().await;
        assert_eq!(local.mode(), BackendMode::LocalFallback);
        assert_eq!(local.increment_guarantee(), IncrementGuarantee::Unsynchronized);

        let (connected, _, _dir) = connected_service().await;
        assert_eq!(connected.mode(), BackendMode::Connected);
        assert_eq!(connected.increment_guarantee(), IncrementGuarantee::Atomic);
    }

    #[tokio::test]
    async fn test_get_interns_returns_last_saved_state() {
        let (service, _, _dir) = local_service().await;

        let mut intern = default_interns()[1].clone();
        intern.name = "Madhu K.".to_string();
        let saved = service.save_intern(intern.clone()).await;
        assert!(saved.success);
        assert_eq!(saved.message.as_deref(), Some("Intern saved to local storage"));

        let interns = service.get_interns().await.data.unwrap();
        assert_eq!(interns.len(), 5);
        assert_eq!(interns[1], intern);
    }

    #[tokio::test]
    async fn test_update_donations_local() {
        let (service, _, _dir) = local_service().await;

        let result = service.update_donations(3, 500).await;
        assert!(result.success);
        assert_eq!(result.data.unwrap().donations_raised, 10000);

        let interns = service.get_interns().await.data.unwrap();
        for (before, after) in default_interns().iter().zip(&interns) {
            if before.id != 3 {
                assert_eq!(before, after);
            }
        }
    }

    #[tokio::test]
    async fn test_update_donations_unknown_id_fails_without_mutation() {
        for (service, local, _dir) in [local_service().await, connected_service().await] {
            let before = sorted(service.get_interns().await.data.unwrap());

            let result = service.update_donations(404, 100).await;
            assert!(!result.success);
            assert_eq!(result.error, Some(ErrorKind::NotFound));
            assert_eq!(result.message.as_deref(), Some("Intern not found"));

            assert_eq!(sorted(service.get_interns().await.data.unwrap()), before);
            assert!(local.get_item(INTERNS_KEY).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_update_donations_overflow_fails_without_mutation() {
        for (service, _local, _dir) in [local_service().await, connected_service().await] {
            let before = sorted(service.get_interns().await.data.unwrap());

            let result = service.update_donations(1, i64::MAX).await;
            assert!(!result.success);
            assert_eq!(result.error, Some(ErrorKind::InvalidInput));
            assert_eq!(sorted(service.get_interns().await.data.unwrap()), before);

            // Near the limit the increment still succeeds and the dashboard
            // total saturates.
            let result = service.update_donations(1, i64::MAX - 18000).await;
            assert_eq!(result.data.unwrap().donations_raised, i64::MAX);
            let stats = service.dashboard().await.data.unwrap();
            assert_eq!(stats.total_donations, i64::MAX);
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_export_failure_is_logged_against_local_store() {
        let (service, local, _dir) = connected_service().await;
        local.set_item(INTERNS_KEY, "{broken").await.unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let result = service.export_data().await;
        assert_eq!(result.error, Some(ErrorKind::MalformedStoredData));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Failed to export data"));
        assert!(output.contains("local storage"));
        assert!(!output.contains("remote store"));
    }

    #[tokio::test]
    async fn test_update_donations_rejects_non_positive_amount() {
        let (service, _, _dir) = local_service().await;

        for amount in [0, -50] {
            let result = service.update_donations(1, amount).await;
            assert_eq!(result.error, Some(ErrorKind::InvalidInput));
        }
        let siya = service.get_intern(1).await.data.unwrap();
        assert_eq!(siya.donations_raised, 18000);
    }

    #[tokio::test]
    async fn test_connected_calls_never_touch_local_store() {
        let (service, local, _dir) = connected_service().await;

        assert!(service.update_donations(1, 2000).await.success);
        assert!(service.save_rewards(default_rewards()).await.success);

        assert_eq!(service.get_intern(1).await.data.unwrap().donations_raised, 20000);
        assert_eq!(service.get_rewards().await.data.unwrap().len(), 5);

        assert!(local.get_item(INTERNS_KEY).await.unwrap().is_none());
        assert!(local.load_rewards().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_reads_local_even_when_connected() {
        let (service, _, _dir) = connected_service().await;
        assert!(service.update_donations(1, 1000).await.success);

        let snapshot = service.export_data().await.data.unwrap();
        assert_eq!(snapshot.interns, default_interns());
        assert!(snapshot.rewards.is_empty());
    }

    #[tokio::test]
    async fn test_export_import_round_trip_through_file() {
        let (service, local, dir) = local_service().await;
        assert!(service.update_donations(5, 750).await.success);
        assert!(service.save_rewards(default_rewards()[..3].to_vec()).await.success);
        let exported_state = (local.load_interns().await.unwrap(), local.load_rewards().await.unwrap());

        let path = service.export_to_dir(dir.path()).await.data.unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("intern-portal-data-"));

        // Diverge, then restore from the file.
        assert!(service.update_donations(1, 99).await.success);
        assert!(service.save_rewards(Vec::new()).await.success);

        let imported = service.import_file(&path).await;
        assert!(imported.success);
        assert_eq!(imported.message.as_deref(), Some("Data imported successfully"));

        let restored = (local.load_interns().await.unwrap(), local.load_rewards().await.unwrap());
        assert_eq!(restored, exported_state);
    }

    #[tokio::test]
    async fn test_import_only_replaces_present_collections() {
        let (service, local, _dir) = local_service().await;
        assert!(service.save_rewards(default_rewards()).await.success);

        let result = service.import_data(br#"{"interns": []}"#).await;
        assert!(result.success);
        assert!(local.load_interns().await.unwrap().is_empty());
        assert_eq!(local.load_rewards().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_import_never_writes_remote() {
        let (service, local, _dir) = connected_service().await;

        let payload = serde_json::json!({ "interns": [], "rewards": default_rewards() });
        assert!(service.import_data(payload.to_string().as_bytes()).await.success);

        assert_eq!(service.get_interns().await.data.unwrap().len(), 5);
        assert!(service.get_rewards().await.data.unwrap().is_empty());
        assert_eq!(local.load_rewards().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_json() {
        let (service, local, _dir) = local_service().await;

        let result = service.import_data(b"not json at all").await;
        assert!(!result.success);
        assert_eq!(result.error, Some(ErrorKind::InvalidInput));
        assert_eq!(result.message.as_deref(), Some("Invalid JSON file"));
        assert!(local.get_item(INTERNS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_local_data_becomes_failure_result() {
        let (service, local, _dir) = local_service().await;
        local.set_item(INTERNS_KEY, "[{\"id\": \"oops\"").await.unwrap();

        let result = service.get_interns().await;
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error, Some(ErrorKind::MalformedStoredData));
        assert_eq!(result.message.as_deref(), Some("Failed to load interns"));
    }

    #[tokio::test]
    async fn test_seed_default_rewards_only_when_empty() {
        let (service, _, _dir) = local_service().await;

        assert_eq!(seed_default_rewards(&service).await.data, Some(true));
        assert_eq!(seed_default_rewards(&service).await.data, Some(false));
        assert_eq!(service.get_rewards().await.data.unwrap(), default_rewards());
    }

    #[tokio::test]
    async fn test_dashboard_over_default_roster() {
        let (service, _, _dir) = local_service().await;

        let stats = service.dashboard().await.data.unwrap();
        assert_eq!(stats.total_donations, 51500);
        assert_eq!(stats.total_interns, 5);
        assert_eq!(stats.avg_donations, 10300);
        assert_eq!(stats.top_performer.unwrap().name, "Siya Shrivastava");
    }
}
