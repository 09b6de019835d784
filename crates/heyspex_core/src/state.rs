//! Application state management.
//!
//! `AppState` owns the services every layout provider needs: the preference
//! store, the data directory, and the tokio runtime that runs deferred
//! persistence writes. It is an explicit owned object handed by reference to
//! whichever subsystem needs it — there are no ambient globals.

use crate::error::HeySpexError;
use crate::services::PreferenceStore;

use std::path::PathBuf;

/// Central application state.
pub struct AppState {
    /// Local preference storage
    storage: PreferenceStore,
    /// Application data directory
    data_dir: PathBuf,
    /// Tokio runtime for deferred persistence writes
    tokio_runtime: tokio::runtime::Runtime,
}

impl AppState {
    /// Create new application state.
    ///
    /// Uses the default data directory based on OS and build type.
    pub fn new() -> Result<Self, HeySpexError> {
        let data_dir = crate::services::storage::default_data_dir();
        Self::with_data_dir(data_dir)
    }

    /// Create application state with a custom data directory (for testing).
    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self, HeySpexError> {
        crate::services::storage::init_data_dir(&data_dir)?;

        let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| HeySpexError::internal(format!("Failed to create tokio runtime: {e}")))?;

        let storage = PreferenceStore::open(data_dir.clone())?;

        tracing::info!(data_dir = %data_dir.display(), "AppState initialized");

        Ok(Self { storage, data_dir, tokio_runtime })
    }

    /// Get the preference store.
    pub fn storage(&self) -> &PreferenceStore {
        &self.storage
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Get a handle to the tokio runtime.
    pub fn runtime(&self) -> &tokio::runtime::Runtime {
        &self.tokio_runtime
    }

    /// Spawn a future on the tokio runtime.
    pub fn spawn<F, T>(&self, future: F) -> tokio::task::JoinHandle<T>
    where
        F: std::future::Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.tokio_runtime.spawn(future)
    }

    /// Block on a future using the tokio runtime.
    ///
    /// Note: Avoid using this from the UI thread as it will block.
    pub fn block_on<F, T>(&self, future: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        self.tokio_runtime.block_on(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_initializes_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::with_data_dir(dir.path().to_path_buf()).expect("state");

        state.storage().set("sidebar-left-open", &json!(true)).unwrap();
        assert!(state.storage().get_bool_or("sidebar-left-open", false));
        assert_eq!(state.data_dir(), &dir.path().to_path_buf());
    }

    #[test]
    fn test_spawn_runs_on_runtime() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::with_data_dir(dir.path().to_path_buf()).expect("state");

        let handle = state.spawn(async { 2 + 2 });
        assert_eq!(state.block_on(handle).unwrap(), 4);
    }
}
