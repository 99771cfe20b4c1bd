//! Use Case Factory
//!
//! Creates the reconcile use case with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::ReconcileUseCase;
use crate::config::Config;
use crate::domain::ports::SyncEventSink;
use crate::infrastructure::{DirectoryEnricher, FsPagePublisher, SnapshotDirectory, TomlUserStore};

/// Type alias for the concrete ReconcileUseCase with all dependencies
pub type ConcreteReconcileUseCase<'a> = ReconcileUseCase<
    'a,
    SnapshotDirectory,
    SnapshotDirectory,
    &'a TomlUserStore,
    &'a TomlUserStore,
>;

/// File-backed adapters for one run
pub struct SyncServices {
    directory: Arc<SnapshotDirectory>,
    store: TomlUserStore,
    pages: FsPagePublisher,
}

impl SyncServices {
    pub fn from_config(config: &Config) -> Self {
        Self {
            directory: Arc::new(SnapshotDirectory::new()),
            store: TomlUserStore::new(config.store_path()),
            pages: FsPagePublisher::new(config.pages_dir()),
        }
    }

    pub fn store(&self) -> &TomlUserStore {
        &self.store
    }

    /// Reconcile use case over these adapters, with enrichment and user
    /// pages enabled
    pub fn reconcile_use_case(&self, events: Arc<dyn SyncEventSink>) -> ConcreteReconcileUseCase<'_> {
        ReconcileUseCase::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.directory),
            &self.store,
            &self.store,
        )
            .with_enrichment(Box::new(DirectoryEnricher::new(&self.directory, &self.store)))
            .with_page_publisher(Box::new(&self.pages))
            .with_event_sink(events)
    }
}
