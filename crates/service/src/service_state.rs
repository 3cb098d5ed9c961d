use blob_store::{BlobStore, BlobStoreError};

use crate::auth::SessionStore;
use crate::database::{Database, DatabaseSetupError};
use crate::pipeline::{JobDispatcher, JobReceiver};
use crate::service_config::Config;

/// Shared service state: explicitly constructed clients, cloned into every
/// handler and worker. No ambient globals.
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    blobs: BlobStore,
    sessions: SessionStore,
    jobs: JobDispatcher,
}

impl State {
    /// Build all clients from config. Returns the job receiver separately
    /// so the process layer can hand it to the pipeline workers.
    pub async fn from_config(config: &Config) -> Result<(Self, JobReceiver), StateSetupError> {
        let database = Database::connect(&config.database_url()?).await?;
        let blobs = BlobStore::new(&config.storage_dir).await?;
        let sessions = SessionStore::new(config.session_ttl);
        let (jobs, job_rx) = JobDispatcher::new();

        Ok((
            Self {
                database,
                blobs,
                sessions,
                jobs,
            },
            job_rx,
        ))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn jobs(&self) -> &JobDispatcher {
        &self.jobs
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to set up the database: {0}")]
    Database(#[from] DatabaseSetupError),

    #[error("failed to set up the blob volume: {0}")]
    Blobs(#[from] BlobStoreError),

    #[error("invalid database location: {0}")]
    DatabaseUrl(#[from] url::ParseError),
}
