pub mod download_manager;
pub mod ingestion_phase;
pub mod manager_config;

pub use download_manager::DownloadManager;
pub use ingestion_phase::IngestionPhase;
pub use manager_config::{
    DEFAULT_STORAGE_TENANT, DownloadManagerConfig, ENV_MAX_SIMULTANEOUS, ENV_PERSIST_PROGRESS,
    ENV_PLATFORM, ENV_TENANT,
};
