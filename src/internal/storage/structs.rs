pub mod download_persistence;
pub mod json_file_store;
pub mod memory_store;
pub mod persistence_error;

pub use download_persistence::DownloadPersistence;
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use persistence_error::PersistenceError;
