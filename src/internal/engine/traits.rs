pub mod native_downloader;

pub use native_downloader::{EngineError, NativeDownloader};
