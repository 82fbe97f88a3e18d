pub mod download_error;
pub mod download_record;
pub mod download_registry;
pub mod download_state;
pub mod labeled_download;
pub mod new_download;
pub mod transition_outcome;

pub use download_error::{DownloadManagerError, RecordInvariantError};
pub use download_record::DownloadRecord;
pub use download_registry::DownloadRegistry;
pub use download_state::DownloadState;
pub use labeled_download::LabeledDownload;
pub use new_download::NewDownload;
pub use transition_outcome::{IgnoreReason, TransitionOutcome};
