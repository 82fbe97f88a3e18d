use std::fmt;

use serde::{Deserialize, Serialize};

/// 下载生命周期状态。
///
/// `Initialized`、`Started` 为入口状态；`Finished`、`Error`、`Cancelled` 为终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadState {
    Initialized,
    Started,
    Progressing,
    Finished,
    Error,
    Cancelled,
}

impl DownloadState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DownloadState::Finished | DownloadState::Error | DownloadState::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadState::Initialized => "initialized",
            DownloadState::Started => "started",
            DownloadState::Progressing => "progressing",
            DownloadState::Finished => "finished",
            DownloadState::Error => "error",
            DownloadState::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
