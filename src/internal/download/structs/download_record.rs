use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::download_error::RecordInvariantError;
use super::download_state::DownloadState;
use super::new_download::NewDownload;

/// 单个下载的完整记录：身份、配置与当前生命周期状态。
///
/// 序列化后的键名与存储中的记录结构一一对应（共 15 个字段，未设置的写 `null`），
/// 时间戳为毫秒级 Unix 时间。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    #[serde(rename = "downloadID")]
    pub download_id: String,
    #[serde(rename = "remoteURL")]
    pub remote_url: String,
    pub state: DownloadState,
    #[serde(rename = "bitRate", default)]
    pub bit_rate: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "assetArtworkURL", default)]
    pub asset_artwork_url: Option<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(rename = "localURL", default)]
    pub local_url: Option<String>,
    #[serde(rename = "fileSize", default)]
    pub file_size: Option<u64>,
    #[serde(rename = "errorType", default)]
    pub error_type: Option<String>,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
    #[serde(rename = "startedTimeStamp", default, with = "chrono::serde::ts_milliseconds_option")]
    pub started_time_stamp: Option<DateTime<Utc>>,
    #[serde(rename = "progressTimeStamp", default, with = "chrono::serde::ts_milliseconds_option")]
    pub progress_time_stamp: Option<DateTime<Utc>>,
    #[serde(rename = "finishedTimeStamp", default, with = "chrono::serde::ts_milliseconds_option")]
    pub finished_time_stamp: Option<DateTime<Utc>>,
    #[serde(rename = "erroredTimeStamp", default, with = "chrono::serde::ts_milliseconds_option")]
    pub errored_time_stamp: Option<DateTime<Utc>>,
}

impl DownloadRecord {
    /// 由创建参数生成一条 `initialized` 状态的新记录。
    pub fn from_request(request: NewDownload) -> Self {
        Self {
            download_id: request.download_id,
            remote_url: request.remote_url,
            state: DownloadState::Initialized,
            bit_rate: request.bit_rate,
            title: request.title,
            asset_artwork_url: request.asset_artwork_url,
            progress: 0.0,
            local_url: None,
            file_size: None,
            error_type: None,
            error_message: None,
            started_time_stamp: None,
            progress_time_stamp: None,
            finished_time_stamp: None,
            errored_time_stamp: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// 校验记录是否满足状态不变量；恢复存储数据时使用。
    pub fn validate(&self) -> Result<(), RecordInvariantError> {
        if self.download_id.is_empty() {
            return Err(RecordInvariantError::EmptyId);
        }
        if !(0.0..=1.0).contains(&self.progress) {
            return Err(RecordInvariantError::ProgressOutOfRange(self.progress));
        }
        match self.state {
            DownloadState::Finished
                if self.local_url.is_none() || self.file_size.is_none() =>
            {
                Err(RecordInvariantError::FinishedWithoutFile)
            }
            DownloadState::Error
                if self.error_type.is_none() || self.error_message.is_none() =>
            {
                Err(RecordInvariantError::ErrorWithoutDetail)
            }
            DownloadState::Cancelled => Err(RecordInvariantError::Cancelled),
            _ => Ok(()),
        }
    }
}
