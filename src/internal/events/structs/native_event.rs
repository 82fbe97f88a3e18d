//! 原生下载引擎上报的生命周期事件。
//!
//! 序列化格式与引擎桥接层保持一致：`event` 字段为事件名，其余为事件载荷。
//!
//! ```json
//! { "event": "onDownloadFinished", "downloadID": "d1", "downloadLocation": "/local/f.mp4", "size": 1024 }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum NativeEvent {
    #[serde(rename = "onDownloadStarted")]
    Started {
        #[serde(rename = "downloadID")]
        download_id: String,
    },

    #[serde(rename = "onDownloadProgress")]
    Progress {
        #[serde(rename = "downloadID")]
        download_id: String,
        #[serde(rename = "percentComplete")]
        percent_complete: f64,
    },

    #[serde(rename = "onDownloadFinished")]
    Finished {
        #[serde(rename = "downloadID")]
        download_id: String,
        #[serde(rename = "downloadLocation")]
        download_location: String,
        size: u64,
    },

    #[serde(rename = "onDownloadError")]
    Error {
        #[serde(rename = "downloadID")]
        download_id: String,
        #[serde(rename = "errorType")]
        error_type: String,
        error: String,
    },

    #[serde(rename = "onDownloadCancelled")]
    Cancelled {
        #[serde(rename = "downloadID")]
        download_id: String,
    },
}

impl NativeEvent {
    /// 由事件名与原始载荷构造事件（桥接层按事件名分发时使用）。
    pub fn from_native(name: &str, payload: Value) -> Result<Self, serde_json::Error> {
        // 非对象载荷按空对象处理，由反序列化报告缺失字段
        let mut fields = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        fields.insert("event".to_string(), Value::String(name.to_string()));
        serde_json::from_value(Value::Object(fields))
    }

    pub fn download_id(&self) -> &str {
        match self {
            NativeEvent::Started { download_id }
            | NativeEvent::Progress { download_id, .. }
            | NativeEvent::Finished { download_id, .. }
            | NativeEvent::Error { download_id, .. }
            | NativeEvent::Cancelled { download_id } => download_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NativeEvent::Started { .. } => "onDownloadStarted",
            NativeEvent::Progress { .. } => "onDownloadProgress",
            NativeEvent::Finished { .. } => "onDownloadFinished",
            NativeEvent::Error { .. } => "onDownloadError",
            NativeEvent::Cancelled { .. } => "onDownloadCancelled",
        }
    }
}
