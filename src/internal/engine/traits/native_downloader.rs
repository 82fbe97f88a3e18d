//! 原生下载引擎接口：真正的网络传输由平台实现，本库只通过该 trait 下发命令。
//!
//! 引擎的生命周期事件经 [`NativeEventSender`](crate::events::NativeEventSender) 回送。

use async_trait::async_trait;
use thiserror::Error;

use crate::internal::download::structs::DownloadRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("引擎拒绝了命令: {0}")]
    Rejected(String),

    #[error("引擎不可用: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait NativeDownloader: Send + Sync {
    /// 让引擎重新挂接上次进程退出时仍在进行中的传输。
    async fn restore(&self) -> Result<(), EngineError>;

    async fn set_max_simultaneous_downloads(&self, max: u32) -> Result<(), EngineError>;

    /// 开始下载一条刚创建的记录。
    async fn start_download(&self, record: &DownloadRecord) -> Result<(), EngineError>;

    /// 删除下载的本地资源，未知 ID 应视为成功。
    async fn delete_download(&self, download_id: &str) -> Result<(), EngineError> {
        let _ = download_id;
        Ok(())
    }
}
