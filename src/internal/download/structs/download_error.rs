//! 下载管理相关错误类型。

use thiserror::Error;

use crate::internal::engine::traits::native_downloader::EngineError;
use crate::internal::storage::structs::persistence_error::PersistenceError;

#[derive(Debug, Error)]
pub enum DownloadManagerError {
    #[error("下载已存在: {0}")]
    DuplicateId(String),

    #[error("参数不合法: {0}")]
    InvalidArgument(String),

    #[error("持久化失败: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("原生下载引擎调用失败: {0}")]
    Engine(#[from] EngineError),
}

/// 下载记录违反了状态不变量（一般出现在恢复被篡改或旧版本写入的存储数据时）。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordInvariantError {
    #[error("downloadID 为空")]
    EmptyId,

    #[error("进度超出 [0, 1]: {0}")]
    ProgressOutOfRange(f64),

    #[error("已完成的下载缺少 localURL 或 fileSize")]
    FinishedWithoutFile,

    #[error("出错的下载缺少 errorType 或 errorMessage")]
    ErrorWithoutDetail,

    #[error("已取消的下载不应被持久化")]
    Cancelled,
}
