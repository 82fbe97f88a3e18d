//! 日志初始化：基于 `tracing-subscriber` 的 fmt 输出，过滤规则优先取 `RUST_LOG`。
//!
//! 库本身只通过 `tracing` 宏打日志，是否安装订阅者由宿主程序决定。

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("日志过滤规则无效: {0}")]
    InvalidDirective(String),

    #[error("全局日志订阅者已存在: {0}")]
    AlreadyInitialized(String),
}

/// 安装全局日志订阅者，`RUST_LOG` 未设置时使用 `default_directive`（如 `"media_downloader=info"`）。
///
/// 重复调用返回 [`LoggingError::AlreadyInitialized`]，不会 panic。
pub fn init_logging(default_directive: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| LoggingError::InvalidDirective(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
