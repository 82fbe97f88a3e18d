use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("存储读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("存储不可用: {0}")]
    Unavailable(String),

    #[error("存储中的记录 {key} 已损坏: {reason}")]
    CorruptRecord { key: String, reason: String },
}
