//! 持久化适配器：在 [`DownloadRecord`] 与存储中的 JSON 记录之间转换。
//!
//! 适配器从不持有记录，只做镜像；内存中的注册表始终是进程内的权威状态，
//! 写入失败不会回滚内存中的变更。

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::internal::download::structs::DownloadRecord;
use crate::internal::storage::structs::persistence_error::PersistenceError;
use crate::internal::storage::traits::key_value_store::KeyValueStore;

#[derive(Clone)]
pub struct DownloadPersistence {
    store: Arc<dyn KeyValueStore>,
    tenant: String,
}

impl std::fmt::Debug for DownloadPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadPersistence")
            .field("tenant", &self.tenant)
            .finish()
    }
}

impl DownloadPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>, tenant: impl Into<String>) -> Self {
        Self {
            store,
            tenant: tenant.into(),
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// 声明租户，首次使用存储前调用。
    pub async fn prepare(&self) -> Result<(), PersistenceError> {
        self.store.add_tenant(&self.tenant).await
    }

    /// 以 downloadID 为键写入（覆盖）记录。
    pub async fn save(&self, record: &DownloadRecord) -> Result<(), PersistenceError> {
        let value = serde_json::to_value(record)?;
        self.store
            .set_item(&self.tenant, &record.download_id, value)
            .await?;
        debug!(download_id = %record.download_id, state = %record.state, "已持久化下载记录");
        Ok(())
    }

    pub async fn remove(&self, download_id: &str) -> Result<(), PersistenceError> {
        self.store.remove_item(&self.tenant, download_id).await
    }

    /// 读出全部记录，损坏或违反状态不变量的条目会被跳过并记录警告。
    pub async fn load_all(&self) -> Result<IndexMap<String, DownloadRecord>, PersistenceError> {
        let entries = self.store.get_all(&self.tenant).await?;
        let mut records = IndexMap::with_capacity(entries.len());

        for (key, value) in entries {
            match decode_entry(&key, value) {
                Ok(record) => {
                    records.insert(key, record);
                }
                Err(e) => warn!(key = %key, error = %e, "跳过无法恢复的存储记录"),
            }
        }

        Ok(records)
    }
}

fn decode_entry(key: &str, value: serde_json::Value) -> Result<DownloadRecord, PersistenceError> {
    let record: DownloadRecord =
        serde_json::from_value(value).map_err(|e| PersistenceError::CorruptRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    if record.download_id != key {
        return Err(PersistenceError::CorruptRecord {
            key: key.to_string(),
            reason: format!("记录中的 downloadID 为 {}", record.download_id),
        });
    }

    record
        .validate()
        .map_err(|e| PersistenceError::CorruptRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    Ok(record)
}
