//! 基于 JSON 文件的键值存储：每个租户一个文件，整体覆盖写入。
//!
//! 写入先落到同目录的临时文件，再 rename 覆盖目标文件，进程中途退出不会留下半截 JSON。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::internal::storage::structs::persistence_error::PersistenceError;
use crate::internal::storage::traits::key_value_store::KeyValueStore;

/// 默认数据目录下的子目录名
const DEFAULT_DIR_NAME: &str = "media_downloader";

type TenantItems = IndexMap<String, Value>;

#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    /// 已读入内存的租户，避免每次写入都重新解析文件
    cache: Mutex<HashMap<String, TenantItems>>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// 使用平台本地数据目录（如 `~/.local/share/media_downloader`）。
    pub fn in_default_dir() -> Result<Self, PersistenceError> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| PersistenceError::Unavailable("无法确定本地数据目录".to_string()))?;
        Ok(Self::new(base.join(DEFAULT_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn tenant_path(&self, tenant: &str) -> PathBuf {
        let file_name: String = tenant
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }

    /// 读入租户文件；整个文件无法解析时把它改名为 `*.json.corrupt` 留档，从空数据开始。
    async fn read_tenant(&self, tenant: &str) -> Result<TenantItems, PersistenceError> {
        let path = self.tenant_path(tenant);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TenantItems::new()),
            Err(e) => return Err(PersistenceError::Io(e)),
        };
        if bytes.is_empty() {
            return Ok(TenantItems::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(items) => Ok(items),
            Err(e) => {
                let aside = path.with_extension("json.corrupt");
                warn!(
                    path = %path.display(),
                    aside = %aside.display(),
                    error = %e,
                    "存储文件无法解析，已移到一旁并从空数据开始"
                );
                tokio::fs::rename(&path, &aside).await?;
                Ok(TenantItems::new())
            }
        }
    }

    async fn write_tenant(&self, tenant: &str, items: &TenantItems) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.tenant_path(tenant);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        debug!(path = %path.display(), entries = items.len(), "已写入存储文件");
        Ok(())
    }

    /// 在持有缓存锁的情况下修改某个租户并落盘。
    ///
    /// 修改先作用在副本上，落盘成功后才替换缓存，写入失败时缓存保持原样。
    async fn mutate<F>(&self, tenant: &str, mutation: F) -> Result<(), PersistenceError>
    where
        F: FnOnce(&mut TenantItems) -> bool,
    {
        let mut cache = self.cache.lock().await;
        if !cache.contains_key(tenant) {
            let items = self.read_tenant(tenant).await?;
            cache.insert(tenant.to_string(), items);
        }
        let Some(items) = cache.get_mut(tenant) else {
            return Ok(());
        };
        let mut next = items.clone();
        if mutation(&mut next) {
            self.write_tenant(tenant, &next).await?;
            *items = next;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn add_tenant(&self, tenant: &str) -> Result<(), PersistenceError> {
        self.mutate(tenant, |_| false).await
    }

    async fn get_all(&self, tenant: &str) -> Result<Vec<(String, Value)>, PersistenceError> {
        let mut cache = self.cache.lock().await;
        if !cache.contains_key(tenant) {
            let items = self.read_tenant(tenant).await?;
            cache.insert(tenant.to_string(), items);
        }
        Ok(cache
            .get(tenant)
            .map(|items| items.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn set_item(&self, tenant: &str, key: &str, value: Value) -> Result<(), PersistenceError> {
        self.mutate(tenant, |items| {
            items.insert(key.to_string(), value);
            true
        })
        .await
    }

    async fn remove_item(&self, tenant: &str, key: &str) -> Result<(), PersistenceError> {
        self.mutate(tenant, |items| items.shift_remove(key).is_some())
            .await
    }
}
