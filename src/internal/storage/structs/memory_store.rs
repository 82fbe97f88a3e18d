use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::internal::storage::structs::persistence_error::PersistenceError;
use crate::internal::storage::traits::key_value_store::KeyValueStore;

/// 进程内存储，进程退出即丢失。用于测试与不需要跨重启保留的会话。
#[derive(Debug, Default)]
pub struct MemoryStore {
    tenants: Mutex<HashMap<String, IndexMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接读取某个键，便于检查写入结果。
    pub async fn get_item(&self, tenant: &str, key: &str) -> Option<Value> {
        let tenants = self.tenants.lock().await;
        tenants.get(tenant).and_then(|items| items.get(key)).cloned()
    }

    pub async fn len(&self, tenant: &str) -> usize {
        let tenants = self.tenants.lock().await;
        tenants.get(tenant).map(IndexMap::len).unwrap_or(0)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn add_tenant(&self, tenant: &str) -> Result<(), PersistenceError> {
        let mut tenants = self.tenants.lock().await;
        tenants.entry(tenant.to_string()).or_default();
        Ok(())
    }

    async fn get_all(&self, tenant: &str) -> Result<Vec<(String, Value)>, PersistenceError> {
        let tenants = self.tenants.lock().await;
        Ok(tenants
            .get(tenant)
            .map(|items| {
                items
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_item(&self, tenant: &str, key: &str, value: Value) -> Result<(), PersistenceError> {
        let mut tenants = self.tenants.lock().await;
        tenants
            .entry(tenant.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, tenant: &str, key: &str) -> Result<(), PersistenceError> {
        let mut tenants = self.tenants.lock().await;
        if let Some(items) = tenants.get_mut(tenant) {
            items.shift_remove(key);
        }
        Ok(())
    }
}
