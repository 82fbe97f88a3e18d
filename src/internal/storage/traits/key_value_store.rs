//! 持久化存储接口：多租户的键值存储，值为不透明的 JSON。
//!
//! 存储引擎的内部格式不在本库约束范围内，本库只约定写入和读出的记录结构。

use async_trait::async_trait;
use serde_json::Value;

use crate::internal::storage::structs::persistence_error::PersistenceError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 声明一个租户（命名空间），重复声明为空操作。
    async fn add_tenant(&self, tenant: &str) -> Result<(), PersistenceError>;

    /// 读取租户下全部键值对。
    async fn get_all(&self, tenant: &str) -> Result<Vec<(String, Value)>, PersistenceError>;

    /// 写入（覆盖）一个键。
    async fn set_item(&self, tenant: &str, key: &str, value: Value) -> Result<(), PersistenceError>;

    /// 删除一个键，不存在时为空操作。
    async fn remove_item(&self, tenant: &str, key: &str) -> Result<(), PersistenceError>;
}
