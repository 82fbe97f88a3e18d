use std::sync::Arc;

use crate::internal::listeners::traits::update_listener::UpdateListener;

/// 订阅句柄，取消订阅时使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub(crate) u64);

/// 订阅范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionScope {
    /// 全部下载
    All,
    /// 单个 ID，通知时给出未包装的单条记录
    Single(String),
    /// ID 集合，通知时给出标签化的匹配记录
    Many(Vec<String>),
}

impl SubscriptionScope {
    /// 某个 ID 的变更是否与本订阅相关。
    pub fn matches(&self, download_id: &str) -> bool {
        match self {
            SubscriptionScope::All => true,
            SubscriptionScope::Single(id) => id == download_id,
            SubscriptionScope::Many(ids) => ids.iter().any(|id| id == download_id),
        }
    }

    pub(crate) fn first_id(&self) -> Option<&str> {
        match self {
            SubscriptionScope::All => None,
            SubscriptionScope::Single(id) => Some(id),
            SubscriptionScope::Many(ids) => ids.first().map(String::as_str),
        }
    }
}

/// `add_update_listener` 的参数。
///
/// 全局订阅注册后会立即收到一次全量快照；限定范围的订阅只有设置了
/// `notify_immediately` 才会立即收到一次（以列表中第一个 ID 的当前状态计算）。
/// 单 ID 订阅的记录尚不存在时跳过这次立即回调，之后的 `Single { record: None }`
/// 只表示删除。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateListenerOptions {
    pub scope: SubscriptionScope,
    pub notify_immediately: bool,
}

impl UpdateListenerOptions {
    pub fn global() -> Self {
        Self {
            scope: SubscriptionScope::All,
            notify_immediately: true,
        }
    }

    pub fn single(download_id: impl Into<String>) -> Self {
        Self {
            scope: SubscriptionScope::Single(download_id.into()),
            notify_immediately: false,
        }
    }

    /// 多 ID 订阅；重复的 ID 会被去重，保留首次出现的顺序。
    pub fn many<I, S>(download_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        for id in download_ids {
            let id = id.into();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self {
            scope: SubscriptionScope::Many(ids),
            notify_immediately: false,
        }
    }

    pub fn notify_immediately(mut self) -> Self {
        self.notify_immediately = true;
        self
    }
}

impl Default for UpdateListenerOptions {
    fn default() -> Self {
        Self::global()
    }
}

pub(crate) struct Subscription {
    pub(crate) handle: SubscriptionHandle,
    pub(crate) scope: SubscriptionScope,
    pub(crate) listener: Arc<dyn UpdateListener>,
}
