//! 监听扇出：保存订阅，并在每次变更后按订阅范围把通知分发出去。
//!
//! 同一次通知按订阅注册顺序依次回调。

use std::sync::Arc;

use tracing::trace;

use crate::internal::download::structs::DownloadRegistry;
use crate::internal::listeners::structs::download_update::DownloadUpdate;
use crate::internal::listeners::structs::subscription::{
    Subscription, SubscriptionHandle, SubscriptionScope, UpdateListenerOptions,
};
use crate::internal::listeners::traits::update_listener::UpdateListener;

#[derive(Default)]
pub struct ListenerHub {
    subscriptions: Vec<Subscription>,
    next_handle: u64,
}

impl std::fmt::Debug for ListenerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHub")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl ListenerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册订阅并按选项决定是否立即回调一次。
    pub fn subscribe(
        &mut self,
        listener: Arc<dyn UpdateListener>,
        options: UpdateListenerOptions,
        registry: &DownloadRegistry,
    ) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;

        let immediate = match &options.scope {
            SubscriptionScope::All => Some(DownloadUpdate::All(registry.all_labeled())),
            // 单 ID 记录不存在时不立即回调，避免被当成删除通知
            scope if options.notify_immediately => scope
                .first_id()
                .map(|id| build_update(scope, id, registry))
                .filter(|update| !update.is_deletion()),
            _ => None,
        };

        self.subscriptions.push(Subscription {
            handle,
            scope: options.scope,
            listener: Arc::clone(&listener),
        });

        if let Some(update) = immediate {
            listener.on_update(&update);
        }
        handle
    }

    /// 取消订阅；句柄不存在时返回 `false`。
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.handle != handle);
        self.subscriptions.len() != before
    }

    /// 某个 ID 发生变更后通知所有相关订阅。
    ///
    /// 返回被回调的订阅数量。
    pub fn notify(&self, download_id: &str, registry: &DownloadRegistry) -> usize {
        self.fan_out(std::slice::from_ref(&download_id), registry)
    }

    /// 批量载入后通知：每个订阅最多回调一次，按它关心的第一个变更 ID 计算内容。
    pub fn notify_many<S: AsRef<str>>(&self, download_ids: &[S], registry: &DownloadRegistry) -> usize {
        self.fan_out(download_ids, registry)
    }

    fn fan_out<S: AsRef<str>>(&self, download_ids: &[S], registry: &DownloadRegistry) -> usize {
        // 全量快照对所有全局订阅相同，只构建一次
        let mut snapshot: Option<DownloadUpdate> = None;
        let mut delivered = 0;

        for subscription in &self.subscriptions {
            let Some(download_id) = download_ids
                .iter()
                .map(|id| id.as_ref())
                .find(|id| subscription.scope.matches(id))
            else {
                continue;
            };
            let update = match &subscription.scope {
                SubscriptionScope::All => snapshot
                    .get_or_insert_with(|| DownloadUpdate::All(registry.all_labeled()))
                    .clone(),
                scope => build_update(scope, download_id, registry),
            };
            trace!(download_id, handle = subscription.handle.0, "回调监听者");
            subscription.listener.on_update(&update);
            delivered += 1;
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

fn build_update(
    scope: &SubscriptionScope,
    download_id: &str,
    registry: &DownloadRegistry,
) -> DownloadUpdate {
    match scope {
        SubscriptionScope::All => DownloadUpdate::All(registry.all_labeled()),
        SubscriptionScope::Single(id) => DownloadUpdate::Single {
            download_id: id.clone(),
            record: registry.get_one(download_id).cloned(),
        },
        SubscriptionScope::Many(ids) => DownloadUpdate::Many(registry.get_labeled(ids)),
    }
}
