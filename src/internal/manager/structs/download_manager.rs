//! 下载管理器：注册表的唯一持有者。
//!
//! 所有变更（创建、状态迁移、删除）都在注册表锁内按「变更 → 持久化 → 通知」顺序完成，
//! 同一 ID 的下一个事件一定看到上一个事件写入后的记录。
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use media_downloader::download::NewDownload;
//! use media_downloader::events::EventIngestion;
//! use media_downloader::listeners::UpdateListenerOptions;
//! use media_downloader::manager::{DownloadManager, DownloadManagerConfig};
//! use media_downloader::storage::JsonFileStore;
//! # use media_downloader::engine::NativeDownloader;
//!
//! # async fn example(engine: Arc<dyn NativeDownloader>) -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(JsonFileStore::in_default_dir()?);
//! let manager = Arc::new(DownloadManager::new(DownloadManagerConfig::default(), store, engine));
//!
//! let (sender, ingestion) = EventIngestion::new(Arc::clone(&manager));
//! let worker = ingestion.spawn();
//! // sender 交给原生引擎的事件桥接层
//!
//! manager.restore_media_downloader().await?;
//! manager.add_update_listener_fn(|update| println!("{update:?}"), UpdateListenerOptions::global()).await;
//! manager.create_new_download(NewDownload::new("http://x/f.mp4", "d1").bit_rate(128)).await?;
//! # drop(sender); worker.await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::internal::download::structs::{
    DownloadManagerError, DownloadRecord, DownloadRegistry, DownloadState, IgnoreReason,
    LabeledDownload, NewDownload, TransitionOutcome,
};
use crate::internal::engine::traits::native_downloader::NativeDownloader;
use crate::internal::events::structs::NativeEvent;
use crate::internal::listeners::structs::listener_adapters::FnUpdateListener;
use crate::internal::listeners::structs::{
    DownloadUpdate, ListenerHub, SubscriptionHandle, UpdateListenerOptions,
};
use crate::internal::listeners::traits::update_listener::UpdateListener;
use crate::internal::manager::structs::ingestion_phase::IngestionPhase;
use crate::internal::manager::structs::manager_config::DownloadManagerConfig;
use crate::internal::states::lock_reactive::LockReactiveProperty;
use crate::internal::states::reactive_core::{PropertyWatcher, ReactivePropertyError, ReactiveProperty};
use crate::internal::storage::structs::download_persistence::DownloadPersistence;
use crate::internal::storage::traits::key_value_store::KeyValueStore;

pub struct DownloadManager {
    config: DownloadManagerConfig,
    registry: Mutex<DownloadRegistry>,
    listeners: Mutex<ListenerHub>,
    persistence: DownloadPersistence,
    engine: Arc<dyn NativeDownloader>,
    phase: LockReactiveProperty<IngestionPhase>,
    /// 全量记录快照，每次变更后刷新，供异步消费者 watch
    snapshot: ReactiveProperty<Vec<DownloadRecord>>,
}

impl std::fmt::Debug for DownloadManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadManager")
            .field("config", &self.config)
            .field("persistence", &self.persistence)
            .finish()
    }
}

/// 构造与恢复
impl DownloadManager {
    pub fn new(
        config: DownloadManagerConfig,
        store: Arc<dyn KeyValueStore>,
        engine: Arc<dyn NativeDownloader>,
    ) -> Self {
        let initial_phase = if config.wait_for_restore {
            IngestionPhase::AwaitingRestore
        } else {
            IngestionPhase::Ready
        };

        Self {
            persistence: DownloadPersistence::new(store, config.storage_tenant.clone()),
            config,
            registry: Mutex::new(DownloadRegistry::new()),
            listeners: Mutex::new(ListenerHub::new()),
            engine,
            phase: LockReactiveProperty::new(initial_phase),
            snapshot: ReactiveProperty::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &DownloadManagerConfig {
        &self.config
    }

    /// 进程启动时调用一次：让引擎重新挂接后台传输（仅支持的平台），
    /// 再把存储中的记录载入内存，完成后放行事件消费。
    ///
    /// 返回本次载入的 downloadID。
    pub async fn restore_media_downloader(&self) -> Result<Vec<String>, DownloadManagerError> {
        if self.config.platform.supports_native_restore() {
            if let Err(e) = self.engine.restore().await {
                warn!(error = %e, "原生引擎恢复失败，继续载入已持久化的记录");
            }
        }

        self.persistence.prepare().await?;
        let stored = self.persistence.load_all().await?;

        let restored = {
            let mut registry = self.registry.lock().await;
            let restored = registry.restore(stored.into_values());
            self.snapshot.update(registry.all());
            if !restored.is_empty() {
                let listeners = self.listeners.lock().await;
                listeners.notify_many(&restored, &registry);
            }
            restored
        };
        info!(count = restored.len(), tenant = self.persistence.tenant(), "下载记录恢复完成");

        if matches!(self.phase.get_current().await, Ok(IngestionPhase::AwaitingRestore)) {
            let _ = self.phase.update(IngestionPhase::Ready).await;
        }

        if let Some(max) = self.config.max_simultaneous_downloads {
            if let Err(e) = self.set_max_simultaneous_downloads(max).await {
                warn!(max, error = %e, "设置最大并发下载数失败");
            }
        }

        Ok(restored)
    }

    /// 设置引擎的最大并发下载数；不支持的平台上只做校验。
    pub async fn set_max_simultaneous_downloads(&self, max: u32) -> Result<(), DownloadManagerError> {
        if max == 0 {
            return Err(DownloadManagerError::InvalidArgument(
                "maxSimultaneousDownloads 必须大于 0".to_string(),
            ));
        }
        if !self.config.platform.supports_simultaneous_limit() {
            debug!(max, platform = ?self.config.platform, "当前平台不支持设置并发数，忽略");
            return Ok(());
        }
        self.engine.set_max_simultaneous_downloads(max).await?;
        info!(max, "已设置最大并发下载数");
        Ok(())
    }

    /// 桥接层入口：值必须是正整数，否则返回 `InvalidArgument`。
    pub async fn set_max_simultaneous_downloads_value(&self, value: &Value) -> Result<(), DownloadManagerError> {
        // 3.0 这类没有小数部分的浮点数也接受
        let max = value
            .as_u64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(n))
                    .map(|n| n as u64)
            })
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                DownloadManagerError::InvalidArgument(format!(
                    "maxSimultaneousDownloads 应为整数，收到 {value}"
                ))
            })?;
        self.set_max_simultaneous_downloads(max).await
    }
}

/// 创建、删除与查询
impl DownloadManager {
    /// 创建新下载：注册、持久化、通知，然后让引擎开始传输。
    ///
    /// ID 重复时返回 `DuplicateId`，已有记录不受影响。持久化或引擎调用失败时
    /// 返回对应错误，但记录已注册并保持 `initialized`，可通过 `delete_downloaded` 清理。
    pub async fn create_new_download(&self, request: NewDownload) -> Result<DownloadRecord, DownloadManagerError> {
        if request.download_id.is_empty() {
            return Err(DownloadManagerError::InvalidArgument("downloadID 不能为空".to_string()));
        }

        let (record, persisted) = {
            let mut registry = self.registry.lock().await;
            let record = registry.create(request)?.clone();
            let persisted = self.persistence.save(&record).await;
            self.publish(&record.download_id, &registry).await;
            (record, persisted)
        };
        info!(download_id = %record.download_id, url = %record.remote_url, "已创建下载");

        if let Err(e) = &persisted {
            warn!(download_id = %record.download_id, error = %e, "新下载持久化失败");
        }
        let started = self.engine.start_download(&record).await;

        persisted?;
        started?;
        Ok(record)
    }

    /// 删除下载及其持久化副本；ID 不存在时为空操作。
    pub async fn delete_downloaded(&self, download_id: &str) -> Result<(), DownloadManagerError> {
        let (removed, persisted) = {
            let mut registry = self.registry.lock().await;
            let removed = registry.remove(download_id);
            let persisted = self.persistence.remove(download_id).await;
            if removed.is_some() {
                self.publish(download_id, &registry).await;
            }
            (removed, persisted)
        };

        if removed.is_some() {
            info!(download_id, "已删除下载");
            if let Err(e) = self.engine.delete_download(download_id).await {
                warn!(download_id, error = %e, "原生引擎删除资源失败");
            }
        }

        persisted.map_err(Into::into)
    }

    /// 按 ID 精确查询，结果可能为空。
    pub async fn get_download<S: AsRef<str>>(&self, ids: &[S]) -> Vec<DownloadRecord> {
        let registry = self.registry.lock().await;
        registry.get(ids).into_iter().cloned().collect()
    }

    pub async fn get_single_download(&self, download_id: &str) -> Option<DownloadRecord> {
        let registry = self.registry.lock().await;
        registry.get_one(download_id).cloned()
    }

    /// 与 [`get_download`](Self::get_download) 相同，但以 `{label, value}` 形式返回。
    pub async fn get_labeled_downloads<S: AsRef<str>>(&self, ids: &[S]) -> Vec<LabeledDownload> {
        let registry = self.registry.lock().await;
        registry.get_labeled(ids)
    }

    pub async fn all_downloads(&self) -> Vec<DownloadRecord> {
        let registry = self.registry.lock().await;
        registry.all()
    }

    /// 是否正在跟踪该下载（不论是否已完成）。
    pub async fn is_downloaded(&self, download_id: &str) -> bool {
        let registry = self.registry.lock().await;
        registry.exists(download_id)
    }

    /// 监听全量记录快照的变化。
    pub fn watch_downloads(&self) -> PropertyWatcher<Vec<DownloadRecord>> {
        self.snapshot.watch()
    }
}

/// 监听订阅
impl DownloadManager {
    pub async fn add_update_listener(
        &self,
        listener: Arc<dyn UpdateListener>,
        options: UpdateListenerOptions,
    ) -> SubscriptionHandle {
        let registry = self.registry.lock().await;
        let mut listeners = self.listeners.lock().await;
        listeners.subscribe(listener, options, &registry)
    }

    pub async fn add_update_listener_fn<F>(&self, f: F, options: UpdateListenerOptions) -> SubscriptionHandle
    where
        F: Fn(&DownloadUpdate) + Send + Sync + 'static,
    {
        self.add_update_listener(Arc::new(FnUpdateListener(f)), options)
            .await
    }

    /// 取消订阅；句柄已失效时返回 `false`。
    pub async fn remove_update_listener(&self, handle: SubscriptionHandle) -> bool {
        let mut listeners = self.listeners.lock().await;
        listeners.unsubscribe(handle)
    }

    async fn publish(&self, download_id: &str, registry: &DownloadRegistry) {
        self.snapshot.update(registry.all());
        let listeners = self.listeners.lock().await;
        listeners.notify(download_id, registry);
    }
}

/// 事件处理
impl DownloadManager {
    /// 把一个原生引擎事件作用到对应记录上。
    ///
    /// 未知 ID 与不符合状态图的事件返回 `Ignored`，不视为错误。持久化失败时
    /// 内存状态与通知照常生效，再返回 `Persistence` 错误。
    pub async fn handle_event(&self, event: &NativeEvent) -> Result<TransitionOutcome, DownloadManagerError> {
        let download_id = event.download_id();
        let mut registry = self.registry.lock().await;

        let (outcome, snapshot) = match registry.get_mut(download_id) {
            Some(record) => {
                let outcome = record.apply_event(event, Utc::now());
                (outcome, record.clone())
            }
            None => {
                debug!(download_id, event = event.name(), "未知的下载，丢弃事件");
                return Ok(TransitionOutcome::Ignored(IgnoreReason::UnknownDownloadId));
            }
        };

        let persisted = match outcome {
            TransitionOutcome::Ignored(_) => return Ok(outcome),
            TransitionOutcome::Removed => {
                registry.remove(download_id);
                info!(download_id, "下载已取消");
                self.persistence.remove(download_id).await
            }
            TransitionOutcome::Applied(DownloadState::Progressing)
                if !self.config.persist_progress_events =>
            {
                Ok(())
            }
            TransitionOutcome::Applied(state) => {
                if state == DownloadState::Finished {
                    info!(download_id, size = ?snapshot.file_size, "下载完成");
                }
                self.persistence.save(&snapshot).await
            }
        };

        if let Err(e) = &persisted {
            warn!(download_id, event = event.name(), error = %e, "事件处理后的持久化失败");
        }
        self.publish(download_id, &registry).await;

        persisted?;
        Ok(outcome)
    }

    pub async fn ingestion_phase(&self) -> Result<IngestionPhase, ReactivePropertyError> {
        self.phase.get_current().await
    }

    /// 挂起直到可以开始消费事件；返回 `false` 表示管理器已关闭。
    pub async fn wait_until_ready(&self) -> bool {
        let _ = self
            .phase
            .wait_until(|phase| *phase != IngestionPhase::AwaitingRestore)
            .await;
        matches!(self.phase.get_current().await, Ok(IngestionPhase::Ready))
    }

    /// 挂起直到请求关闭。
    pub async fn wait_for_shutdown(&self) {
        let _ = self
            .phase
            .wait_until(|phase| *phase == IngestionPhase::ShuttingDown)
            .await;
    }

    /// 请求事件消费循环退出。
    pub async fn shutdown(&self) {
        let _ = self.phase.update(IngestionPhase::ShuttingDown).await;
        self.snapshot.close();
        info!("下载管理器已请求关闭");
    }
}
