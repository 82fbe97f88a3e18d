//! 事件接入：原生引擎异步、无阻塞地投递事件，单个消费任务按 FIFO 逐条交给管理器处理。
//!
//! 单一消费者保证同一 ID 的「变更 → 持久化 → 通知」不会与该 ID 的下一个事件交错；
//! 任何一个事件处理失败都只记日志，不会中断后续事件。

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::internal::download::structs::TransitionOutcome;
use crate::internal::events::structs::native_event::NativeEvent;
use crate::internal::manager::structs::download_manager::DownloadManager;
use crate::internal::states::queue_reactive::{QueueReactiveConsumer, QueueReactiveProperty};
use crate::internal::states::reactive_core::PropertyWatcher;

/// 投递事件的句柄，可 Clone 给引擎的多个回调使用。
#[derive(Debug, Clone)]
pub struct NativeEventSender {
    queue: QueueReactiveProperty<NativeEvent>,
}

impl NativeEventSender {
    /// 入队一个事件；消费循环已退出时原样退回。
    pub fn send(&self, event: NativeEvent) -> Result<(), NativeEvent> {
        self.queue.send(event)
    }

    /// 按引擎的事件名与原始载荷入队，载荷无法解析时返回错误且不入队。
    pub fn send_native(&self, name: &str, payload: Value) -> Result<(), serde_json::Error> {
        let event = NativeEvent::from_native(name, payload)?;
        if let Err(event) = self.queue.send(event) {
            warn!(event = event.name(), download_id = event.download_id(), "事件消费循环已退出，丢弃事件");
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    /// 队列中尚未被取出的事件数。
    pub fn backlog(&self) -> usize {
        self.queue.backlog()
    }

    pub fn watch_backlog(&self) -> PropertyWatcher<usize> {
        self.queue.watch_backlog()
    }
}

/// 消费循环结束时的统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionStats {
    pub applied: usize,
    pub removed: usize,
    pub ignored: usize,
    pub failed: usize,
}

impl IngestionStats {
    pub fn total(&self) -> usize {
        self.applied + self.removed + self.ignored + self.failed
    }
}

pub struct EventIngestion {
    manager: Arc<DownloadManager>,
    consumer: QueueReactiveConsumer<NativeEvent>,
}

impl EventIngestion {
    /// 返回 (投递句柄, 消费循环)。
    pub fn new(manager: Arc<DownloadManager>) -> (NativeEventSender, Self) {
        let (queue, consumer) = QueueReactiveProperty::new();
        (NativeEventSender { queue }, Self { manager, consumer })
    }

    pub fn spawn(self) -> JoinHandle<IngestionStats> {
        tokio::spawn(self.run())
    }

    /// 等待恢复完成后开始消费，直到所有投递句柄释放或管理器关闭。
    pub async fn run(mut self) -> IngestionStats {
        let mut stats = IngestionStats::default();

        if !self.manager.wait_until_ready().await {
            info!("恢复完成前管理器已关闭，事件消费未启动");
            return stats;
        }
        debug!("事件消费开始");

        loop {
            let event = tokio::select! {
                biased;
                _ = self.manager.wait_for_shutdown() => {
                    // 不再接收新事件，已入队的照常处理完
                    self.consumer.close();
                    while let Some(event) = self.consumer.recv().await {
                        self.process(&event, &mut stats).await;
                    }
                    break;
                }
                event = self.consumer.recv() => event,
            };

            match event {
                Some(event) => self.process(&event, &mut stats).await,
                None => break,
            }
        }

        info!(
            applied = stats.applied,
            removed = stats.removed,
            ignored = stats.ignored,
            failed = stats.failed,
            "事件消费结束"
        );
        stats
    }

    async fn process(&self, event: &NativeEvent, stats: &mut IngestionStats) {
        match self.manager.handle_event(event).await {
            Ok(TransitionOutcome::Applied(_)) => stats.applied += 1,
            Ok(TransitionOutcome::Removed) => stats.removed += 1,
            Ok(TransitionOutcome::Ignored(reason)) => {
                debug!(event = event.name(), download_id = event.download_id(), ?reason, "事件被忽略");
                stats.ignored += 1;
            }
            Err(e) => {
                warn!(event = event.name(), download_id = event.download_id(), error = %e, "事件处理失败");
                stats.failed += 1;
            }
        }
    }
}
