//! # QueueReactiveProperty：微队列响应式属性
//!
//! 基于 `tokio::sync::mpsc::unbounded_channel` 的单向 FIFO 队列：
//! - 生产者可 Clone，发送永不阻塞（原生下载引擎的回调线程直接调用）
//! - 消费者唯一，按发送顺序逐条取出
//! - 附带一个响应式的积压计数，外部可以 watch 队列里还有多少条未消费

use tokio::sync::mpsc;

use super::reactive_core::{PropertyWatcher, ReactiveProperty};

/// 生产者端
#[derive(Clone, Debug)]
pub(crate) struct QueueReactiveProperty<T: Send + 'static> {
    sender: mpsc::UnboundedSender<T>,
    backlog: ReactiveProperty<usize>,
}

/// 消费者端，不可 Clone。
#[derive(Debug)]
pub(crate) struct QueueReactiveConsumer<T: Send + 'static> {
    receiver: mpsc::UnboundedReceiver<T>,
    backlog: ReactiveProperty<usize>,
}

impl<T> QueueReactiveProperty<T>
where
    T: Send + 'static,
{
    /// 返回 (生产者, 消费者)。
    pub(crate) fn new() -> (Self, QueueReactiveConsumer<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let backlog = ReactiveProperty::new(0usize);

        (
            Self {
                sender,
                backlog: backlog.clone(),
            },
            QueueReactiveConsumer { receiver, backlog },
        )
    }

    /// 入队；消费者已关闭时原样退回消息。
    pub(crate) fn send(&self, value: T) -> Result<(), T> {
        // 先计数再入队，避免消费者先取走导致计数残留
        self.backlog.update_with(|n| *n += 1);
        self.sender.send(value).map_err(|e| {
            self.backlog.update_with(|n| *n = n.saturating_sub(1));
            e.0
        })
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub(crate) fn watch_backlog(&self) -> PropertyWatcher<usize> {
        self.backlog.watch()
    }

    pub(crate) fn backlog(&self) -> usize {
        self.backlog.get_current().unwrap_or(0)
    }
}

impl<T> QueueReactiveConsumer<T>
where
    T: Send + 'static,
{
    /// 取出下一条消息；所有生产者都释放后返回 `None`。
    pub(crate) async fn recv(&mut self) -> Option<T> {
        let value = self.receiver.recv().await;
        if value.is_some() {
            self.backlog.update_with(|n| *n = n.saturating_sub(1));
        }
        value
    }

    /// 不再接收新消息，已入队的仍可取出。
    pub(crate) fn close(&mut self) {
        self.receiver.close();
    }
}
