//! # ReactiveProperty：响应式属性内核
//!
//! 基于 [`tokio::sync::watch`] 的单值广播容器：写入方覆盖当前值，
//! 所有监听者只关心「最新值」。下载快照（`watch_downloads`）和事件队列的
//! 积压计数（`watch_backlog`）都建立在它之上。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::watch;
use tokio::sync::watch::error::RecvError;

/// 响应式属性统一错误类型
#[derive(Debug, Error)]
pub enum ReactivePropertyError {
    /// 属性已被关闭，监听者不会再收到新值
    #[error("响应式属性已关闭")]
    Closed,

    /// watch 通道接收失败
    #[error("接收失败: {0}")]
    Recv(#[from] RecvError),
}

#[derive(Debug)]
struct Inner<T> {
    sender: watch::Sender<Option<T>>,
    closed: AtomicBool,
}

/// 响应式属性：可 Clone，多个克隆共享同一个值。
#[derive(Clone, Debug)]
pub struct ReactiveProperty<T: Clone + Send + Sync> {
    inner: Arc<Inner<T>>,
}

impl<T> ReactiveProperty<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(Some(value));
        Self {
            inner: Arc::new(Inner {
                sender,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// 覆盖当前值并唤醒所有监听者；属性关闭后静默忽略。
    pub fn update(&self, value: T) {
        if self.inner.closed.load(Ordering::Acquire) {
            return;
        }
        self.inner.sender.send_replace(Some(value));
    }

    /// 在当前值上原地修改；属性关闭后不会调用 `updater`。
    pub fn update_with<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        if self.inner.closed.load(Ordering::Acquire) {
            return;
        }
        self.inner.sender.send_if_modified(|slot| match slot {
            Some(value) => {
                updater(value);
                true
            }
            None => false,
        });
    }

    /// 当前值的快照；关闭后返回 `None`。
    pub fn get_current(&self) -> Option<T> {
        self.inner.sender.borrow().clone()
    }

    /// 关闭属性：写入 `None`，所有监听者的 `changed` 返回 [`ReactivePropertyError::Closed`]。
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.sender.send_replace(None);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// 创建一个监听器，用于异步等待下一次变化。
    pub fn watch(&self) -> PropertyWatcher<T> {
        PropertyWatcher {
            receiver: self.inner.sender.subscribe(),
        }
    }
}

/// 属性监听器：`changed().await` 拿到变化后的最新值。
#[derive(Debug)]
pub struct PropertyWatcher<T> {
    receiver: watch::Receiver<Option<T>>,
}

impl<T> PropertyWatcher<T>
where
    T: Clone + Send + Sync,
{
    pub async fn changed(&mut self) -> Result<T, ReactivePropertyError> {
        self.receiver.changed().await?;
        match self.receiver.borrow_and_update().as_ref() {
            Some(value) => Ok(value.clone()),
            None => Err(ReactivePropertyError::Closed),
        }
    }

    /// 同步读取当前值，不标记为已读。
    pub fn borrow(&self) -> Option<T> {
        self.receiver.borrow().clone()
    }
}
