//! # LockReactiveProperty
//!
//! 带条件等待能力的响应式属性，基于 `tokio::sync::Mutex` + `Notify`。
//!
//! 与 [`ReactiveProperty`](super::reactive_core::ReactiveProperty) 不同，
//! `wait_until` 不会错过任何一次满足条件的写入，适合「阶段切换」这类
//! 低频但必须可靠送达的信号，例如事件消费循环等待恢复完成。
//!
//! ```rust,no_run
//! use media_downloader::states::LockReactiveProperty;
//!
//! # async fn example() {
//! let ready = LockReactiveProperty::new(false);
//! let r = ready.clone();
//! tokio::spawn(async move { r.update(true).await.unwrap() });
//! ready.wait_until(|v| *v).await.unwrap();
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use super::reactive_core::ReactivePropertyError;

struct Inner<T> {
    value: Mutex<Option<T>>,
    notify: Notify,
}

#[derive(Clone)]
pub struct LockReactiveProperty<T: Clone + Send + Sync> {
    inner: Arc<Inner<T>>,
}

impl<T> LockReactiveProperty<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(Some(value)),
                notify: Notify::new(),
            }),
        }
    }

    /// 写入新值并唤醒所有等待者。
    ///
    /// # 返回值
    /// - `Err(ReactivePropertyError::Closed)`: 属性已被关闭。
    pub async fn update(&self, new_value: T) -> Result<(), ReactivePropertyError> {
        let mut guard = self.inner.value.lock().await;
        if guard.is_none() {
            return Err(ReactivePropertyError::Closed);
        }
        *guard = Some(new_value);
        drop(guard);
        self.inner.notify.notify_waiters();
        Ok(())
    }

    pub async fn get_current(&self) -> Result<T, ReactivePropertyError> {
        let guard = self.inner.value.lock().await;
        guard.as_ref().cloned().ok_or(ReactivePropertyError::Closed)
    }

    /// 关闭属性；正在 `wait_until` 的任务会收到 `Closed`。
    pub async fn close(&self) {
        let mut guard = self.inner.value.lock().await;
        *guard = None;
        drop(guard);
        self.inner.notify.notify_waiters();
    }

    /// 挂起直到当前值满足 `predicate`；已满足时立即返回。
    pub async fn wait_until<F>(&self, mut predicate: F) -> Result<(), ReactivePropertyError>
    where
        F: FnMut(&T) -> bool,
    {
        loop {
            // 先注册通知再加锁检查，锁释放后的写入不会被漏掉
            let notified = self.inner.notify.notified();

            let guard = self.inner.value.lock().await;
            match guard.as_ref() {
                None => return Err(ReactivePropertyError::Closed),
                Some(value) if predicate(value) => return Ok(()),
                Some(_) => {}
            }
            drop(guard);

            notified.await;
        }
    }
}
