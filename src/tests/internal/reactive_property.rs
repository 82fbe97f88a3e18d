//! 响应式属性测试
//!
//! 测试项：
//! - `ReactiveProperty` 基础读写、原地修改、watch 监听与关闭
//! - `LockReactiveProperty` 的 `wait_until` 条件等待（立即满足 / 异步等待 / 持续挂起）
//! - 事件队列的 FIFO 顺序与积压计数

use std::time::Duration;

use crate::internal::states::queue_reactive::QueueReactiveProperty;
use crate::states::{LockReactiveProperty, ReactiveProperty, ReactivePropertyError};

// ═══════════════════════════ ReactiveProperty ═══════════════════════════

#[tokio::test]
async fn basic_update_and_read() {
    let prop = ReactiveProperty::new(0u64);
    prop.update(42);
    assert_eq!(prop.get_current(), Some(42));

    prop.update_with(|v| *v += 8);
    assert_eq!(prop.get_current(), Some(50));
}

#[tokio::test]
async fn watch_receives_latest_value() {
    let prop = ReactiveProperty::new(0i32);
    let mut watcher = prop.watch();

    prop.update(1);
    assert_eq!(watcher.changed().await.unwrap(), 1);

    // 中间值被覆盖，监听者只看到最新值
    prop.update(2);
    prop.update(3);
    assert_eq!(watcher.changed().await.unwrap(), 3);
    assert_eq!(watcher.borrow(), Some(3));
}

#[tokio::test]
async fn closed_property_rejects_writes_and_wakes_watchers() {
    let prop = ReactiveProperty::new(vec![1, 2]);
    let mut watcher = prop.watch();

    prop.close();
    assert!(prop.is_closed());
    assert!(matches!(watcher.changed().await, Err(ReactivePropertyError::Closed)));

    prop.update(vec![3]);
    prop.update_with(|v| v.push(4));
    assert_eq!(prop.get_current(), None);
}

// ═══════════════════════════ LockReactiveProperty ═══════════════════════════

#[tokio::test]
async fn lock_basic_update_and_read() {
    let prop = LockReactiveProperty::new("hello".to_string());
    prop.update("world".to_string()).await.unwrap();
    assert_eq!(prop.get_current().await.unwrap().as_str(), "world");
}

#[tokio::test]
async fn lock_wait_until_already_satisfied() {
    let prop = LockReactiveProperty::new(100i32);
    // 当前值已满足，应立即返回
    prop.wait_until(|v| *v == 100).await.unwrap();
}

#[tokio::test]
async fn lock_wait_until_async_satisfied() {
    let prop = LockReactiveProperty::new(0i32);
    let p = prop.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        p.update(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        p.update(42).await.unwrap();
    });

    prop.wait_until(|v| *v == 42).await.unwrap();
    assert_eq!(prop.get_current().await.unwrap(), 42);
}

#[tokio::test]
async fn lock_wait_until_blocks_when_unsatisfied() {
    let prop = LockReactiveProperty::new(0i32);
    let p = prop.clone();

    let result = tokio::time::timeout(Duration::from_millis(100), p.wait_until(|v| *v == 9999)).await;
    assert!(result.is_err(), "条件未满足时 wait_until 应持续挂起（超时）");

    prop.update(9999).await.unwrap();
    let result = tokio::time::timeout(Duration::from_millis(100), p.wait_until(|v| *v == 9999)).await;
    assert!(result.is_ok(), "条件满足后 wait_until 应立即返回");
}

#[tokio::test]
async fn lock_closed_property_returns_closed() {
    let prop = LockReactiveProperty::new(1u8);
    prop.close().await;
    assert!(matches!(prop.update(2).await, Err(ReactivePropertyError::Closed)));
    assert!(matches!(prop.get_current().await, Err(ReactivePropertyError::Closed)));
    assert!(matches!(prop.wait_until(|_| true).await, Err(ReactivePropertyError::Closed)));
}

// ═══════════════════════════ 事件队列 ═══════════════════════════

#[tokio::test]
async fn queue_is_fifo_and_tracks_backlog() {
    let (queue, mut consumer) = QueueReactiveProperty::new();
    for i in 0..5u32 {
        queue.send(i).unwrap();
    }
    assert_eq!(queue.backlog(), 5);

    for expected in 0..5u32 {
        assert_eq!(consumer.recv().await, Some(expected));
    }
    assert_eq!(queue.backlog(), 0);
}

#[tokio::test]
async fn closed_queue_drains_then_returns_sent_value() {
    let (queue, mut consumer) = QueueReactiveProperty::new();
    queue.send("a").unwrap();
    consumer.close();

    assert!(queue.is_closed());
    assert_eq!(queue.send("b"), Err("b"));
    assert_eq!(queue.backlog(), 1);

    assert_eq!(consumer.recv().await, Some("a"));
    assert_eq!(consumer.recv().await, None);
    assert_eq!(queue.backlog(), 0);
}

#[tokio::test]
async fn dropping_all_producers_ends_the_consumer() {
    let (queue, mut consumer) = QueueReactiveProperty::<u8>::new();
    let other = queue.clone();
    drop(queue);
    other.send(7).unwrap();
    drop(other);

    assert_eq!(consumer.recv().await, Some(7));
    assert_eq!(consumer.recv().await, None);
}
