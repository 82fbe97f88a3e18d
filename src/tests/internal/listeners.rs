//! 监听测试：订阅范围、立即通知、删除通知与取消订阅。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::download::DownloadRegistry;
use crate::events::NativeEvent;
use crate::listeners::{
    DownloadUpdate, ListenerHub, SubscriptionScope, UpdateListener, UpdateListenerOptions,
};
use crate::tests::{Fixture, collector, drain, sample_request};

#[derive(Default)]
struct CountingListener {
    hits: AtomicUsize,
}

impl UpdateListener for CountingListener {
    fn on_update(&self, _update: &DownloadUpdate) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

fn ids(update: &DownloadUpdate) -> Vec<String> {
    update
        .records()
        .iter()
        .map(|r| r.download_id.clone())
        .collect()
}

#[tokio::test]
async fn global_listener_gets_immediate_snapshot_then_every_change() {
    let fx = Fixture::android();
    let (updates, sink) = collector();
    fx.manager
        .add_update_listener_fn(sink, UpdateListenerOptions::global())
        .await;

    assert_eq!(drain(&updates), vec![DownloadUpdate::All(Vec::new())]);

    fx.manager.create_new_download(sample_request("a")).await.unwrap();
    fx.manager.create_new_download(sample_request("b")).await.unwrap();
    fx.manager
        .handle_event(&NativeEvent::Started { download_id: "a".to_string() })
        .await
        .unwrap();

    let received = drain(&updates);
    assert_eq!(received.len(), 3);
    assert_eq!(ids(&received[0]), vec!["a"]);
    assert_eq!(ids(&received[1]), vec!["a", "b"]);
    match &received[2] {
        DownloadUpdate::All(items) => {
            assert_eq!(items[0].label, "a");
            assert_eq!(items[0].value.state, crate::DownloadState::Started);
        }
        other => panic!("期望全量通知，实际 {other:?}"),
    }
}

#[tokio::test]
async fn single_listener_ignores_other_ids() {
    let fx = Fixture::android();
    let (updates, sink) = collector();
    fx.manager
        .add_update_listener_fn(sink, UpdateListenerOptions::single("A"))
        .await;
    assert!(drain(&updates).is_empty());

    fx.manager.create_new_download(sample_request("B")).await.unwrap();
    fx.manager
        .handle_event(&NativeEvent::Progress { download_id: "B".to_string(), percent_complete: 0.3 })
        .await
        .unwrap();
    assert!(drain(&updates).is_empty());

    fx.manager.create_new_download(sample_request("A")).await.unwrap();
    let received = drain(&updates);
    assert_eq!(received.len(), 1);
    match &received[0] {
        DownloadUpdate::Single { download_id, record } => {
            assert_eq!(download_id, "A");
            assert_eq!(record.as_ref().map(|r| r.remote_url.as_str()), Some("http://x/A.mp4"));
        }
        other => panic!("期望单条通知，实际 {other:?}"),
    }
}

#[tokio::test]
async fn notify_immediately_uses_first_id() {
    let fx = Fixture::android();
    fx.manager.create_new_download(sample_request("a")).await.unwrap();

    let (single, sink) = collector();
    fx.manager
        .add_update_listener_fn(sink, UpdateListenerOptions::single("missing").notify_immediately())
        .await;
    // 记录尚不存在时不回调，免得被误认为删除
    assert!(drain(&single).is_empty());
    fx.manager.create_new_download(sample_request("missing")).await.unwrap();
    let received = drain(&single);
    assert_eq!(received.len(), 1);
    assert!(matches!(&received[0], DownloadUpdate::Single { record: Some(_), .. }));

    let (many, sink) = collector();
    fx.manager
        .add_update_listener_fn(sink, UpdateListenerOptions::many(["a", "zzz"]).notify_immediately())
        .await;
    let received = drain(&many);
    assert_eq!(received.len(), 1);
    assert_eq!(ids(&received[0]), vec!["a"]);
}

#[tokio::test]
async fn many_listener_matches_by_membership() {
    let fx = Fixture::android();
    let (updates, sink) = collector();
    let options = UpdateListenerOptions::many(["a", "c", "a"]);
    assert_eq!(options.scope, SubscriptionScope::Many(vec!["a".to_string(), "c".to_string()]));
    fx.manager.add_update_listener_fn(sink, options).await;

    fx.manager.create_new_download(sample_request("b")).await.unwrap();
    assert!(drain(&updates).is_empty());

    fx.manager.create_new_download(sample_request("c")).await.unwrap();
    fx.manager.create_new_download(sample_request("a")).await.unwrap();
    let received = drain(&updates);
    assert_eq!(received.len(), 2);
    assert!(matches!(received[0], DownloadUpdate::Many(_)));
    assert_eq!(ids(&received[0]), vec!["c"]);
    assert_eq!(ids(&received[1]), vec!["c", "a"]);
}

#[tokio::test]
async fn cancellation_is_announced_as_deletion() {
    let fx = Fixture::android();
    fx.manager.create_new_download(sample_request("d1")).await.unwrap();

    let (single, sink) = collector();
    fx.manager
        .add_update_listener_fn(sink, UpdateListenerOptions::single("d1"))
        .await;
    let (global, sink) = collector();
    fx.manager
        .add_update_listener_fn(sink, UpdateListenerOptions::global())
        .await;
    drain(&global);

    fx.manager
        .handle_event(&NativeEvent::Cancelled { download_id: "d1".to_string() })
        .await
        .unwrap();

    let received = drain(&single);
    assert_eq!(received.len(), 1);
    assert!(received[0].is_deletion());
    assert_eq!(drain(&global), vec![DownloadUpdate::All(Vec::new())]);
}

#[tokio::test]
async fn ignored_events_do_not_notify() {
    let fx = Fixture::android();
    fx.manager.create_new_download(sample_request("d1")).await.unwrap();
    let listener = Arc::new(CountingListener::default());
    fx.manager
        .add_update_listener(listener.clone(), UpdateListenerOptions::single("d1"))
        .await;

    fx.manager
        .handle_event(&NativeEvent::Cancelled { download_id: "unknown".to_string() })
        .await
        .unwrap();
    fx.manager
        .handle_event(&NativeEvent::Progress { download_id: "d1".to_string(), percent_complete: f64::NAN })
        .await
        .unwrap();
    assert_eq!(listener.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unsubscribed_listener_stops_receiving() {
    let fx = Fixture::android();
    let listener = Arc::new(CountingListener::default());
    let handle = fx
        .manager
        .add_update_listener(listener.clone(), UpdateListenerOptions::global())
        .await;
    assert_eq!(listener.hits.load(Ordering::SeqCst), 1);

    assert!(fx.manager.remove_update_listener(handle).await);
    assert!(!fx.manager.remove_update_listener(handle).await);

    fx.manager.create_new_download(sample_request("d1")).await.unwrap();
    assert_eq!(listener.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn hub_reports_delivery_count_in_registration_order() {
    let mut registry = DownloadRegistry::new();
    registry.create(sample_request("x")).unwrap();

    let mut hub = ListenerHub::new();
    let first = Arc::new(CountingListener::default());
    let second = Arc::new(CountingListener::default());
    let other = Arc::new(CountingListener::default());
    hub.subscribe(first.clone(), UpdateListenerOptions::single("x"), &registry);
    hub.subscribe(second.clone(), UpdateListenerOptions::many(["x", "y"]), &registry);
    hub.subscribe(other.clone(), UpdateListenerOptions::single("y"), &registry);
    assert_eq!(hub.len(), 3);

    assert_eq!(hub.notify("x", &registry), 2);
    assert_eq!(hub.notify("nobody", &registry), 0);
    assert_eq!(first.hits.load(Ordering::SeqCst), 1);
    assert_eq!(second.hits.load(Ordering::SeqCst), 1);
    assert_eq!(other.hits.load(Ordering::SeqCst), 0);

    // 批量通知时每个订阅最多回调一次
    registry.create(sample_request("y")).unwrap();
    assert_eq!(hub.notify_many(&["x", "y"], &registry), 3);
    assert_eq!(first.hits.load(Ordering::SeqCst), 2);
    assert_eq!(second.hits.load(Ordering::SeqCst), 2);
    assert_eq!(other.hits.load(Ordering::SeqCst), 1);
}
