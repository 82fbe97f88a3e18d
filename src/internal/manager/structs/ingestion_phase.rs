/// 事件消费所处阶段，由管理器维护，消费循环据此决定何时开始、何时退出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionPhase {
    /// 等待 `restore_media_downloader` 完成，期间到达的事件留在队列中
    AwaitingRestore,
    Ready,
    /// 已请求关闭，消费循环处理完已入队的事件后退出
    ShuttingDown,
}
