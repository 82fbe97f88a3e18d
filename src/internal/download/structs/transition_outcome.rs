use super::download_state::DownloadState;

/// 事件被丢弃的原因。被丢弃的事件不会持久化，也不会通知监听者。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IgnoreReason {
    /// 注册表中没有该 ID（引擎可能仍引用本进程已不再跟踪的下载）
    UnknownDownloadId,
    /// 记录已处于终态，只有取消可以作用于它
    TerminalState(DownloadState),
    /// 事件到达顺序与状态图不符，例如进度之后才收到 started
    OutOfOrder(DownloadState),
    /// 新进度低于当前进度
    ProgressRegression { current: f64, received: f64 },
    /// 进度不是有效数字
    InvalidProgress,
}

/// 单个事件作用于注册表后的结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionOutcome {
    /// 记录已更新，需要持久化并通知
    Applied(DownloadState),
    /// 记录已被取消，需要从注册表和存储中移除并发出删除通知
    Removed,
    Ignored(IgnoreReason),
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, TransitionOutcome::Ignored(_))
    }
}
