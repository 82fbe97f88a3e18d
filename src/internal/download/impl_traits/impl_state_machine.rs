//! 下载状态机：把原生引擎事件作用到单条记录上。
//!
//! 状态只沿 `initialized → started → progressing* → finished | error` 前进，
//! 取消可以从任意状态发生。不符合状态图的事件记日志后丢弃，不回滚、不报错。

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::internal::download::structs::{
    DownloadRecord, DownloadState, IgnoreReason, TransitionOutcome,
};
use crate::internal::events::structs::NativeEvent;

impl DownloadRecord {
    /// 应用一个事件。调用方负责保证 `event.download_id()` 与本记录一致。
    pub fn apply_event(&mut self, event: &NativeEvent, now: DateTime<Utc>) -> TransitionOutcome {
        if let NativeEvent::Cancelled { .. } = event {
            self.state = DownloadState::Cancelled;
            return TransitionOutcome::Removed;
        }

        if self.state.is_terminal() {
            debug!(
                download_id = %self.download_id,
                state = %self.state,
                event = event.name(),
                "记录已处于终态，忽略事件"
            );
            return TransitionOutcome::Ignored(IgnoreReason::TerminalState(self.state));
        }

        match event {
            NativeEvent::Started { .. } => self.on_started(now),
            NativeEvent::Progress {
                percent_complete, ..
            } => self.on_progress(*percent_complete, now),
            NativeEvent::Finished {
                download_location,
                size,
                ..
            } => self.on_finished(download_location, *size, now),
            NativeEvent::Error {
                error_type, error, ..
            } => self.on_error(error_type, error, now),
            NativeEvent::Cancelled { .. } => TransitionOutcome::Removed,
        }
    }

    fn on_started(&mut self, now: DateTime<Utc>) -> TransitionOutcome {
        if self.state != DownloadState::Initialized {
            debug!(download_id = %self.download_id, state = %self.state, "重复或迟到的 started 事件");
            return TransitionOutcome::Ignored(IgnoreReason::OutOfOrder(self.state));
        }
        self.state = DownloadState::Started;
        self.started_time_stamp.get_or_insert(now);
        TransitionOutcome::Applied(self.state)
    }

    fn on_progress(&mut self, percent_complete: f64, now: DateTime<Utc>) -> TransitionOutcome {
        if percent_complete.is_nan() {
            return TransitionOutcome::Ignored(IgnoreReason::InvalidProgress);
        }
        let received = percent_complete.clamp(0.0, 1.0);
        if received < self.progress {
            debug!(
                download_id = %self.download_id,
                current = self.progress,
                received,
                "进度回退，忽略"
            );
            return TransitionOutcome::Ignored(IgnoreReason::ProgressRegression {
                current: self.progress,
                received,
            });
        }
        self.state = DownloadState::Progressing;
        self.progress = received;
        self.progress_time_stamp.get_or_insert(now);
        TransitionOutcome::Applied(self.state)
    }

    fn on_finished(&mut self, location: &str, size: u64, now: DateTime<Utc>) -> TransitionOutcome {
        self.state = DownloadState::Finished;
        self.local_url = Some(location.to_string());
        self.file_size = Some(size);
        self.progress = 1.0;
        self.finished_time_stamp.get_or_insert(now);
        TransitionOutcome::Applied(self.state)
    }

    fn on_error(&mut self, error_type: &str, message: &str, now: DateTime<Utc>) -> TransitionOutcome {
        warn!(download_id = %self.download_id, error_type, message, "下载出错");
        self.state = DownloadState::Error;
        self.error_type = Some(error_type.to_string());
        self.error_message = Some(message.to_string());
        self.errored_time_stamp.get_or_insert(now);
        TransitionOutcome::Applied(self.state)
    }
}
