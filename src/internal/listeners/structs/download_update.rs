use crate::internal::download::structs::{DownloadRecord, LabeledDownload};

/// 一次通知的内容，形状取决于订阅范围。
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadUpdate {
    /// 全局订阅：全部记录（标签化）
    All(Vec<LabeledDownload>),
    /// 多 ID 订阅：订阅集合中当前存在的记录（标签化）
    Many(Vec<LabeledDownload>),
    /// 单 ID 订阅：该记录本身；`record == None` 表示记录已被删除
    Single {
        download_id: String,
        record: Option<DownloadRecord>,
    },
}

impl DownloadUpdate {
    /// 通知中携带的全部记录。
    pub fn records(&self) -> Vec<&DownloadRecord> {
        match self {
            DownloadUpdate::All(items) | DownloadUpdate::Many(items) => {
                items.iter().map(|item| &item.value).collect()
            }
            DownloadUpdate::Single { record, .. } => record.iter().collect(),
        }
    }

    /// 是否为单 ID 订阅收到的删除通知。
    pub fn is_deletion(&self) -> bool {
        matches!(self, DownloadUpdate::Single { record: None, .. })
    }
}
