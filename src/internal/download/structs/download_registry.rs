//! 内存中的下载注册表：进程内唯一的事实来源。
//!
//! 以插入顺序保存记录，全量快照与标签化结果都按该顺序返回。

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, warn};

use super::download_error::DownloadManagerError;
use super::download_record::DownloadRecord;
use super::labeled_download::LabeledDownload;
use super::new_download::NewDownload;

#[derive(Debug, Default)]
pub struct DownloadRegistry {
    records: IndexMap<String, DownloadRecord>,
}

impl DownloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一条新下载，ID 已存在时返回 [`DownloadManagerError::DuplicateId`] 且不改动已有记录。
    pub fn create(&mut self, request: NewDownload) -> Result<&DownloadRecord, DownloadManagerError> {
        match self.records.entry(request.download_id.clone()) {
            Entry::Occupied(_) => Err(DownloadManagerError::DuplicateId(request.download_id)),
            Entry::Vacant(slot) => {
                let record: &DownloadRecord = slot.insert(DownloadRecord::from_request(request));
                Ok(record)
            }
        }
    }

    /// 批量载入已持久化的记录，保留其最后已知状态；返回实际载入的 ID。
    ///
    /// 已在内存中的 ID 以内存为准，存储中的同名记录被跳过。
    pub fn restore<I>(&mut self, stored: I) -> Vec<String>
    where
        I: IntoIterator<Item = DownloadRecord>,
    {
        let mut restored = Vec::new();
        for record in stored {
            if self.records.contains_key(&record.download_id) {
                warn!(download_id = %record.download_id, "恢复时发现重复的下载，保留内存中的记录");
                continue;
            }
            debug!(download_id = %record.download_id, state = %record.state, "恢复下载记录");
            restored.push(record.download_id.clone());
            self.records.insert(record.download_id.clone(), record);
        }
        restored
    }

    /// 按 ID 精确匹配，结果按注册顺序排列，可能为空。
    pub fn get<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&DownloadRecord> {
        self.records
            .values()
            .filter(|record| ids.iter().any(|id| id.as_ref() == record.download_id))
            .collect()
    }

    /// 恰好一条的查询。
    pub fn get_one(&self, id: &str) -> Option<&DownloadRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut DownloadRecord> {
        self.records.get_mut(id)
    }

    /// 与 [`get`](Self::get) 相同的匹配，但以 `{label, value}` 形式返回克隆。
    pub fn get_labeled<S: AsRef<str>>(&self, ids: &[S]) -> Vec<LabeledDownload> {
        self.get(ids)
            .into_iter()
            .cloned()
            .map(LabeledDownload::from)
            .collect()
    }

    /// 全部记录的标签化快照。
    pub fn all_labeled(&self) -> Vec<LabeledDownload> {
        self.records
            .values()
            .cloned()
            .map(LabeledDownload::from)
            .collect()
    }

    pub fn all(&self) -> Vec<DownloadRecord> {
        self.records.values().cloned().collect()
    }

    /// 删除记录；不存在时为空操作，返回 `None`。
    pub fn remove(&mut self, id: &str) -> Option<DownloadRecord> {
        self.records.shift_remove(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
