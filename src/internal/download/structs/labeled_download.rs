use serde::Serialize;

use super::download_record::DownloadRecord;

/// 以 downloadID 作为标签的记录，供展示层区分同构集合中的各项。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledDownload {
    pub label: String,
    pub value: DownloadRecord,
}

impl From<DownloadRecord> for LabeledDownload {
    fn from(value: DownloadRecord) -> Self {
        Self {
            label: value.download_id.clone(),
            value,
        }
    }
}
