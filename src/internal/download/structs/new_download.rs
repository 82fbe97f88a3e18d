/// 创建下载时的参数。`bit_rate` 默认为 0。
///
/// ```rust,no_run
/// use media_downloader::download::NewDownload;
///
/// let request = NewDownload::new("http://x/f.mp4", "d1")
///     .title("Episode 1")
///     .asset_artwork_url("http://x/f.jpg")
///     .bit_rate(128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDownload {
    pub remote_url: String,
    pub download_id: String,
    pub title: Option<String>,
    pub asset_artwork_url: Option<String>,
    pub bit_rate: u64,
}

impl NewDownload {
    pub fn new(remote_url: impl Into<String>, download_id: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            download_id: download_id.into(),
            title: None,
            asset_artwork_url: None,
            bit_rate: 0,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn asset_artwork_url(mut self, url: impl Into<String>) -> Self {
        self.asset_artwork_url = Some(url.into());
        self
    }

    pub fn bit_rate(mut self, bit_rate: u64) -> Self {
        self.bit_rate = bit_rate;
        self
    }
}
