use serde::Deserialize;

use crate::internal::download::structs::DownloadManagerError;
use crate::internal::engine::structs::engine_platform::EnginePlatform;

/// 默认存储租户，与早期版本写入的数据保持兼容
pub const DEFAULT_STORAGE_TENANT: &str = "RNMediaSuite_DownloadManager";

pub const ENV_TENANT: &str = "MEDIA_DOWNLOADER_TENANT";
pub const ENV_PLATFORM: &str = "MEDIA_DOWNLOADER_PLATFORM";
pub const ENV_MAX_SIMULTANEOUS: &str = "MEDIA_DOWNLOADER_MAX_SIMULTANEOUS";
pub const ENV_PERSIST_PROGRESS: &str = "MEDIA_DOWNLOADER_PERSIST_PROGRESS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DownloadManagerConfig {
    /// 存储中的命名空间
    pub storage_tenant: String,
    pub platform: EnginePlatform,
    /// 恢复完成后下发给引擎的最大并发数；`None` 表示沿用引擎默认值
    pub max_simultaneous_downloads: Option<u32>,
    /// 进度事件是否写入存储；关闭后进度只保留在内存和通知中
    pub persist_progress_events: bool,
    /// 事件消费是否等待恢复完成
    pub wait_for_restore: bool,
}

impl Default for DownloadManagerConfig {
    fn default() -> Self {
        Self {
            storage_tenant: DEFAULT_STORAGE_TENANT.to_string(),
            platform: EnginePlatform::current(),
            max_simultaneous_downloads: None,
            persist_progress_events: true,
            wait_for_restore: true,
        }
    }
}

impl DownloadManagerConfig {
    /// 从进程环境变量读取，未设置的项使用默认值。
    pub fn from_env() -> Result<Self, DownloadManagerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（便于测试或接入其他配置源）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DownloadManagerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(tenant) = lookup(ENV_TENANT) {
            let tenant = tenant.trim();
            if tenant.is_empty() {
                return Err(invalid(ENV_TENANT, "不能为空"));
            }
            config.storage_tenant = tenant.to_string();
        }

        if let Some(platform) = lookup(ENV_PLATFORM) {
            config.platform = platform
                .parse()
                .map_err(|e: String| invalid(ENV_PLATFORM, &e))?;
        }

        if let Some(max) = lookup(ENV_MAX_SIMULTANEOUS) {
            let max = max
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid(ENV_MAX_SIMULTANEOUS, &e.to_string()))?;
            if max == 0 {
                return Err(invalid(ENV_MAX_SIMULTANEOUS, "必须大于 0"));
            }
            config.max_simultaneous_downloads = Some(max);
        }

        if let Some(flag) = lookup(ENV_PERSIST_PROGRESS) {
            config.persist_progress_events = parse_bool(&flag)
                .ok_or_else(|| invalid(ENV_PERSIST_PROGRESS, "应为 true/false"))?;
        }

        Ok(config)
    }

    pub fn with_storage_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.storage_tenant = tenant.into();
        self
    }

    pub fn with_platform(mut self, platform: EnginePlatform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_max_simultaneous_downloads(mut self, max: u32) -> Self {
        self.max_simultaneous_downloads = Some(max);
        self
    }

    pub fn with_persist_progress_events(mut self, persist: bool) -> Self {
        self.persist_progress_events = persist;
        self
    }

    pub fn with_wait_for_restore(mut self, wait: bool) -> Self {
        self.wait_for_restore = wait;
        self
    }
}

fn invalid(key: &str, reason: &str) -> DownloadManagerError {
    DownloadManagerError::InvalidArgument(format!("{key}: {reason}"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
