use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 原生引擎所在平台。只有 iOS 引擎支持恢复后台传输与并发数设置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnginePlatform {
    Ios,
    Android,
}

impl EnginePlatform {
    /// 编译目标对应的平台，非移动平台按 Android 处理（不转发平台专属命令）。
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            EnginePlatform::Ios
        } else {
            EnginePlatform::Android
        }
    }

    pub fn supports_native_restore(&self) -> bool {
        matches!(self, EnginePlatform::Ios)
    }

    pub fn supports_simultaneous_limit(&self) -> bool {
        matches!(self, EnginePlatform::Ios)
    }
}

impl Default for EnginePlatform {
    fn default() -> Self {
        Self::current()
    }
}

impl FromStr for EnginePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(EnginePlatform::Ios),
            "android" => Ok(EnginePlatform::Android),
            other => Err(format!("未知平台: {other}")),
        }
    }
}
