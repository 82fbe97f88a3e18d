/// 内部实现模块
mod internal;


/// 下载记录、生命周期状态、注册表与状态机
pub mod download {
    use crate::internal;
    pub use internal::download::structs::*;
}

/// 原生下载引擎接入：事件模型与事件消费循环
pub mod events {
    use crate::internal;
    pub use internal::events::structs::*;
}

/// 原生下载引擎接口
pub mod engine {
    use crate::internal;
    pub use internal::engine::structs::*;
    pub use internal::engine::traits::*;
}

/// 持久化：键值存储接口、记录适配器与内置存储实现
pub mod storage {
    use crate::internal;
    pub use internal::storage::structs::*;
    pub use internal::storage::traits::*;
}

/// 更新监听与扇出
pub mod listeners {
    use crate::internal;
    pub use internal::listeners::structs::*;
    pub use internal::listeners::traits::*;
}

/// 对外主入口：下载管理器及其配置
pub mod manager {
    use crate::internal;
    pub use internal::manager::structs::*;
}

pub mod states {
    use crate::internal;
    pub use internal::states::lock_reactive::LockReactiveProperty;
    pub use internal::states::reactive_core::{PropertyWatcher, ReactiveProperty, ReactivePropertyError};
}

pub mod logging {
    use crate::internal;
    pub use internal::logging::*;
}

pub use download::{DownloadRecord, DownloadState, NewDownload};
pub use manager::{DownloadManager, DownloadManagerConfig};
