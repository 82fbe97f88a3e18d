//! 更新监听接口：注册表发生变更后由扇出组件同步回调。
//!
//! 使用方式二选一：
//! - **闭包**：`manager.add_update_listener_fn(|update| ..., options)`；
//! - **完整监听器**：实现本 trait，通过 `add_update_listener` 注册。
//!
//! 回调在事件处理的临界区内执行，不要在回调里同步等待管理器的其他操作。

use crate::internal::listeners::structs::download_update::DownloadUpdate;

pub trait UpdateListener: Send + Sync {
    fn on_update(&self, update: &DownloadUpdate);
}
