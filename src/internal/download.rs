//! 下载领域模块：记录、状态、注册表与状态机。
//! 对外导出以 [`crate::download`] 为准。

pub mod impl_traits;
pub mod structs;
