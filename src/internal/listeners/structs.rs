pub mod download_update;
pub(crate) mod listener_adapters;
pub mod listener_hub;
pub mod subscription;

pub use download_update::DownloadUpdate;
pub use listener_hub::ListenerHub;
pub use subscription::{SubscriptionHandle, SubscriptionScope, UpdateListenerOptions};
