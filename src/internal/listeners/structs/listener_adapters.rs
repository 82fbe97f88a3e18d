//! 将闭包包装成 [`UpdateListener`]。

use crate::internal::listeners::structs::download_update::DownloadUpdate;
use crate::internal::listeners::traits::update_listener::UpdateListener;

pub(crate) struct FnUpdateListener<F>(pub(crate) F);

impl<F> UpdateListener for FnUpdateListener<F>
where
    F: Fn(&DownloadUpdate) + Send + Sync + 'static,
{
    fn on_update(&self, update: &DownloadUpdate) {
        (self.0)(update)
    }
}
