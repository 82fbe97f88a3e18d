pub mod update_listener;

pub use update_listener::UpdateListener;
