pub mod lock_reactive;
pub(crate) mod queue_reactive;
pub mod reactive_core;
