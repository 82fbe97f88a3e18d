pub mod event_ingestion;
pub mod native_event;

pub use event_ingestion::{EventIngestion, IngestionStats, NativeEventSender};
pub use native_event::NativeEvent;
