pub mod download;
pub mod engine;
pub mod events;
pub mod listeners;
pub mod logging;
pub mod manager;
pub mod states;
pub mod storage;
