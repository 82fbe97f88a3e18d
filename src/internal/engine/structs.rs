pub mod engine_platform;

pub use engine_platform::EnginePlatform;
