// Data models module
// Re-exports all model types for convenient access

pub mod config;
pub mod webhook_log;
pub mod workflow;

pub use config::*;
pub use webhook_log::*;
pub use workflow::*;
