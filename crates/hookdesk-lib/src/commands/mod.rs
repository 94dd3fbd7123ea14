// Command layer
// UI-facing entry points; every command returns Result<T, String>

pub mod config;
pub mod webhook;
pub mod workflow;
