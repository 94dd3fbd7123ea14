// Hookdesk Shared Library
// Outbound webhooks, automation log, workflow executions and webhook settings

pub mod commands;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use error::{HookdeskError, HookdeskErrorCode, HookdeskResult};
pub use state::AppState;
