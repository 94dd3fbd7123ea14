// Services module
// Dispatch, logging, configuration and workflow execution

pub mod config_store;
pub mod connection_test;
pub mod execution_cache;
pub mod log_store;
pub mod webhook_sender;
pub mod workflow_runner;

pub use config_store::ConfigStore;
pub use connection_test::test_connection;
pub use execution_cache::WorkflowExecutionCache;
pub use log_store::{LogSink, WebhookLogStore};
pub use webhook_sender::{WebhookDispatcher, WebhookRequest, WebhookSender};
pub use workflow_runner::{catalog, find_workflow, WorkflowRunner};
