//! Remote runtime engine client
//!
//! [`RuntimeEngine`] is the handle producers call into. The REST implementation
//! is assembled by [`RemoteRestRuntimeEngineBuilder`], which the endpoint feeds
//! from its configuration.

mod builder;
mod rest;
mod types;

use async_trait::async_trait;
use serde_json::Value;

pub use builder::{RemoteRestRuntimeEngineBuilder, RemoteRuntimeEngineFactory, RuntimeEngineBuilder};
pub use rest::RemoteRestRuntimeEngine;
pub use types::{
    Parameters, ProcessInstance, ProcessInstanceState, Task, TaskAction, TaskData, TaskQuery,
    TaskStatus, TaskSummary,
};

use crate::error::Result;

/// Operations a remote runtime engine exposes to producers
#[async_trait]
pub trait RuntimeEngine: Send + Sync {
    /// Start a new instance of a process definition
    async fn start_process(
        &self,
        process_id: &str,
        parameters: &Parameters,
    ) -> Result<ProcessInstance>;

    /// Abort a running process instance
    async fn abort_process_instance(&self, process_instance_id: i64) -> Result<()>;

    /// Signal an event, either to one instance or to the whole deployment
    async fn signal_event(
        &self,
        event_type: &str,
        event: Option<&Value>,
        process_instance_id: Option<i64>,
    ) -> Result<()>;

    /// Look up a process instance, `None` when the engine does not know it
    async fn get_process_instance(&self, process_instance_id: i64)
    -> Result<Option<ProcessInstance>>;

    /// Complete a work item with its results
    async fn complete_work_item(&self, work_item_id: i64, results: &Parameters) -> Result<()>;

    /// Abort a work item
    async fn abort_work_item(&self, work_item_id: i64) -> Result<()>;

    /// Apply a lifecycle action to a human task
    async fn task_action(&self, task_id: i64, action: &TaskAction) -> Result<()>;

    /// Look up a task, `None` when the engine does not know it
    async fn get_task(&self, task_id: i64) -> Result<Option<Task>>;

    /// Fetch the content map attached to a task
    async fn get_task_content(&self, task_id: i64) -> Result<Value>;

    /// List tasks matching a query
    async fn query_tasks(&self, query: &TaskQuery) -> Result<Vec<TaskSummary>>;
}
