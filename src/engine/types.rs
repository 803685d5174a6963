//! Payload types exchanged with the runtime engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{JbpmError, Result};

/// Named values passed to processes, work items and tasks
pub type Parameters = Map<String, Value>;

/// Lifecycle state of a process instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ProcessInstanceState {
    /// Created but not yet started
    Pending,
    /// Running
    Active,
    /// Reached an end node
    Completed,
    /// Aborted by a user or the engine
    Aborted,
    /// Suspended
    Suspended,
}

impl TryFrom<i32> for ProcessInstanceState {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Active),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Aborted),
            4 => Ok(Self::Suspended),
            other => Err(format!("unknown process instance state {other}")),
        }
    }
}

impl From<ProcessInstanceState> for i32 {
    fn from(state: ProcessInstanceState) -> Self {
        match state {
            ProcessInstanceState::Pending => 0,
            ProcessInstanceState::Active => 1,
            ProcessInstanceState::Completed => 2,
            ProcessInstanceState::Aborted => 3,
            ProcessInstanceState::Suspended => 4,
        }
    }
}

/// A process instance as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInstance {
    /// Instance id
    pub id:                         i64,
    /// Process definition id
    #[serde(rename = "process-id", alias = "processId")]
    pub process_id:                 String,
    /// Current state
    pub state:                      ProcessInstanceState,
    /// Signals the instance is currently waiting for
    #[serde(default, rename = "eventTypes", alias = "event-types")]
    pub event_types:                Vec<String>,
    /// Parent instance when started as a sub-process
    #[serde(
        default,
        rename = "parentProcessInstanceId",
        alias = "parent-process-instance-id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_process_instance_id: Option<i64>,
}

/// Human task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created
    Created,
    /// Ready to be claimed
    Ready,
    /// Claimed by an owner
    Reserved,
    /// Started by its owner
    InProgress,
    /// Suspended
    Suspended,
    /// Completed
    Completed,
    /// Failed
    Failed,
    /// Errored
    Error,
    /// Exited by an administrator
    Exited,
    /// No longer relevant
    Obsolete,
}

impl TaskStatus {
    /// Name used on the wire
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Ready => "Ready",
            Self::Reserved => "Reserved",
            Self::InProgress => "InProgress",
            Self::Suspended => "Suspended",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Error => "Error",
            Self::Exited => "Exited",
            Self::Obsolete => "Obsolete",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = JbpmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Created" => Ok(Self::Created),
            "Ready" => Ok(Self::Ready),
            "Reserved" => Ok(Self::Reserved),
            "InProgress" => Ok(Self::InProgress),
            "Suspended" => Ok(Self::Suspended),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            "Error" => Ok(Self::Error),
            "Exited" => Ok(Self::Exited),
            "Obsolete" => Ok(Self::Obsolete),
            other => Err(JbpmError::invalid_parameter(
                "status",
                format!("unknown task status {other}"),
            )),
        }
    }
}

/// Task as listed by task queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TaskSummary {
    /// Task id
    pub id:                  i64,
    /// Display name
    #[serde(default)]
    pub name:                Option<String>,
    /// Free text description
    #[serde(default)]
    pub description:         Option<String>,
    /// Lifecycle status
    pub status:              TaskStatus,
    /// Priority, lower is more urgent
    #[serde(default)]
    pub priority:            Option<i32>,
    /// User currently owning the task
    #[serde(default, alias = "actualOwner")]
    pub actual_owner:        Option<String>,
    /// User that created the task
    #[serde(default, alias = "createdBy")]
    pub created_by:          Option<String>,
    /// Owning process instance
    #[serde(default, alias = "processInstanceId")]
    pub process_instance_id: Option<i64>,
    /// Owning process definition
    #[serde(default, alias = "processId")]
    pub process_id:          Option<String>,
    /// Deployment the task belongs to
    #[serde(default, alias = "deploymentId")]
    pub deployment_id:       Option<String>,
}

/// Runtime data attached to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    /// Lifecycle status
    pub status:              TaskStatus,
    /// User currently owning the task
    #[serde(default)]
    pub actual_owner:        Option<String>,
    /// Owning process instance
    #[serde(default)]
    pub process_instance_id: Option<i64>,
    /// Work item the task was created for
    #[serde(default)]
    pub work_item_id:        Option<i64>,
    /// Deployment the task belongs to
    #[serde(default)]
    pub deployment_id:       Option<String>,
}

/// Full task as returned by a task lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task id
    pub id:          i64,
    /// Display name
    #[serde(default)]
    pub name:        Option<String>,
    /// Subject line
    #[serde(default)]
    pub subject:     Option<String>,
    /// Free text description
    #[serde(default)]
    pub description: Option<String>,
    /// Priority, lower is more urgent
    #[serde(default)]
    pub priority:    Option<i32>,
    /// Runtime data, absent on partial lookups
    #[serde(default)]
    pub task_data:   Option<TaskData>,
}

/// State change requested on a human task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAction {
    /// Claim the task for the authenticated user
    Claim,
    /// Start working on the task
    Start,
    /// Stop working without completing
    Stop,
    /// Give the task back to the group
    Release,
    /// Suspend
    Suspend,
    /// Resume a suspended task
    Resume,
    /// Skip an optional task
    Skip,
    /// Exit as administrator
    Exit,
    /// Complete with output data
    Complete(Parameters),
    /// Fail with fault data
    Fail(Parameters),
    /// Hand the task to another user
    Delegate {
        /// New owner
        target_user_id: String,
    },
    /// Nominate potential owners
    Nominate {
        /// Users that may claim the task
        entities: Vec<String>,
    },
}

impl TaskAction {
    /// REST path segment for this action
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Release => "release",
            Self::Suspend => "suspend",
            Self::Resume => "resume",
            Self::Skip => "skip",
            Self::Exit => "exit",
            Self::Complete(_) => "complete",
            Self::Fail(_) => "fail",
            Self::Delegate { .. } => "delegate",
            Self::Nominate { .. } => "nominate",
        }
    }
}

/// Filter for task queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Only tasks this user may claim
    pub potential_owner:     Option<String>,
    /// Only tasks owned by this user
    pub task_owner:          Option<String>,
    /// Only tasks of this process instance
    pub process_instance_id: Option<i64>,
    /// Only the task created for this work item
    pub work_item_id:        Option<i64>,
    /// Only tasks in one of these statuses; empty matches all
    pub statuses:            Vec<TaskStatus>,
    /// Language of task names and descriptions
    pub language:            String,
    /// Zero based result page
    pub page:                u32,
    /// Results per page
    pub page_size:           u32,
}

impl TaskQuery {
    /// Query with no filters on the given result page
    pub fn new(language: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            potential_owner: None,
            task_owner: None,
            process_instance_id: None,
            work_item_id: None,
            statuses: Vec::new(),
            language: language.into(),
            page,
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn test_process_instance_from_engine_json() {
        let instance: ProcessInstance = serde_json::from_value(json!({
            "status": "SUCCESS",
            "url": "/business-central/rest/runtime/org:proj:1.0/process/evaluation/start",
            "id": 7,
            "process-id": "evaluation",
            "state": 1,
            "eventTypes": ["approve"]
        }))
        .unwrap();

        assert_eq!(instance.id, 7);
        assert_eq!(instance.process_id, "evaluation");
        assert_eq!(instance.state, ProcessInstanceState::Active);
        assert_eq!(instance.event_types, vec!["approve"]);
        assert_eq!(instance.parent_process_instance_id, None);
    }

    #[test]
    fn test_process_instance_rejects_unknown_state() {
        let result = serde_json::from_value::<ProcessInstance>(json!({
            "id": 1, "process-id": "p", "state": 9
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_task_summary_from_engine_json() {
        let summary: TaskSummary = serde_json::from_value(json!({
            "id": 3,
            "name": "Approve",
            "status": "Reserved",
            "actual-owner": "john",
            "process-instance-id": 7
        }))
        .unwrap();

        assert_eq!(summary.status, TaskStatus::Reserved);
        assert_eq!(summary.actual_owner.as_deref(), Some("john"));
        assert_eq!(summary.process_instance_id, Some(7));
    }

    #[test]
    fn test_task_with_task_data() {
        let task: Task = serde_json::from_value(json!({
            "id": 3,
            "name": "Approve",
            "taskData": {"status": "InProgress", "actualOwner": "mary", "workItemId": 11}
        }))
        .unwrap();

        let data = task.task_data.unwrap();
        assert_eq!(data.status, TaskStatus::InProgress);
        assert_eq!(data.work_item_id, Some(11));
    }

    #[test]
    fn test_task_status_parsing() {
        assert_eq!(
            "InProgress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert!("Done".parse::<TaskStatus>().is_err());
        assert_eq!(TaskStatus::Obsolete.to_string(), "Obsolete");
    }

    #[test]
    fn test_task_action_paths() {
        assert_eq!(TaskAction::Claim.path(), "claim");
        assert_eq!(TaskAction::Complete(Parameters::new()).path(), "complete");
        assert_eq!(
            TaskAction::Delegate {
                target_user_id: "mary".into(),
            }
            .path(),
            "delegate"
        );
    }
}
