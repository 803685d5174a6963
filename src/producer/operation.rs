use std::fmt;
use std::str::FromStr;

use crate::error::JbpmError;

/// Operations the producer can perform against the runtime engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Start a process instance
    StartProcess,
    /// Abort a process instance
    AbortProcessInstance,
    /// Signal an event
    SignalEvent,
    /// Look up a process instance
    GetProcessInstance,
    /// Complete a work item
    CompleteWorkItem,
    /// Abort a work item
    AbortWorkItem,
    /// Claim a task
    ClaimTask,
    /// Start a task
    StartTask,
    /// Stop a task
    StopTask,
    /// Release a task
    ReleaseTask,
    /// Suspend a task
    SuspendTask,
    /// Resume a task
    ResumeTask,
    /// Skip a task
    SkipTask,
    /// Exit a task
    ExitTask,
    /// Fail a task
    FailTask,
    /// Complete a task
    CompleteTask,
    /// Delegate a task
    DelegateTask,
    /// Nominate potential owners of a task
    NominateTask,
    /// Look up a task
    GetTask,
    /// Fetch a task's content
    GetTaskContent,
    /// Find the task created for a work item
    GetTaskByWorkItem,
    /// List tasks owned by a user
    GetTasksOwned,
    /// List tasks a user may claim
    GetTasksAssignedAsPotentialOwner,
    /// List a process instance's tasks in given statuses
    GetTasksByStatusByProcessInstance,
}

impl Operation {
    /// Every operation, in declaration order
    pub const ALL: [Self; 24] = [
        Self::StartProcess,
        Self::AbortProcessInstance,
        Self::SignalEvent,
        Self::GetProcessInstance,
        Self::CompleteWorkItem,
        Self::AbortWorkItem,
        Self::ClaimTask,
        Self::StartTask,
        Self::StopTask,
        Self::ReleaseTask,
        Self::SuspendTask,
        Self::ResumeTask,
        Self::SkipTask,
        Self::ExitTask,
        Self::FailTask,
        Self::CompleteTask,
        Self::DelegateTask,
        Self::NominateTask,
        Self::GetTask,
        Self::GetTaskContent,
        Self::GetTaskByWorkItem,
        Self::GetTasksOwned,
        Self::GetTasksAssignedAsPotentialOwner,
        Self::GetTasksByStatusByProcessInstance,
    ];

    /// Name used in headers and URIs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartProcess => "startProcess",
            Self::AbortProcessInstance => "abortProcessInstance",
            Self::SignalEvent => "signalEvent",
            Self::GetProcessInstance => "getProcessInstance",
            Self::CompleteWorkItem => "completeWorkItem",
            Self::AbortWorkItem => "abortWorkItem",
            Self::ClaimTask => "claimTask",
            Self::StartTask => "startTask",
            Self::StopTask => "stopTask",
            Self::ReleaseTask => "releaseTask",
            Self::SuspendTask => "suspendTask",
            Self::ResumeTask => "resumeTask",
            Self::SkipTask => "skipTask",
            Self::ExitTask => "exitTask",
            Self::FailTask => "failTask",
            Self::CompleteTask => "completeTask",
            Self::DelegateTask => "delegateTask",
            Self::NominateTask => "nominateTask",
            Self::GetTask => "getTask",
            Self::GetTaskContent => "getTaskContent",
            Self::GetTaskByWorkItem => "getTaskByWorkItem",
            Self::GetTasksOwned => "getTasksOwned",
            Self::GetTasksAssignedAsPotentialOwner => "getTasksAssignedAsPotentialOwner",
            Self::GetTasksByStatusByProcessInstance => "getTasksByStatusByProcessInstance",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = JbpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.as_str() == s)
            .ok_or_else(|| JbpmError::UnknownOperation(s.to_string()))
    }
}
