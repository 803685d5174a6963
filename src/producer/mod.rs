//! Producer sending exchanges to the runtime engine
//!
//! The operation and its arguments are taken from message headers first and
//! from the endpoint configuration second.

mod operation;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub use operation::Operation;

use crate::config::{JbpmConfiguration, split_list};
use crate::constants::{
    HEADER_ENTITY_LIST, HEADER_EVENT, HEADER_EVENT_TYPE, HEADER_LANGUAGE, HEADER_OPERATION,
    HEADER_PARAMETERS, HEADER_PROCESS_ID, HEADER_PROCESS_INSTANCE_ID, HEADER_RESULT_PAGE,
    HEADER_RESULT_PAGE_SIZE, HEADER_STATUS_LIST, HEADER_TARGET_USER_ID, HEADER_TASK_ID,
    HEADER_USER_ID, HEADER_WORK_ITEM_ID,
};
use crate::engine::{Parameters, RuntimeEngine, TaskAction, TaskQuery, TaskStatus};
use crate::error::{JbpmError, Result};
use crate::framework::{Exchange, Message, Producer};

/// Producer bound to a shared runtime engine
#[derive(Clone)]
pub struct JbpmProducer {
    endpoint_uri:  String,
    configuration: Arc<JbpmConfiguration>,
    engine:        Arc<dyn RuntimeEngine>,
}

impl JbpmProducer {
    pub(crate) fn new(
        endpoint_uri: String,
        configuration: Arc<JbpmConfiguration>,
        engine: Arc<dyn RuntimeEngine>,
    ) -> Self {
        Self {
            endpoint_uri,
            configuration,
            engine,
        }
    }

    /// Engine this producer sends to
    pub fn engine(&self) -> &Arc<dyn RuntimeEngine> {
        &self.engine
    }

    /// Perform the exchange's operation; queries replace the body with their result
    pub async fn send(&self, exchange: &mut Exchange) -> Result<()> {
        let arguments = Arguments {
            message:       exchange.message(),
            configuration: &self.configuration,
        };
        let operation = arguments.operation()?;
        debug!("Exchange {} performing {operation}", exchange.id());

        let reply = self.perform(operation, &arguments).await?;
        if let Some(reply) = reply {
            exchange.message_mut().set_body(reply);
        }
        Ok(())
    }

    async fn perform(
        &self,
        operation: Operation,
        arguments: &Arguments<'_>,
    ) -> Result<Option<Value>> {
        let engine = self.engine.as_ref();

        match operation {
            Operation::StartProcess => {
                let process_id = arguments.process_id()?;
                let parameters = arguments.parameters()?;
                let instance = engine.start_process(&process_id, &parameters).await?;
                reply(&instance)
            }
            Operation::AbortProcessInstance => {
                let id = arguments.required_process_instance_id()?;
                engine.abort_process_instance(id).await?;
                Ok(None)
            }
            Operation::SignalEvent => {
                let event_type = arguments.event_type()?;
                let event = arguments.event();
                let instance = arguments.process_instance_id()?;
                engine.signal_event(&event_type, event, instance).await?;
                Ok(None)
            }
            Operation::GetProcessInstance => {
                let id = arguments.required_process_instance_id()?;
                reply(&engine.get_process_instance(id).await?)
            }
            Operation::CompleteWorkItem => {
                let id = arguments.work_item_id()?;
                let results = arguments.parameters()?;
                engine.complete_work_item(id, &results).await?;
                Ok(None)
            }
            Operation::AbortWorkItem => {
                engine.abort_work_item(arguments.work_item_id()?).await?;
                Ok(None)
            }
            Operation::ClaimTask => self.task_action(arguments, TaskAction::Claim).await,
            Operation::StartTask => self.task_action(arguments, TaskAction::Start).await,
            Operation::StopTask => self.task_action(arguments, TaskAction::Stop).await,
            Operation::ReleaseTask => self.task_action(arguments, TaskAction::Release).await,
            Operation::SuspendTask => self.task_action(arguments, TaskAction::Suspend).await,
            Operation::ResumeTask => self.task_action(arguments, TaskAction::Resume).await,
            Operation::SkipTask => self.task_action(arguments, TaskAction::Skip).await,
            Operation::ExitTask => self.task_action(arguments, TaskAction::Exit).await,
            Operation::FailTask => {
                let action = TaskAction::Fail(arguments.parameters()?);
                self.task_action(arguments, action).await
            }
            Operation::CompleteTask => {
                let action = TaskAction::Complete(arguments.parameters()?);
                self.task_action(arguments, action).await
            }
            Operation::DelegateTask => {
                let action = TaskAction::Delegate {
                    target_user_id: arguments.target_user_id()?,
                };
                self.task_action(arguments, action).await
            }
            Operation::NominateTask => {
                let action = TaskAction::Nominate {
                    entities: arguments.entities()?,
                };
                self.task_action(arguments, action).await
            }
            Operation::GetTask => reply(&engine.get_task(arguments.task_id()?).await?),
            Operation::GetTaskContent => {
                let content = engine.get_task_content(arguments.task_id()?).await?;
                Ok(Some(content))
            }
            Operation::GetTaskByWorkItem => {
                let mut query = arguments.task_query()?;
                query.work_item_id = Some(arguments.work_item_id()?);
                let task = engine.query_tasks(&query).await?.into_iter().next();
                reply(&task)
            }
            Operation::GetTasksOwned => {
                let mut query = arguments.task_query()?;
                query.task_owner = Some(arguments.user_id()?);
                reply(&engine.query_tasks(&query).await?)
            }
            Operation::GetTasksAssignedAsPotentialOwner => {
                let mut query = arguments.task_query()?;
                query.potential_owner = Some(arguments.user_id()?);
                reply(&engine.query_tasks(&query).await?)
            }
            Operation::GetTasksByStatusByProcessInstance => {
                let mut query = arguments.task_query()?;
                query.process_instance_id = Some(arguments.required_process_instance_id()?);
                query.statuses = arguments.statuses()?;
                reply(&engine.query_tasks(&query).await?)
            }
        }
    }

    async fn task_action(
        &self,
        arguments: &Arguments<'_>,
        action: TaskAction,
    ) -> Result<Option<Value>> {
        let task_id = arguments.task_id()?;
        self.engine.task_action(task_id, &action).await?;
        Ok(None)
    }
}

#[async_trait]
impl Producer for JbpmProducer {
    fn endpoint_uri(&self) -> &str {
        &self.endpoint_uri
    }

    async fn process(&self, exchange: &mut Exchange) -> Result<()> {
        self.send(exchange).await
    }
}

impl std::fmt::Debug for JbpmProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JbpmProducer")
            .field(
                "endpoint_uri",
                &JbpmConfiguration::redacted_uri(&self.endpoint_uri),
            )
            .finish_non_exhaustive()
    }
}

fn reply<T: Serialize>(value: &T) -> Result<Option<Value>> {
    Ok(Some(serde_json::to_value(value)?))
}

/// Resolves operation arguments, headers before configuration
struct Arguments<'a> {
    message:       &'a Message,
    configuration: &'a JbpmConfiguration,
}

impl Arguments<'_> {
    fn operation(&self) -> Result<Operation> {
        match self.message.get_header(HEADER_OPERATION) {
            Some(value) => Operation::from_str(&header_string(HEADER_OPERATION, value)?),
            None => Operation::from_str(self.configuration.operation()),
        }
    }

    fn string(&self, header: &str, fallback: Option<&str>) -> Result<Option<String>> {
        match self.message.get_header(header) {
            Some(value) => header_string(header, value).map(Some),
            None => Ok(fallback.map(String::from)),
        }
    }

    fn id(&self, header: &str, fallback: Option<i64>) -> Result<Option<i64>> {
        match self.message.get_header(header) {
            Some(value) => header_id(header, value).map(Some),
            None => Ok(fallback),
        }
    }

    fn list(&self, header: &str, fallback: Option<&[String]>) -> Result<Option<Vec<String>>> {
        match self.message.get_header(header) {
            Some(value) => header_list(header, value).map(Some),
            None => Ok(fallback.map(<[String]>::to_vec)),
        }
    }

    fn page_value(&self, header: &str, fallback: u32) -> Result<u32> {
        match self.message.get_header(header) {
            Some(value) => u32::try_from(header_id(header, value)?)
                .map_err(|e| JbpmError::invalid_parameter(header, e.to_string())),
            None => Ok(fallback),
        }
    }

    fn process_id(&self) -> Result<String> {
        self.string(HEADER_PROCESS_ID, self.configuration.process_id())?
            .ok_or(JbpmError::MissingParameter("processId"))
    }

    fn process_instance_id(&self) -> Result<Option<i64>> {
        self.id(
            HEADER_PROCESS_INSTANCE_ID,
            self.configuration.process_instance_id(),
        )
    }

    fn required_process_instance_id(&self) -> Result<i64> {
        self.process_instance_id()?
            .ok_or(JbpmError::MissingParameter("processInstanceId"))
    }

    fn work_item_id(&self) -> Result<i64> {
        self.id(HEADER_WORK_ITEM_ID, self.configuration.work_item_id())?
            .ok_or(JbpmError::MissingParameter("workItemId"))
    }

    fn task_id(&self) -> Result<i64> {
        self.id(HEADER_TASK_ID, self.configuration.task_id())?
            .ok_or(JbpmError::MissingParameter("taskId"))
    }

    fn user_id(&self) -> Result<String> {
        self.string(HEADER_USER_ID, self.configuration.user_id())?
            .ok_or(JbpmError::MissingParameter("userId"))
    }

    fn target_user_id(&self) -> Result<String> {
        self.string(HEADER_TARGET_USER_ID, self.configuration.target_user_id())?
            .ok_or(JbpmError::MissingParameter("targetUserId"))
    }

    fn event_type(&self) -> Result<String> {
        self.string(HEADER_EVENT_TYPE, self.configuration.event_type())?
            .ok_or(JbpmError::MissingParameter("eventType"))
    }

    fn event(&self) -> Option<&Value> {
        self.message
            .get_header(HEADER_EVENT)
            .or_else(|| self.configuration.event())
    }

    fn entities(&self) -> Result<Vec<String>> {
        self.list(HEADER_ENTITY_LIST, self.configuration.entities())?
            .ok_or(JbpmError::MissingParameter("entities"))
    }

    fn statuses(&self) -> Result<Vec<TaskStatus>> {
        match self.message.get_header(HEADER_STATUS_LIST) {
            Some(value) => header_list(HEADER_STATUS_LIST, value)?
                .iter()
                .map(|status| TaskStatus::from_str(status))
                .collect(),
            None => self
                .configuration
                .statuses()
                .map(<[TaskStatus]>::to_vec)
                .ok_or(JbpmError::MissingParameter("statuses")),
        }
    }

    /// Parameters, empty when neither header nor configuration has any
    fn parameters(&self) -> Result<Parameters> {
        match self.message.get_header(HEADER_PARAMETERS) {
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(Value::String(text)) => match serde_json::from_str(text) {
                Ok(Value::Object(map)) => Ok(map),
                _ => Err(JbpmError::invalid_parameter(
                    HEADER_PARAMETERS,
                    "expected a JSON object",
                )),
            },
            Some(_) => Err(JbpmError::invalid_parameter(
                HEADER_PARAMETERS,
                "expected a JSON object",
            )),
            None => Ok(self.configuration.parameters().cloned().unwrap_or_default()),
        }
    }

    fn task_query(&self) -> Result<TaskQuery> {
        let language = self
            .string(HEADER_LANGUAGE, Some(self.configuration.language()))?
            .unwrap_or_default();
        let page = self.page_value(HEADER_RESULT_PAGE, self.configuration.page())?;
        let page_size = self.page_value(HEADER_RESULT_PAGE_SIZE, self.configuration.page_size())?;
        Ok(TaskQuery::new(language, page, page_size))
    }
}

fn header_string(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(JbpmError::invalid_parameter(name, "expected a string")),
    }
}

fn header_id(name: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| JbpmError::invalid_parameter(name, format!("{number} is not an id"))),
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| JbpmError::invalid_parameter(name, format!("'{text}' is not an id"))),
        _ => Err(JbpmError::invalid_parameter(name, "expected a number")),
    }
}

fn header_list(name: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| header_string(name, item))
            .collect(),
        Value::String(text) => Ok(split_list(text)),
        _ => Err(JbpmError::invalid_parameter(name, "expected a list")),
    }
}
