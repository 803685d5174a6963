//! Endpoint configuration parsed from `jbpm:` URIs
//!
//! The remainder of the URI after the scheme is the engine's connection URL,
//! and the query string carries every other option:
//!
//! ```text
//! jbpm:http://localhost:8080/business-central?userName=bpmsAdmin&deploymentId=org.kie:evaluation:1.0
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::constants::{
    DEFAULT_LANGUAGE, DEFAULT_OPERATION, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PARAM_CONNECTION_URL,
    PARAM_DEPLOYMENT_ID, PARAM_ENTITIES, PARAM_EVENT, PARAM_EVENT_TYPE, PARAM_EXTRA_CLASSES,
    PARAM_EXTRA_JAXB_CLASSES, PARAM_LANGUAGE, PARAM_OPERATION, PARAM_PAGE, PARAM_PAGE_SIZE,
    PARAM_PARAMETERS, PARAM_PASSWORD, PARAM_PROCESS_ID, PARAM_PROCESS_INSTANCE_ID,
    PARAM_STATUSES, PARAM_TARGET_USER_ID, PARAM_TASK_ID, PARAM_TIMEOUT, PARAM_USER_ID,
    PARAM_USER_NAME, PARAM_WORK_ITEM_ID, URI_SCHEME,
};
use crate::engine::TaskStatus;
use crate::error::{JbpmError, Result};

/// Options for a jBPM endpoint
///
/// Every field is optional. Engine fields are only forwarded to the engine
/// builder when present; producer fields act as defaults that message headers
/// can override.
#[derive(Clone, Default, PartialEq)]
pub struct JbpmConfiguration {
    // Engine fields
    user_name:           Option<String>,
    password:            Option<String>,
    deployment_id:       Option<String>,
    connection_url:      Option<String>,
    process_instance_id: Option<i64>,
    timeout:             Option<u32>,
    extra_classes:       Option<Vec<String>>,

    // Producer defaults
    operation:      Option<String>,
    process_id:     Option<String>,
    parameters:     Option<Map<String, Value>>,
    event_type:     Option<String>,
    event:          Option<Value>,
    work_item_id:   Option<i64>,
    task_id:        Option<i64>,
    user_id:        Option<String>,
    target_user_id: Option<String>,
    entities:       Option<Vec<String>>,
    statuses:       Option<Vec<TaskStatus>>,
    language:       Option<String>,
    page:           Option<u32>,
    page_size:      Option<u32>,
}

impl JbpmConfiguration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `jbpm:<connectionURL>?key=value&...` endpoint URI
    pub fn from_uri(uri: &str) -> Result<Self> {
        let remainder = uri
            .strip_prefix(URI_SCHEME)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| {
                JbpmError::InvalidUri(format!(
                    "{} does not start with {URI_SCHEME}:",
                    Self::redacted_uri(uri)
                ))
            })?;

        let (location, query) = match remainder.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (remainder, None),
        };

        let mut configuration = Self::new();
        if !location.is_empty() {
            configuration.connection_url = Some(location.to_string());
        }

        if let Some(query) = query {
            for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                configuration.apply_parameter(&key, &value)?;
            }
        }

        Ok(configuration)
    }

    /// Copy of an endpoint URI safe to log, with the `password` value masked
    pub fn redacted_uri(uri: &str) -> String {
        let Some((location, query)) = uri.split_once('?') else {
            return uri.to_string();
        };

        let mut redacted = form_urlencoded::Serializer::new(String::new());
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == PARAM_PASSWORD {
                redacted.append_pair(&key, MASK);
            } else {
                redacted.append_pair(&key, &value);
            }
        }
        format!("{location}?{}", redacted.finish())
    }

    fn apply_parameter(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            PARAM_USER_NAME => self.user_name = Some(value.to_string()),
            PARAM_PASSWORD => self.password = Some(value.to_string()),
            PARAM_DEPLOYMENT_ID => self.deployment_id = Some(value.to_string()),
            PARAM_CONNECTION_URL => self.connection_url = Some(value.to_string()),
            PARAM_PROCESS_INSTANCE_ID => self.process_instance_id = Some(parse_number(key, value)?),
            PARAM_TIMEOUT => self.timeout = Some(parse_number(key, value)?),
            PARAM_EXTRA_JAXB_CLASSES | PARAM_EXTRA_CLASSES => {
                self.extra_classes = Some(split_list(value));
            }
            PARAM_OPERATION => self.operation = Some(value.to_string()),
            PARAM_PROCESS_ID => self.process_id = Some(value.to_string()),
            PARAM_PARAMETERS => match serde_json::from_str(value) {
                Ok(Value::Object(map)) => self.parameters = Some(map),
                Ok(_) => return Err(JbpmError::invalid_parameter(key, "expected a JSON object")),
                Err(e) => return Err(JbpmError::invalid_parameter(key, e.to_string())),
            },
            PARAM_EVENT_TYPE => self.event_type = Some(value.to_string()),
            // Plain text events are common, so anything that is not JSON stays a string
            PARAM_EVENT => {
                self.event = Some(
                    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.into())),
                );
            }
            PARAM_WORK_ITEM_ID => self.work_item_id = Some(parse_number(key, value)?),
            PARAM_TASK_ID => self.task_id = Some(parse_number(key, value)?),
            PARAM_USER_ID => self.user_id = Some(value.to_string()),
            PARAM_TARGET_USER_ID => self.target_user_id = Some(value.to_string()),
            PARAM_ENTITIES => self.entities = Some(split_list(value)),
            PARAM_STATUSES => {
                self.statuses = Some(
                    split_list(value)
                        .iter()
                        .map(|status| TaskStatus::from_str(status))
                        .collect::<Result<Vec<_>>>()?,
                );
            }
            PARAM_LANGUAGE => self.language = Some(value.to_string()),
            PARAM_PAGE => self.page = Some(parse_number(key, value)?),
            PARAM_PAGE_SIZE => self.page_size = Some(parse_number(key, value)?),
            unknown => {
                return Err(JbpmError::InvalidUri(format!(
                    "Unknown parameter {unknown} for {URI_SCHEME} endpoint"
                )));
            }
        }
        Ok(())
    }

    /// User name for basic authentication
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Set the user name
    pub fn set_user_name(&mut self, user_name: impl Into<String>) {
        self.user_name = Some(user_name.into());
    }

    /// Password for basic authentication
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Set the password
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    /// Deployment the runtime calls are addressed to
    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment_id.as_deref()
    }

    /// Set the deployment id
    pub fn set_deployment_id(&mut self, deployment_id: impl Into<String>) {
        self.deployment_id = Some(deployment_id.into());
    }

    /// Base URL of the engine application
    pub fn connection_url(&self) -> Option<&str> {
        self.connection_url.as_deref()
    }

    /// Set the connection URL
    pub fn set_connection_url(&mut self, connection_url: impl Into<String>) {
        self.connection_url = Some(connection_url.into());
    }

    /// Process instance the engine is bound to
    pub const fn process_instance_id(&self) -> Option<i64> {
        self.process_instance_id
    }

    /// Set the process instance id
    pub const fn set_process_instance_id(&mut self, process_instance_id: i64) {
        self.process_instance_id = Some(process_instance_id);
    }

    /// Request timeout in seconds
    pub const fn timeout(&self) -> Option<u32> {
        self.timeout
    }

    /// Set the request timeout in seconds
    pub const fn set_timeout(&mut self, timeout: u32) {
        self.timeout = Some(timeout);
    }

    /// Additional payload type names the engine should accept
    pub fn extra_classes(&self) -> Option<&[String]> {
        self.extra_classes.as_deref()
    }

    /// Set the extra payload type names
    pub fn set_extra_classes(&mut self, extra_classes: Vec<String>) {
        self.extra_classes = Some(extra_classes);
    }

    /// Default operation, `startProcess` unless configured
    pub fn operation(&self) -> &str {
        self.operation.as_deref().unwrap_or(DEFAULT_OPERATION)
    }

    /// Set the default operation
    pub fn set_operation(&mut self, operation: impl Into<String>) {
        self.operation = Some(operation.into());
    }

    /// Default process definition id
    pub fn process_id(&self) -> Option<&str> {
        self.process_id.as_deref()
    }

    /// Set the default process definition id
    pub fn set_process_id(&mut self, process_id: impl Into<String>) {
        self.process_id = Some(process_id.into());
    }

    /// Default process or work item parameters
    pub const fn parameters(&self) -> Option<&Map<String, Value>> {
        self.parameters.as_ref()
    }

    /// Set the default parameters
    pub fn set_parameters(&mut self, parameters: Map<String, Value>) {
        self.parameters = Some(parameters);
    }

    /// Default signal type
    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    /// Set the default signal type
    pub fn set_event_type(&mut self, event_type: impl Into<String>) {
        self.event_type = Some(event_type.into());
    }

    /// Default signal payload
    pub const fn event(&self) -> Option<&Value> {
        self.event.as_ref()
    }

    /// Set the default signal payload
    pub fn set_event(&mut self, event: Value) {
        self.event = Some(event);
    }

    /// Default work item id
    pub const fn work_item_id(&self) -> Option<i64> {
        self.work_item_id
    }

    /// Set the default work item id
    pub const fn set_work_item_id(&mut self, work_item_id: i64) {
        self.work_item_id = Some(work_item_id);
    }

    /// Default task id
    pub const fn task_id(&self) -> Option<i64> {
        self.task_id
    }

    /// Set the default task id
    pub const fn set_task_id(&mut self, task_id: i64) {
        self.task_id = Some(task_id);
    }

    /// Default user for task queries
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Set the default user
    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
    }

    /// Default delegation target
    pub fn target_user_id(&self) -> Option<&str> {
        self.target_user_id.as_deref()
    }

    /// Set the default delegation target
    pub fn set_target_user_id(&mut self, target_user_id: impl Into<String>) {
        self.target_user_id = Some(target_user_id.into());
    }

    /// Default nomination entities
    pub fn entities(&self) -> Option<&[String]> {
        self.entities.as_deref()
    }

    /// Set the default nomination entities
    pub fn set_entities(&mut self, entities: Vec<String>) {
        self.entities = Some(entities);
    }

    /// Default task status filter
    pub fn statuses(&self) -> Option<&[TaskStatus]> {
        self.statuses.as_deref()
    }

    /// Set the default task status filter
    pub fn set_statuses(&mut self, statuses: Vec<TaskStatus>) {
        self.statuses = Some(statuses);
    }

    /// Language for task queries, `en-UK` unless configured
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Set the query language
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    /// Result page for task queries
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Set the result page
    pub const fn set_page(&mut self, page: u32) {
        self.page = Some(page);
    }

    /// Result page size for task queries
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Set the result page size
    pub const fn set_page_size(&mut self, page_size: u32) {
        self.page_size = Some(page_size);
    }
}

// Credentials never reach the logs
impl fmt::Debug for JbpmConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JbpmConfiguration")
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| MASK))
            .field("deployment_id", &self.deployment_id)
            .field("connection_url", &self.connection_url)
            .field("process_instance_id", &self.process_instance_id)
            .field("timeout", &self.timeout)
            .field("extra_classes", &self.extra_classes)
            .field("operation", &self.operation)
            .field("process_id", &self.process_id)
            .field("task_id", &self.task_id)
            .field("work_item_id", &self.work_item_id)
            .finish_non_exhaustive()
    }
}

const MASK: &str = "******";

fn parse_number<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| JbpmError::invalid_parameter(name, format!("'{value}': {e}")))
}

/// Split a comma separated list, dropping blanks
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
