//! REST client for the engine's `/rest/runtime` and `/rest/task` resources

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{
    Parameters, ProcessInstance, RuntimeEngine, Task, TaskAction, TaskQuery, TaskSummary,
};
use crate::constants::{
    JSON_FIELD_CLASS, JSON_FIELD_CONTENT_MAP, JSON_FIELD_LIST, JSON_FIELD_MESSAGE,
    JSON_FIELD_TASK_SUMMARY, QUERY_EVENT, QUERY_LANGUAGE, QUERY_MAP_PREFIX, QUERY_PAGE,
    QUERY_PAGE_SIZE, QUERY_POTENTIAL_OWNER, QUERY_PROCESS_INSTANCE_ID, QUERY_SIGNAL,
    QUERY_STATUS, QUERY_TARGET_ENTITY_ID, QUERY_TASK_OWNER, QUERY_USER, QUERY_WORK_ITEM_ID,
    REST_ABORT, REST_COMPLETE, REST_CONTENT, REST_INSTANCE, REST_PROCESS, REST_QUERY, REST_ROOT,
    REST_RUNTIME, REST_SIGNAL, REST_START, REST_TASK, REST_WORK_ITEM,
};
use crate::error::{JbpmError, Result};

type Query = Vec<(String, String)>;

/// Basic authentication credentials
pub(super) struct Credentials {
    pub(super) user_name: String,
    pub(super) password:  Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "******"))
            .finish()
    }
}

/// Runtime engine reached over HTTP
#[derive(Debug)]
pub struct RemoteRestRuntimeEngine {
    client:              Client,
    base_url:            Url,
    credentials:         Option<Credentials>,
    deployment_id:       Option<String>,
    process_instance_id: Option<i64>,
    extra_classes:       BTreeSet<String>,
}

impl RemoteRestRuntimeEngine {
    pub(super) const fn new(
        client: Client,
        base_url: Url,
        credentials: Option<Credentials>,
        deployment_id: Option<String>,
        process_instance_id: Option<i64>,
        extra_classes: BTreeSet<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            credentials,
            deployment_id,
            process_instance_id,
            extra_classes,
        }
    }

    /// Base URL of the engine application
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Deployment runtime calls are addressed to
    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment_id.as_deref()
    }

    /// Process instance context sent with runtime calls
    pub const fn process_instance_id(&self) -> Option<i64> {
        self.process_instance_id
    }

    /// Payload type names accepted in `@class` tagged values
    pub const fn extra_classes(&self) -> &BTreeSet<String> {
        &self.extra_classes
    }

    /// URL of a resource below `<base>/rest`
    fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| JbpmError::invalid_url(self.base_url.as_str(), "cannot be a base URL"))?
            .pop_if_empty()
            .push(REST_ROOT)
            .extend(segments);
        Ok(url)
    }

    /// URL of a resource below `<base>/rest/runtime/<deploymentId>`
    fn runtime_url(&self, segments: &[&str]) -> Result<Url> {
        let deployment_id = self
            .deployment_id
            .as_deref()
            .ok_or(JbpmError::MissingConfiguration("deploymentId"))?;

        let mut full = Vec::with_capacity(segments.len() + 2);
        full.push(REST_RUNTIME);
        full.push(deployment_id);
        full.extend_from_slice(segments);
        self.resource_url(&full)
    }

    /// Query pairs every runtime call carries
    fn runtime_query(&self) -> Query {
        self.process_instance_id
            .map(|id| vec![(QUERY_PROCESS_INSTANCE_ID.to_string(), id.to_string())])
            .unwrap_or_default()
    }

    /// Flatten parameters into `map_` query pairs
    fn map_parameters(&self, parameters: &Parameters, query: &mut Query) -> Result<()> {
        for (name, value) in parameters {
            self.check_registered(value)?;
            if let Some(text) = value_text(value) {
                query.push((format!("{QUERY_MAP_PREFIX}{name}"), text));
            }
        }
        Ok(())
    }

    /// Reject `@class` tagged values whose type was never registered
    fn check_registered(&self, value: &Value) -> Result<()> {
        match value {
            Value::Object(map) => {
                let class = map.get(JSON_FIELD_CLASS).and_then(Value::as_str);
                if let Some(class) = class.filter(|class| !self.extra_classes.contains(*class)) {
                    return Err(JbpmError::UnregisteredClass(class.to_string()));
                }
                map.values().try_for_each(|nested| self.check_registered(nested))
            }
            Value::Array(items) => items.iter().try_for_each(|item| self.check_registered(item)),
            _ => Ok(()),
        }
    }

    async fn send(&self, method: Method, url: Url, query: &Query) -> Result<Response> {
        debug!("{method} {url}");

        let mut request = self.client.request(method, url).query(query);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.user_name, credentials.password.as_deref());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = failure_message(status, body);
        warn!("Runtime engine returned HTTP {status}: {message}");
        Err(JbpmError::RemoteEngine {
            status: status.as_u16(),
            message,
        })
    }

    async fn post(&self, url: Url, query: &Query) -> Result<()> {
        self.send(Method::POST, url, query).await.map(drop)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &Query) -> Result<T> {
        Ok(self.send(Method::GET, url, query).await?.json().await?)
    }
}

#[async_trait]
impl RuntimeEngine for RemoteRestRuntimeEngine {
    async fn start_process(
        &self,
        process_id: &str,
        parameters: &Parameters,
    ) -> Result<ProcessInstance> {
        let url = self.runtime_url(&[REST_PROCESS, process_id, REST_START])?;
        let mut query = self.runtime_query();
        self.map_parameters(parameters, &mut query)?;

        Ok(self.send(Method::POST, url, &query).await?.json().await?)
    }

    async fn abort_process_instance(&self, process_instance_id: i64) -> Result<()> {
        let id = process_instance_id.to_string();
        let url = self.runtime_url(&[REST_PROCESS, REST_INSTANCE, &id, REST_ABORT])?;
        self.post(url, &self.runtime_query()).await
    }

    async fn signal_event(
        &self,
        event_type: &str,
        event: Option<&Value>,
        process_instance_id: Option<i64>,
    ) -> Result<()> {
        let url = match process_instance_id {
            Some(id) => {
                let id = id.to_string();
                self.runtime_url(&[REST_PROCESS, REST_INSTANCE, &id, REST_SIGNAL])?
            }
            None => self.runtime_url(&[REST_SIGNAL])?,
        };

        let mut query = self.runtime_query();
        query.push((QUERY_SIGNAL.to_string(), event_type.to_string()));
        if let Some(event) = event {
            self.check_registered(event)?;
            if let Some(text) = value_text(event) {
                query.push((QUERY_EVENT.to_string(), text));
            }
        }

        self.post(url, &query).await
    }

    async fn get_process_instance(
        &self,
        process_instance_id: i64,
    ) -> Result<Option<ProcessInstance>> {
        let id = process_instance_id.to_string();
        let url = self.runtime_url(&[REST_PROCESS, REST_INSTANCE, &id])?;
        not_found_as_none(self.get_json(url, &self.runtime_query()).await)
    }

    async fn complete_work_item(&self, work_item_id: i64, results: &Parameters) -> Result<()> {
        let id = work_item_id.to_string();
        let url = self.runtime_url(&[REST_WORK_ITEM, &id, REST_COMPLETE])?;
        let mut query = self.runtime_query();
        self.map_parameters(results, &mut query)?;
        self.post(url, &query).await
    }

    async fn abort_work_item(&self, work_item_id: i64) -> Result<()> {
        let id = work_item_id.to_string();
        let url = self.runtime_url(&[REST_WORK_ITEM, &id, REST_ABORT])?;
        self.post(url, &self.runtime_query()).await
    }

    async fn task_action(&self, task_id: i64, action: &TaskAction) -> Result<()> {
        let id = task_id.to_string();
        let url = self.resource_url(&[REST_TASK, &id, action.path()])?;

        let mut query = Query::new();
        match action {
            TaskAction::Complete(data) | TaskAction::Fail(data) => {
                self.map_parameters(data, &mut query)?;
            }
            TaskAction::Delegate { target_user_id } => {
                query.push((QUERY_TARGET_ENTITY_ID.to_string(), target_user_id.clone()));
            }
            TaskAction::Nominate { entities } => {
                query.extend(
                    entities
                        .iter()
                        .map(|entity| (QUERY_USER.to_string(), entity.clone())),
                );
            }
            _ => {}
        }

        self.post(url, &query).await
    }

    async fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        let id = task_id.to_string();
        let url = self.resource_url(&[REST_TASK, &id])?;
        not_found_as_none(self.get_json(url, &Query::new()).await)
    }

    async fn get_task_content(&self, task_id: i64) -> Result<Value> {
        let id = task_id.to_string();
        let url = self.resource_url(&[REST_TASK, &id, REST_CONTENT])?;
        let mut content: Value = self.get_json(url, &Query::new()).await?;

        Ok(match content.get_mut(JSON_FIELD_CONTENT_MAP) {
            Some(map) => map.take(),
            None => content,
        })
    }

    async fn query_tasks(&self, query: &TaskQuery) -> Result<Vec<TaskSummary>> {
        let url = self.resource_url(&[REST_TASK, REST_QUERY])?;

        let mut pairs = Query::new();
        if let Some(owner) = &query.potential_owner {
            pairs.push((QUERY_POTENTIAL_OWNER.to_string(), owner.clone()));
        }
        if let Some(owner) = &query.task_owner {
            pairs.push((QUERY_TASK_OWNER.to_string(), owner.clone()));
        }
        if let Some(id) = query.process_instance_id {
            pairs.push((QUERY_PROCESS_INSTANCE_ID.to_string(), id.to_string()));
        }
        if let Some(id) = query.work_item_id {
            pairs.push((QUERY_WORK_ITEM_ID.to_string(), id.to_string()));
        }
        pairs.extend(
            query
                .statuses
                .iter()
                .map(|status| (QUERY_STATUS.to_string(), status.to_string())),
        );
        pairs.push((QUERY_LANGUAGE.to_string(), query.language.clone()));
        pairs.push((QUERY_PAGE.to_string(), query.page.to_string()));
        pairs.push((QUERY_PAGE_SIZE.to_string(), query.page_size.to_string()));

        let response: Value = self.get_json(url, &pairs).await?;
        parse_task_summaries(response)
    }
}

/// Text form of a parameter value, `None` for null
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn failure_message(status: StatusCode, body: String) -> String {
    let from_json = serde_json::from_str::<Value>(&body).ok().and_then(|json| {
        json.get(JSON_FIELD_MESSAGE)
            .and_then(Value::as_str)
            .map(String::from)
    });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        None => body,
    }
}

fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(JbpmError::RemoteEngine { status: 404, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Summaries arrive either as a bare array or under `list`, each item
/// optionally wrapped in a `task-summary` object
fn parse_task_summaries(response: Value) -> Result<Vec<TaskSummary>> {
    let items = match response {
        Value::Array(items) => items,
        Value::Object(mut body) => match body.remove(JSON_FIELD_LIST) {
            Some(Value::Array(items)) => items,
            _ => return Err(unexpected_task_list("object without a task list")),
        },
        other => return Err(unexpected_task_list(&other.to_string())),
    };

    items
        .into_iter()
        .map(|item| {
            let item = match item {
                Value::Object(mut wrapper) if wrapper.contains_key(JSON_FIELD_TASK_SUMMARY) => {
                    wrapper.remove(JSON_FIELD_TASK_SUMMARY).unwrap_or_default()
                }
                other => other,
            };
            Ok(serde_json::from_value(item)?)
        })
        .collect()
}

fn unexpected_task_list(found: &str) -> JbpmError {
    JbpmError::Serialization(<serde_json::Error as serde::de::Error>::custom(format!(
        "expected a task summary list, got {found}"
    )))
}
