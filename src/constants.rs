//! Names shared by endpoint URIs, message headers and the REST client

// Endpoint URI
/// Scheme prefix of endpoint URIs
pub const URI_SCHEME: &str = "jbpm";

// URI parameter names
/// User name for basic authentication
pub const PARAM_USER_NAME: &str = "userName";
/// Password for basic authentication
pub const PARAM_PASSWORD: &str = "password";
/// Deployment runtime calls are addressed to
pub const PARAM_DEPLOYMENT_ID: &str = "deploymentId";
/// Engine base URL, when not given as the URI remainder
pub const PARAM_CONNECTION_URL: &str = "connectionURL";
/// Process instance the engine is bound to
pub const PARAM_PROCESS_INSTANCE_ID: &str = "processInstanceId";
/// Request timeout in seconds; 0 disables it
pub const PARAM_TIMEOUT: &str = "timeout";
/// Comma separated payload class names
pub const PARAM_EXTRA_JAXB_CLASSES: &str = "extraJaxbClasses";
/// Alias of [`PARAM_EXTRA_JAXB_CLASSES`]
pub const PARAM_EXTRA_CLASSES: &str = "extraClasses";
/// Default operation
pub const PARAM_OPERATION: &str = "operation";
/// Default process definition id
pub const PARAM_PROCESS_ID: &str = "processId";
/// Default process or work item parameters as a JSON object
pub const PARAM_PARAMETERS: &str = "parameters";
/// Default signal name
pub const PARAM_EVENT_TYPE: &str = "eventType";
/// Default signal payload
pub const PARAM_EVENT: &str = "event";
/// Default work item id
pub const PARAM_WORK_ITEM_ID: &str = "workItemId";
/// Default task id
pub const PARAM_TASK_ID: &str = "taskId";
/// Default user for task queries
pub const PARAM_USER_ID: &str = "userId";
/// Default delegation target
pub const PARAM_TARGET_USER_ID: &str = "targetUserId";
/// Default nomination list
pub const PARAM_ENTITIES: &str = "entities";
/// Default task status filter
pub const PARAM_STATUSES: &str = "statuses";
/// Default query language
pub const PARAM_LANGUAGE: &str = "language";
/// Default result page
pub const PARAM_PAGE: &str = "page";
/// Default result page size
pub const PARAM_PAGE_SIZE: &str = "pageSize";

// Producer defaults
/// Operation used when neither header nor URI names one
pub const DEFAULT_OPERATION: &str = "startProcess";
/// Query language used when none is configured
pub const DEFAULT_LANGUAGE: &str = "en-UK";
/// First result page
pub const DEFAULT_PAGE: u32 = 0;
/// Results per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// Message header names
/// Operation override
pub const HEADER_OPERATION: &str = "JBPMOperation";
/// Process definition id
pub const HEADER_PROCESS_ID: &str = "JBPMProcessId";
/// Process instance id
pub const HEADER_PROCESS_INSTANCE_ID: &str = "JBPMProcessInstanceId";
/// Process or work item parameters
pub const HEADER_PARAMETERS: &str = "JBPMParameters";
/// Signal name
pub const HEADER_EVENT_TYPE: &str = "JBPMEventType";
/// Signal payload
pub const HEADER_EVENT: &str = "JBPMEvent";
/// Work item id
pub const HEADER_WORK_ITEM_ID: &str = "JBPMWorkItemId";
/// Task id
pub const HEADER_TASK_ID: &str = "JBPMTaskId";
/// User for task queries
pub const HEADER_USER_ID: &str = "JBPMUserId";
/// Delegation target
pub const HEADER_TARGET_USER_ID: &str = "JBPMTargetUserId";
/// Nomination list
pub const HEADER_ENTITY_LIST: &str = "JBPMEntityList";
/// Task status filter
pub const HEADER_STATUS_LIST: &str = "JBPMStatusList";
/// Query language
pub const HEADER_LANGUAGE: &str = "JBPMLanguage";
/// Result page
pub const HEADER_RESULT_PAGE: &str = "JBPMResultPage";
/// Result page size
pub const HEADER_RESULT_PAGE_SIZE: &str = "JBPMResultPageSize";

// REST resource path segments
pub(crate) const REST_ROOT: &str = "rest";
pub(crate) const REST_RUNTIME: &str = "runtime";
pub(crate) const REST_TASK: &str = "task";
pub(crate) const REST_PROCESS: &str = "process";
pub(crate) const REST_INSTANCE: &str = "instance";
pub(crate) const REST_WORK_ITEM: &str = "workitem";
pub(crate) const REST_START: &str = "start";
pub(crate) const REST_ABORT: &str = "abort";
pub(crate) const REST_COMPLETE: &str = "complete";
pub(crate) const REST_SIGNAL: &str = "signal";
pub(crate) const REST_CONTENT: &str = "content";
pub(crate) const REST_QUERY: &str = "query";

// REST query parameter names
pub(crate) const QUERY_MAP_PREFIX: &str = "map_";
pub(crate) const QUERY_SIGNAL: &str = "signal";
pub(crate) const QUERY_EVENT: &str = "event";
pub(crate) const QUERY_PROCESS_INSTANCE_ID: &str = "processInstanceId";
pub(crate) const QUERY_WORK_ITEM_ID: &str = "workItemId";
pub(crate) const QUERY_TARGET_ENTITY_ID: &str = "targetEntityId";
pub(crate) const QUERY_USER: &str = "user";
pub(crate) const QUERY_POTENTIAL_OWNER: &str = "potentialOwner";
pub(crate) const QUERY_TASK_OWNER: &str = "taskOwner";
pub(crate) const QUERY_STATUS: &str = "status";
pub(crate) const QUERY_LANGUAGE: &str = "language";
pub(crate) const QUERY_PAGE: &str = "page";
pub(crate) const QUERY_PAGE_SIZE: &str = "pageSize";

// JSON field names
pub(crate) const JSON_FIELD_CLASS: &str = "@class";
pub(crate) const JSON_FIELD_MESSAGE: &str = "message";
pub(crate) const JSON_FIELD_LIST: &str = "list";
pub(crate) const JSON_FIELD_TASK_SUMMARY: &str = "task-summary";
pub(crate) const JSON_FIELD_CONTENT_MAP: &str = "contentMap";
