//! The `jbpm` component and its endpoint
//!
//! An endpoint owns one runtime engine, built when the endpoint is created and
//! shared by every producer it hands out.

use std::sync::Arc;

use tracing::trace;

use crate::config::JbpmConfiguration;
use crate::engine::{RemoteRuntimeEngineFactory, RuntimeEngine, RuntimeEngineBuilder};
use crate::error::{JbpmError, Result};
use crate::framework::{Consumer, Endpoint, Processor, Producer};
use crate::producer::JbpmProducer;

/// Creates endpoints from `jbpm:` URIs
#[derive(Debug, Default)]
pub struct JbpmComponent;

impl JbpmComponent {
    /// Create the component
    pub const fn new() -> Self {
        Self
    }

    /// Parse `uri` and build an endpoint for it
    pub fn create_endpoint(&self, uri: &str) -> Result<JbpmEndpoint> {
        let configuration = JbpmConfiguration::from_uri(uri)?;
        JbpmEndpoint::new(uri, configuration)
    }
}

/// Endpoint talking to a remote runtime engine
pub struct JbpmEndpoint {
    uri:            String,
    configuration:  Arc<JbpmConfiguration>,
    runtime_engine: Arc<dyn RuntimeEngine>,
}

impl JbpmEndpoint {
    /// Build an endpoint backed by the REST runtime engine
    pub fn new(uri: &str, configuration: JbpmConfiguration) -> Result<Self> {
        Self::with_builder(
            uri,
            configuration,
            RemoteRuntimeEngineFactory::new_rest_builder(),
        )
    }

    /// Build an endpoint, forwarding each configured engine field to `builder`
    pub fn with_builder<B: RuntimeEngineBuilder>(
        uri: &str,
        configuration: JbpmConfiguration,
        mut builder: B,
    ) -> Result<Self> {
        trace!("creating endpoint: [{configuration:?}]");

        if let Some(user_name) = configuration.user_name() {
            builder = builder.add_user_name(user_name);
        }
        if let Some(password) = configuration.password() {
            builder = builder.add_password(password);
        }
        if let Some(deployment_id) = configuration.deployment_id() {
            builder = builder.add_deployment_id(deployment_id);
        }
        if let Some(connection_url) = configuration.connection_url() {
            builder = builder.add_url(connection_url)?;
        }
        if let Some(process_instance_id) = configuration.process_instance_id() {
            builder = builder.add_process_instance_id(process_instance_id);
        }
        if let Some(timeout) = configuration.timeout() {
            builder = builder.add_timeout(timeout);
        }
        if let Some(extra_classes) = configuration.extra_classes() {
            builder = builder.add_extra_classes(extra_classes);
        }
        let runtime_engine: Arc<dyn RuntimeEngine> = Arc::new(builder.build()?);

        trace!("creating endpoint done");
        Ok(Self {
            uri: uri.to_string(),
            configuration: Arc::new(configuration),
            runtime_engine,
        })
    }

    /// Configuration the endpoint was created with
    pub fn configuration(&self) -> &JbpmConfiguration {
        &self.configuration
    }

    /// Producer bound to this endpoint's engine
    pub fn producer(&self) -> JbpmProducer {
        JbpmProducer::new(
            self.uri.clone(),
            Arc::clone(&self.configuration),
            Arc::clone(&self.runtime_engine),
        )
    }
}

impl Endpoint for JbpmEndpoint {
    fn endpoint_uri(&self) -> &str {
        &self.uri
    }

    fn create_producer(&self) -> Result<Box<dyn Producer>> {
        Ok(Box::new(self.producer()))
    }

    fn create_consumer(&self, _processor: Arc<dyn Processor>) -> Result<Box<dyn Consumer>> {
        Err(JbpmError::UnsupportedOperation(
            "Consumer not supported for JbpmEndpoint endpoint".to_string(),
        ))
    }

    fn is_singleton(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for JbpmEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JbpmEndpoint")
            .field("uri", &JbpmConfiguration::redacted_uri(&self.uri))
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::engine::{Parameters, ProcessInstance, Task, TaskAction, TaskQuery, TaskSummary};
    use crate::framework::Exchange;

    /// A call received by the recording builder
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum BuilderCall {
        UserName(String),
        Password(String),
        DeploymentId(String),
        Url(String),
        ProcessInstanceId(i64),
        Timeout(u32),
        ExtraClasses(Vec<String>),
    }

    #[derive(Default, Clone)]
    struct RecordingBuilder {
        calls: Arc<Mutex<Vec<BuilderCall>>>,
    }

    impl RecordingBuilder {
        fn push(self, call: BuilderCall) -> Self {
            self.calls.lock().unwrap().push(call);
            self
        }

        fn calls(&self) -> Vec<BuilderCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    struct IdleEngine;

    #[async_trait]
    impl RuntimeEngine for IdleEngine {
        async fn start_process(&self, _: &str, _: &Parameters) -> Result<ProcessInstance> {
            Err(JbpmError::MissingConfiguration("deploymentId"))
        }

        async fn abort_process_instance(&self, _: i64) -> Result<()> {
            Ok(())
        }

        async fn signal_event(&self, _: &str, _: Option<&Value>, _: Option<i64>) -> Result<()> {
            Ok(())
        }

        async fn get_process_instance(&self, _: i64) -> Result<Option<ProcessInstance>> {
            Ok(None)
        }

        async fn complete_work_item(&self, _: i64, _: &Parameters) -> Result<()> {
            Ok(())
        }

        async fn abort_work_item(&self, _: i64) -> Result<()> {
            Ok(())
        }

        async fn task_action(&self, _: i64, _: &TaskAction) -> Result<()> {
            Ok(())
        }

        async fn get_task(&self, _: i64) -> Result<Option<Task>> {
            Ok(None)
        }

        async fn get_task_content(&self, _: i64) -> Result<Value> {
            Ok(Value::Null)
        }

        async fn query_tasks(&self, _: &TaskQuery) -> Result<Vec<TaskSummary>> {
            Ok(Vec::new())
        }
    }

    impl RuntimeEngineBuilder for RecordingBuilder {
        type Engine = IdleEngine;

        fn add_user_name(self, user_name: &str) -> Self {
            self.push(BuilderCall::UserName(user_name.into()))
        }

        fn add_password(self, password: &str) -> Self {
            self.push(BuilderCall::Password(password.into()))
        }

        fn add_deployment_id(self, deployment_id: &str) -> Self {
            self.push(BuilderCall::DeploymentId(deployment_id.into()))
        }

        fn add_url(self, url: &str) -> Result<Self> {
            Ok(self.push(BuilderCall::Url(url.into())))
        }

        fn add_process_instance_id(self, process_instance_id: i64) -> Self {
            self.push(BuilderCall::ProcessInstanceId(process_instance_id))
        }

        fn add_timeout(self, timeout: u32) -> Self {
            self.push(BuilderCall::Timeout(timeout))
        }

        fn add_extra_classes(self, extra_classes: &[String]) -> Self {
            self.push(BuilderCall::ExtraClasses(extra_classes.to_vec()))
        }

        fn build(self) -> Result<IdleEngine> {
            Ok(IdleEngine)
        }
    }

    fn build_with(configuration: JbpmConfiguration) -> Vec<BuilderCall> {
        let builder = RecordingBuilder::default();
        JbpmEndpoint::with_builder("jbpm:", configuration, builder.clone()).unwrap();
        builder.calls()
    }

    #[test]
    fn test_absent_fields_are_not_forwarded() {
        assert!(build_with(JbpmConfiguration::new()).is_empty());
    }

    #[test]
    fn test_present_fields_are_forwarded_exactly() {
        let mut configuration = JbpmConfiguration::new();
        configuration.set_user_name("bpmsAdmin");
        configuration.set_password("pa$word1");
        configuration.set_deployment_id("org.kie.example:project1:1.0");
        configuration.set_connection_url("http://localhost:8080/business-central");
        configuration.set_process_instance_id(42);
        configuration.set_timeout(30);
        configuration.set_extra_classes(vec!["com.acme.Order".into()]);

        assert_eq!(
            build_with(configuration),
            vec![
                BuilderCall::UserName("bpmsAdmin".into()),
                BuilderCall::Password("pa$word1".into()),
                BuilderCall::DeploymentId("org.kie.example:project1:1.0".into()),
                BuilderCall::Url("http://localhost:8080/business-central".into()),
                BuilderCall::ProcessInstanceId(42),
                BuilderCall::Timeout(30),
                BuilderCall::ExtraClasses(vec!["com.acme.Order".into()]),
            ]
        );
    }

    #[test]
    fn test_each_field_forwarded_alone() {
        let mut configuration = JbpmConfiguration::new();
        configuration.set_timeout(7);
        assert_eq!(build_with(configuration), vec![BuilderCall::Timeout(7)]);

        let mut configuration = JbpmConfiguration::new();
        configuration.set_deployment_id("demo");
        assert_eq!(
            build_with(configuration),
            vec![BuilderCall::DeploymentId("demo".into())]
        );
    }

    #[test]
    fn test_producer_fields_are_not_forwarded() {
        let mut configuration = JbpmConfiguration::new();
        configuration.set_operation("claimTask");
        configuration.set_task_id(3);
        configuration.set_user_id("john");
        assert!(build_with(configuration).is_empty());
    }

    #[test]
    fn test_invalid_connection_url_fails_construction() {
        for url in ["not a url", "ftp://engine/kie", "http://"] {
            let mut configuration = JbpmConfiguration::new();
            configuration.set_connection_url(url);
            let result = JbpmEndpoint::new("jbpm:", configuration);
            assert!(
                matches!(result, Err(JbpmError::InvalidUrl { .. })),
                "{url} should fail"
            );
        }
    }

    #[test]
    fn test_component_rejects_invalid_url() {
        let result = JbpmComponent::new().create_endpoint("jbpm:localhost?deploymentId=demo");
        assert!(matches!(result, Err(JbpmError::InvalidUrl { .. })));
    }

    #[test]
    fn test_consumer_is_unsupported() {
        let configurations = [
            JbpmConfiguration::new(),
            JbpmConfiguration::from_uri("jbpm:?deploymentId=demo&userName=john").unwrap(),
        ];

        for configuration in configurations {
            let endpoint =
                JbpmEndpoint::with_builder("jbpm:", configuration, RecordingBuilder::default())
                    .unwrap();
            let result = endpoint.create_consumer(Arc::new(NoopProcessor));
            match result {
                Err(JbpmError::UnsupportedOperation(message)) => {
                    assert_eq!(message, "Consumer not supported for JbpmEndpoint endpoint");
                }
                _ => unreachable!("consumer creation must fail"),
            }
        }
    }

    #[test]
    fn test_rest_endpoint_consumer_is_unsupported() {
        let endpoint = JbpmComponent::new()
            .create_endpoint("jbpm:http://localhost:8080/business-central?deploymentId=demo")
            .unwrap();
        assert!(matches!(
            endpoint.create_consumer(Arc::new(NoopProcessor)),
            Err(JbpmError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_endpoint_is_singleton_sharing_one_engine() {
        let endpoint = JbpmComponent::new()
            .create_endpoint("jbpm:http://localhost:8080/business-central?deploymentId=demo")
            .unwrap();

        assert!(endpoint.is_singleton());
        assert_eq!(
            endpoint.endpoint_uri(),
            "jbpm:http://localhost:8080/business-central?deploymentId=demo"
        );
        assert_eq!(endpoint.configuration().deployment_id(), Some("demo"));

        let first = endpoint.producer();
        let second = endpoint.producer();
        assert!(Arc::ptr_eq(first.engine(), second.engine()));
        assert_eq!(
            endpoint.create_producer().unwrap().endpoint_uri(),
            endpoint.endpoint_uri()
        );
    }

    #[test]
    fn test_debug_output_masks_password() {
        let endpoint = JbpmComponent::new()
            .create_endpoint(
                "jbpm:http://localhost:8080/kie?userName=john&password=s3cr3t&deploymentId=demo",
            )
            .unwrap();

        let rendered = format!("{endpoint:?} {:?}", endpoint.producer());
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("password=******"));
        assert_eq!(endpoint.configuration().password(), Some("s3cr3t"));
    }

    struct NoopProcessor;

    #[async_trait]
    impl Processor for NoopProcessor {
        async fn process(&self, _exchange: &mut Exchange) -> Result<()> {
            Ok(())
        }
    }
}
