use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use url::Url;

use super::RuntimeEngine;
use super::rest::{Credentials, RemoteRestRuntimeEngine};
use crate::error::{JbpmError, Result};

/// Receives configuration values and produces a runtime engine
///
/// Each `add_*` call registers one value; a value that is never added keeps
/// the builder's own default.
pub trait RuntimeEngineBuilder: Sized {
    /// Engine produced by [`Self::build`]
    type Engine: RuntimeEngine + 'static;

    /// Register the authentication user name
    #[must_use]
    fn add_user_name(self, user_name: &str) -> Self;

    /// Register the authentication password
    #[must_use]
    fn add_password(self, password: &str) -> Self;

    /// Register the deployment runtime calls are addressed to
    #[must_use]
    fn add_deployment_id(self, deployment_id: &str) -> Self;

    /// Register the engine's base URL, failing when it is malformed
    fn add_url(self, url: &str) -> Result<Self>;

    /// Register the process instance the engine is bound to
    #[must_use]
    fn add_process_instance_id(self, process_instance_id: i64) -> Self;

    /// Register the request timeout in seconds; 0 means no timeout
    #[must_use]
    fn add_timeout(self, timeout: u32) -> Self;

    /// Register additional payload type names
    #[must_use]
    fn add_extra_classes(self, extra_classes: &[String]) -> Self;

    /// Produce the engine
    fn build(self) -> Result<Self::Engine>;
}

/// Entry point for engine builders
#[derive(Debug)]
pub struct RemoteRuntimeEngineFactory;

impl RemoteRuntimeEngineFactory {
    /// Builder for an engine reached over REST
    pub fn new_rest_builder() -> RemoteRestRuntimeEngineBuilder {
        RemoteRestRuntimeEngineBuilder::default()
    }
}

/// Builder for [`RemoteRestRuntimeEngine`]
#[derive(Default)]
pub struct RemoteRestRuntimeEngineBuilder {
    user_name:           Option<String>,
    password:            Option<String>,
    deployment_id:       Option<String>,
    url:                 Option<Url>,
    process_instance_id: Option<i64>,
    timeout:             Option<Duration>,
    extra_classes:       BTreeSet<String>,
}

impl RuntimeEngineBuilder for RemoteRestRuntimeEngineBuilder {
    type Engine = RemoteRestRuntimeEngine;

    fn add_user_name(mut self, user_name: &str) -> Self {
        self.user_name = Some(user_name.to_string());
        self
    }

    fn add_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    fn add_deployment_id(mut self, deployment_id: &str) -> Self {
        self.deployment_id = Some(deployment_id.to_string());
        self
    }

    fn add_url(mut self, url: &str) -> Result<Self> {
        self.url = Some(parse_base_url(url)?);
        Ok(self)
    }

    fn add_process_instance_id(mut self, process_instance_id: i64) -> Self {
        self.process_instance_id = Some(process_instance_id);
        self
    }

    fn add_timeout(mut self, timeout: u32) -> Self {
        self.timeout = if timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(timeout)))
        };
        self
    }

    fn add_extra_classes(mut self, extra_classes: &[String]) -> Self {
        self.extra_classes.extend(extra_classes.iter().cloned());
        self
    }

    fn build(self) -> Result<RemoteRestRuntimeEngine> {
        let base_url = self
            .url
            .ok_or(JbpmError::MissingConfiguration("connectionURL"))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut client = Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        let credentials = self.user_name.map(|user_name| Credentials {
            user_name,
            password: self.password,
        });

        Ok(RemoteRestRuntimeEngine::new(
            client.build()?,
            base_url,
            credentials,
            self.deployment_id,
            self.process_instance_id,
            self.extra_classes,
        ))
    }
}

impl fmt::Debug for RemoteRestRuntimeEngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteRestRuntimeEngineBuilder")
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "******"))
            .field("deployment_id", &self.deployment_id)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("process_instance_id", &self.process_instance_id)
            .field("timeout", &self.timeout)
            .field("extra_classes", &self.extra_classes)
            .finish()
    }
}

/// Validate an engine base URL
///
/// Only absolute `http`/`https` URLs with a host are accepted.
fn parse_base_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| JbpmError::invalid_url(url, e))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(JbpmError::invalid_url(
            url,
            format!("unsupported scheme {}", parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(JbpmError::invalid_url(url, "missing host"));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_add_url_accepts_http_and_https() {
        assert!(
            RemoteRuntimeEngineFactory::new_rest_builder()
                .add_url("http://localhost:8080/business-central")
                .is_ok()
        );
        assert!(
            RemoteRuntimeEngineFactory::new_rest_builder()
                .add_url("https://engine.example.com/kie-server")
                .is_ok()
        );
    }

    #[test]
    fn test_add_url_rejects_malformed_urls() {
        for url in ["not a url", "localhost:8080", "ftp://engine/kie", "http://", ""] {
            let result = RemoteRuntimeEngineFactory::new_rest_builder().add_url(url);
            assert!(
                matches!(result, Err(JbpmError::InvalidUrl { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_build_requires_url() {
        let result = RemoteRuntimeEngineFactory::new_rest_builder()
            .add_user_name("john")
            .add_deployment_id("org:proj:1.0")
            .build();
        assert!(matches!(
            result,
            Err(JbpmError::MissingConfiguration("connectionURL"))
        ));
    }

    #[test]
    fn test_zero_timeout_disables_timeout() {
        let builder = RemoteRuntimeEngineFactory::new_rest_builder().add_timeout(5);
        assert_eq!(builder.timeout, Some(Duration::from_secs(5)));
        assert_eq!(builder.add_timeout(0).timeout, None);
    }

    #[test]
    fn test_build_carries_registered_values() {
        let engine = RemoteRuntimeEngineFactory::new_rest_builder()
            .add_url("http://localhost:8080/business-central")
            .unwrap()
            .add_deployment_id("org:proj:1.0")
            .add_process_instance_id(12)
            .add_timeout(5)
            .add_extra_classes(&["com.acme.Order".to_string()])
            .build()
            .unwrap();

        assert_eq!(engine.deployment_id(), Some("org:proj:1.0"));
        assert_eq!(engine.process_instance_id(), Some(12));
        assert!(engine.extra_classes().contains("com.acme.Order"));
        assert_eq!(
            engine.base_url().as_str(),
            "http://localhost:8080/business-central"
        );
    }
}
