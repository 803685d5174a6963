//! Routing framework seam: messages, exchanges and the capabilities an endpoint offers

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;

/// A message travelling through a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    headers: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body:    Option<Value>,
}

impl Message {
    /// Empty message
    pub fn new() -> Self {
        Self::default()
    }

    /// Message carrying `body`
    pub fn with_body(body: Value) -> Self {
        Self {
            headers: HashMap::new(),
            body:    Some(body),
        }
    }

    /// Builder style header setter
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Header value, if set
    pub fn get_header(&self, name: &str) -> Option<&Value> {
        self.headers.get(name)
    }

    /// Set or replace a header
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Remove a header, returning its value
    pub fn remove_header(&mut self, name: &str) -> Option<Value> {
        self.headers.remove(name)
    }

    /// All headers
    pub const fn headers(&self) -> &HashMap<String, Value> {
        &self.headers
    }

    /// Message body
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Replace the body
    pub fn set_body(&mut self, body: Value) {
        self.body = Some(body);
    }
}

/// One message exchange, identified for correlation in the logs
#[derive(Debug, Clone)]
pub struct Exchange {
    id:      Uuid,
    message: Message,
}

impl Exchange {
    /// Wrap a message in a new exchange
    pub fn new(message: Message) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
        }
    }

    /// Exchange id
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Current message
    pub const fn message(&self) -> &Message {
        &self.message
    }

    /// Current message, mutably
    pub const fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

/// Handles exchanges handed to it by a consumer
#[async_trait]
pub trait Processor: Send + Sync {
    /// Process one exchange
    async fn process(&self, exchange: &mut Exchange) -> Result<()>;
}

/// Sends exchanges out of the route to an external system
#[async_trait]
pub trait Producer: Send + Sync {
    /// URI of the endpoint this producer belongs to
    fn endpoint_uri(&self) -> &str;

    /// Send one exchange, replacing the body with any reply
    async fn process(&self, exchange: &mut Exchange) -> Result<()>;
}

/// Receives events from an external system and feeds them to a processor
#[async_trait]
pub trait Consumer: Send + Sync {
    /// Begin receiving
    async fn start(&self) -> Result<()>;

    /// Stop receiving
    async fn stop(&self) -> Result<()>;
}

/// A configured connection point of a route
pub trait Endpoint: Send + Sync {
    /// URI the endpoint was created from
    fn endpoint_uri(&self) -> &str;

    /// Capability for sending exchanges
    fn create_producer(&self) -> Result<Box<dyn Producer>>;

    /// Capability for receiving exchanges
    fn create_consumer(&self, processor: Arc<dyn Processor>) -> Result<Box<dyn Consumer>>;

    /// Whether the framework may share one instance for every route using the URI
    fn is_singleton(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_headers() {
        let mut message = Message::with_body(json!("payload"))
            .header("JBPMTaskId", 4)
            .header("JBPMUserId", "john");

        assert_eq!(message.get_header("JBPMTaskId"), Some(&json!(4)));
        assert_eq!(message.headers().len(), 2);
        assert_eq!(message.remove_header("JBPMUserId"), Some(json!("john")));
        assert!(message.get_header("JBPMUserId").is_none());
        assert_eq!(message.body(), Some(&json!("payload")));
    }

    #[test]
    fn test_exchanges_get_distinct_ids() {
        let first = Exchange::new(Message::new());
        let second = Exchange::new(Message::new());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_exchange_message_is_mutable() {
        let mut exchange = Exchange::new(Message::new());
        exchange.message_mut().set_body(json!({"id": 1}));
        assert_eq!(exchange.message().body(), Some(&json!({"id": 1})));
    }
}
