//! Endpoint connecting a message router to a remote jBPM runtime engine
//!
//! An endpoint is configured from a `jbpm:` URI whose remainder is the engine's
//! connection URL:
//!
//! ```no_run
//! use jbpm_connector::{Exchange, JbpmComponent, Message};
//!
//! # async fn run() -> jbpm_connector::Result<()> {
//! let endpoint = JbpmComponent::new().create_endpoint(
//!     "jbpm:http://localhost:8080/business-central?userName=bpmsAdmin&password=secret\
//!      &deploymentId=org.kie.example:project1:1.0&processId=evaluation",
//! )?;
//!
//! let mut exchange = Exchange::new(Message::new());
//! endpoint.producer().send(&mut exchange).await?;
//! println!("{:?}", exchange.message().body());
//! # Ok(())
//! # }
//! ```
//!
//! Endpoints only produce; asking one for a consumer fails with
//! [`JbpmError::UnsupportedOperation`].

mod component;
mod config;
pub mod constants;
pub mod engine;
mod error;
mod framework;
mod producer;

pub use component::{JbpmComponent, JbpmEndpoint};
pub use config::JbpmConfiguration;
pub use error::{JbpmError, Result};
pub use framework::{Consumer, Endpoint, Exchange, Message, Processor, Producer};
pub use producer::{JbpmProducer, Operation};
