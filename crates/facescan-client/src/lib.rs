//! facescan-client: HTTP endpoint gateway and the capture workflow engine.
//!
//! Talks to the remote inference backend over HTTP and turns each captured
//! image into one of the closed outcome sets defined in `facescan-core`.

pub mod config;
pub mod engine;
pub mod gateway;

pub use config::Config;
pub use engine::{EngineError, WorkflowEngine};
pub use gateway::{Backend, GatewayError, HttpGateway, ScanRecord};
