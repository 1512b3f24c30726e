//! Capability gateway implementations.

pub mod http_gateway;

pub use http_gateway::HttpCapabilityGateway;
