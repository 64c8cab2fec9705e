//! Supertest Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, and the transport configuration.

pub mod adapters;
pub mod config;

pub use adapters::ReqwestHttpClient;
pub use config::{ClientConfig, ConfigError, ENV_MAX_REDIRECTS, ENV_TIMEOUT_MS, ENV_USER_AGENT};
