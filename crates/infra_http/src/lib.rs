//! Infrastructure HTTP Layer
//!
//! This crate connects the review desk to the remote claims service over
//! REST, implementing `ClaimsPort` with reqwest.
//!
//! # Routing
//!
//! The service is reached either directly or through a same-origin gateway
//! (`BaseRouting`). In both cases every endpoint lives under one API prefix
//! (default `/api`), applied exactly once.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_http::{HttpClaimsAdapter, ServiceConfig};
//!
//! let config = ServiceConfig::gateway("http://localhost:5173");
//! let adapter = HttpClaimsAdapter::new(&config, credential)?;
//! ```

pub mod config;
pub mod dto;
pub mod client;
pub mod error;

pub use config::{BaseRouting, ServiceConfig};
pub use client::HttpClaimsAdapter;
pub use error::HttpConfigError;
