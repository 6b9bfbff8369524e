//! Core Kernel - Foundational types for the claims review desk
//!
//! This crate provides the building blocks shared by the domain, adapter and
//! console crates:
//! - Strongly-typed identifiers issued by the remote claims service
//! - Port infrastructure (errors, marker traits, credentials, health checks)

pub mod identifiers;
pub mod ports;

pub use identifiers::{ClaimId, ProviderId, IdentifierError};
pub use ports::{
    PortError, DomainPort, CredentialSource, StaticCredential,
    HealthCheckable, HealthCheckResult, AdapterHealth,
};
