//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims review test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for claims, scores and counters
//! - `builders`: Builder patterns for test data construction
//! - `desk`: Helpers for driving a review desk over the mock port
//! - `assertions`: Custom assertion helpers for desk state
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod desk;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use desk::*;
pub use assertions::*;
pub use generators::*;
