//! Claims Review Console
//!
//! Operator front end for the review desk:
//!
//! - `config` - `REVIEW_*` environment configuration
//! - `session` - bearer token and the admin guard
//! - `command` - line commands
//! - `render` - plain-text views
//! - `console` - the event loop tying input and desk events together

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod render;
pub mod session;

pub use command::{Command, CommandError};
pub use config::ConsoleConfig;
pub use console::{Console, Flow};
pub use error::ConsoleError;
pub use session::{Role, Session, SessionClaims, SessionError};
