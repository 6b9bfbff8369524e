//! Claims Review - Operator Console Binary
//!
//! Loads the review queue from the claims service and lets an admin
//! operator score, approve and reject pending claims from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a local claims service
//! REVIEW_TOKEN=eyJ... cargo run --bin claims-review
//!
//! # Go through the portal gateway instead
//! REVIEW_ROUTING=gateway REVIEW_GATEWAY_URL=http://localhost:5173 cargo run --bin claims-review
//! ```
//!
//! # Environment Variables
//!
//! * `REVIEW_ROUTING` - `direct` or `gateway` (default: direct)
//! * `REVIEW_SERVICE_URL` - Claims service origin (default: http://localhost:8000)
//! * `REVIEW_GATEWAY_URL` - Gateway origin (default: http://localhost:5173)
//! * `REVIEW_API_PREFIX` - Path prefix of every endpoint (default: /api)
//! * `REVIEW_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! * `REVIEW_TOKEN` - Session token issued at login
//! * `REVIEW_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::sync::Arc;

use core_kernel::HealthCheckable;
use domain_claims::{ClaimsPort, ReviewDesk};
use infra_http::HttpClaimsAdapter;
use interface_cli::{Console, ConsoleConfig, Session};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the console.
///
/// # Errors
///
/// Returns an error if:
/// - The routing mode or base URL is invalid
/// - A configured token is not an unexpired admin token
/// - The terminal cannot be read or written
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = load_config();

    // stdout carries the console views; logs go to stderr
    init_tracing(&config.log_level);

    let service = config.service_config()?;
    tracing::info!(
        routing = %service.routing,
        base_url = %service.base_url(),
        "Starting claims review console"
    );

    let session = Session::new(config.token());
    let adapter = Arc::new(HttpClaimsAdapter::new(&service, Arc::new(session.clone()))?);

    let health = adapter.health_check().await;
    tracing::info!(
        adapter = %health.adapter_id,
        status = ?health.status,
        latency_ms = health.latency_ms,
        message = ?health.message,
        "Claims service health"
    );

    let desk = ReviewDesk::new(adapter as Arc<dyn ClaimsPort>);
    let mut console = Console::new(desk, session, std::io::stdout());
    console.start()?;
    console.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}

/// Loads console configuration from environment variables.
///
/// Falls back to individual variables or defaults when the `REVIEW_*` set
/// does not deserialize as a whole.
fn load_config() -> ConsoleConfig {
    ConsoleConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Ignoring malformed REVIEW_* configuration: {e}");
        let defaults = ConsoleConfig::default();
        ConsoleConfig {
            routing: std::env::var("REVIEW_ROUTING").unwrap_or(defaults.routing),
            service_url: std::env::var("REVIEW_SERVICE_URL").unwrap_or(defaults.service_url),
            gateway_url: std::env::var("REVIEW_GATEWAY_URL").unwrap_or(defaults.gateway_url),
            api_prefix: std::env::var("REVIEW_API_PREFIX").unwrap_or(defaults.api_prefix),
            timeout_secs: std::env::var("REVIEW_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            token: std::env::var("REVIEW_TOKEN").ok(),
            log_level: std::env::var("REVIEW_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
        }
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
