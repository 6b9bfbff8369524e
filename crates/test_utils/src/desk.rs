//! Review Desk Harness
//!
//! Builds desks over the in-memory port and steps their event loop with a
//! timeout, so an ordering bug fails the test instead of hanging it.

use std::sync::Arc;
use std::time::Duration;

use domain_claims::ports::mock::MockClaimsPort;
use domain_claims::{Claim, ClaimsPort, DeskChange, ReviewDesk};

/// Upper bound on waiting for a single desk event
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a desk over a mock port pre-loaded with `claims`
///
/// The desk is not mounted; tests decide when the first load starts.
pub fn mock_desk(claims: Vec<Claim>) -> (ReviewDesk, Arc<MockClaimsPort>) {
    let port = Arc::new(MockClaimsPort::with_pending(claims));
    let desk = ReviewDesk::new(Arc::clone(&port) as Arc<dyn ClaimsPort>);
    (desk, port)
}

/// Creates a desk and runs its initial load to completion
pub async fn mounted_desk(claims: Vec<Claim>) -> (ReviewDesk, Arc<MockClaimsPort>) {
    let (mut desk, port) = mock_desk(claims);
    desk.mount();
    settle(&mut desk).await;
    (desk, port)
}

/// Applies the next event the desk receives
///
/// # Panics
///
/// Panics if no event arrives within [`EVENT_TIMEOUT`].
pub async fn apply_next(desk: &mut ReviewDesk) -> DeskChange {
    let event = tokio::time::timeout(EVENT_TIMEOUT, desk.next_event())
        .await
        .expect("timed out waiting for a desk event")
        .expect("desk event channel closed");
    desk.apply(event)
}

/// Applies events until the desk has nothing in flight
///
/// # Panics
///
/// Panics if the desk does not go idle within [`EVENT_TIMEOUT`].
pub async fn settle(desk: &mut ReviewDesk) -> Vec<DeskChange> {
    tokio::time::timeout(EVENT_TIMEOUT, desk.run_until_idle())
        .await
        .expect("timed out waiting for the desk to go idle")
}
