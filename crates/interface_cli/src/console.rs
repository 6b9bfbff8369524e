//! Operator console
//!
//! A single loop owns the [`ReviewDesk`]. It waits on two sources at once:
//! operator input lines and settled network tasks. Whichever arrives first
//! is handled to completion before the next wait, so desk state only ever
//! changes on this task.
//!
//! Privileged commands re-check the session before they run. A console
//! started without a token skips the check and lets the service decide.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use domain_claims::{ClusterQuery, DeskChange, DeskEvent, PanelPhase, ReviewDesk};

use crate::command::{Command, HELP};
use crate::error::ConsoleError;
use crate::render;
use crate::session::Session;

/// Whether the loop keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end over a review desk
pub struct Console<W: Write> {
    desk: ReviewDesk,
    session: Session,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(desk: ReviewDesk, session: Session, out: W) -> Self {
        Self { desk, session, out }
    }

    pub fn desk(&self) -> &ReviewDesk {
        &self.desk
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Checks the session and starts the first load
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Session` when a configured token is invalid,
    /// expired or lacks the admin role.
    pub fn start(&mut self) -> Result<(), ConsoleError> {
        if self.session.has_token() {
            let claims = self.session.require_admin()?;
            info!(email = ?claims.email, "Admin session accepted");
        } else {
            warn!("No session token configured; requests go out unauthenticated");
        }

        if self.desk.mount() {
            self.say("Loading review queue…")?;
        }
        Ok(())
    }

    /// Runs until `quit` or end of input
    ///
    /// At end of input the loop keeps applying events until nothing is in
    /// flight, so a decision typed last still reaches the service.
    pub async fn run<R>(&mut self, input: R) -> Result<(), ConsoleError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if self.handle_line(&line).await? == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        debug!("Input closed");
                        self.drain().await?;
                        break;
                    }
                },
                Some(event) = self.desk.next_event() => self.on_event(event)?,
            }
        }
        info!("Console closed");
        Ok(())
    }

    /// Applies events until no task is outstanding
    pub async fn drain(&mut self) -> Result<(), ConsoleError> {
        while !self.desk.is_idle() {
            match self.desk.next_event().await {
                Some(event) => self.on_event(event)?,
                None => break,
            }
        }
        Ok(())
    }

    /// Parses and executes one input line
    ///
    /// Parse failures are reported to the operator, not returned.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow, ConsoleError> {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                self.say(&format!("Error: {e}"))?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn execute(&mut self, command: Command) -> Result<Flow, ConsoleError> {
        if command.is_privileged() && self.session.has_token() {
            if let Err(e) = self.session.require_admin() {
                warn!(command = %command, error = %e, "Session check failed");
                self.say(&format!("Error: {e}"))?;
                return Ok(Flow::Continue);
            }
        }

        match command {
            Command::Refresh => {
                let cycle = self.desk.refresh();
                debug!(cycle = cycle.number(), "Refresh requested");
                self.say("Refreshing…")?;
            }
            Command::Search(query) => {
                self.desk.set_query(&query);
                self.show_queue()?;
            }
            Command::Clear => {
                self.desk.set_query("");
                self.show_queue()?;
            }
            Command::List => {
                self.say(&render::summary_line(&self.desk.summary()))?;
                if let Some(banner) = render::banner(self.desk.error()) {
                    self.say(&banner)?;
                }
                self.show_queue()?;
            }
            Command::Open(claim_id) => match self.desk.open_review_by_id(&claim_id) {
                Ok(_) => self.show_panel()?,
                Err(e) => self.say(&format!("Error: {e}"))?,
            },
            Command::Decide(decision) => {
                if self.desk.decide(decision) {
                    self.say(&format!("Submitting {decision}…"))?;
                } else {
                    let reason = self.decide_refusal();
                    self.say(reason)?;
                }
            }
            Command::ToggleRaw => match self.desk.toggle_raw() {
                Ok(_) => self.show_panel()?,
                Err(e) => self.say(&format!("Error: {e}"))?,
            },
            Command::Close => match self.desk.close_review() {
                Ok(true) => self.say("Review closed.")?,
                Ok(false) => self.say("No review panel is open.")?,
                Err(e) => self.say(&format!("Error: {e}"))?,
            },
            Command::Cancel => {
                let closed = self.desk.cancel_key();
                self.report_dismissal(closed)?;
            }
            Command::Outside => {
                let closed = self.desk.dismiss_outside();
                self.report_dismissal(closed)?;
            }
            Command::Cluster { provider, days } => match ClusterQuery::new(&provider, days) {
                Ok(query) => match self.desk.lookup_cluster(&query).await {
                    Ok(report) => self.say(&render::cluster_view(&report))?,
                    Err(message) => self.say(&format!("Error: {message}"))?,
                },
                Err(e) => self.say(&format!("Error: {e}"))?,
            },
            Command::Status => {
                let status = format!(
                    "loading: {} | in flight: {} | filter: {:?} | panel: {:?}",
                    if self.desk.is_loading() { "yes" } else { "no" },
                    self.desk.in_flight(),
                    self.desk.query(),
                    self.desk.panel().phase(),
                );
                self.say(&status)?;
            }
            Command::Help => self.say(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Applies a settled task and prints what changed
    pub fn on_event(&mut self, event: DeskEvent) -> Result<(), ConsoleError> {
        let change = self.desk.apply(event);
        if let Some(notice) = render::change_notice(&change) {
            self.say(&notice)?;
        }

        match change {
            DeskChange::QueueUpdated => self.show_queue(),
            DeskChange::SummaryUpdated => self.say(&render::summary_line(&self.desk.summary())),
            DeskChange::PanelUpdated | DeskChange::DecisionFailed(_) => self.show_panel(),
            DeskChange::LoadFailed(_) | DeskChange::DecisionPersisted { .. } | DeskChange::Ignored => Ok(()),
        }
    }

    fn report_dismissal(&mut self, closed: bool) -> Result<(), ConsoleError> {
        if closed {
            self.say("Review closed.")
        } else if self.desk.panel().is_busy() {
            self.say("Decision in progress; the review stays open.")
        } else {
            Ok(())
        }
    }

    fn decide_refusal(&self) -> &'static str {
        let panel = self.desk.panel();
        if panel.is_busy() {
            "A decision is already being submitted."
        } else {
            match panel.phase() {
                PanelPhase::Closed => "No review panel is open.",
                PanelPhase::ScoringInFlight => "Wait for scoring to finish.",
                PanelPhase::Scored | PanelPhase::ScoringFailed => "Decision not accepted.",
            }
        }
    }

    fn show_queue(&mut self) -> Result<(), ConsoleError> {
        let table = render::queue_table(&self.desk.visible_claims(), self.desk.is_loading());
        self.say(&table)
    }

    fn show_panel(&mut self) -> Result<(), ConsoleError> {
        match self.desk.panel().current() {
            Some(panel) => {
                let view = render::panel_view(panel);
                self.say(&view)
            }
            None => Ok(()),
        }
    }

    fn say(&mut self, text: &str) -> Result<(), ConsoleError> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }
}
