//! Console commands
//!
//! One command per input line. The first word selects the command; the rest
//! of the line is its argument text.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use domain_claims::Decision;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new load cycle
    Refresh,
    /// Set the filter text; the whole remainder of the line is the query
    Search(String),
    /// Clear the filter text
    Clear,
    /// Print counters and the filtered queue
    List,
    /// Open the review panel for a claim
    Open(String),
    /// Approve or reject the open claim
    Decide(Decision),
    /// Show or hide the raw model response
    ToggleRaw,
    /// Close button
    Close,
    /// Cancellation key
    Cancel,
    /// Interaction outside the panel
    Outside,
    /// Look up the fraud ring around a provider
    Cluster { provider: String, days: Option<u32> },
    Status,
    Help,
    Quit,
}

/// Command parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (type `help` for the list)")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("Days window must be a whole number, got `{0}`")]
    InvalidDays(String),
}

impl Command {
    /// Parses a line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "refresh" | "reload" | "r" => Command::Refresh,
            "search" | "find" | "/" => Command::Search(rest.to_string()),
            "clear" => Command::Clear,
            "list" | "ls" => Command::List,
            "open" | "review" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "open",
                        argument: "a claim id",
                    });
                }
                Command::Open(rest.to_string())
            }
            "approve" => Command::Decide(Decision::Approved),
            "reject" => Command::Decide(Decision::Rejected),
            "raw" => Command::ToggleRaw,
            "close" => Command::Close,
            "esc" | "cancel" => Command::Cancel,
            "outside" => Command::Outside,
            "cluster" | "ring" => parse_cluster(rest)?,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Whether the command talks to the service and needs an admin session
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            Command::Refresh | Command::Open(_) | Command::Decide(_) | Command::Cluster { .. }
        )
    }
}

fn parse_cluster(rest: &str) -> Result<Command, CommandError> {
    let mut words = rest.split_whitespace();
    let provider = words.next().ok_or(CommandError::MissingArgument {
        command: "cluster",
        argument: "a provider id",
    })?;
    let days = match words.next() {
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|_| CommandError::InvalidDays(raw.to_string()))?,
        ),
        None => None,
    };
    Ok(Command::Cluster {
        provider: provider.to_string(),
        days,
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)?.ok_or(CommandError::MissingArgument {
            command: "console",
            argument: "a command",
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Refresh => f.write_str("refresh"),
            Command::Search(query) => write!(f, "search {query}"),
            Command::Clear => f.write_str("clear"),
            Command::List => f.write_str("list"),
            Command::Open(id) => write!(f, "open {id}"),
            Command::Decide(Decision::Approved) => f.write_str("approve"),
            Command::Decide(Decision::Rejected) => f.write_str("reject"),
            Command::ToggleRaw => f.write_str("raw"),
            Command::Close => f.write_str("close"),
            Command::Cancel => f.write_str("esc"),
            Command::Outside => f.write_str("outside"),
            Command::Cluster { provider, days: Some(days) } => write!(f, "cluster {provider} {days}"),
            Command::Cluster { provider, days: None } => write!(f, "cluster {provider}"),
            Command::Status => f.write_str("status"),
            Command::Help => f.write_str("help"),
            Command::Quit => f.write_str("quit"),
        }
    }
}

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  list                    counters and the filtered queue
  search <text>           filter by claim id, provider id or diagnosis code
  clear                   clear the filter
  refresh                 reload the queue and counters
  open <claim id>         open the review panel and score the claim
  approve | reject        decide the open claim
  raw                     show/hide the raw model response
  close | esc | outside   close the panel
  cluster <provider> [d]  fraud ring lookup over the last d days (default 30)
  status                  loading and in-flight state
  help                    this text
  quit                    leave the console";
