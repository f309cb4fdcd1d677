//! Workflow page status machine.
//!
//! The page moves through Idle → Connected → Fetching → Done, with Error
//! reachable from the connect and fetch steps. The transition table is
//! embedded in the page so the client script rejects the same illegal moves.

use serde::{Deserialize, Serialize};

/// Shown when the callback reports an unknown error code.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Shown when the auth URL request itself fails.
pub const CONNECT_FAILED: &str = "Failed to connect to Gmail. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Idle,
    Connected,
    Fetching,
    Done,
    Error,
}

/// Every legal (from, to) pair.
pub const TRANSITIONS: &[(WorkflowStatus, WorkflowStatus)] = &[
    (WorkflowStatus::Idle, WorkflowStatus::Connected),
    (WorkflowStatus::Idle, WorkflowStatus::Error),
    (WorkflowStatus::Connected, WorkflowStatus::Fetching),
    (WorkflowStatus::Fetching, WorkflowStatus::Done),
    (WorkflowStatus::Fetching, WorkflowStatus::Error),
    (WorkflowStatus::Done, WorkflowStatus::Connected),
    (WorkflowStatus::Error, WorkflowStatus::Idle),
];

impl WorkflowStatus {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WorkflowStatus) -> bool {
        TRANSITIONS.contains(&(*self, target))
    }

    /// Move to `target`, or report the illegal transition.
    pub fn transition(self, target: WorkflowStatus) -> Result<WorkflowStatus, String> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(format!("Cannot transition from {self} to {target}"))
        }
    }
}

impl Default for WorkflowStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Connected => "connected",
            Self::Fetching => "fetching",
            Self::Done => "done",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Page state on first render: a status plus the message shown in the
/// error panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitialView {
    pub status: WorkflowStatus,
    pub error: Option<String>,
}

impl InitialView {
    /// Derive the landing status from the OAuth callback redirect.
    ///
    /// `connected=true` wins over an `error` code; an empty `error` counts as
    /// absent. Anything else stays idle.
    pub fn from_query(connected: Option<&str>, error: Option<&str>) -> Self {
        let idle = WorkflowStatus::Idle;
        if connected == Some("true") {
            return Self {
                status: idle.transition(WorkflowStatus::Connected).unwrap_or(idle),
                error: None,
            };
        }
        match error.filter(|code| !code.is_empty()) {
            Some(code) => Self {
                status: idle.transition(WorkflowStatus::Error).unwrap_or(idle),
                error: Some(error_message(code).to_string()),
            },
            None => Self {
                status: idle,
                error: None,
            },
        }
    }
}

/// User-facing text for a callback error code.
pub fn error_message(code: &str) -> &'static str {
    match code {
        "access_denied" => "You denied access to Gmail. Please try again and allow access.",
        "no_code" => "No authorization code received. Please try again.",
        "token_exchange_failed" => "Failed to authenticate with Gmail. Please try again.",
        _ => GENERIC_ERROR,
    }
}

/// Transition table as JSON: `{"idle": ["connected", "error"], ...}`.
pub fn transition_table_json() -> serde_json::Value {
    let mut table = serde_json::Map::new();
    for (from, to) in TRANSITIONS {
        let entry = table
            .entry(from.to_string())
            .or_insert_with(|| serde_json::Value::Array(Vec::new()));
        if let serde_json::Value::Array(targets) = entry {
            targets.push(serde_json::Value::String(to.to_string()));
        }
    }
    serde_json::Value::Object(table)
}
