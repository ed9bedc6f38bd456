//! Submission session state machine

/// States of one submit/poll/deploy session
///
/// State transitions:
/// ```text
/// Idle → Sending → AwaitingResponse → Deployed → Terminal
///           ↑              │
///           │              ├→ Waiting ──────────┐
///           │              └→ ReUploadRequested ┤
///           └──────────────────────────────────┘
///        Any non-terminal state → Failed (on error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing sent yet
    #[default]
    Idle,
    /// A request is being written
    Sending,
    /// Request flushed, blocked on the response
    AwaitingResponse,
    /// Server asked to query again later
    Waiting,
    /// Server asked for the full project again
    ReUploadRequested,
    /// Artifacts received and handed to the deployer
    Deployed,
    /// Session finished successfully
    Terminal,
    /// Session aborted
    Failed,
}

impl SessionState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Idle, Sending)
                | (Sending, AwaitingResponse)
                | (AwaitingResponse, Waiting)
                | (AwaitingResponse, ReUploadRequested)
                | (AwaitingResponse, Deployed)
                | (Waiting, Sending)
                | (ReUploadRequested, Sending)
                | (Deployed, Terminal)
                | (Idle, Failed)
                | (Sending, Failed)
                | (AwaitingResponse, Failed)
                | (Waiting, Failed)
                | (ReUploadRequested, Failed)
                | (Deployed, Failed)
        )
    }

    /// Check if the session has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminal | SessionState::Failed)
    }

    /// Get a human-readable description of this state
    pub fn description(&self) -> &'static str {
        match self {
            SessionState::Idle => "Nothing sent yet",
            SessionState::Sending => "Sending request",
            SessionState::AwaitingResponse => "Waiting for the server response",
            SessionState::Waiting => "Waiting before the next result query",
            SessionState::ReUploadRequested => "Server requested the project again",
            SessionState::Deployed => "Artifacts received",
            SessionState::Terminal => "Session completed",
            SessionState::Failed => "Session failed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Sending => write!(f, "Sending"),
            SessionState::AwaitingResponse => write!(f, "AwaitingResponse"),
            SessionState::Waiting => write!(f, "Waiting"),
            SessionState::ReUploadRequested => write!(f, "ReUploadRequested"),
            SessionState::Deployed => write!(f, "Deployed"),
            SessionState::Terminal => write!(f, "Terminal"),
            SessionState::Failed => write!(f, "Failed"),
        }
    }
}


#[cfg(test)]
#[path = "lifecycle/lifecycle_parameterized_tests.rs"]
mod lifecycle_parameterized_tests;
