//! Sandbox request and decision types.
//!
//! The out-of-process runner lives in `artifex-sandbox`; these are the
//! shared shapes of what goes in and what comes out. Sensitive-artifact
//! downloads fail closed: every terminal state other than `Approved` maps
//! to `approved == false`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The parameters handed to an access-policy script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxRequest {
    /// Name of the artifact being downloaded.
    pub model_name: String,
    /// The user who uploaded the artifact (and owns the policy).
    pub uploader: String,
    /// The user requesting the download.
    pub downloader: String,
    /// Storage path of the artifact archive.
    pub artifact_path: String,
}

/// Lifecycle of one sandbox invocation.
///
/// `Idle → Running → {Approved, Rejected, TimedOut, Crashed}`; the four
/// right-hand states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxState {
    Idle,
    Running,
    /// The script exited with code 0.
    Approved,
    /// The script exited with a non-zero code.
    Rejected,
    /// The script exceeded the wall-clock timeout and was killed.
    TimedOut,
    /// The script could not be started or died without an exit code.
    Crashed,
}

impl SandboxState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SandboxState::Idle | SandboxState::Running)
    }
}

impl fmt::Display for SandboxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SandboxState::Idle => "idle",
            SandboxState::Running => "running",
            SandboxState::Approved => "approved",
            SandboxState::Rejected => "rejected",
            SandboxState::TimedOut => "timed_out",
            SandboxState::Crashed => "crashed",
        };
        f.write_str(s)
    }
}

/// The access decision derived from a sandbox run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    /// True only when the script exited with code 0. Timeouts and crashes
    /// are always `false` — the sandbox never fails open.
    pub approved: bool,

    /// Human-readable explanation. Script output may feed this string but
    /// never the decision itself.
    pub reason: String,

    /// The terminal state the invocation ended in, for diagnosis.
    pub state: SandboxState,
}

impl AccessDecision {
    pub fn approved(reason: impl Into<String>) -> Self {
        Self {
            approved: true,
            reason: reason.into(),
            state: SandboxState::Approved,
        }
    }

    pub fn denied(state: SandboxState, reason: impl Into<String>) -> Self {
        debug_assert!(state.is_terminal());
        Self {
            approved: false,
            reason: reason.into(),
            state,
        }
    }
}
