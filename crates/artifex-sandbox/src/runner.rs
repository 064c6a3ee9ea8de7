//! The out-of-process policy runner.
//!
//! An uploader-supplied policy script is opaque, untrusted text. It is
//! written to a private temp file, executed under a configured interpreter
//! in a cleaned environment, and judged on its exit code alone:
//!
//! - exit 0            → `Approved`
//! - non-zero exit     → `Rejected`
//! - wall-clock expiry → group-killed, `TimedOut`
//! - spawn failure, exit 126/127 (interpreter or script could not run),
//!   or death without an exit code → `Crashed`
//!
//! Every outcome except `Approved` denies the download. Script stdout and
//! stderr are drained and logged for diagnosis but never influence the
//! decision.
//!
//! Containment invariants:
//!
//! - The child runs as the leader of its own process group; on timeout the
//!   whole group is SIGKILLed, so a forked grandchild cannot outlive the
//!   deadline holding our pipes open.
//! - Pipe drains are collected with a grace deadline, never an unbounded
//!   join — even a process that escaped the group (setsid) cannot stall
//!   the caller past timeout + grace.
//! - When the host supports unprivileged network namespaces, the child is
//!   spawned under `unshare -r -n` and sees no network interfaces beyond
//!   a downed loopback. Where unavailable this degrades to a logged
//!   warning; it is containment hardening, not part of the decision
//!   contract.

use std::fs;
use std::io::Read;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{mpsc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use artifex_contracts::artifact::AccessPolicy;
use artifex_contracts::sandbox::{AccessDecision, SandboxRequest, SandboxState};
use artifex_core::traits::DownloadAuthorizer;

/// How often the runner polls a live child for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to wait for the output drains after the child is gone. The
/// pipes close when the process group dies, so this only triggers when
/// something detached itself from the group and kept a pipe end open.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Removes the temp script when the invocation ends, however it ends.
struct TempScript {
    path: PathBuf,
}

impl Drop for TempScript {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove policy temp file");
        }
    }
}

/// Reads a pipe to the end on its own thread, delivering over a channel
/// so the caller can bound how long it waits for the result.
fn drain(stream: Option<impl Read + Send + 'static>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut out = String::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_string(&mut out);
        }
        let _ = tx.send(out);
    });
    rx
}

fn script_digest(source: &str) -> String {
    hex::encode(Sha256::digest(source.as_bytes()))
}

/// Whether this host can give the child an empty network namespace.
///
/// Checked once per process: `unshare -r -n true` succeeds exactly when
/// unprivileged user+network namespaces are usable here.
fn network_isolation_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        let works = Command::new("unshare")
            .args(["-r", "-n", "true"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if !works {
            warn!("network namespaces unavailable; policy scripts run without network isolation");
        }
        works
    })
}

/// SIGKILL the child's whole process group, then reap the child.
///
/// The child was spawned as its own group leader, so its pgid equals its
/// pid and this reaches every descendant it forked.
fn kill_group(child: &mut Child) {
    let pgid = child.id() as libc::pid_t;
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
    let _ = child.wait();
}

/// The production `DownloadAuthorizer`: one interpreter subprocess per
/// authorization request.
#[derive(Debug, Clone)]
pub struct PolicySandbox {
    interpreter: String,
    timeout: Duration,
    isolate_network: bool,
}

impl PolicySandbox {
    pub fn new(interpreter: impl Into<String>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout,
            isolate_network: network_isolation_available(),
        }
    }

    /// True when policy scripts run inside an empty network namespace.
    pub fn network_isolated(&self) -> bool {
        self.isolate_network
    }

    fn command(&self) -> Command {
        if self.isolate_network {
            let mut command = Command::new("unshare");
            command.args(["-r", "-n"]).arg(&self.interpreter);
            command
        } else {
            Command::new(&self.interpreter)
        }
    }

    /// Poll the child until exit or deadline. Returns `None` when the
    /// deadline passed and the process group was killed.
    fn wait_with_deadline(&self, child: &mut Child) -> Option<std::process::ExitStatus> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Some(status),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        kill_group(child);
                        return None;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    warn!(error = %e, "failed to poll policy script; killing its group");
                    kill_group(child);
                    return None;
                }
            }
        }
    }
}

impl DownloadAuthorizer for PolicySandbox {
    fn authorize(&self, policy: &AccessPolicy, request: &SandboxRequest) -> AccessDecision {
        let digest = script_digest(&policy.source);
        debug!(
            script_sha256 = %digest,
            model = %request.model_name,
            downloader = %request.downloader,
            network_isolated = self.isolate_network,
            state = %SandboxState::Idle,
            "preparing policy sandbox"
        );

        let path = std::env::temp_dir().join(format!("artifex-policy-{}.sh", Uuid::new_v4()));
        if let Err(e) = fs::write(&path, &policy.source) {
            warn!(path = %path.display(), error = %e, "could not stage policy script");
            return AccessDecision::denied(
                SandboxState::Crashed,
                format!("policy script could not be staged for execution: {}", e),
            );
        }
        let _script = TempScript { path: path.clone() };

        let started = Instant::now();
        let spawned = self
            .command()
            .arg(&path)
            .arg(&request.model_name)
            .arg(&request.uploader)
            .arg(&request.downloader)
            .arg(&request.artifact_path)
            .env_clear()
            .env("PATH", "/usr/bin:/bin")
            .env("ARTIFEX_MODEL_NAME", &request.model_name)
            .env("ARTIFEX_UPLOADER", &request.uploader)
            .env("ARTIFEX_DOWNLOADER", &request.downloader)
            .env("ARTIFEX_ARTIFACT_PATH", &request.artifact_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                warn!(
                    interpreter = %self.interpreter,
                    error = %e,
                    "policy interpreter failed to start"
                );
                return AccessDecision::denied(
                    SandboxState::Crashed,
                    format!(
                        "policy interpreter '{}' could not be started: {}",
                        self.interpreter, e
                    ),
                );
            }
        };
        debug!(script_sha256 = %digest, state = %SandboxState::Running, "policy script running");

        let stdout_rx = drain(child.stdout.take());
        let stderr_rx = drain(child.stderr.take());

        let status = self.wait_with_deadline(&mut child);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        // Bounded: a stray pipe holder cannot stall us past the grace.
        let stdout = stdout_rx.recv_timeout(DRAIN_GRACE).unwrap_or_default();
        let stderr = stderr_rx.recv_timeout(DRAIN_GRACE).unwrap_or_default();
        if !stderr.trim().is_empty() {
            debug!(script_sha256 = %digest, stderr = %stderr.trim(), "policy script stderr");
        }

        let decision = match status {
            None => AccessDecision::denied(
                SandboxState::TimedOut,
                format!(
                    "policy script exceeded the {}ms limit and its process group was terminated",
                    self.timeout.as_millis()
                ),
            ),
            Some(status) => match status.code() {
                Some(0) => AccessDecision::approved("policy script approved the download (exit 0)"),
                // Shell convention: 126 = found but not runnable, 127 =
                // command not found. Both mean the script never ran to a
                // decision, which is a crash, not a rejection verdict.
                Some(code @ (126 | 127)) => AccessDecision::denied(
                    SandboxState::Crashed,
                    format!(
                        "policy interpreter '{}' could not run the script (exit code {})",
                        self.interpreter, code
                    ),
                ),
                Some(code) => AccessDecision::denied(
                    SandboxState::Rejected,
                    format!("policy script denied the download (exit code {})", code),
                ),
                // Killed by a signal other than our own timeout path.
                None => AccessDecision::denied(
                    SandboxState::Crashed,
                    "policy script terminated without an exit code",
                ),
            },
        };

        info!(
            script_sha256 = %digest,
            model = %request.model_name,
            downloader = %request.downloader,
            state = %decision.state,
            approved = decision.approved,
            elapsed_ms,
            stdout_bytes = stdout.len(),
            "policy sandbox finished"
        );
        decision
    }
}
