//! Spawning a NUPACK tool and owning its lifetime for one request.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use serde_json::Value;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, error, warn};

use nupack_common::NupackError;
use nupack_config::{RunnerConfig, ToolConfig};

use crate::extract::{extract_json, ExtractError};
use crate::script::PromptScript;
use crate::session::PromptSession;
use crate::Result;

/// How one tool is launched.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    name: String,
    launcher: Vec<String>,
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(name: impl Into<String>, tool: &ToolConfig, launcher: &[String]) -> Self {
        Self {
            name: name.into(),
            launcher: launcher.to_vec(),
            program: tool.program.clone(),
            args: tool.args.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full command line, for logs and error messages.
    pub fn display(&self) -> String {
        self.argv().collect::<Vec<_>>().join(" ")
    }

    fn argv(&self) -> impl Iterator<Item = &str> {
        self.launcher
            .iter()
            .chain(std::iter::once(&self.program))
            .chain(self.args.iter())
            .map(String::as_str)
    }

    fn command(&self) -> Command {
        let mut argv = self.argv();
        // argv always yields at least the program
        let mut cmd = Command::new(argv.next().unwrap_or(self.program.as_str()));
        cmd.args(argv)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Time and size bounds applied to one tool run.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub prompt: Duration,
    pub harvest: Duration,
    pub exit: Duration,
    pub max_output_bytes: usize,
}

impl From<&RunnerConfig> for Limits {
    fn from(cfg: &RunnerConfig) -> Self {
        Self {
            prompt: cfg.prompt_timeout(),
            harvest: cfg.harvest_timeout(),
            exit: cfg.exit_timeout(),
            max_output_bytes: cfg.max_output_bytes,
        }
    }
}

/// Exit code and parsed JSON of a finished tool run.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRun {
    pub status: i32,
    pub result: Value,
}

enum Exit {
    Exited(ExitStatus),
    /// Still running after the exit timeout; killed and reaped.
    Killed,
    Lost(String),
}

/// Spawn `cmd`, answer `script`, harvest and parse the output.
///
/// The child is always reaped before this returns. Dropping the returned
/// future kills the child.
pub async fn run_tool(cmd: &ToolCommand, script: &PromptScript, limits: &Limits) -> Result<ToolRun> {
    let mut child = cmd.command().spawn().map_err(|e| NupackError::Process {
        tool: cmd.name.clone(),
        reason: format!("failed to spawn `{}`: {}", cmd.display(), e),
    })?;

    let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
        (Some(stdin), Some(stdout)) => (stdin, stdout),
        _ => {
            close(&mut child, false, limits.exit).await;
            return Err(NupackError::Process {
                tool: cmd.name.clone(),
                reason: "child has no stdio pipes".to_string(),
            });
        }
    };
    let stderr = child.stderr.take().map(|pipe| {
        let tool = cmd.name.clone();
        let limit = limits.max_output_bytes as u64;
        tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = pipe.take(limit).read_to_end(&mut buf).await {
                debug!(%tool, "reading stderr failed: {}", e);
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    });

    let mut session = PromptSession::new(cmd.name.clone(), stdout, stdin, limits.prompt)
        .with_output_limit(limits.max_output_bytes);
    let harvested = match session.run_script(script).await {
        Ok(()) => session.harvest(limits.harvest).await,
        Err(e) => Err(e),
    };
    debug!(tool = %cmd.name, sent = session.responses_sent(), "interaction finished");

    let exit = close(&mut child, harvested.is_ok(), limits.exit).await;
    session.finish(harvested.is_ok());
    let stderr = match stderr {
        Some(task) => timeout(limits.exit, task).await.ok().and_then(|r| r.ok()).unwrap_or_default(),
        None => String::new(),
    };

    let raw = match harvested {
        Ok(raw) => raw,
        Err(e) => {
            if let NupackError::Interaction { transcript, .. } = &e {
                error!(tool = %cmd.name, %transcript, %stderr, "tool interaction failed: {}", e);
            }
            return Err(e);
        }
    };

    let reason = match exit {
        Exit::Exited(status) => match status.code() {
            Some(0) => None,
            Some(code) => Some(format!("exited with status {}", code)),
            None => Some(format!("terminated by signal ({})", status)),
        },
        Exit::Killed => Some(format!("did not exit within {:?} after closing its output", limits.exit)),
        Exit::Lost(reason) => Some(reason),
    };
    if let Some(reason) = reason {
        error!(tool = %cmd.name, output = %raw, %stderr, "tool terminated abnormally: {}", reason);
        return Err(NupackError::Process { tool: cmd.name.clone(), reason });
    }

    let result = extract_json(&raw).map_err(|e| {
        error!(tool = %cmd.name, output = %raw, "could not extract JSON from tool output: {}", e);
        match e {
            ExtractError::NoPayload => NupackError::Interaction {
                tool: cmd.name.clone(),
                reason: "tool produced no JSON payload".to_string(),
                timed_out: false,
                transcript: raw.clone(),
            },
            ExtractError::Malformed(source) => NupackError::Parse {
                tool: cmd.name.clone(),
                source,
                raw: raw.clone(),
            },
        }
    })?;

    Ok(ToolRun { status: 0, result })
}

/// Reap the child. A graceful close waits for a normal exit first; otherwise,
/// or if the wait times out, the child is killed.
async fn close(child: &mut Child, graceful: bool, limit: Duration) -> Exit {
    if graceful {
        match timeout(limit, child.wait()).await {
            Ok(Ok(status)) => return Exit::Exited(status),
            Ok(Err(e)) => return Exit::Lost(format!("waiting for exit failed: {}", e)),
            Err(_) => warn!("tool still running {:?} after its output closed, killing it", limit),
        }
    }

    if let Err(e) = child.start_kill() {
        debug!("kill failed, child probably already exited: {}", e);
    }
    match timeout(limit, child.wait()).await {
        Ok(Ok(status)) if !graceful => Exit::Exited(status),
        Ok(Ok(_)) => Exit::Killed,
        Ok(Err(e)) => Exit::Lost(format!("waiting for exit failed: {}", e)),
        Err(_) => Exit::Lost(format!("could not reap tool within {:?}", limit)),
    }
}
