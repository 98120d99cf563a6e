//! The seam between request handling and tool execution.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{info, Instrument};
use uuid::Uuid;

use nupack_common::NupackError;
use nupack_config::Config;

use crate::operations::Operation;
use crate::process::{run_tool, Limits, ToolCommand, ToolRun};
use crate::script::PromptScript;
use crate::Result;

/// Runs one prompt script against the tool for `operation`.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, operation: Operation, script: PromptScript) -> Result<ToolRun>;
}

/// Spawns the configured NUPACK binaries, at most `runner.max_concurrent` at a time.
pub struct ProcessRunner {
    mfe: ToolCommand,
    complexes: ToolCommand,
    concentrations: ToolCommand,
    limits: Limits,
    permits: Arc<Semaphore>,
}

impl ProcessRunner {
    pub fn from_config(config: &Config) -> Self {
        let launcher = &config.runner.launcher;
        Self {
            mfe: ToolCommand::new("mfe", &config.tools.mfe, launcher),
            complexes: ToolCommand::new("complexes", &config.tools.complexes, launcher),
            concentrations: ToolCommand::new("concentrations", &config.tools.concentrations, launcher),
            limits: Limits::from(&config.runner),
            permits: Arc::new(Semaphore::new(config.runner.max_concurrent)),
        }
    }

    pub fn command(&self, operation: Operation) -> &ToolCommand {
        match operation {
            Operation::Mfe => &self.mfe,
            Operation::Complexes => &self.complexes,
            Operation::Concentrations => &self.concentrations,
        }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, operation: Operation, script: PromptScript) -> Result<ToolRun> {
        let job_id = Uuid::new_v4();
        let span = tracing::info_span!("tool_run", %job_id, tool = operation.name());

        async move {
            let cmd = self.command(operation);
            let _permit = match tokio::time::timeout(self.limits.prompt, self.permits.acquire()).await {
                Ok(Ok(permit)) => permit,
                Ok(Err(_)) => {
                    return Err(NupackError::Process {
                        tool: operation.name().to_string(),
                        reason: "runner is shut down".to_string(),
                    });
                }
                Err(_) => {
                    return Err(NupackError::Interaction {
                        tool: operation.name().to_string(),
                        reason: format!("runner busy, no slot free within {:?}", self.limits.prompt),
                        timed_out: true,
                        transcript: String::new(),
                    });
                }
            };

            info!(responses = script.len(), "Running `{}`", cmd.display());
            let started = Instant::now();
            let run = run_tool(cmd, &script, &self.limits).await?;
            info!(status = run.status, elapsed_ms = started.elapsed().as_millis() as u64, "{} completed", operation);
            Ok(run)
        }
        .instrument(span)
        .await
    }
}
