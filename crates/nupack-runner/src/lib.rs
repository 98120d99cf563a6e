//! nupack-runner: Drives the NUPACK command-line tools through their interactive prompts.
//!
//! A request is handled in four steps:
//! 1. Building the prompt script for the operation (`operations`)
//! 2. Spawning the tool and answering each prompt in order (`process`, `session`)
//! 3. Harvesting the JSON the tool prints afterwards (`extract`)
//! 4. Handing the exit status and result back to the caller (`runner`, `forwarder`)

pub mod script;
pub mod operations;
pub mod session;
pub mod extract;
pub mod process;
pub mod runner;
pub mod forwarder;

pub use forwarder::Forwarder;
pub use operations::Operation;
pub use process::ToolRun;
pub use runner::{ProcessRunner, ToolRunner};
pub use script::{PromptScript, PromptStep};

pub type Result<T> = nupack_common::Result<T>;
