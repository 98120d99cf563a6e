//! One entry point per operation: validate, build the script, run the tool.

use std::sync::Arc;

use nupack_common::{ComplexesParams, ConcentrationsParams, MfeParams};

use crate::operations::{complexes_script, concentrations_script, mfe_script, Operation};
use crate::process::ToolRun;
use crate::runner::ToolRunner;
use crate::Result;

#[derive(Clone)]
pub struct Forwarder {
    runner: Arc<dyn ToolRunner>,
}

impl Forwarder {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    pub async fn mfe(&self, params: &MfeParams) -> Result<ToolRun> {
        params.validate()?;
        self.runner.run(Operation::Mfe, mfe_script(params)).await
    }

    pub async fn complexes(&self, params: &ComplexesParams) -> Result<ToolRun> {
        params.validate()?;
        self.runner.run(Operation::Complexes, complexes_script(params)).await
    }

    pub async fn concentrations(&self, params: &ConcentrationsParams) -> Result<ToolRun> {
        params.validate()?;
        self.runner.run(Operation::Concentrations, concentrations_script(params)).await
    }
}
