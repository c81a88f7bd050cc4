use clap::Args;
use serde::Serialize;

use releaser::executor::JobPlan;
use releaser::release;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct PlanArgs {
    /// Release target to plan (e.g. api-build)
    pub target: String,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum PlanOutput {
    #[serde(rename = "plan")]
    Plan { plan: JobPlan },
}

pub fn run(args: PlanArgs, global: &GlobalArgs) -> CmdResult<PlanOutput> {
    let config = global.load_config()?;
    let job = release::job_for(&config, &args.target)?;
    Ok((PlanOutput::Plan { plan: job.plan() }, 0))
}
