use clap::Args;
use serde::Serialize;

use releaser::executor::{JobPlan, JobRun, OutputMode};
use releaser::release;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct RunArgs {
    /// Release target to run (e.g. api-build)
    pub target: String,

    /// Show the steps that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Capture step output into the response instead of streaming it
    #[arg(long)]
    pub capture: bool,

    /// Directory to run steps from (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RunOutput {
    #[serde(rename = "run.dry_run")]
    DryRun { plan: JobPlan },
    #[serde(rename = "run")]
    Completed { run: JobRun },
}

pub fn run(args: RunArgs, global: &GlobalArgs) -> CmdResult<RunOutput> {
    let config = global.load_config()?;
    let mut job = release::job_for(&config, &args.target)?;

    if let Some(dir) = args.dir {
        job = job.in_dir(dir);
    }

    if args.dry_run {
        return Ok((RunOutput::DryRun { plan: job.plan() }, 0));
    }

    if args.capture {
        job = job.with_output(OutputMode::Capture);
    }

    let run = job.run()?;
    Ok((RunOutput::Completed { run }, 0))
}
