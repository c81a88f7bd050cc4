use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use releaser::dirdiff::{self, DiffReport};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct DiffArgs {
    /// First directory (e.g. main)
    pub left: PathBuf,

    /// Second directory (e.g. explore)
    pub right: PathBuf,

    /// Where to write <file>.diff.txt for files that differ
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum DiffOutput {
    #[serde(rename = "diff")]
    Diff { report: DiffReport },
}

pub fn run(args: DiffArgs, _global: &GlobalArgs) -> CmdResult<DiffOutput> {
    let report = dirdiff::compare(&args.left, &args.right, &args.output)?;
    Ok((DiffOutput::Diff { report }, 0))
}
