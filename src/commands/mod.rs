use std::path::PathBuf;

use releaser::defaults::{self, ReleaserConfig};

pub type CmdResult<T> = releaser::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit config file (overrides $RELEASER_CONFIG and the default path)
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn load_config(&self) -> releaser::Result<ReleaserConfig> {
        match &self.config {
            Some(path) => defaults::load_config_from(path),
            None => defaults::load_config(),
        }
    }
}

pub mod config;
pub mod diff;
pub mod list;
pub mod plan;
pub mod run;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (releaser::Result<serde_json::Value>, i32) {
    crate::tty::status("releaser is working...");

    match command {
        crate::Commands::List => crate::output::map_cmd_result_to_json(list::run(global)),
        crate::Commands::Plan(args) => dispatch!(args, global, plan),
        crate::Commands::Run(args) => dispatch!(args, global, run),
        crate::Commands::Diff(args) => dispatch!(args, global, diff),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
