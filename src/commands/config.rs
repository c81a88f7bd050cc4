use clap::{Args, Subcommand};
use serde::Serialize;

use releaser::defaults::{self, ReleaserConfig};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration (file merged over built-in defaults)
    Show,
    /// Show the path of the config file
    Path,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ConfigOutput {
    #[serde(rename = "config.show")]
    Show {
        path: String,
        exists: bool,
        config: ReleaserConfig,
    },
    #[serde(rename = "config.path")]
    Path { path: String, exists: bool },
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let (path, exists) = match &global.config {
        Some(path) => (path.display().to_string(), path.exists()),
        None => (defaults::config_path()?, defaults::config_exists()),
    };

    match args.command {
        ConfigCommand::Show => {
            let config = global.load_config()?;
            Ok((
                ConfigOutput::Show {
                    path,
                    exists,
                    config,
                },
                0,
            ))
        }
        ConfigCommand::Path => Ok((ConfigOutput::Path { path, exists }, 0)),
    }
}
