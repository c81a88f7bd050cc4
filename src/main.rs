use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{config, diff, plan, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "releaser")]
#[command(version = VERSION)]
#[command(about = "Run fail-fast release jobs that publish artifacts to an object-store mirror")]
struct Cli {
    /// Config file to use instead of $RELEASER_CONFIG or ~/.config/releaser/releaser.json
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured release targets
    List,
    /// Show the command sequence for a target without running it
    Plan(plan::PlanArgs),
    /// Run a release target, stopping at the first failing step
    Run(run::RunArgs),
    /// Compare the files of two directories
    Diff(diff::DiffArgs),
    /// Inspect releaser configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { config: cli.config };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
