use serde::Serialize;

use releaser::release::{self, TargetSummary};

use super::{CmdResult, GlobalArgs};

#[derive(Serialize)]
pub struct ListOutput {
    pub command: &'static str,
    pub targets: Vec<TargetSummary>,
}

pub fn run(global: &GlobalArgs) -> CmdResult<ListOutput> {
    let config = global.load_config()?;
    Ok((
        ListOutput {
            command: "list",
            targets: release::list_targets(&config),
        },
        0,
    ))
}
