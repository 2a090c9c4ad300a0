pub mod models;
pub mod replay;
pub mod run;

use std::path::Path;

use anyhow::Context;
use pathwalk_core::WalkReport;

use super::args::{Cli, Command};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args).await,
        Command::Replay(args) => replay::run(args),
        Command::Models => models::run(),
    }
}

pub(crate) fn write_report(path: &Path, report: &WalkReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("failed to write report {}", path.display()))
}
