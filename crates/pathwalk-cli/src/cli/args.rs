use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pathwalk",
    version,
    about = "Model-based test driver: walks a GraphWalker model and runs a model action for every element"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Walk a model live against the traversal engine
    Run(RunArgs),
    /// Replay a saved walk file without the engine
    Replay(ReplayArgs),
    /// List built-in models and their actions
    Models,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// JSON model file to load into the engine before walking (.json)
    #[arg(short = 'j', long)]
    pub json: Option<PathBuf>,

    /// Base URL of the engine REST API [default: http://localhost:8887/graphwalker]
    #[arg(short = 'u', long, env = "PATHWALK_ENGINE_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, env = "PATHWALK_ENGINE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Model to execute: a built-in model name (or a file named after it) or a .yaml script
    #[arg(short = 'm', long, alias = "ruby")]
    pub model: Option<String>,

    /// Directory where the walk file is saved
    #[arg(short = 's', long)]
    pub save: Option<PathBuf>,

    /// Write the walk report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Walk file to replay (.wlk)
    #[arg(short = 'w', long)]
    pub walk: PathBuf,

    /// Model to execute: a built-in model name (or a file named after it) or a .yaml script
    #[arg(short = 'm', long, alias = "ruby")]
    pub model: Option<String>,

    /// Write the walk report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}
