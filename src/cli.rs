use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytcaps",
    about = "YouTube caption extraction HTTP service",
    version,
)]
pub struct Cli {
    /// Path to config file (default: <config_dir>/ytcaps/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Log debug detail
    #[arg(short, long)]
    pub verbose: bool,
}
