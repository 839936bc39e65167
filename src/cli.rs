use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "tophn")]
#[command(about = "Publish the most persistent Hacker News top story of the last 24 hours")]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}
