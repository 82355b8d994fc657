use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Location of the repository to clone and inspect, e.g. an https URL
    pub source: String,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Directory to clone into; removed again once the output is produced.
    /// Defaults to a per-process path under the system temp directory.
    #[clap(long, short)]
    pub workdir: Option<PathBuf>,
}
