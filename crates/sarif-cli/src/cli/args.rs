use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sarif",
    version,
    about = "Convert SARIF logs between 1.0.0 and 2.1.0 and enumerate analysis targets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a SARIF log to another version
    Transform(TransformArgs),
    /// List the files named by one or more path specifiers
    Enumerate(EnumerateArgs),
    /// Write a starter config file
    Init(InitArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TransformArgs {
    /// SARIF log to convert
    pub input: PathBuf,

    /// Destination file; stdout when omitted
    #[arg(short, long, conflicts_with = "inline")]
    pub output: Option<PathBuf>,

    /// v1 | v2 (also accepts 1.0.0 and 2.1.0); defaults to the config, then v2
    #[arg(short = 't', long)]
    pub target_version: Option<String>,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,

    /// Write the result back over the input file
    #[arg(long)]
    pub inline: bool,

    #[arg(long, env = "SARIF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reject unknown config keys instead of warning
    #[arg(long)]
    pub strict_config: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EnumerateArgs {
    /// Paths, directories or filename globs; `%VAR%` references are expanded
    #[arg(required = true, num_args = 1..)]
    pub specifiers: Vec<String>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recurse: bool,

    /// Skip files larger than this many kilobytes
    #[arg(long)]
    pub max_file_size_kb: Option<u64>,

    /// Print the SHA-256 of each file next to its URI
    #[arg(long)]
    pub hash: bool,

    /// Output format: text | json
    #[arg(long, default_value = "text")]
    pub format: String,

    #[arg(long, env = "SARIF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reject unknown config keys instead of warning
    #[arg(long)]
    pub strict_config: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "sarif.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}
