use std::path::Path;

use sarif_core::config::{load_config, ToolkitConfig};
use sarif_core::errors::ConfigError;

use super::args::{Cli, Command};

pub mod enumerate;
pub mod init;
pub mod transform;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Transform(args) => transform::run(args).await,
        Command::Enumerate(args) => enumerate::run(args).await,
        Command::Init(args) => init::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

/// The config file when one is given, else defaults; environment overrides
/// are applied either way.
pub(crate) fn load_settings(path: Option<&Path>, strict: bool) -> Result<ToolkitConfig, ConfigError> {
    let mut cfg = match path {
        Some(p) => load_config(p, strict)?,
        None => ToolkitConfig::default(),
    };
    cfg.apply_env();
    Ok(cfg)
}
