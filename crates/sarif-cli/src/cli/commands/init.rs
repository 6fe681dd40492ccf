use anyhow::Result;
use sarif_core::config::write_sample_config;

use super::exit_codes;
use crate::cli::args::InitArgs;

pub fn run(args: InitArgs) -> Result<i32> {
    if args.config.exists() && !args.force {
        eprintln!(
            "config already exists: {} (use --force to overwrite)",
            args.config.display()
        );
        return Ok(exit_codes::FAILED);
    }

    if let Err(e) = write_sample_config(&args.config) {
        eprintln!("{}", e);
        return Ok(exit_codes::CONFIG_ERROR);
    }
    eprintln!("created config: {}", args.config.display());
    Ok(exit_codes::OK)
}
