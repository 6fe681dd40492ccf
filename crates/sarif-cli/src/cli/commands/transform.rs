use anyhow::{Context, Result};
use sarif_core::{transform_file, SarifVersion};

use super::{exit_codes, load_settings};
use crate::cli::args::TransformArgs;

pub async fn run(args: TransformArgs) -> Result<i32> {
    let cfg = match load_settings(args.config.as_deref(), args.strict_config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let target = match args.target_version.as_deref() {
        Some(v) => match v.parse::<SarifVersion>() {
            Ok(t) => t,
            Err(_) => {
                eprintln!("invalid --target-version '{}' (expected v1 or v2)", v);
                return Ok(exit_codes::CONFIG_ERROR);
            }
        },
        None => match cfg.transform.target() {
            Ok(t) => t.unwrap_or(SarifVersion::Current),
            Err(e) => {
                eprintln!("{}", e);
                return Ok(exit_codes::CONFIG_ERROR);
            }
        },
    };
    let pretty = args.pretty || cfg.transform.pretty;

    let destination = if args.inline {
        Some(args.input.clone())
    } else {
        args.output.clone()
    };
    if let Some(out) = &args.output {
        if out.exists() && !args.force {
            eprintln!(
                "output file exists: {} (use --force to overwrite)",
                out.display()
            );
            return Ok(exit_codes::FAILED);
        }
    }

    let rendered = transform_file(&args.input, target, pretty)
        .with_context(|| format!("failed to transform {}", args.input.display()))?;

    match destination {
        Some(path) => {
            std::fs::write(&path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                event = "sarif.cli.transform",
                input = %args.input.display(),
                output = %path.display(),
                target = %target,
                "wrote transformed log"
            );
        }
        None => println!("{}", rendered),
    }

    Ok(exit_codes::OK)
}
