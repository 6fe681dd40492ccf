use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use sarif_core::enumeration::{
    AggregatingArtifactProvider, ArtifactProvider, CancellationToken, LocalFileSystem,
    OrderedFileSpecifier,
};

use super::{exit_codes, load_settings};
use crate::cli::args::EnumerateArgs;

pub async fn run(args: EnumerateArgs) -> Result<i32> {
    let cfg = match load_settings(args.config.as_deref(), args.strict_config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let recurse = args.recurse || cfg.enumeration.recurse;
    let max_file_size_kb = args.max_file_size_kb.or(cfg.enumeration.max_file_size_kb);
    let cancellation = CancellationToken::new();

    let mut provider = AggregatingArtifactProvider::new();
    for specifier in &args.specifiers {
        provider.push(Box::new(
            OrderedFileSpecifier::new(specifier.as_str())
                .recurse(recurse)
                .max_file_size_kb(max_file_size_kb)
                .channel_capacity(cfg.enumeration.channel_capacity)
                .cancellation(cancellation.clone())
                .file_system(Arc::new(LocalFileSystem)),
        ));
    }

    let json = args.format == "json";
    let hash = args.hash;
    // The iterator blocks on the producer queue; keep it off the runtime threads.
    let mut task = tokio::task::spawn_blocking(move || list(&provider, hash, json));

    let outcome = tokio::select! {
        res = &mut task => res,
        Ok(()) = tokio::signal::ctrl_c() => {
            cancellation.cancel();
            eprintln!("cancelled");
            task.await
        }
    };
    outcome.context("enumeration task failed")?
}

fn list(provider: &AggregatingArtifactProvider, hash: bool, json: bool) -> Result<i32> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut code = exit_codes::OK;
    let mut count = 0usize;

    for item in provider.artifacts() {
        let artifact = match item {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {}", e);
                code = exit_codes::FAILED;
                continue;
            }
        };
        count += 1;

        let digest = if hash {
            match artifact.sha256() {
                Ok(d) => Some(d),
                Err(e) => {
                    eprintln!("error: failed to read {}: {}", artifact.path().display(), e);
                    code = exit_codes::FAILED;
                    continue;
                }
            }
        } else {
            None
        };

        if json {
            let line = serde_json::json!({ "uri": artifact.uri().as_str(), "sha256": digest });
            writeln!(out, "{}", line)?;
        } else if let Some(d) = digest {
            writeln!(out, "{}  {}", d, artifact.uri())?;
        } else {
            writeln!(out, "{}", artifact.uri())?;
        }
    }

    let skipped = provider.skipped();
    for artifact in &skipped {
        eprintln!("skipped (too large): {}", artifact.uri());
    }
    for e in provider.take_errors() {
        eprintln!("warning: {}", e);
    }

    tracing::info!(
        event = "sarif.cli.enumerate",
        files = count,
        skipped = skipped.len(),
        "enumeration finished"
    );
    Ok(code)
}
