mod archive;
mod args;
mod artifact;
mod context;
mod error;
mod manifest;
mod package;
mod platform;
mod result;
mod tpl;
mod utils;
mod variant;

use args::Args;
use context::Context;
use error::Error;
use manifest::Manifest;
use std::path::PathBuf;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    // Parse command-line arguments
    let Args {
        verbose,
        keep_going,
        path,
        manifest: manifest_arg,
        output,
        source_date_epoch,
    } = Args::parse();

    init_logger(verbose);

    let base_dir = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let output_dir = output.map(|o| if o.is_absolute() { o } else { base_dir.join(o) });

    let mut ctx = Context::new(base_dir, output_dir);
    ctx.verbose = verbose;
    ctx.keep_going = keep_going;
    if let Some(epoch) = source_date_epoch {
        ctx = ctx.with_timestamp(utils::entry_timestamp(epoch)?);
    }

    cliclack::intro("prepare-release")?;

    // Load release configuration
    let config_path = utils::find_config(&ctx.base_dir, manifest_arg.as_deref())?;
    let manifest = Manifest::load(config_path.as_deref())?;
    cliclack::log::info(format!(
        "{} ({}): {} variants x {} targets from {}",
        manifest.product,
        manifest.addon_id,
        manifest.variants().len(),
        manifest.targets.len(),
        config_source(config_path),
    ))?;

    let report = match package::package_all(&ctx, &manifest) {
        Ok(report) => report,
        Err(e) => {
            cliclack::outro_cancel("Packaging aborted")?;
            return Err(e);
        }
    };

    for archive in &report.archives {
        let message = format!("{} ({} entries)", archive.path.display(), archive.entries.len());
        if archive.warnings.is_empty() {
            cliclack::log::success(message)?;
        } else {
            cliclack::log::warning(format!("{}, {} warnings", message, archive.warnings.len()))?;
        }
        if ctx.verbose {
            for entry in &archive.entries {
                cliclack::log::remark(entry)?;
            }
        }
    }
    for (variant, e) in &report.failures {
        cliclack::log::error(format!("{}: {}", variant, e))?;
    }

    if !report.failures.is_empty() {
        cliclack::outro_cancel("Some variants failed")?;
        return Err(Error::BatchFailed {
            failed: report.failures.len(),
            total: report.total(),
        });
    }

    cliclack::outro("Release archives created successfully!")?;
    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn config_source(config_path: Option<PathBuf>) -> String {
    config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string())
}
