use crate::archive::{ArchiveSummary, ArchiveWriter, Warning};
use crate::artifact;
use crate::context::Context;
use crate::error::Error;
use crate::manifest::Manifest;
use crate::result::Result;
use crate::utils;
use crate::variant::Variant;

/// Artifact resolved for one build target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub target: String,
    /// Path relative to the working directory
    pub source: String,
    pub file_name: String,
}

/// Outcome of a whole packaging run
#[derive(Debug, Default)]
pub struct Report {
    pub archives: Vec<ArchiveSummary>,
    pub failures: Vec<(Variant, Error)>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.archives.len() + self.failures.len()
    }
}

/// Resolve the single artifact of every target of `variant`
pub fn resolve_artifacts(
    ctx: &Context,
    manifest: &Manifest,
    variant: &Variant,
) -> Result<Vec<ResolvedArtifact>> {
    manifest
        .targets
        .iter()
        .map(|target| {
            let source_dir = manifest.source_dir(variant, target);
            let file_name = artifact::resolve_single_artifact(&ctx.base_dir.join(&source_dir))?;
            Ok(ResolvedArtifact {
                target: target.clone(),
                source: format!("{}/{}", source_dir, file_name),
                file_name,
            })
        })
        .collect()
}

/// Produce the archive for one (version, platform) pair.
///
/// Artifacts are resolved before the output file is opened, so a build
/// directory with the wrong contents never leaves a partial archive.
pub fn build_archive_for_variant(
    ctx: &Context,
    manifest: &Manifest,
    variant: &Variant,
) -> Result<ArchiveSummary> {
    let artifacts = resolve_artifacts(ctx, manifest, variant)?;

    utils::ensure_dir(&ctx.output_dir)?;
    let archive_path = manifest.archive_path(ctx, variant);
    let mut writer = ArchiveWriter::create(
        ctx,
        &archive_path,
        &manifest.archive_root,
        manifest.compression_level,
    )?;
    log::debug!("Writing {}", writer.path().display());

    for file in &manifest.static_files {
        writer.add_static_file(&file.source, file.target.as_deref())?;
    }

    for artifact in &artifacts {
        if !variant.platform.accepts(&artifact.file_name) {
            writer.warn(Warning::UnexpectedExtension {
                artifact: artifact.source.clone(),
                platform: variant.platform.to_string(),
            });
        }
        writer.add_artifact(&artifact.source, &artifact.target, &artifact.file_name)?;
    }

    writer.finish()
}

/// Package every variant in order.
///
/// Without `keep_going` the first failure ends the run and is returned.
/// With it, failures are recorded in the report and the remaining
/// variants are still packaged. Errors are logged where they are detected,
/// not here.
pub fn package_all(ctx: &Context, manifest: &Manifest) -> Result<Report> {
    let mut report = Report::default();

    for variant in manifest.variants() {
        log::info!("Packaging {}", variant);
        match build_archive_for_variant(ctx, manifest, &variant) {
            Ok(summary) => report.archives.push(summary),
            Err(e) if ctx.keep_going => report.failures.push((variant, e)),
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
