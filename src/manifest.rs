use crate::context::Context;
use crate::error::Error;
use crate::platform::Platform;
use crate::result::Result;
use crate::tpl::Tpl;
use crate::variant::{self, Variant};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_PRODUCT: &str = "godot_fluent_translation";
const DEFAULT_ADDON_ID: &str = "godot-fluent-translation";
const DEFAULT_VERSIONS: &[&str] = &["forked", "default"];
const DEFAULT_PLATFORMS: &[&str] = &["windows", "linux"];
const DEFAULT_TARGETS: &[&str] = &["debug", "release"];
const DEFAULT_FILES: &[&str] = &["LICENSE", "README.md", "$ADDON.gdextension"];
const DEFAULT_ARCHIVE: &str = "$VERSION.$PLATFORM.$PRODUCT.zip";
const DEFAULT_SOURCE_DIR: &str = "$VERSION.$PLATFORM.$PRODUCT.$TARGET";
const DEFAULT_ARCHIVE_ROOT: &str = "addons/$ADDON";
const DEFAULT_COMPRESSION_LEVEL: i64 = 9;

#[derive(Debug, Deserialize, Serialize)]
pub struct ReleaseToml {
    #[serde(default)]
    pub release: Option<ReleaseConfig>,
}

/// The `[release]` table; every key falls back to the built-in default
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReleaseConfig {
    #[serde(default)]
    pub product: Option<String>,

    #[serde(default)]
    pub addon_id: Option<String>,

    #[serde(default)]
    pub versions: Option<Vec<String>>,

    #[serde(default)]
    pub platforms: Option<Vec<String>>,

    #[serde(default)]
    pub targets: Option<Vec<String>>,

    #[serde(default)]
    pub files: Option<Vec<FileEntry>>,

    #[serde(default)]
    pub archive: Option<String>,

    #[serde(default)]
    pub source_dir: Option<String>,

    #[serde(default)]
    pub archive_root: Option<String>,

    #[serde(default)]
    pub compression_level: Option<i64>,
}

/// `"LICENSE"` or `{ "LICENSE.txt" = "LICENSE" }`
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum FileEntry {
    Path(String),
    Renamed(HashMap<String, String>),
}

/// A file copied verbatim into every archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    /// Path relative to the working directory
    pub source: String,
    /// Name under the archive root, if different from `source`
    pub target: Option<String>,
}

/// Resolved release configuration
#[derive(Debug, Clone)]
pub struct Manifest {
    pub product: String,
    pub addon_id: String,
    pub versions: Vec<String>,
    pub platforms: Vec<Platform>,
    pub targets: Vec<String>,
    pub static_files: Vec<StaticFile>,
    pub archive_root: String,
    pub compression_level: i64,
    archive_template: String,
    source_dir_template: String,
    tpl: Tpl,
}

impl Manifest {
    /// Load the release config at `config_path`, or the built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let Some(path) = config_path else {
            return Self::from_config(ReleaseConfig::default());
        };

        let content = fs::read_to_string(path)?;
        let release_toml: ReleaseToml = toml::from_str(&content)?;
        let config = release_toml.release.ok_or_else(|| {
            Error::InvalidManifest(format!("Missing [release] section in {}", path.display()))
        })?;

        Self::from_config(config)
    }

    pub fn from_config(config: ReleaseConfig) -> Result<Self> {
        let product = config.product.unwrap_or_else(|| DEFAULT_PRODUCT.to_string());
        let addon_id = config.addon_id.unwrap_or_else(|| DEFAULT_ADDON_ID.to_string());

        let mut tpl = Tpl::new();
        tpl.register("PRODUCT", &product);
        tpl.register("ADDON", &addon_id);

        let versions = non_empty("versions", config.versions, DEFAULT_VERSIONS)?;
        let targets = non_empty("targets", config.targets, DEFAULT_TARGETS)?;
        let platforms: Vec<Platform> = non_empty("platforms", config.platforms, DEFAULT_PLATFORMS)?
            .iter()
            .map(|p| Platform::parse(p))
            .collect();

        let static_files = match config.files {
            Some(files) => files
                .iter()
                .map(|entry| static_file(&tpl, entry))
                .collect::<Result<Vec<_>>>()?,
            None => DEFAULT_FILES
                .iter()
                .map(|f| static_file(&tpl, &FileEntry::Path(f.to_string())))
                .collect::<Result<Vec<_>>>()?,
        };
        if static_files.is_empty() {
            return Err(Error::InvalidManifest("`files` must not be empty".to_string()));
        }

        let compression_level = config.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL);
        if !(1..=9).contains(&compression_level) {
            return Err(Error::InvalidManifest(format!(
                "`compression-level` must be between 1 and 9, got {}",
                compression_level
            )));
        }

        let source_dir_template = config
            .source_dir
            .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string());
        if !Tpl::references(&source_dir_template, "TARGET") {
            return Err(Error::InvalidManifest(format!(
                "`source-dir` must reference $TARGET: {}",
                source_dir_template
            )));
        }

        let archive_root = tpl.parse(
            &config
                .archive_root
                .unwrap_or_else(|| DEFAULT_ARCHIVE_ROOT.to_string()),
        );

        let manifest = Manifest {
            product,
            addon_id,
            versions,
            platforms,
            targets,
            static_files,
            archive_root,
            compression_level,
            archive_template: config.archive.unwrap_or_else(|| DEFAULT_ARCHIVE.to_string()),
            source_dir_template,
            tpl,
        };

        manifest.check_archive_names()?;
        Ok(manifest)
    }

    /// Every (version, platform) pair in packaging order
    pub fn variants(&self) -> Vec<Variant> {
        variant::cross_product(&self.versions, &self.platforms)
    }

    /// Output file name for `variant`, e.g. `default.linux.godot_fluent_translation.zip`
    pub fn archive_filename(&self, variant: &Variant) -> String {
        self.variant_tpl(variant).parse(&self.archive_template)
    }

    /// Directory holding the artifact for `target`, relative to the working directory
    pub fn source_dir(&self, variant: &Variant, target: &str) -> String {
        self.variant_tpl(variant)
            .with("TARGET", target)
            .parse(&self.source_dir_template)
    }

    pub fn archive_path(&self, ctx: &Context, variant: &Variant) -> PathBuf {
        ctx.output_dir.join(self.archive_filename(variant))
    }

    fn variant_tpl(&self, variant: &Variant) -> Tpl {
        self.tpl
            .with("VERSION", &variant.version)
            .with("PLATFORM", variant.platform.as_str())
    }

    fn check_archive_names(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for variant in self.variants() {
            let name = self.archive_filename(&variant);
            if !seen.insert(name.clone()) {
                return Err(Error::InvalidManifest(format!(
                    "`archive` template produces {} for more than one variant",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn non_empty(key: &str, values: Option<Vec<String>>, defaults: &[&str]) -> Result<Vec<String>> {
    let values = values.unwrap_or_else(|| defaults.iter().map(|v| v.to_string()).collect());

    if values.is_empty() {
        return Err(Error::InvalidManifest(format!("`{}` must not be empty", key)));
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = values.iter().find(|v| !seen.insert(v.as_str())) {
        return Err(Error::InvalidManifest(format!(
            "`{}` lists {} more than once",
            key, duplicate
        )));
    }

    Ok(values)
}

fn static_file(tpl: &Tpl, entry: &FileEntry) -> Result<StaticFile> {
    match entry {
        FileEntry::Path(source) => Ok(StaticFile {
            source: tpl.parse(source),
            target: None,
        }),
        FileEntry::Renamed(map) => {
            let mut pairs = map.iter();
            match (pairs.next(), pairs.next()) {
                (Some((source, target)), None) => Ok(StaticFile {
                    source: tpl.parse(source),
                    target: Some(tpl.parse(target)),
                }),
                _ => Err(Error::InvalidManifest(format!(
                    "renamed file entries take exactly one `source = target` pair, got {:?}",
                    map
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Manifest> {
        let release_toml: ReleaseToml = toml::from_str(source)?;
        Manifest::from_config(release_toml.release.unwrap_or_default())
    }

    #[test]
    fn defaults_match_reference_release() {
        let manifest = Manifest::load(None).unwrap();

        assert_eq!(manifest.versions, ["forked", "default"]);
        assert_eq!(manifest.platforms, [Platform::Windows, Platform::Linux]);
        assert_eq!(manifest.targets, ["debug", "release"]);
        assert_eq!(manifest.archive_root, "addons/godot-fluent-translation");
        assert_eq!(manifest.compression_level, 9);

        let sources: Vec<&str> = manifest
            .static_files
            .iter()
            .map(|f| f.source.as_str())
            .collect();
        assert_eq!(
            sources,
            ["LICENSE", "README.md", "godot-fluent-translation.gdextension"]
        );

        let archives: Vec<String> = manifest
            .variants()
            .iter()
            .map(|v| manifest.archive_filename(v))
            .collect();
        assert_eq!(
            archives,
            [
                "forked.windows.godot_fluent_translation.zip",
                "forked.linux.godot_fluent_translation.zip",
                "default.windows.godot_fluent_translation.zip",
                "default.linux.godot_fluent_translation.zip",
            ]
        );
    }

    #[test]
    fn source_dir_binds_target() {
        let manifest = Manifest::load(None).unwrap();
        let variant = Variant::new("default", Platform::Linux);

        assert_eq!(
            manifest.source_dir(&variant, "release"),
            "default.linux.godot_fluent_translation.release"
        );
    }

    #[test]
    fn overrides_from_toml() {
        let manifest = parse(
            r#"
            [release]
            product = "product"
            addon-id = "product"
            versions = ["default"]
            platforms = ["linux"]
            targets = ["debug"]
            files = ["LICENSE", { "docs/README.md" = "README.md" }, "$PRODUCT.extension-manifest"]
            compression-level = 6
            "#,
        )
        .unwrap();

        assert_eq!(manifest.variants(), [Variant::new("default", Platform::Linux)]);
        assert_eq!(manifest.compression_level, 6);
        assert_eq!(
            manifest.static_files,
            [
                StaticFile { source: "LICENSE".into(), target: None },
                StaticFile {
                    source: "docs/README.md".into(),
                    target: Some("README.md".into())
                },
                StaticFile { source: "product.extension-manifest".into(), target: None },
            ]
        );
    }

    #[test]
    fn dollar_in_version_is_kept_literally() {
        let manifest =
            parse("[release]\nversions = [\"$ADDON\"]\nplatforms = [\"linux\"]\n").unwrap();
        let variants = manifest.variants();

        assert_eq!(
            manifest.archive_filename(&variants[0]),
            "$ADDON.linux.godot_fluent_translation.zip"
        );
    }

    #[test]
    fn missing_release_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.toml");
        fs::write(&path, "[package]\nname = \"x\"\n").unwrap();

        assert!(matches!(
            Manifest::load(Some(path.as_path())),
            Err(Error::InvalidManifest(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            parse("[release]\nplatform = [\"linux\"]\n"),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn rejects_invalid_configs() {
        let cases = [
            "[release]\nversions = []\n",
            "[release]\ntargets = [\"debug\", \"debug\"]\n",
            "[release]\nfiles = []\n",
            "[release]\ncompression-level = 0\n",
            "[release]\ncompression-level = 10\n",
            "[release]\narchive = \"$VERSION.zip\"\n",
            "[release]\nsource-dir = \"$VERSION.$PLATFORM\"\n",
            "[release]\nfiles = [{ \"a\" = \"b\", \"c\" = \"d\" }]\n",
        ];

        for case in cases {
            assert!(
                matches!(parse(case), Err(Error::InvalidManifest(_))),
                "accepted {:?}",
                case
            );
        }
    }
}
