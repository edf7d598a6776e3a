use crate::platform::Platform;

/// One (version, platform) pair; each produces exactly one archive
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    pub version: String,
    pub platform: Platform,
}

impl Variant {
    pub fn new<V: Into<String>>(version: V, platform: Platform) -> Self {
        Self {
            version: version.into(),
            platform,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.version, self.platform)
    }
}

/// Every platform of the first version, then every platform of the next, ...
pub fn cross_product(versions: &[String], platforms: &[Platform]) -> Vec<Variant> {
    versions
        .iter()
        .flat_map(|version| {
            platforms
                .iter()
                .map(move |platform| Variant::new(version.clone(), platform.clone()))
        })
        .collect()
}
