use std::path::Path;

/// Release platform identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    MacOS,
    /// Any platform the packager has no extension expectations for
    Other(String),
}

impl Platform {
    pub fn parse(name: &str) -> Self {
        match name {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" => Platform::MacOS,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Get platform identifier as string
    pub fn as_str(&self) -> &str {
        match self {
            Platform::MacOS => "macos",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Other(name) => name,
        }
    }

    /// Native library extensions built for this platform
    pub fn library_extensions(&self) -> &'static [&'static str] {
        match self {
            Platform::Windows => &["dll"],
            Platform::Linux => &["so"],
            Platform::MacOS => &["dylib", "framework"],
            Platform::Other(_) => &[],
        }
    }

    /// Whether `artifact` looks like a library built for this platform
    pub fn accepts(&self, artifact: &str) -> bool {
        let extensions = self.library_extensions();
        if extensions.is_empty() {
            return true;
        }

        Path::new(artifact)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.contains(&ext))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
