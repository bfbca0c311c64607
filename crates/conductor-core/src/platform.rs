//! Platform display labels

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Accepts both Rust (`macos`, `windows`) and Node (`darwin`, `win32`)
    /// names. Anything unrecognised is treated as Linux.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "darwin" | "macos" => Platform::MacOs,
            "win32" | "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::MacOs => "macOS",
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn platform_label(platform: &str) -> &'static str {
    Platform::from_name(platform).label()
}
