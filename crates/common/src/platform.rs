//! Platform utilities
//!
//! Answers "what OS/arch/CI am I on", "what binary extension applies" and
//! "how do I turn a display name into a path segment". Everything here is
//! pure and infallible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family, named the way Node.js reports `process.platform`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    #[serde(rename = "darwin")]
    MacOs,
    #[serde(rename = "win32")]
    Windows,
    #[serde(untagged)]
    Other(String),
}

impl Platform {
    /// Platform of the running process
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a Rust (`std::env::consts::OS`) or Node.js platform name
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" | "darwin" => Platform::MacOs,
            "windows" | "win32" => Platform::Windows,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "darwin",
            Platform::Windows => "win32",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture, named the way Node.js reports `process.arch`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    Arm64,
    Ia32,
    Arm,
    #[serde(untagged)]
    Other(String),
}

impl Arch {
    /// Architecture of the running process
    pub fn current() -> Self {
        Self::from_arch(std::env::consts::ARCH)
    }

    /// Map a Rust (`std::env::consts::ARCH`) or Node.js architecture name
    pub fn from_arch(arch: &str) -> Self {
        match arch {
            "x86_64" | "x64" => Arch::X64,
            "aarch64" | "arm64" => Arch::Arm64,
            "x86" | "ia32" => Arch::Ia32,
            "arm" => Arch::Arm,
            other => Arch::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::Ia32 => "ia32",
            Arch::Arm => "arm",
            Arch::Other(name) => name,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension carried by an application binary on the given platform
pub fn binary_extension(platform: &Platform) -> &'static str {
    match platform {
        Platform::Windows => ".exe",
        Platform::MacOs => ".app",
        Platform::Linux | Platform::Other(_) => "",
    }
}

const CI_VARIABLES: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "GITHUB_ACTIONS",
    "BUILD_NUMBER",
    "RUN_ID",
];

/// Whether the process runs under a CI system
pub fn is_ci() -> bool {
    is_ci_with(|key| std::env::var(key).ok())
}

/// Same as [`is_ci`] with an injectable environment lookup
pub fn is_ci_with<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    CI_VARIABLES.iter().any(|key| match lookup(key) {
        Some(value) => {
            let value = value.trim();
            !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
        }
        None => false,
    })
}

const RESERVED_WINDOWS_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Turn an application display name into a single filesystem path segment.
///
/// Characters that are illegal on any major filesystem become `-`, repeated
/// dashes collapse, and leading/trailing dots, dashes and whitespace are
/// trimmed. A reserved Windows device name as stem gets an underscore appended
/// to the stem (`con.txt` becomes `con_.txt`).
pub fn sanitize_app_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let mapped = if c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
            '-'
        } else {
            c
        };
        if mapped == '-' && out.ends_with('-') {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out
        .trim_matches(|c: char| c == '.' || c == '-' || c.is_whitespace())
        .to_string();

    if trimmed.is_empty() {
        return "app".to_string();
    }

    // Reserved regardless of extension
    let stem_len = trimmed.find('.').unwrap_or(trimmed.len());
    let stem = trimmed[..stem_len].to_ascii_uppercase();
    if RESERVED_WINDOWS_NAMES.contains(&stem.as_str()) {
        let mut renamed = trimmed;
        renamed.insert(stem_len, '_');
        return renamed;
    }

    trimmed
}
