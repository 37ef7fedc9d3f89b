//! Host platform detection and naming
//!
//! Two naming schemes are in play:
//! - Release assets use Go's `GOOS`/`GOARCH` names (`linux_amd64`, `darwin_arm64`)
//! - Cache directories use the runner tool cache names (`x64`, `arm64`, `ia32`)

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

impl Os {
    pub fn current() -> Option<Self> {
        Self::from_rust_os(std::env::consts::OS)
    }

    fn from_rust_os(os: &str) -> Option<Self> {
        match os {
            "linux" => Some(Os::Linux),
            "macos" => Some(Os::Darwin),
            "windows" => Some(Os::Windows),
            _ => None,
        }
    }

    /// Go `GOOS` name used in release asset names
    pub fn asset_name(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
    X86,
}

impl Arch {
    pub fn current() -> Option<Self> {
        Self::from_rust_arch(std::env::consts::ARCH)
    }

    fn from_rust_arch(arch: &str) -> Option<Self> {
        match arch {
            "x86_64" => Some(Arch::X64),
            "aarch64" => Some(Arch::Arm64),
            "x86" => Some(Arch::X86),
            _ => None,
        }
    }

    /// Go `GOARCH` name used in release asset names
    pub fn asset_name(&self) -> &'static str {
        match self {
            Arch::X64 => "amd64",
            Arch::Arm64 => "arm64",
            Arch::X86 => "386",
        }
    }

    /// Directory name used for the architecture level of the tool cache
    pub fn cache_name(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::X86 => "ia32",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Returns the platform this process runs on, or None when releases are not built for it
    pub fn current() -> Option<Self> {
        Some(Self::new(Os::current()?, Arch::current()?))
    }

    /// Fragment identifying this platform inside an asset name, e.g. `_linux_amd64`
    pub fn asset_suffix(&self) -> String {
        format!("_{}_{}", self.os.asset_name(), self.arch.asset_name())
    }

    /// File name of a tool's executable on this platform
    pub fn executable_name(&self, binary: &str) -> String {
        match self.os {
            Os::Windows => format!("{binary}.exe"),
            _ => binary.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.asset_name(), self.arch.asset_name())
    }
}
