use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Tool defaults
// =============================================================================

/// Tool installed when no other tool is configured
pub const DEFAULT_TOOL_NAME: &str = "go-actions";

/// GitHub owner publishing the default tool's releases
pub const DEFAULT_TOOL_OWNER: &str = "variantdev";

/// Executable shipped inside the default tool's release archives
pub const DEFAULT_TOOL_BINARY: &str = "actions";

/// Default base URL for GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Timeout for HTTP operations in milliseconds (5 minutes, covers large asset downloads)
pub const HTTP_TIMEOUT_MS: u64 = 5 * 60 * 1000;

/// Installer configuration, passed explicitly to the installer at construction time
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InstallerConfig {
    /// Root of the tool cache (`<root>/<tool>/<version>/<arch>`)
    pub cache_root: PathBuf,
    /// Directory for downloaded archives before extraction
    pub temp_root: PathBuf,
    /// Resolve specifiers against complete cache entries before asking the release index
    pub prefer_cached: bool,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            cache_root: PathBuf::from("toolcache"),
            temp_root: PathBuf::from("temp"),
            prefer_cached: true,
        }
    }
}

impl InstallerConfig {
    /// Builds a config from the runner environment.
    /// Uses $RUNNER_TOOL_CACHE / $RUNNER_TEMP when set (GitHub Actions runners),
    /// otherwise falls back to the user cache directory and the OS temp directory.
    pub fn from_env() -> Self {
        Self {
            cache_root: cache_root_with_env(
                std::env::var("RUNNER_TOOL_CACHE").ok(),
                dirs::cache_dir(),
            ),
            temp_root: temp_root_with_env(std::env::var("RUNNER_TEMP").ok()),
            prefer_cached: true,
        }
    }
}

/// Describes which tool to install and where its releases live
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolSpec {
    /// Tool name, also the GitHub repository name and the cache directory name
    pub name: String,
    /// GitHub owner of the repository
    pub owner: String,
    /// Executable name inside the release archive (without `.exe`)
    pub binary: String,
}

impl Default for ToolSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOOL_NAME.to_string(),
            owner: DEFAULT_TOOL_OWNER.to_string(),
            binary: DEFAULT_TOOL_BINARY.to_string(),
        }
    }
}

fn cache_root_with_env(runner_tool_cache: Option<String>, cache_dir: Option<PathBuf>) -> PathBuf {
    runner_tool_cache
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| cache_dir.map(|dir| dir.join("setup-go-actions").join("tools")))
        .unwrap_or_else(|| PathBuf::from("toolcache"))
}

fn temp_root_with_env(runner_temp: Option<String>) -> PathBuf {
    runner_temp
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}
