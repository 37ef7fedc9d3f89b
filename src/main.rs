use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use setup_go_actions::config::{
    DEFAULT_API_URL, DEFAULT_TOOL_BINARY, DEFAULT_TOOL_NAME, DEFAULT_TOOL_OWNER, InstallerConfig,
    ToolSpec,
};
use setup_go_actions::install::Installer;
use setup_go_actions::platform::Platform;

#[derive(Parser)]
#[command(name = "setup-go-actions")]
#[command(version, about = "Install a go-actions release into the tool cache")]
struct Cli {
    /// Version to install: exact ("0.5.0") or prefix ("0.5", "0.5.x", "0.x")
    #[arg(default_value = "0.x")]
    version: String,

    /// Tool name (GitHub repository and cache directory name)
    #[arg(long, default_value = DEFAULT_TOOL_NAME)]
    tool: String,

    /// GitHub owner of the tool repository
    #[arg(long, default_value = DEFAULT_TOOL_OWNER)]
    owner: String,

    /// Executable inside the release archive
    #[arg(long, default_value = DEFAULT_TOOL_BINARY)]
    binary: String,

    /// Tool cache root (defaults to $RUNNER_TOOL_CACHE)
    #[arg(long)]
    cache_root: Option<PathBuf>,

    /// Download directory (defaults to $RUNNER_TEMP)
    #[arg(long)]
    temp_root: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Always consult the release index instead of reusing a cached match
    #[arg(long)]
    no_prefer_cached: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = InstallerConfig::from_env();
    if let Some(cache_root) = cli.cache_root {
        config.cache_root = cache_root;
    }
    if let Some(temp_root) = cli.temp_root {
        config.temp_root = temp_root;
    }
    config.prefer_cached = !cli.no_prefer_cached;

    let tool = ToolSpec {
        name: cli.tool,
        owner: cli.owner,
        binary: cli.binary,
    };
    let platform = Platform::current().with_context(|| {
        format!(
            "unsupported platform {}/{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    })?;
    let token = std::env::var("GITHUB_TOKEN")
        .or_else(|_| std::env::var("GH_TOKEN"))
        .ok();

    let installer = Installer::github(tool, config, platform, &cli.api_url, token);
    let path = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(installer.get_tool(&cli.version))?;

    println!("{}", path.display());
    if let Some(github_path) = std::env::var_os("GITHUB_PATH") {
        add_path(Path::new(&github_path), &path)?;
    }

    Ok(())
}

/// Append the install directory to the runner's PATH file
fn add_path(github_path: &Path, dir: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(github_path)
        .with_context(|| format!("failed to open {}", github_path.display()))?;
    writeln!(file, "{}", dir.display())?;
    Ok(())
}
