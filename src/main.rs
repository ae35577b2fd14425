use anyhow::Result;
use clap::Parser;
use msget::cli::{self, RunOptions};
use std::path::PathBuf;
use std::time::Duration;

/// Sample product page used when no URL is given.
const DEFAULT_PRODUCT_URL: &str = "https://apps.microsoft.com/detail/9pdxgncfsczv";

/// msget - Microsoft Store asset downloader
///
/// Resolve a store product page URL into its downloadable installer assets
/// and stream a chosen asset to disk.
///
/// Examples:
///   msget https://apps.microsoft.com/detail/9pdxgncfsczv
///   msget https://apps.microsoft.com/detail/9pdxgncfsczv --auto --dir /tmp
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Store product page URL
    #[arg(value_name = "URL", default_value = DEFAULT_PRODUCT_URL)]
    url: String,

    /// Download the first resolved asset without prompting
    #[arg(long)]
    auto: bool,

    /// Destination directory (defaults to downloads/ next to the executable)
    #[arg(long = "dir", value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Total timeout for one network operation, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 120)]
    timeout: u64,

    /// Store backend API URL (defaults to the production endpoint)
    #[arg(long = "api-url", env = "MSGET_API_URL", value_name = "URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    cli::run(RunOptions {
        url: cli.url,
        auto: cli.auto,
        dir: cli.dir,
        timeout: Duration::from_secs(cli.timeout),
        api_url: cli.api_url,
    })
    .await
}
