//! Presentation shell: orchestrates resolve → display → select → download
//! and owns all console output. The core components below it never touch
//! the terminal.

mod table;

use anyhow::{Context, Result};
use dialoguer::Select;
use is_terminal::is_terminal;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::asset::{AssetResolver, ResolutionResult};
use crate::download::{AssetDownloader, Progress};
use crate::store::StoreClient;

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub url: String,
    /// Download the first resolved asset without prompting.
    pub auto: bool,
    pub dir: Option<PathBuf>,
    /// Total-operation bound for each network call.
    pub timeout: Duration,
    pub api_url: Option<String>,
}

/// Resolve, display, select, download. Any failure that should surface as
/// a non-zero exit comes back as an error; quitting the prompt does not.
pub async fn run(opts: RunOptions) -> Result<()> {
    println!("Processing URL: {}", opts.url);
    if opts.auto {
        println!("Auto-download mode enabled");
    }

    let backend = StoreClient::new(opts.api_url.clone(), opts.timeout);
    let resolver = AssetResolver::new(backend);

    println!("Getting product information...");
    let result = resolver.fetch(&opts.url).await?;
    debug!("Resolved {} {} asset(s)", result.len(), result.family());

    table::print_assets(&result)?;

    let index = if opts.auto {
        println!("Auto-selecting first asset");
        Some(0)
    } else {
        select_index(&result)?
    };

    let Some(index) = index else {
        // Operator quit, or a non-interactive session that only listed.
        return Ok(());
    };

    let target = result
        .target(index)
        .context("Selected asset is out of range")?;
    println!("Selected: {}", target.name);

    let dest_dir = opts.dir.clone().unwrap_or_else(default_download_dir);
    println!("Downloading to: {}", dest_dir.join(target.name).display());

    let downloader = AssetDownloader::new(opts.timeout);
    let progress = ConsoleProgress::default();
    let path = downloader.download(target, &dest_dir, &progress).await?;
    progress.finish();

    println!("Download completed: {}", path.display());
    Ok(())
}

/// `downloads/` next to the executable, or under the working directory when
/// the executable location is unavailable.
pub fn default_download_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("downloads")
}

/// Ask the operator which asset to download. `None` means quit without
/// downloading; that includes non-interactive sessions, where prompting
/// would block forever.
fn select_index(result: &ResolutionResult) -> Result<Option<usize>> {
    if !is_terminal(&std::io::stdin()) {
        println!("Not an interactive session; pass --auto to download the first asset.");
        return Ok(None);
    }

    let labels = result.names();
    let picked = Select::new()
        .with_prompt("Asset to download (Esc to quit)")
        .items(&labels)
        .default(0)
        .interact_opt()
        .context("Selection prompt failed")?;

    Ok(picked)
}

/// Console progress sink; prints the running total once per crossed
/// mebibyte so small downloads stay quiet.
#[derive(Default)]
struct ConsoleProgress {
    last_mib: AtomicU64,
}

impl ConsoleProgress {
    fn finish(&self) {
        if self.last_mib.load(Ordering::Relaxed) > 0 {
            println!();
        }
    }
}

impl Progress for ConsoleProgress {
    fn transferred(&self, total_bytes: u64) {
        let mib = total_bytes / (1024 * 1024);
        if mib > self.last_mib.swap(mib, Ordering::Relaxed) {
            print!("\r  {} MB transferred", mib);
            let _ = std::io::stdout().flush();
        }
    }
}
