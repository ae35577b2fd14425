//! Streamed asset download.
//!
//! One transfer per call: GET the asset URL, stream the body chunk by chunk
//! into a staging file, rename on completion. The whole body is never held
//! in memory, and a failed transfer never leaves a complete-looking file at
//! the final destination path.

use log::{debug, info};
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::asset::DownloadTarget;

/// Default total-operation bound for one transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Outcome of one download call: the absolute path of the written file, or
/// a typed reason for the failure.
pub type DownloadOutcome = Result<PathBuf, DownloadError>;

/// Why a download did not complete.
#[derive(Debug)]
pub enum DownloadError {
    /// The server answered with a non-success status. Nothing was written.
    Status(u16),
    /// The connection failed or the configured timeout elapsed.
    Transport(String),
    /// The destination could not be created or written.
    Io(String),
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadError::Status(code) => write!(f, "Download failed with status {}", code),
            DownloadError::Transport(msg) => write!(f, "Download transport error: {}", msg),
            DownloadError::Io(msg) => write!(f, "Download I/O error: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

/// Observer for transfer progress, called after each received chunk with
/// the running byte total. Implementations must be cheap.
pub trait Progress: Send + Sync {
    fn transferred(&self, total_bytes: u64);
}

/// Progress sink that reports nothing.
pub struct NoProgress;

impl Progress for NoProgress {
    fn transferred(&self, _total_bytes: u64) {}
}

/// Streams one asset to a destination directory under a total-operation
/// timeout. Every failure comes back as a [`DownloadError`]; nothing
/// propagates past this boundary.
pub struct AssetDownloader {
    timeout: Duration,
}

impl AssetDownloader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Download `target` into `dest_dir`, creating the directory if needed,
    /// and return the absolute path of the written file.
    ///
    /// The body is staged at `<name>.part` and renamed to the final name
    /// only after the last chunk, so an interrupted transfer leaves nothing
    /// at the destination path.
    #[tracing::instrument(skip(self, progress))]
    pub async fn download(
        &self,
        target: DownloadTarget<'_>,
        dest_dir: &Path,
        progress: &dyn Progress,
    ) -> DownloadOutcome {
        std::fs::create_dir_all(dest_dir).map_err(|e| {
            DownloadError::Io(format!("Failed to create {}: {}", dest_dir.display(), e))
        })?;

        // Scoped to this call; dropping it releases every connection.
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| DownloadError::Transport(e.to_string()))?;

        debug!("Downloading {} from {}...", target.name, target.url);

        let mut response = client
            .get(target.url)
            .send()
            .await
            .map_err(|e| DownloadError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status().as_u16()));
        }

        let final_path = dest_dir.join(target.name);
        let part_path = dest_dir.join(format!("{}.part", target.name));

        match stream_to(&mut response, &part_path, progress).await {
            Ok(bytes) => {
                std::fs::rename(&part_path, &final_path).map_err(|e| {
                    let _ = std::fs::remove_file(&part_path);
                    DownloadError::Io(format!("Failed to move {}: {}", part_path.display(), e))
                })?;
                info!(
                    "Downloaded {} ({:.2} MB)",
                    target.name,
                    bytes as f64 / (1024.0 * 1024.0)
                );
                Ok(std::fs::canonicalize(&final_path).unwrap_or(final_path))
            }
            Err(e) => {
                // Never leave a half-written staging file behind.
                let _ = std::fs::remove_file(&part_path);
                Err(e)
            }
        }
    }
}

impl Default for AssetDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// Chunked read-write loop. Each chunk goes straight to disk.
async fn stream_to(
    response: &mut reqwest::Response,
    path: &Path,
    progress: &dyn Progress,
) -> Result<u64, DownloadError> {
    let mut file = std::fs::File::create(path)
        .map_err(|e| DownloadError::Io(format!("Failed to create {}: {}", path.display(), e)))?;

    let mut transferred: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| DownloadError::Transport(e.to_string()))?
    {
        file.write_all(&chunk)
            .map_err(|e| DownloadError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        transferred += chunk.len() as u64;
        progress.transferred(transferred);
    }

    Ok(transferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    struct CountingProgress {
        total: AtomicU64,
    }

    impl Progress for CountingProgress {
        fn transferred(&self, total_bytes: u64) {
            self.total.store(total_bytes, Ordering::SeqCst);
        }
    }

    fn target<'a>(name: &'a str, url: &'a str) -> DownloadTarget<'a> {
        DownloadTarget { name, url }
    }

    #[tokio::test]
    async fn test_download_writes_exact_bytes() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/App_x64.msixbundle")
            .with_status(200)
            .with_body("INSTALLER_DATA")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let downloader = AssetDownloader::new(Duration::from_secs(5));

        let path = downloader
            .download(
                target(
                    "App_x64.msixbundle",
                    &format!("{}/App_x64.msixbundle", url),
                ),
                dir.path(),
                &NoProgress,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(path.is_absolute());
        assert_eq!(path.file_name().unwrap(), "App_x64.msixbundle");
        assert_eq!(std::fs::read(&path).unwrap(), b"INSTALLER_DATA");
        // The staging file must be gone after the rename.
        assert!(!dir.path().join("App_x64.msixbundle.part").exists());
    }

    #[tokio::test]
    async fn test_download_large_body_round_trips() {
        // A body well past any single network read, with a patterned
        // payload so truncation or reordering would be caught.
        let body: Vec<u8> = (0..256 * 1024u32).map(|i| (i % 251) as u8).collect();

        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/big.bin")
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let downloader = AssetDownloader::new(Duration::from_secs(10));
        let progress = CountingProgress {
            total: AtomicU64::new(0),
        };

        let path = downloader
            .download(
                target("big.bin", &format!("{}/big.bin", url)),
                dir.path(),
                &progress,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(std::fs::read(&path).unwrap(), body);
        assert_eq!(progress.total.load(Ordering::SeqCst), body.len() as u64);
    }

    #[tokio::test]
    async fn test_download_not_found_writes_nothing() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/missing.exe")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let downloader = AssetDownloader::new(Duration::from_secs(5));

        let result = downloader
            .download(
                target("missing.exe", &format!("{}/missing.exe", url)),
                dir.path(),
                &NoProgress,
            )
            .await;

        mock.assert_async().await;
        match result {
            Err(DownloadError::Status(code)) => assert_eq!(code, 404),
            other => panic!("Expected Status error, got {:?}", other),
        }
        // The destination directory stays empty: no file, no staging file.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_truncated_body_leaves_no_artifact() {
        // A server that promises 100 bytes, sends 7, and drops the
        // connection mid-body.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let _ = stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\npartial")
                .await;
        });

        let dir = tempfile::tempdir().unwrap();
        let downloader = AssetDownloader::new(Duration::from_secs(5));

        let result = downloader
            .download(
                target("file.bin", &format!("http://{}/file.bin", addr)),
                dir.path(),
                &NoProgress,
            )
            .await;

        assert!(matches!(result, Err(DownloadError::Transport(_))));
        assert!(!dir.path().join("file.bin").exists());
        assert!(!dir.path().join("file.bin.part").exists());
    }

    #[tokio::test]
    async fn test_download_timeout_is_bounded() {
        // A server that accepts the connection and then never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let dir = tempfile::tempdir().unwrap();
        let downloader = AssetDownloader::new(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let result = downloader
            .download(
                target("slow.bin", &format!("http://{}/slow.bin", addr)),
                dir.path(),
                &NoProgress,
            )
            .await;
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(DownloadError::Transport(_))));
        // Well under the server's stall, close to the configured bound.
        assert!(elapsed < Duration::from_secs(5));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/setup.exe")
            .with_status(200)
            .with_body("new contents")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("setup.exe"), "old contents").unwrap();

        let downloader = AssetDownloader::new(Duration::from_secs(5));
        let path = downloader
            .download(
                target("setup.exe", &format!("{}/setup.exe", url)),
                dir.path(),
                &NoProgress,
            )
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new contents");
    }

    #[tokio::test]
    async fn test_download_creates_destination_dir() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/setup.exe")
            .with_status(200)
            .with_body("data")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("downloads");

        let downloader = AssetDownloader::new(Duration::from_secs(5));
        let path = downloader
            .download(
                target("setup.exe", &format!("{}/setup.exe", url)),
                &nested,
                &NoProgress,
            )
            .await
            .unwrap();

        assert!(nested.is_dir());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }

    #[test]
    fn test_download_error_display() {
        assert!(
            DownloadError::Status(404)
                .to_string()
                .contains("status 404")
        );
        assert!(
            DownloadError::Transport("reset".to_string())
                .to_string()
                .contains("reset")
        );
        assert!(
            DownloadError::Io("denied".to_string())
                .to_string()
                .contains("denied")
        );
    }
}
