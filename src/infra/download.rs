//! HTTP download functionality
//!
//! Downloads a file to disk unless it is already there, reporting throttled
//! progress and retrying with exponential backoff.

use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::defaults;
use crate::core::flags::Flags;
use crate::error::DownloadError;

/// Snapshot of a transfer in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Bytes written so far
    pub transferred: u64,
    /// Expected size, when the server announced one
    pub total: Option<u64>,
    /// Average speed since the request started
    pub bytes_per_sec: f64,
}

impl Progress {
    /// Completed fraction in `[0, 1]`, `0` when the total is unknown
    pub fn fraction(&self) -> f64 {
        match self.total {
            #[allow(clippy::cast_precision_loss)]
            Some(total) if total > 0 => (self.transferred as f64 / total as f64).min(1.0),
            _ => 0.0,
        }
    }
}

/// Progress callback type for download progress reporting
pub type ProgressCallback = Box<dyn Fn(Progress) + Send + Sync>;

/// Download result containing file path and metadata
#[derive(Debug)]
pub struct DownloadResult {
    /// Path to the downloaded file
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// What [`DownloadManager::fetch`] did
#[derive(Debug)]
pub enum FetchOutcome {
    /// The file was transferred
    Downloaded(DownloadResult),
    /// The target already existed and nothing was transferred
    Skipped(PathBuf),
}

/// Download manager for fetching files with retry support
#[derive(Debug, Clone)]
pub struct DownloadManager {
    /// HTTP client
    client: reqwest::Client,
    /// Maximum retry attempts
    max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds)
    base_delay_ms: u64,
    /// No progress is reported before this much time has passed
    progress_delay: Duration,
    /// Minimum time between two progress reports
    progress_throttle: Duration,
}

impl DownloadManager {
    /// Create a new download manager
    pub fn new() -> Self {
        Self::with_config(defaults::MAX_DOWNLOAD_RETRIES, defaults::RETRY_BASE_DELAY_MS)
    }

    /// Create a download manager with custom settings
    pub fn with_config(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(defaults::USER_AGENT)
                .timeout(Duration::from_secs(300))
                .connect_timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            max_retries: max_retries.max(1),
            base_delay_ms,
            progress_delay: Duration::from_millis(defaults::PROGRESS_DELAY_MS),
            progress_throttle: Duration::from_millis(defaults::PROGRESS_THROTTLE_MS),
        }
    }

    /// Override when and how often progress is reported
    #[must_use]
    pub fn with_progress_timing(mut self, delay: Duration, throttle: Duration) -> Self {
        self.progress_delay = delay;
        self.progress_throttle = throttle;
        self
    }

    /// Get max retries
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fetch `url` into `dest`
    ///
    /// An existing `dest` is kept and the download skipped, unless
    /// `flags.force` is set, in which case it is deleted first.
    ///
    /// # Arguments
    /// * `url` - URL to download from
    /// * `dest` - Destination path
    /// * `flags` - Behavior flags (`force` is honored)
    /// * `progress` - Optional progress callback
    pub async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        flags: &Flags,
        progress: Option<ProgressCallback>,
    ) -> Result<FetchOutcome, DownloadError> {
        if flags.force && dest.exists() {
            tracing::info!("Removing {} (forced re-download)", dest.display());
            tokio::fs::remove_file(dest)
                .await
                .map_err(|e| DownloadError::Io {
                    path: dest.to_path_buf(),
                    error: e.to_string(),
                })?;
        }

        if dest.exists() {
            tracing::info!("File found at {}", dest.display());
            tracing::info!("Skipping download...");
            return Ok(FetchOutcome::Skipped(dest.to_path_buf()));
        }

        tracing::info!("Fetching: {url}");
        self.download(url, dest, progress)
            .await
            .map(FetchOutcome::Downloaded)
    }

    /// Download a file with retry logic, overwriting `dest`
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<DownloadResult, DownloadError> {
        let mut attempts = 0;
        let mut last_error = None;
        let mut delay_ms = self.base_delay_ms;

        while attempts < self.max_retries {
            attempts += 1;

            match self.download_once(url, dest, progress.as_ref()).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!("Download attempt {attempts} failed: {e}");
                    last_error = Some(e);

                    if attempts < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = (delay_ms * 2).min(defaults::RETRY_MAX_DELAY_MS);
                    }
                }
            }
        }

        // Clean up partial download on failure
        let _ = tokio::fs::remove_file(dest).await;

        Err(last_error.unwrap_or_else(|| DownloadError::MaxRetriesExceeded {
            url: url.to_string(),
            retries: self.max_retries,
        }))
    }

    /// Single download attempt without retry
    async fn download_once(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadResult, DownloadError> {
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::Network {
                url: url.to_string(),
                error: format!("HTTP {}", response.status()),
            });
        }

        let total = response.content_length();

        // Create parent directories if needed
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::Io {
                    path: parent.to_path_buf(),
                    error: e.to_string(),
                })?;
        }

        let mut file = File::create(dest).await.map_err(|e| DownloadError::Io {
            path: dest.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut transferred: u64 = 0;
        let mut last_report: Option<Instant> = None;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;

            file.write_all(&chunk).await.map_err(|e| DownloadError::Io {
                path: dest.to_path_buf(),
                error: e.to_string(),
            })?;

            transferred += chunk.len() as u64;

            if let Some(cb) = progress {
                let now = Instant::now();
                let due = now.duration_since(started) >= self.progress_delay
                    && last_report.map_or(true, |at| now.duration_since(at) >= self.progress_throttle);
                if due {
                    last_report = Some(now);
                    cb(snapshot(transferred, total, started));
                }
            }
        }

        file.flush().await.map_err(|e| DownloadError::Io {
            path: dest.to_path_buf(),
            error: e.to_string(),
        })?;

        if let Some(cb) = progress {
            cb(snapshot(transferred, total, started));
        }

        Ok(DownloadResult {
            path: dest.to_path_buf(),
            size: transferred,
        })
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot(transferred: u64, total: Option<u64>, started: Instant) -> Progress {
    let elapsed = started.elapsed().as_secs_f64();
    #[allow(clippy::cast_precision_loss)]
    let bytes_per_sec = if elapsed > 0.0 {
        transferred as f64 / elapsed
    } else {
        0.0
    };
    Progress {
        transferred,
        total,
        bytes_per_sec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ============================================
    // Unit Tests - Download manager creation
    // ============================================

    #[test]
    fn test_download_manager_default() {
        let manager = DownloadManager::new();
        assert_eq!(manager.max_retries(), 3);
    }

    #[test]
    fn test_download_manager_with_config() {
        let manager = DownloadManager::with_config(5, 500);
        assert_eq!(manager.max_retries(), 5);
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        let manager = DownloadManager::with_config(0, 10);
        assert_eq!(manager.max_retries(), 1);
    }

    #[test]
    fn test_progress_fraction() {
        let p = Progress {
            transferred: 50,
            total: Some(200),
            bytes_per_sec: 0.0,
        };
        assert!((p.fraction() - 0.25).abs() < f64::EPSILON);

        let unknown = Progress { total: None, ..p };
        assert!(unknown.fraction().abs() < f64::EPSILON);

        let overshoot = Progress {
            transferred: 300,
            ..p
        };
        assert!((overshoot.fraction() - 1.0).abs() < f64::EPSILON);
    }

    // ============================================
    // Async Tests - Download functionality
    // ============================================

    #[tokio::test]
    async fn test_fetch_downloads_missing_file() {
        let mock_server = MockServer::start().await;
        let content = b"test file content";

        Mock::given(method("GET"))
            .and(path("/test.txt"))
            .and(header("user-agent", "Emanator"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
            .mount(&mock_server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("deps").join("downloaded.txt");
        let manager = DownloadManager::new();

        let outcome = manager
            .fetch(
                &format!("{}/test.txt", mock_server.uri()),
                &dest,
                &Flags::default(),
                None,
            )
            .await
            .unwrap();

        match outcome {
            FetchOutcome::Downloaded(result) => {
                assert_eq!(result.size, content.len() as u64);
                assert_eq!(result.path, dest);
            }
            FetchOutcome::Skipped(_) => panic!("Expected a download"),
        }
        assert_eq!(std::fs::read(&dest).unwrap(), content);
    }

    #[tokio::test]
    async fn test_fetch_skips_existing_file() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/existing.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("existing.txt");
        std::fs::write(&dest, b"old").unwrap();

        let outcome = DownloadManager::new()
            .fetch(
                &format!("{}/existing.txt", mock_server.uri()),
                &dest,
                &Flags::default(),
                None,
            )
            .await
            .unwrap();

        assert!(matches!(outcome, FetchOutcome::Skipped(_)));
        assert_eq!(std::fs::read(&dest).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_fetch_force_replaces_existing_file() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/existing.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("existing.txt");
        std::fs::write(&dest, b"old").unwrap();

        let flags = Flags {
            force: true,
            ..Flags::default()
        };
        let outcome = DownloadManager::new()
            .fetch(
                &format!("{}/existing.txt", mock_server.uri()),
                &dest,
                &flags,
                None,
            )
            .await
            .unwrap();

        assert!(matches!(outcome, FetchOutcome::Downloaded(_)));
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_download_reports_final_progress() {
        let mock_server = MockServer::start().await;
        let content = b"test file content for progress";

        Mock::given(method("GET"))
            .and(path("/progress.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
            .mount(&mock_server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("progress.txt");
        let manager = DownloadManager::new();

        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let progress: ProgressCallback = Box::new(move |p| sink.lock().unwrap().push(p));

        manager
            .download(
                &format!("{}/progress.txt", mock_server.uri()),
                &dest,
                Some(progress),
            )
            .await
            .unwrap();

        let reports = reports.lock().unwrap();
        let last = reports.last().expect("at least the final report");
        assert_eq!(last.transferred, content.len() as u64);
        assert_eq!(last.total, Some(content.len() as u64));
    }

    #[tokio::test]
    async fn test_download_retry_on_failure() {
        let mock_server = MockServer::start().await;
        let content = b"retry content";

        // First two requests fail, third succeeds
        Mock::given(method("GET"))
            .and(path("/retry.txt"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/retry.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
            .mount(&mock_server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("retry.txt");
        // Use short delays for testing
        let manager = DownloadManager::with_config(3, 10);

        let result = manager
            .download(&format!("{}/retry.txt", mock_server.uri()), &dest, None)
            .await;

        assert!(result.is_ok());
        assert_eq!(std::fs::read(&dest).unwrap(), content);
    }

    #[tokio::test]
    async fn test_download_max_retries_exceeded() {
        let mock_server = MockServer::start().await;

        // All requests fail
        Mock::given(method("GET"))
            .and(path("/fail.txt"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("fail.txt");
        let manager = DownloadManager::with_config(3, 10);

        let result = manager
            .download(&format!("{}/fail.txt", mock_server.uri()), &dest, None)
            .await;

        match result.unwrap_err() {
            DownloadError::Network { error, .. } => assert!(error.contains("500")),
            e => panic!("Expected Network error, got: {e:?}"),
        }
        // File should not exist after all retries fail
        assert!(!dest.exists());
    }
}
