use std::path::PathBuf;
use std::time::{Duration, Instant};

use futures::StreamExt;
use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;

use crate::{
    api::ApiClient,
    application::{
        download_job::{DownloadJob, DownloadRequest},
        version_extractor::extract_versions,
    },
    domain::{AppError, JobState, Platform, ProgressSnapshot, VersionCatalog},
};

const RATE_WINDOW: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    Progress(ProgressSnapshot),
    Completed(PathBuf),
    Failed(AppError),
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    /// Fetch the release page and resolve a link for every version on it.
    pub async fn load_catalog(&self, platform: Platform) -> Result<VersionCatalog, AppError> {
        let page = self
            .api_client
            .fetch_release_page()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let extracted = extract_versions(page.lines())?;
        for (version, raw) in &extracted.raw_matches {
            log::debug!("EA {} matched as {:?}", version, raw);
        }

        Ok(VersionCatalog::resolve(
            extracted.versions,
            platform,
            self.api_client.repo_base(),
        ))
    }

    /// Check that `url` answers, then start streaming it into
    /// `destination_dir` in the background.
    pub async fn start_download(
        &self,
        url: String,
        destination_dir: PathBuf,
    ) -> Result<DownloadJob, AppError> {
        let status = self
            .api_client
            .ping(&url)
            .await
            .map_err(|e| AppError::Unreachable(e.to_string()))?;

        if status != StatusCode::OK {
            log::error!("Ping of {} answered {}", url, status);
            return Err(AppError::Unreachable(format!(
                "no download link found (status {}), GitHub seems to be having issues",
                status
            )));
        }

        let request = DownloadRequest::new(&url, &destination_dir)?;
        tokio::fs::create_dir_all(&destination_dir)
            .await
            .map_err(|e| {
                AppError::RequestCreation(format!(
                    "Failed to create {}: {}",
                    destination_dir.display(),
                    e
                ))
            })?;

        let (progress_tx, progress_rx) = watch::channel(ProgressSnapshot::default());
        let (cancel_tx, cancel_rx) = watch::channel(false);
        progress_tx.send_modify(|snapshot| snapshot.state = JobState::Running);

        log::info!(
            "Downloading {} to {}",
            request.url(),
            request.destination().display()
        );

        let job = DownloadJob::new(request.clone(), progress_rx, cancel_tx);
        tokio::spawn(run_transfer(
            self.api_client.clone(),
            request,
            progress_tx,
            cancel_rx,
        ));

        Ok(job)
    }
}

async fn run_transfer(
    client: ApiClient,
    request: DownloadRequest,
    progress: watch::Sender<ProgressSnapshot>,
    mut cancel: watch::Receiver<bool>,
) {
    // Every handle being dropped also counts as a cancellation.
    let cancelled = async {
        let _ = cancel.wait_for(|requested| *requested).await;
    };

    let state = tokio::select! {
        result = transfer(&client, &request, &progress) => match result {
            Ok(()) => JobState::Completed,
            Err(e) => JobState::Failed(e),
        },
        _ = cancelled => JobState::Cancelled,
    };

    match &state {
        JobState::Completed => {
            log::info!("Download of {} completed", request.url());
        }
        JobState::Cancelled => {
            log::info!("Download of {} cancelled", request.url());
            remove_partial_file(&request).await;
        }
        JobState::Failed(e) => {
            log::error!("Download of {} failed: {}", request.url(), e);
            remove_partial_file(&request).await;
        }
        JobState::Created | JobState::Running => {}
    }

    progress.send_modify(|snapshot| {
        if state == JobState::Completed && snapshot.total_bytes.is_none() {
            snapshot.total_bytes = Some(snapshot.bytes_transferred);
        }
        snapshot.state = state;
    });
}

async fn remove_partial_file(request: &DownloadRequest) {
    if let Err(e) = tokio::fs::remove_file(request.destination()).await {
        log::debug!(
            "No partial file removed at {}: {}",
            request.destination().display(),
            e
        );
    }
}

async fn transfer(
    client: &ApiClient,
    request: &DownloadRequest,
    progress: &watch::Sender<ProgressSnapshot>,
) -> Result<(), AppError> {
    let (total_size, stream) = client
        .download_file_stream(request.url())
        .await
        .map_err(|e| AppError::Transfer(e.to_string()))?;
    let mut stream = stream.boxed();

    progress.send_modify(|snapshot| snapshot.total_bytes = total_size);

    let mut file = tokio::fs::File::create(request.destination())
        .await
        .map_err(|e| AppError::Transfer(format!("Failed to create file: {}", e)))?;

    let mut meter = RateMeter::new(Instant::now());
    // Closes rate windows while the server sends nothing, so a stall reads as 0.
    let mut ticker = tokio::time::interval(RATE_WINDOW);
    loop {
        let len = tokio::select! {
            chunk = stream.next() => match chunk {
                Some(chunk) => {
                    let chunk = chunk.map_err(|e| AppError::Transfer(e.to_string()))?;
                    file.write_all(&chunk)
                        .await
                        .map_err(|e| AppError::Transfer(format!("Write error: {}", e)))?;
                    chunk.len() as u64
                }
                None => break,
            },
            _ = ticker.tick() => 0,
        };

        let rate = meter.record(len, Instant::now());
        progress.send_modify(|snapshot| {
            snapshot.bytes_transferred += len;
            if let Some(rate) = rate {
                snapshot.bytes_per_second = rate;
            }
        });
    }

    file.sync_all()
        .await
        .map_err(|e| AppError::Transfer(format!("Failed to sync file: {}", e)))?;

    Ok(())
}

/// Transfer rate over consecutive windows of at least `RATE_WINDOW`.
struct RateMeter {
    window_start: Instant,
    window_bytes: u64,
}

impl RateMeter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            window_bytes: 0,
        }
    }

    /// Returns the rate of the window that just closed, if any.
    fn record(&mut self, bytes: u64, now: Instant) -> Option<f64> {
        self.window_bytes += bytes;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < RATE_WINDOW {
            return None;
        }

        let rate = self.window_bytes as f64 / elapsed.as_secs_f64();
        self.window_start = now;
        self.window_bytes = 0;
        Some(rate)
    }
}
