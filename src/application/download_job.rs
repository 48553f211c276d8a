use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;
use url::Url;

use crate::domain::{AppError, ProgressSnapshot};
use crate::utils::file_name_from_url;

/// A validated source URL and the file it will be written to.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    url: Url,
    destination: PathBuf,
}

impl DownloadRequest {
    /// The file keeps the name of the last URL path segment.
    pub fn new(url: &str, destination_dir: &Path) -> Result<Self, AppError> {
        let url = Url::parse(url)
            .map_err(|e| AppError::RequestCreation(format!("invalid URL {}: {}", url, e)))?;
        let file_name = file_name_from_url(&url).ok_or_else(|| {
            AppError::RequestCreation(format!("no file name in URL {}", url))
        })?;

        if destination_dir.as_os_str().is_empty() {
            return Err(AppError::RequestCreation(
                "destination directory is empty".to_string(),
            ));
        }

        Ok(Self {
            destination: destination_dir.join(file_name),
            url,
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Cancels a running download. Cloned freely; every clone cancels the same job.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }
}

/// Handle to one in-flight download. The transfer task is the only writer of
/// the progress channel; this side only reads it.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    request: DownloadRequest,
    progress: watch::Receiver<ProgressSnapshot>,
    cancel: CancelHandle,
}

impl DownloadJob {
    pub(crate) fn new(
        request: DownloadRequest,
        progress: watch::Receiver<ProgressSnapshot>,
        cancel: watch::Sender<bool>,
    ) -> Self {
        Self {
            request,
            progress,
            cancel: CancelHandle(Arc::new(cancel)),
        }
    }

    pub fn url(&self) -> &str {
        self.request.url()
    }

    pub fn destination(&self) -> &Path {
        self.request.destination()
    }

    #[cfg(test)]
    pub(crate) fn progress_receiver(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.clone()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.progress.borrow().clone()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
