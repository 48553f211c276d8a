pub mod download_coordinator;
pub mod download_job;
pub mod progress_reporter;
pub mod version_extractor;

pub use download_coordinator::{DownloadCoordinator, DownloadEvent};
pub use download_job::{CancelHandle, DownloadJob};
pub use progress_reporter::{report_progress, POLL_INTERVAL};
