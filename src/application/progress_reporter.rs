use std::time::Duration;

use futures::{stream::BoxStream, StreamExt};

use super::{download_coordinator::DownloadEvent, download_job::DownloadJob};
use crate::domain::JobState;

pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Poll `job` every `interval` and turn what it reports into events.
///
/// Yields any number of `Progress` events followed by at most one
/// `Completed` or `Failed`. A cancelled job ends the stream silently.
pub fn report_progress(job: DownloadJob, interval: Duration) -> BoxStream<'static, DownloadEvent> {
    futures::stream::unfold(Some(job), move |job| async move {
        let job = job?;

        tokio::time::sleep(interval).await;

        if job.cancel_handle().is_cancelled() {
            return None;
        }

        let snapshot = job.snapshot();
        match snapshot.state {
            JobState::Created | JobState::Running => {
                Some((DownloadEvent::Progress(snapshot), Some(job)))
            }
            JobState::Completed => Some((
                DownloadEvent::Completed(job.destination().to_path_buf()),
                None,
            )),
            JobState::Failed(error) => Some((DownloadEvent::Failed(error), None)),
            JobState::Cancelled => None,
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::download_job::DownloadRequest;
    use crate::domain::{AppError, ProgressSnapshot};
    use std::path::Path;
    use tokio::sync::watch;

    const TICK: Duration = Duration::from_millis(5);

    fn job_with_state(
        state: JobState,
    ) -> (DownloadJob, watch::Sender<ProgressSnapshot>, watch::Receiver<bool>) {
        let request =
            DownloadRequest::new("https://example.com/Linux-Yuzu-EA-1.AppImage", Path::new("/opt"))
                .unwrap();
        let (progress_tx, progress_rx) = watch::channel(ProgressSnapshot {
            state,
            ..Default::default()
        });
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (
            DownloadJob::new(request, progress_rx, cancel_tx),
            progress_tx,
            cancel_rx,
        )
    }

    #[tokio::test]
    async fn test_completed_job_emits_single_success() {
        let (job, _progress, _cancel) = job_with_state(JobState::Completed);

        let events: Vec<_> = report_progress(job, TICK).collect().await;

        assert_eq!(
            events,
            vec![DownloadEvent::Completed(
                Path::new("/opt/Linux-Yuzu-EA-1.AppImage").to_path_buf()
            )]
        );
    }

    #[tokio::test]
    async fn test_progress_then_completion() {
        let (job, progress, _cancel) = job_with_state(JobState::Running);
        let mut events = report_progress(job, TICK);

        progress.send_modify(|snapshot| {
            snapshot.total_bytes = Some(10);
            snapshot.bytes_transferred = 5;
        });
        match events.next().await {
            Some(DownloadEvent::Progress(snapshot)) => assert_eq!(snapshot.fraction(), 0.5),
            other => panic!("expected progress, got {:?}", other),
        }

        progress.send_modify(|snapshot| {
            snapshot.bytes_transferred = 10;
            snapshot.state = JobState::Completed;
        });
        assert!(matches!(
            events.next().await,
            Some(DownloadEvent::Completed(_))
        ));
        assert_eq!(events.next().await, None);
    }

    #[tokio::test]
    async fn test_cancel_stops_without_success() {
        let (job, _progress, cancel) = job_with_state(JobState::Running);
        let handle = job.cancel_handle();
        let mut events = report_progress(job, TICK);

        assert!(matches!(events.next().await, Some(DownloadEvent::Progress(_))));

        handle.cancel();
        assert!(*cancel.borrow());
        assert_eq!(events.next().await, None);
    }

    #[tokio::test]
    async fn test_cancelled_state_ends_silently() {
        let (job, _progress, _cancel) = job_with_state(JobState::Cancelled);

        let events: Vec<_> = report_progress(job, TICK).collect().await;

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_terminal() {
        let error = AppError::Transfer("connection reset".to_string());
        let (job, _progress, _cancel) = job_with_state(JobState::Failed(error.clone()));

        let events: Vec<_> = report_progress(job, TICK).collect().await;

        assert_eq!(events, vec![DownloadEvent::Failed(error)]);
    }
}
