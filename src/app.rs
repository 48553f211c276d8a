use crate::api::{ApiClient, ApiConfig};
use crate::application::{
    report_progress, CancelHandle, DownloadCoordinator, DownloadEvent, DownloadJob, POLL_INTERVAL,
};
use crate::config::{PreferenceStore, Preferences};
use crate::domain::{AppError, Platform, VersionCatalog};
use crate::ui::{DownloadProgress, LauncherView, Notice, Screen, UiMessage};
use crate::utils::format_rate;
use iced::Task;
use std::path::PathBuf;

pub struct LauncherApp {
    view: LauncherView,
    coordinator: DownloadCoordinator,
    platform: Platform,
    preference_store: PreferenceStore,
    preferences: Preferences,
    catalog: Option<VersionCatalog>,
    // Only one download runs at a time; events of any other id are stale
    active_download: Option<ActiveDownload>,
    next_download_id: u64,
}

struct ActiveDownload {
    id: u64,
    /// `None` until the transfer has been started
    cancel: Option<CancelHandle>,
}

pub fn boot() -> (LauncherApp, Task<Message>) {
    LauncherApp::new(PreferenceStore::default_location(), ApiConfig::default())
}

impl LauncherApp {
    pub fn new(preference_store: PreferenceStore, api_config: ApiConfig) -> (Self, Task<Message>) {
        log::info!(
            "Loading preferences from {}",
            preference_store.path().display()
        );
        let preferences = preference_store.load().unwrap_or_else(|e| {
            log::warn!("Falling back to default preferences: {}", e);
            Preferences::default()
        });

        let view = LauncherView {
            install_path: preferences.install_path.display().to_string(),
            ..Default::default()
        };

        let app = Self {
            view,
            coordinator: DownloadCoordinator::new(ApiClient::new(api_config)),
            platform: Platform::current(),
            preference_store,
            preferences,
            catalog: None,
            active_download: None,
            next_download_id: 0,
        };
        let task = app.load_catalog();

        (app, task)
    }

    fn load_catalog(&self) -> Task<Message> {
        let coordinator = self.coordinator.clone();
        let platform = self.platform;

        Task::perform(
            async move { coordinator.load_catalog(platform).await },
            Message::CatalogLoaded,
        )
    }

    fn is_active(&self, id: u64) -> bool {
        self.active_download
            .as_ref()
            .is_some_and(|active| active.id == id)
    }

    fn finish_download(&mut self) {
        self.active_download = None;
        self.view.download = None;
    }

    fn start_download(&mut self) -> Task<Message> {
        if self.active_download.is_some() {
            self.view.status_message = "A download is already running".to_string();
            return Task::none();
        }

        let Some(version) = self.view.selected_version else {
            self.view.status_message = "Select a version first".to_string();
            return Task::none();
        };

        let Some(catalog) = self.catalog.as_ref() else {
            return Task::none();
        };
        let Some(url) = catalog.link(version).map(str::to_string) else {
            self.view.notice = Some(Notice::Error(format!(
                "EA {} cannot be downloaded on {}",
                version,
                catalog.platform()
            )));
            return Task::none();
        };

        let id = self.next_download_id;
        self.next_download_id += 1;
        self.active_download = Some(ActiveDownload { id, cancel: None });
        self.view.download = Some(DownloadProgress {
            fraction: 0.0,
            speed: format_rate(0.0),
        });
        self.view.notice = None;
        self.view.status_message = format!("Downloading EA {}", version);

        let coordinator = self.coordinator.clone();
        let destination = self.preferences.install_path.clone();

        Task::perform(
            async move { coordinator.start_download(url, destination).await },
            move |result| Message::DownloadStarted(id, result),
        )
    }

    fn cancel_download(&mut self) {
        if let Some(active) = self.active_download.take() {
            if let Some(cancel) = active.cancel {
                cancel.cancel();
            }
            self.view.download = None;
            self.view.status_message = "Download cancelled".to_string();
        }
    }

    fn choose_install_path(&self) -> Task<Message> {
        let current = self.preferences.install_path.clone();

        Task::perform(
            async move {
                rfd::AsyncFileDialog::new()
                    .set_directory(&current)
                    .pick_folder()
                    .await
                    .map(|handle| handle.path().to_path_buf())
            },
            Message::InstallPathSelected,
        )
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(UiMessage),
    CatalogLoaded(Result<VersionCatalog, AppError>),
    /// (Download id, started job)
    DownloadStarted(u64, Result<DownloadJob, AppError>),
    /// (Download id, progress or terminal event)
    DownloadEvent(u64, DownloadEvent),
    InstallPathSelected(Option<PathBuf>),
}

pub fn update(app: &mut LauncherApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                UiMessage::DownloadPressed => return app.start_download(),
                UiMessage::CancelPressed => app.cancel_download(),
                UiMessage::SettingsPressed => return app.choose_install_path(),
                UiMessage::RetryPressed => {
                    app.view.screen = Screen::Loading;
                    return app.load_catalog();
                }
                _ => {}
            }
        }
        Message::CatalogLoaded(result) => match result {
            Ok(catalog) => {
                app.view.versions = catalog.versions().to_vec();
                app.view.screen = Screen::Ready;
                app.catalog = Some(catalog);
            }
            Err(e) => {
                log::error!("Could not load the version list: {}", e);
                app.view.screen = Screen::LoadFailed(e.to_string());
            }
        },
        Message::DownloadStarted(id, result) => {
            if !app.is_active(id) {
                // Cancelled while the link was being checked
                if let Ok(job) = result {
                    job.cancel();
                }
                return Task::none();
            }

            match result {
                Ok(job) => {
                    log::info!("Download of {} started", job.url());
                    if let Some(active) = app.active_download.as_mut() {
                        active.cancel = Some(job.cancel_handle());
                    }
                    return Task::stream(report_progress(job, POLL_INTERVAL))
                        .map(move |event| Message::DownloadEvent(id, event));
                }
                Err(e) => {
                    app.finish_download();
                    app.view.status_message = "Download failed".to_string();
                    app.view.notice = Some(Notice::Error(e.to_string()));
                }
            }
        }
        Message::DownloadEvent(id, event) => {
            if !app.is_active(id) {
                return Task::none();
            }

            match event {
                DownloadEvent::Progress(snapshot) => {
                    app.view.download = Some(DownloadProgress {
                        fraction: snapshot.fraction(),
                        speed: format_rate(snapshot.bytes_per_second),
                    });
                }
                DownloadEvent::Completed(path) => {
                    app.finish_download();
                    app.view.status_message = format!("Saved: {}", path.display());
                    app.view.notice = Some(Notice::Success("Download completed!".to_string()));
                }
                DownloadEvent::Failed(e) => {
                    app.finish_download();
                    app.view.status_message = "Download failed".to_string();
                    app.view.notice = Some(Notice::Error(e.to_string()));
                }
            }
        }
        Message::InstallPathSelected(path_opt) => {
            if let Some(path) = path_opt {
                app.preferences.install_path = path;
                app.view.install_path = app.preferences.install_path.display().to_string();

                if let Err(e) = app.preference_store.save(&app.preferences) {
                    app.view.notice = Some(Notice::Error(e.to_string()));
                }
            }
        }
    }
    Task::none()
}

pub fn view(app: &LauncherApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
