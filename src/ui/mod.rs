use iced::{
    widget::{button, column, progress_bar, row, scrollable, text, Column, Space},
    Element, Length,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    LoadFailed(String),
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DownloadProgress {
    pub fraction: f32,
    pub speed: String,
}

/// Main view state
pub struct LauncherView {
    pub screen: Screen,
    pub versions: Vec<u32>,
    pub selected_version: Option<u32>,
    pub install_path: String,
    pub status_message: String,
    pub download: Option<DownloadProgress>,
    pub notice: Option<Notice>,
    pub show_about: bool,
}

impl Default for LauncherView {
    fn default() -> Self {
        Self {
            screen: Screen::Loading,
            versions: Vec::new(),
            selected_version: None,
            install_path: String::new(),
            status_message: "Select a version to download".to_string(),
            download: None,
            notice: None,
            show_about: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiMessage {
    VersionSelected(u32),
    DownloadPressed,
    CancelPressed,
    SettingsPressed,
    AboutPressed,
    AboutClosed,
    NoticeClosed,
    RetryPressed,
}

impl LauncherView {
    pub fn update(&mut self, message: UiMessage) {
        match message {
            UiMessage::VersionSelected(version) => {
                self.selected_version = Some(version);
            }
            UiMessage::AboutPressed => self.show_about = true,
            UiMessage::AboutClosed => self.show_about = false,
            UiMessage::NoticeClosed => self.notice = None,
            UiMessage::DownloadPressed
            | UiMessage::CancelPressed
            | UiMessage::SettingsPressed
            | UiMessage::RetryPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, UiMessage> {
        if self.show_about {
            return about_view();
        }

        let body: Element<'_, UiMessage> = match &self.screen {
            Screen::Loading => text("Downloading available versions...").size(16).into(),
            Screen::LoadFailed(reason) => column![
                text(reason).size(16),
                button("Retry").on_press(UiMessage::RetryPressed).padding([10, 20]),
            ]
            .spacing(10)
            .into(),
            Screen::Ready => row![self.version_list(), self.actions()]
                .spacing(10)
                .height(Length::Fill)
                .into(),
        };

        let mut content = Column::new()
            .padding(20)
            .spacing(10)
            .push(text(format!("Current path: {}", self.install_path)).size(14))
            .push(body);

        if let Some(download) = &self.download {
            content = content.push(download_view(download));
        }

        if let Some(notice) = &self.notice {
            content = content.push(notice_view(notice));
        }

        content
            .push(text(&self.status_message).size(14))
            .push(
                row![
                    button("About").on_press(UiMessage::AboutPressed),
                    button("Settings").on_press(UiMessage::SettingsPressed),
                ]
                .spacing(10),
            )
            .into()
    }

    fn version_list(&self) -> Element<'_, UiMessage> {
        let entries = self.versions.iter().map(|&version| {
            let label = if self.selected_version == Some(version) {
                format!("> EA {}", version)
            } else {
                format!("EA {}", version)
            };
            Element::from(
                button(text(label))
                    .on_press(UiMessage::VersionSelected(version))
                    .width(Length::Fill),
            )
        });

        scrollable(Column::with_children(entries).spacing(2))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn actions(&self) -> Element<'_, UiMessage> {
        let can_download = self.selected_version.is_some() && self.download.is_none();

        column![button("Download")
            .on_press_maybe(can_download.then_some(UiMessage::DownloadPressed))
            .padding([10, 20])]
        .spacing(10)
        .into()
    }
}

fn download_view(download: &DownloadProgress) -> Element<'_, UiMessage> {
    column![
        progress_bar(0.0..=1.0, download.fraction),
        row![
            text(format!("Download Speed: {}", download.speed)).size(14),
            Space::new().width(Length::Fill),
            button("Cancel").on_press(UiMessage::CancelPressed),
        ]
        .spacing(10),
    ]
    .spacing(5)
    .into()
}

fn notice_view(notice: &Notice) -> Element<'_, UiMessage> {
    let message = match notice {
        Notice::Success(message) => message,
        Notice::Error(message) => message,
    };

    row![
        text(message).size(14),
        Space::new().width(Length::Fill),
        button("Close").on_press(UiMessage::NoticeClosed),
    ]
    .spacing(10)
    .into()
}

fn about_view<'a>() -> Element<'a, UiMessage> {
    column![
        text("Project Dëfënëstrëring").size(24),
        text("From EmuWorld with love\n2021").size(16),
        Space::new().height(Length::Fixed(20.0)),
        text(
            "This program is free software; you can redistribute it and/or modify\n\
             it under the terms of the GNU General Public License as published by\n\
             the Free Software Foundation; either version 2 of the License, or\n\
             (at your option) any later version."
        )
        .size(12),
        Space::new().height(Length::Fixed(20.0)),
        button("Close").on_press(UiMessage::AboutClosed),
    ]
    .padding(20)
    .spacing(10)
    .into()
}
