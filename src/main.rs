mod api;
mod app;
mod application;
mod config;
mod domain;
mod ui;
mod utils;

use std::fs::OpenOptions;
use std::io::Write;

use iced::window;

fn main() -> iced::Result {
    init_logging();

    iced::application(app::boot, app::update, app::view)
        .title("PinEApple Updater")
        .window(window::Settings {
            icon: window_icon(),
            size: iced::Size::new(500.0, 450.0),
            ..Default::default()
        })
        .run()
}

/// The bundled launcher icon, or the platform default if it fails to decode.
fn window_icon() -> Option<window::Icon> {
    let rgba = image::load_from_memory(include_bytes!("../assets/icon.png"))
        .map_err(|e| log::warn!("Bundled icon is not a valid image: {}", e))
        .ok()?
        .into_rgba8();
    let (width, height) = rgba.dimensions();

    window::icon::from_rgba(rgba.into_raw(), width, height)
        .map_err(|e| log::warn!("Bundled icon was rejected by the window: {}", e))
        .ok()
}

/// Log to `log.txt` in the data directory, or stderr if it can't be opened.
fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        });

    let log_dir = config::data_dir();
    let log_path = log_dir.join("log.txt");
    let file = std::fs::create_dir_all(&log_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
    });

    match file {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Could not open log file {}: {}", log_path.display(), e),
    }

    builder.init();
}
