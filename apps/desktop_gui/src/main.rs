mod backend_bridge;
mod controller;
mod ui;

use contacts_core::config::{config_path, load_settings, Settings};
use crossbeam_channel::bounded;
use eframe::egui;
use storage::normalize_database_url;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::app::{ViewPreferences, SETTINGS_STORAGE_KEY};
use crate::ui::{DesktopGuiApp, StartupConfig};

fn main() -> eframe::Result<()> {
    let (settings, settings_error) = match load_settings() {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    if let Some(err) = settings_error {
        tracing::warn!("using default settings: {err}");
    }

    let database_url = normalize_database_url(&settings.database_url);
    tracing::info!(database_url = %database_url, "starting contacts desktop app");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(database_url.clone(), cmd_rx, ui_tx);

    let startup = StartupConfig {
        database_url,
        config_path: config_path(),
        permissions: settings.permissions.to_gate(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Contacts")
            .with_inner_size([420.0, 720.0])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Contacts",
        options,
        Box::new(|cc| {
            let preferences = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<ViewPreferences>(&text).ok())
            });
            Ok(Box::new(DesktopGuiApp::new(
                cmd_tx,
                ui_rx,
                startup,
                preferences,
            )))
        }),
    )
}
