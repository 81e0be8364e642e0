//! UI layer for desktop GUI: app shell, dialogs, and list row widgets.

pub mod app;
pub mod widgets;

pub use app::{DesktopGuiApp, StartupConfig};
