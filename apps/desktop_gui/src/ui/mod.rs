//! UI layer for the desktop GUI: app shell, panels, and layout.

pub mod app;

pub use app::ClassifierGuiApp;
