//! imesetting-core
//!
//! Catalog model shared by the keyboard list and keyboard selector screens.
//!
//! All real input method state lives in the platform's input method service.
//! This crate loads it, orders it for display, and routes user actions back
//! to the service.
//!
//! Public API:
//! - `ImeEntry` - One installed input method
//! - `ImeCatalog` - Display-ordered entries plus the active index
//! - `ImeService` - Query/mutation surface of the input method service
//! - `SelectionController` - Active selection, enable/disable, confirmation flow
//! - `RowItem` - Per-row display projection and event handling
//! - `Config` - Screen configuration and user-facing strings
use tracing::{debug, warn};

pub mod entry;
pub use entry::ImeEntry;

pub mod error;
pub use error::{ControlError, ServiceError};

pub mod service;
pub use service::{FileService, ImeService, MemoryService, ServiceCall, ServiceState};

pub mod catalog;
pub use catalog::{compare_labels, ActiveIndex, FilterPolicy, ImeCatalog};

pub mod controller;
pub use controller::{OptionTarget, PendingToggle, RowContext, SelectionController, ToggleOutcome};

pub mod projection;
pub use projection::{
    project, ControlKind, ControlState, DefaultKeyboardRow, GroupHeaderRow, KeyboardRow,
    KeyboardSettingRow, RowAction, RowItem, RowState, SelectorRow,
};

pub mod launch;
pub use launch::{AppType, LaunchReply, LaunchRequest, Launcher, ProcessLauncher, RecordingLauncher};

pub mod config;
pub use config::{Config, Labels};

/// Load a config file if one was given, falling back to defaults.
///
/// A config that fails to load is logged and replaced by the defaults; the
/// screens are still usable without their customized strings.
pub fn load_config_or_default<P: AsRef<std::path::Path>>(path: Option<P>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let path = path.as_ref();
    match Config::load_toml(path) {
        Ok(cfg) => {
            debug!(path = %path.display(), "config loaded");
            cfg
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config load failed, using defaults");
            Config::default()
        }
    }
}
