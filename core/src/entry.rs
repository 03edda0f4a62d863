//! Installed input method record.
//!
//! `ImeEntry` mirrors the per-IME information the input method framework
//! reports. The catalog never mutates these fields locally; they change only
//! when the catalog is rebuilt from the service.

use serde::{Deserialize, Serialize};

/// One installed input method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImeEntry {
    /// Unique, stable identifier of the IME application
    pub app_id: String,

    /// User-facing display name
    pub label: String,

    /// Whether the user has turned this IME on
    #[serde(default)]
    pub is_enabled: bool,

    /// System-provided (true) vs. user-installed (false)
    #[serde(default)]
    pub is_preinstalled: bool,

    /// Whether the IME exposes a configuration screen
    #[serde(default)]
    pub has_option: bool,
}

impl ImeEntry {
    /// Create an entry with all flags cleared.
    pub fn new<A: Into<String>, L: Into<String>>(app_id: A, label: L) -> Self {
        Self {
            app_id: app_id.into(),
            label: label.into(),
            is_enabled: false,
            is_preinstalled: false,
            has_option: false,
        }
    }

    /// Builder-style setter for `is_enabled`.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }

    /// Builder-style setter for `is_preinstalled`.
    pub fn preinstalled(mut self, preinstalled: bool) -> Self {
        self.is_preinstalled = preinstalled;
        self
    }

    /// Builder-style setter for `has_option`.
    pub fn with_option(mut self, has_option: bool) -> Self {
        self.has_option = has_option;
        self
    }

    /// Preinstalled IMEs are always shown as enabled and cannot be turned off.
    pub fn is_locked_on(&self) -> bool {
        self.is_preinstalled
    }
}
