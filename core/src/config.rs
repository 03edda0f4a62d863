//! Screen configuration.
//!
//! Loaded from TOML. Every field has a default, so a config file only needs
//! the keys it wants to change.

use serde::{Deserialize, Serialize};

/// User-facing strings shown by the list and selector screens.
///
/// Popup texts may contain one `%s`, replaced with the IME label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub keyboards_header: String,
    pub virtual_keyboard_header: String,
    pub default_keyboard: String,
    pub keyboard_settings: String,
    pub popup_title: String,
    pub popup_cancel: String,
    pub popup_disable: String,
    pub popup_enable: String,
    /// Warning shown before turning an input method off
    pub disable_warning: String,
    /// Warning shown before turning an input method on (when configured)
    pub enable_warning: String,
    pub selector_title: String,
    pub select_keyboard: String,
    /// Secondary label of the default keyboard row when nothing is active
    pub no_active_placeholder: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "Keyboard".into(),
            keyboards_header: "Keyboards".into(),
            virtual_keyboard_header: "Virtual keyboard".into(),
            default_keyboard: "Default keyboard".into(),
            keyboard_settings: "Keyboard settings".into(),
            popup_title: "Attention".into(),
            popup_cancel: "Cancel".into(),
            popup_disable: "Disable".into(),
            popup_enable: "Enable".into(),
            disable_warning: "If you disable %s you may lose a way to type. Continue?".into(),
            enable_warning: "This input method may be able to collect all the text you type, \
                             including personal data like passwords and credit card numbers. \
                             It comes from %s. Use this input method?"
                .into(),
            selector_title: "Select input method".into(),
            select_keyboard: "Set up input methods".into(),
            no_active_placeholder: "None".into(),
        }
    }
}

impl Labels {
    /// Substitute `label` into a popup text template.
    pub fn format_popup(template: &str, label: &str) -> String {
        template.replacen("%s", label, 1)
    }
}

/// Configuration shared by the list and selector screens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Also ask for confirmation before enabling an input method.
    /// Disabling always asks.
    pub confirm_on_enable: bool,

    /// Registered setup modules (e.g. "org.example.kbd-setup"). An active IME
    /// with a matching `<app_id>-setup` module is configured in place instead
    /// of through the service's option window.
    pub setup_modules: Vec<String>,

    /// App id the list screen launches to pick the default keyboard
    pub selector_app_id: String,

    /// App id the selector launches to manage keyboards
    pub list_app_id: String,

    /// User-facing strings
    pub labels: Labels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confirm_on_enable: false,
            setup_modules: Vec::new(),
            selector_app_id: "org.tizen.inputmethod-setting-selector".into(),
            list_app_id: "org.tizen.inputmethod-setting-list".into(),
            labels: Labels::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating missing parent directories.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Name of the setup module registered for `app_id`, if any.
    pub fn setup_module_for(&self, app_id: &str) -> Option<&str> {
        let wanted = format!("{}-setup", app_id);
        self.setup_modules
            .iter()
            .find(|m| **m == wanted)
            .map(String::as_str)
    }
}
