//! External input method service abstraction.
//!
//! All persistent IME state (installed list, enabled flags, the active IME)
//! is owned by the platform's input method framework. The catalog model only
//! talks to it through the [`ImeService`] trait.
//!
//! Two implementations ship with the crate:
//! - [`MemoryService`]: in-process state with a call log, used by tests and demos
//! - [`FileService`]: a JSON state file so separate processes (the list and
//!   the selector binaries) observe each other's changes

use crate::entry::ImeEntry;
use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Query and mutation surface of the input method framework.
pub trait ImeService {
    /// Return every installed IME in service order.
    fn list_all_ime(&self) -> Result<Vec<ImeEntry>, ServiceError>;

    /// Return the app id of the active IME, if any.
    fn get_active_ime(&self) -> Result<Option<String>, ServiceError>;

    /// Make `app_id` the active IME.
    fn set_active_ime(&mut self, app_id: &str) -> Result<(), ServiceError>;

    /// Turn `app_id` on or off.
    fn set_ime_enabled(&mut self, app_id: &str, enabled: bool) -> Result<(), ServiceError>;

    /// Ask the service to show the active IME's own option window.
    fn open_ime_option_window(&mut self) -> Result<(), ServiceError>;
}

/// Mutation recorded by [`MemoryService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    SetActive(String),
    SetEnabled(String, bool),
    OpenOptionWindow,
}

/// Serializable snapshot of everything the service owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    /// App id of the active IME
    #[serde(default)]
    pub active: Option<String>,

    /// Installed IMEs in service order
    #[serde(default)]
    pub imes: Vec<ImeEntry>,
}

impl ServiceState {
    fn entry_mut(&mut self, app_id: &str) -> Result<&mut ImeEntry, ServiceError> {
        self.imes
            .iter_mut()
            .find(|e| e.app_id == app_id)
            .ok_or_else(|| ServiceError::UnknownApp(app_id.to_string()))
    }

    fn set_active(&mut self, app_id: &str) -> Result<(), ServiceError> {
        self.entry_mut(app_id)?;
        self.active = Some(app_id.to_string());
        Ok(())
    }

    fn set_enabled(&mut self, app_id: &str, enabled: bool) -> Result<(), ServiceError> {
        self.entry_mut(app_id)?.is_enabled = enabled;
        Ok(())
    }
}

/// In-process service.
///
/// Every mutation is appended to a call log so callers can verify which
/// requests actually reached the service. `set_unavailable(true)` makes all
/// calls fail with [`ServiceError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct MemoryService {
    state: ServiceState,
    calls: Vec<ServiceCall>,
    unavailable: bool,
}

impl MemoryService {
    /// Create a service with the given installed IMEs and no active IME.
    pub fn new(imes: Vec<ImeEntry>) -> Self {
        Self {
            state: ServiceState { active: None, imes },
            calls: Vec::new(),
            unavailable: false,
        }
    }

    /// Builder-style setter for the active IME.
    pub fn with_active<A: Into<String>>(mut self, app_id: A) -> Self {
        self.state.active = Some(app_id.into());
        self
    }

    /// Simulate the framework being down.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Mutations received so far, oldest first.
    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    /// Forget the recorded mutations.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Current service-side state.
    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    /// Mutable service-side state, for simulating changes made by other apps.
    pub fn state_mut(&mut self) -> &mut ServiceState {
        &mut self.state
    }

    fn check(&self) -> Result<(), ServiceError> {
        if self.unavailable {
            Err(ServiceError::Unavailable("memory service offline".into()))
        } else {
            Ok(())
        }
    }
}

impl ImeService for MemoryService {
    fn list_all_ime(&self) -> Result<Vec<ImeEntry>, ServiceError> {
        self.check()?;
        Ok(self.state.imes.clone())
    }

    fn get_active_ime(&self) -> Result<Option<String>, ServiceError> {
        self.check()?;
        Ok(self.state.active.clone())
    }

    fn set_active_ime(&mut self, app_id: &str) -> Result<(), ServiceError> {
        self.check()?;
        self.calls.push(ServiceCall::SetActive(app_id.to_string()));
        self.state.set_active(app_id)
    }

    fn set_ime_enabled(&mut self, app_id: &str, enabled: bool) -> Result<(), ServiceError> {
        self.check()?;
        self.calls.push(ServiceCall::SetEnabled(app_id.to_string(), enabled));
        self.state.set_enabled(app_id, enabled)
    }

    fn open_ime_option_window(&mut self) -> Result<(), ServiceError> {
        self.check()?;
        self.calls.push(ServiceCall::OpenOptionWindow);
        Ok(())
    }
}

/// Service backed by a JSON state file.
///
/// The file is re-read on every query and rewritten on every mutation, so
/// two processes pointed at the same path see each other's changes on their
/// next reload.
#[derive(Debug, Clone)]
pub struct FileService {
    path: PathBuf,
}

impl FileService {
    /// Use an existing state file.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create (or overwrite) a state file with `state`.
    pub fn create<P: AsRef<Path>>(path: P, state: &ServiceState) -> Result<Self, ServiceError> {
        let service = Self::open(path);
        service.write_state(state)?;
        Ok(service)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole state file.
    pub fn read_state(&self) -> Result<ServiceState, ServiceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ServiceError::Unavailable(format!("read {}: {}", self.path.display(), e))
        })?;
        let state = serde_json::from_str(&content)?;
        Ok(state)
    }

    fn write_state(&self, state: &ServiceState) -> Result<(), ServiceError> {
        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut ServiceState) -> Result<(), ServiceError>,
    {
        let mut state = self.read_state()?;
        f(&mut state)?;
        self.write_state(&state)
    }
}

impl ImeService for FileService {
    fn list_all_ime(&self) -> Result<Vec<ImeEntry>, ServiceError> {
        Ok(self.read_state()?.imes)
    }

    fn get_active_ime(&self) -> Result<Option<String>, ServiceError> {
        Ok(self.read_state()?.active)
    }

    fn set_active_ime(&mut self, app_id: &str) -> Result<(), ServiceError> {
        debug!(app_id, path = %self.path.display(), "set active ime");
        self.update(|s| s.set_active(app_id))
    }

    fn set_ime_enabled(&mut self, app_id: &str, enabled: bool) -> Result<(), ServiceError> {
        debug!(app_id, enabled, path = %self.path.display(), "set ime enabled");
        self.update(|s| s.set_enabled(app_id, enabled))
    }

    fn open_ime_option_window(&mut self) -> Result<(), ServiceError> {
        let state = self.read_state()?;
        match state.active {
            Some(app_id) => {
                info!(%app_id, "opening option window");
                Ok(())
            }
            None => Err(ServiceError::Unavailable("no active input method".into())),
        }
    }
}
