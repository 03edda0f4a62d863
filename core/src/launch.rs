//! Cross-app launch values.
//!
//! The list screen launches the selector to pick the default keyboard and the
//! selector can launch the list to manage keyboards. Launches are
//! fire-and-forget: the launching screen does not wait, it reloads its
//! catalog when a reply says something changed.
//!
//! [`ProcessLauncher`] runs sibling screens as child processes pointed at the
//! same service state file; the child's exit status becomes the reply.

use crate::error::ServiceError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// How a screen was started, derived from the `caller` launch extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppType {
    /// Started from the system settings app
    Setting,
    /// Started from settings, rotation locked
    SettingNoRotation,
    /// Started directly
    #[default]
    Normal,
}

impl AppType {
    /// Interpret the `caller` extra.
    pub fn from_caller(caller: Option<&str>) -> Self {
        match caller {
            Some("settings") => AppType::Setting,
            Some("settings_no_rotation") => AppType::SettingNoRotation,
            _ => AppType::Normal,
        }
    }

    /// Whether the screen runs inside the settings app.
    pub fn is_setting(self) -> bool {
        matches!(self, AppType::Setting)
    }
}

/// Request to start a sibling screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub app_id: String,
    pub caller: String,
}

impl LaunchRequest {
    pub fn new<A: Into<String>, C: Into<String>>(app_id: A, caller: C) -> Self {
        Self {
            app_id: app_id.into(),
            caller: caller.into(),
        }
    }

    /// The list screen asking the selector to pick the default keyboard.
    pub fn open_selector<A: Into<String>>(selector_app_id: A) -> Self {
        Self::new(selector_app_id, "settings")
    }

    /// The selector asking the list screen to manage keyboards.
    pub fn open_list<A: Into<String>>(list_app_id: A) -> Self {
        Self::new(list_app_id, "verify")
    }
}

/// Reply delivered when a launched screen finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchReply {
    pub succeeded: bool,
    /// Value of the `result` extra, if the launched screen set one
    pub result: Option<String>,
}

impl LaunchReply {
    pub fn success<R: Into<String>>(result: R) -> Self {
        Self {
            succeeded: true,
            result: Some(result.into()),
        }
    }

    /// The payload is irrelevant; a successful reply with a result means
    /// "something changed, reload".
    pub fn requires_reload(&self) -> bool {
        self.succeeded && self.result.is_some()
    }
}

/// Sends launch requests to sibling screens.
pub trait Launcher {
    fn send_launch_request(&mut self, request: &LaunchRequest) -> Result<(), ServiceError>;
}

/// Launcher that only remembers what it was asked to start.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    pub requests: Vec<LaunchRequest>,
}

impl Launcher for RecordingLauncher {
    fn send_launch_request(&mut self, request: &LaunchRequest) -> Result<(), ServiceError> {
        self.requests.push(request.clone());
        Ok(())
    }
}

/// Runs the binary registered for a launch request's app id.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    programs: HashMap<String, PathBuf>,
    extra_args: Vec<String>,
    last_reply: Option<LaunchReply>,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the program that implements `app_id`.
    pub fn register<A: Into<String>, P: Into<PathBuf>>(mut self, app_id: A, program: P) -> Self {
        self.programs.insert(app_id.into(), program.into());
        self
    }

    /// Arguments passed to every launched program (e.g. the shared state path).
    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Reply of the most recent launch, consumed once.
    pub fn take_reply(&mut self) -> Option<LaunchReply> {
        self.last_reply.take()
    }
}

impl Launcher for ProcessLauncher {
    fn send_launch_request(&mut self, request: &LaunchRequest) -> Result<(), ServiceError> {
        let program = self.programs.get(&request.app_id).ok_or_else(|| {
            ServiceError::Unavailable(format!("no program registered for {}", request.app_id))
        })?;

        info!(app_id = %request.app_id, program = %program.display(), "launching");
        let status = Command::new(program)
            .args(&self.extra_args)
            .arg("--caller")
            .arg(&request.caller)
            .status()?;
        debug!(?status, "launched screen exited");

        self.last_reply = Some(if status.success() {
            LaunchReply::success("done")
        } else {
            LaunchReply::default()
        });
        Ok(())
    }
}
