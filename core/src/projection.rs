//! Display projection: what each list row shows and what its events do.
//!
//! Rows hold no catalog data of their own. Every accessor reads the
//! controller, so re-rendering after a reload always reflects the new
//! catalog. Row kinds implement [`RowItem`]; screens keep them as
//! `Box<dyn RowItem<S>>`.

use crate::config::Config;
use crate::controller::{OptionTarget, PendingToggle, RowContext, SelectionController, ToggleOutcome};
use crate::service::ImeService;
use std::sync::Arc;

/// Kind of interactive control drawn at the end of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlKind {
    #[default]
    None,
    /// On/off switch
    Toggle,
    /// One-of-many radio button
    Radio,
}

/// State of a row's control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    pub kind: ControlKind,
    pub checked: bool,
    pub disabled: bool,
}

/// Everything a renderer needs for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowState {
    pub label: String,
    pub secondary_label: Option<String>,
    pub control: ControlState,
    /// Whole row greyed out and not selectable
    pub disabled: bool,
}

impl std::fmt::Display for RowState {
    /// Plain-text rendering for terminal front ends.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.control.kind, self.control.checked) {
            (ControlKind::Toggle, true) => write!(f, "[on ] ")?,
            (ControlKind::Toggle, false) => write!(f, "[off] ")?,
            (ControlKind::Radio, true) => write!(f, "(*) ")?,
            (ControlKind::Radio, false) => write!(f, "( ) ")?,
            (ControlKind::None, _) => {}
        }
        write!(f, "{}", self.label)?;
        if let Some(secondary) = &self.secondary_label {
            write!(f, " - {}", secondary)?;
        }
        if self.control.kind == ControlKind::Toggle && self.control.disabled {
            write!(f, " (locked)")?;
        }
        if self.disabled {
            write!(f, " (unavailable)")?;
        }
        Ok(())
    }
}

/// What the screen must do after a row event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Nothing changed
    None,
    /// Controller state changed, re-render
    Refresh,
    /// Show the warning dialog for this toggle
    Confirm(PendingToggle),
    /// Close the warning dialog; its toggle was flipped back
    Withdraw,
    /// Launch the selector to pick the default keyboard
    LaunchSelector,
    /// Configuration for the active IME was opened
    OpenOption(OptionTarget),
    /// Close the screen
    Close,
}

/// One row kind of a keyboard list.
pub trait RowItem<S: ImeService> {
    /// Primary text.
    fn label(&self, ctl: &SelectionController<S>) -> String;

    /// Secondary text, if the row style has one.
    fn secondary_label(&self, _ctl: &SelectionController<S>) -> Option<String> {
        None
    }

    /// Control at the end of the row.
    fn control_state(&self, _ctl: &SelectionController<S>) -> ControlState {
        ControlState::default()
    }

    /// Whether the whole row is disabled.
    fn is_disabled(&self, _ctl: &SelectionController<S>) -> bool {
        false
    }

    /// The row itself was tapped.
    fn on_selected(&self, _ctl: &mut SelectionController<S>) -> RowAction {
        RowAction::None
    }

    /// The row's control changed.
    fn on_toggled(&self, _ctl: &mut SelectionController<S>) -> RowAction {
        RowAction::None
    }

    /// Snapshot of everything above for rendering.
    fn state(&self, ctl: &SelectionController<S>) -> RowState {
        RowState {
            label: self.label(ctl),
            secondary_label: self.secondary_label(ctl),
            control: self.control_state(ctl),
            disabled: self.is_disabled(ctl),
        }
    }
}

/// Render every row.
pub fn project<S: ImeService>(
    rows: &[Box<dyn RowItem<S>>],
    ctl: &SelectionController<S>,
) -> Vec<RowState> {
    rows.iter().map(|r| r.state(ctl)).collect()
}

/// Section title.
#[derive(Debug, Clone)]
pub struct GroupHeaderRow {
    title: String,
}

impl GroupHeaderRow {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self { title: title.into() }
    }
}

impl<S: ImeService> RowItem<S> for GroupHeaderRow {
    fn label(&self, _ctl: &SelectionController<S>) -> String {
        self.title.clone()
    }
}

/// "Default keyboard" summary: shows the active IME and opens the selector.
#[derive(Debug, Clone)]
pub struct DefaultKeyboardRow {
    title: String,
    placeholder: String,
}

impl DefaultKeyboardRow {
    pub fn new<T: Into<String>, P: Into<String>>(title: T, placeholder: P) -> Self {
        Self {
            title: title.into(),
            placeholder: placeholder.into(),
        }
    }
}

impl<S: ImeService> RowItem<S> for DefaultKeyboardRow {
    fn label(&self, _ctl: &SelectionController<S>) -> String {
        self.title.clone()
    }

    fn secondary_label(&self, ctl: &SelectionController<S>) -> Option<String> {
        Some(
            ctl.catalog()
                .active_entry()
                .map(|e| e.label.clone())
                .unwrap_or_else(|| self.placeholder.clone()),
        )
    }

    fn on_selected(&self, _ctl: &mut SelectionController<S>) -> RowAction {
        RowAction::LaunchSelector
    }
}

/// "Keyboard settings": opens the active IME's configuration.
#[derive(Debug, Clone)]
pub struct KeyboardSettingRow {
    title: String,
    config: Arc<Config>,
}

impl KeyboardSettingRow {
    pub fn new<T: Into<String>>(title: T, config: Arc<Config>) -> Self {
        Self {
            title: title.into(),
            config,
        }
    }
}

impl<S: ImeService> RowItem<S> for KeyboardSettingRow {
    fn label(&self, _ctl: &SelectionController<S>) -> String {
        self.title.clone()
    }

    fn is_disabled(&self, ctl: &SelectionController<S>) -> bool {
        !ctl.catalog().active_entry().is_some_and(|e| e.has_option)
    }

    fn on_selected(&self, ctl: &mut SelectionController<S>) -> RowAction {
        match ctl.open_option_window(&self.config) {
            Ok(target) => RowAction::OpenOption(target),
            Err(_) => RowAction::None,
        }
    }
}

/// One installed IME with an on/off switch.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardRow {
    ctx: RowContext,
}

impl KeyboardRow {
    pub fn new(ctx: RowContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> RowContext {
        self.ctx
    }

    fn toggle<S: ImeService>(&self, ctl: &mut SelectionController<S>) -> RowAction {
        match ctl.request_toggle(self.ctx) {
            Ok(ToggleOutcome::Applied) => RowAction::Refresh,
            Ok(ToggleOutcome::ConfirmationRequired(pending)) => RowAction::Confirm(pending),
            Ok(ToggleOutcome::Withdrawn) => RowAction::Withdraw,
            Err(_) => RowAction::None,
        }
    }
}

impl<S: ImeService> RowItem<S> for KeyboardRow {
    fn label(&self, ctl: &SelectionController<S>) -> String {
        entry_label(ctl, self.ctx)
    }

    fn control_state(&self, ctl: &SelectionController<S>) -> ControlState {
        let index = self.ctx.index();
        ControlState {
            kind: ControlKind::Toggle,
            checked: ctl.is_checked(index),
            disabled: !ctl.is_current(self.ctx) || ctl.catalog().is_locked(index),
        }
    }

    fn on_selected(&self, ctl: &mut SelectionController<S>) -> RowAction {
        self.toggle(ctl)
    }

    fn on_toggled(&self, ctl: &mut SelectionController<S>) -> RowAction {
        self.toggle(ctl)
    }
}

/// One enabled IME with a radio button, as shown by the selector popup.
#[derive(Debug, Clone, Copy)]
pub struct SelectorRow {
    ctx: RowContext,
}

impl SelectorRow {
    pub fn new(ctx: RowContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> RowContext {
        self.ctx
    }
}

impl<S: ImeService> RowItem<S> for SelectorRow {
    fn label(&self, ctl: &SelectionController<S>) -> String {
        entry_label(ctl, self.ctx)
    }

    fn control_state(&self, ctl: &SelectionController<S>) -> ControlState {
        ControlState {
            kind: ControlKind::Radio,
            checked: ctl.is_current(self.ctx) && ctl.catalog().is_active(self.ctx.index()),
            disabled: false,
        }
    }

    fn on_selected(&self, ctl: &mut SelectionController<S>) -> RowAction {
        match ctl.set_active(self.ctx) {
            Ok(()) => RowAction::Close,
            Err(_) => RowAction::None,
        }
    }

    fn on_toggled(&self, ctl: &mut SelectionController<S>) -> RowAction {
        match ctl.set_active(self.ctx) {
            Ok(()) => RowAction::Refresh,
            Err(_) => RowAction::None,
        }
    }
}

fn entry_label<S: ImeService>(ctl: &SelectionController<S>, ctx: RowContext) -> String {
    if !ctl.is_current(ctx) {
        return String::new();
    }
    ctl.catalog()
        .get(ctx.index())
        .map(|e| e.label.clone())
        .unwrap_or_default()
}
