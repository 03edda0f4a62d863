//! Management screen state.
//!
//! Row layout, top to bottom:
//! - when started from settings: "virtual keyboard" header, default keyboard
//!   summary, keyboard settings
//! - "keyboards" header
//! - one toggle row per installed IME, in catalog order

use imesetting_core::{
    project, AppType, Config, DefaultKeyboardRow, FilterPolicy, GroupHeaderRow, ImeService,
    KeyboardRow, KeyboardSettingRow, LaunchReply, LaunchRequest, Labels, Launcher,
    PendingToggle, RowAction, RowItem, RowState, SelectionController,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Text of the warning shown before a toggle is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: String,
    pub text: String,
    pub cancel_label: String,
    pub ok_label: String,
}

/// Keyboard list screen.
pub struct ListScreen<S: ImeService, L: Launcher> {
    controller: SelectionController<S>,
    launcher: L,
    config: Arc<Config>,
    app_type: AppType,
    rows: Vec<Box<dyn RowItem<S>>>,
    pending: Option<PendingToggle>,
}

impl<S: ImeService + 'static, L: Launcher> ListScreen<S, L> {
    /// Load the catalog and build the rows.
    pub fn new(service: S, launcher: L, config: Config, app_type: AppType) -> Self {
        let controller = SelectionController::new(service, FilterPolicy::Management)
            .with_confirm_on_enable(config.confirm_on_enable);
        let mut screen = Self {
            controller,
            launcher,
            config: Arc::new(config),
            app_type,
            rows: Vec::new(),
            pending: None,
        };
        screen.rebuild_rows();
        screen
    }

    fn rebuild_rows(&mut self) {
        let labels = &self.config.labels;
        let mut rows: Vec<Box<dyn RowItem<S>>> = Vec::new();

        if self.app_type.is_setting() {
            rows.push(Box::new(GroupHeaderRow::new(labels.virtual_keyboard_header.clone())));
            rows.push(Box::new(DefaultKeyboardRow::new(
                labels.default_keyboard.clone(),
                labels.no_active_placeholder.clone(),
            )));
            rows.push(Box::new(KeyboardSettingRow::new(
                labels.keyboard_settings.clone(),
                Arc::clone(&self.config),
            )));
        }

        rows.push(Box::new(GroupHeaderRow::new(labels.keyboards_header.clone())));
        for index in 0..self.controller.catalog().len() {
            if let Some(ctx) = self.controller.row_context(index) {
                rows.push(Box::new(KeyboardRow::new(ctx)));
            }
        }

        self.rows = rows;
    }

    /// Reload from the service and rebuild every row.
    ///
    /// Any open confirmation is dropped; its row no longer exists.
    pub fn update_window(&mut self) {
        if self.pending.take().is_some() {
            debug!("dropping pending confirmation on reload");
        }
        self.controller.reload();
        self.rebuild_rows();
    }

    pub fn title(&self) -> &str {
        &self.config.labels.title
    }

    pub fn app_type(&self) -> AppType {
        self.app_type
    }

    /// Render every row.
    pub fn rows(&self) -> Vec<RowState> {
        project(&self.rows, &self.controller)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Screen row of the first keyboard.
    pub fn first_keyboard_row(&self) -> usize {
        if self.app_type.is_setting() {
            4
        } else {
            1
        }
    }

    pub fn controller(&self) -> &SelectionController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SelectionController<S> {
        &mut self.controller
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn launcher_mut(&mut self) -> &mut L {
        &mut self.launcher
    }

    /// The row at `row` was tapped.
    pub fn tap(&mut self, row: usize) -> RowAction {
        let Some(item) = self.rows.get(row) else {
            warn!(row, rows = self.rows.len(), "tap on missing row");
            return RowAction::None;
        };
        let action = item.on_selected(&mut self.controller);
        self.handle(action)
    }

    /// The control of the row at `row` was flipped.
    pub fn toggle(&mut self, row: usize) -> RowAction {
        let Some(item) = self.rows.get(row) else {
            warn!(row, rows = self.rows.len(), "toggle on missing row");
            return RowAction::None;
        };
        let action = item.on_toggled(&mut self.controller);
        self.handle(action)
    }

    fn handle(&mut self, action: RowAction) -> RowAction {
        match &action {
            RowAction::Confirm(pending) => {
                if let Some(previous) = self.pending.replace(pending.clone()) {
                    debug!(label = previous.label(), "confirmation replaced by another toggle");
                }
            }
            RowAction::Withdraw => {
                if let Some(previous) = self.pending.take() {
                    debug!(label = previous.label(), "confirmation withdrawn");
                }
            }
            RowAction::LaunchSelector => {
                let request = LaunchRequest::open_selector(self.config.selector_app_id.clone());
                if let Err(e) = self.launcher.send_launch_request(&request) {
                    warn!(app_id = %request.app_id, error = %e, "launching selector failed");
                }
            }
            _ => {}
        }
        action
    }

    /// The confirmation currently awaiting an answer.
    pub fn pending_dialog(&self) -> Option<ConfirmDialog> {
        let pending = self.pending.as_ref()?;
        let labels = &self.config.labels;
        let (template, ok) = if pending.enable() {
            (&labels.enable_warning, &labels.popup_enable)
        } else {
            (&labels.disable_warning, &labels.popup_disable)
        };
        Some(ConfirmDialog {
            title: labels.popup_title.clone(),
            text: Labels::format_popup(template, pending.label()),
            cancel_label: labels.popup_cancel.clone(),
            ok_label: ok.clone(),
        })
    }

    /// User pressed the dialog's OK button. Returns whether the change was applied.
    pub fn confirm_dialog(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => match self.controller.confirm(pending) {
                Ok(()) => true,
                Err(e) => {
                    debug!(error = %e, "confirmation rejected");
                    false
                }
            },
            None => false,
        }
    }

    /// User pressed the dialog's cancel button or dismissed it.
    pub fn cancel_dialog(&mut self) {
        if let Some(pending) = self.pending.take() {
            if let Err(e) = self.controller.cancel(pending) {
                debug!(error = %e, "cancel rejected");
            }
        }
    }

    /// A launched screen finished. Returns whether the screen reloaded.
    pub fn on_launch_reply(&mut self, reply: &LaunchReply) -> bool {
        if reply.requires_reload() {
            self.update_window();
            true
        } else {
            debug!(?reply, "launch reply without changes");
            false
        }
    }
}
