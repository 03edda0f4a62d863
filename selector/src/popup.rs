//! Selector popup state.
//!
//! Shows only enabled IMEs. Picking one makes it active and closes the
//! popup. Unless the popup was opened from settings, it also offers a
//! button that opens the keyboard list so more IMEs can be enabled; the
//! popup stays up behind the list and reloads when the list reports back.

use imesetting_core::{
    AppType, Config, FilterPolicy, ImeService, LaunchReply, LaunchRequest, Launcher, RowAction,
    RowItem, RowState, SelectionController, SelectorRow,
};
use tracing::{debug, warn};

/// Keyboard selector popup.
pub struct SelectorScreen<S: ImeService, L: Launcher> {
    controller: SelectionController<S>,
    launcher: L,
    config: Config,
    app_type: AppType,
    rows: Vec<SelectorRow>,
    closed: bool,
}

impl<S: ImeService, L: Launcher> SelectorScreen<S, L> {
    pub fn new(service: S, launcher: L, config: Config, app_type: AppType) -> Self {
        let controller = SelectionController::new(service, FilterPolicy::Selector);
        let mut screen = Self {
            controller,
            launcher,
            config,
            app_type,
            rows: Vec::new(),
            closed: false,
        };
        screen.rebuild_rows();
        screen
    }

    fn rebuild_rows(&mut self) {
        self.rows = (0..self.controller.catalog().len())
            .filter_map(|i| self.controller.row_context(i))
            .map(SelectorRow::new)
            .collect();
    }

    /// Reload from the service.
    pub fn update_window(&mut self) {
        self.controller.reload();
        self.rebuild_rows();
    }

    pub fn title(&self) -> &str {
        &self.config.labels.selector_title
    }

    /// Label of the "select keyboard" button, when the popup shows one.
    pub fn button_label(&self) -> Option<&str> {
        (!self.app_type.is_setting()).then_some(self.config.labels.select_keyboard.as_str())
    }

    pub fn rows(&self) -> Vec<RowState> {
        self.rows.iter().map(|r| r.state(&self.controller)).collect()
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

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The row for IME `index` was tapped: make it active and close.
    pub fn pick(&mut self, index: usize) -> RowAction {
        let Some(row) = self.rows.get(index) else {
            warn!(index, rows = self.rows.len(), "pick on missing row");
            return RowAction::None;
        };
        let action = row.on_selected(&mut self.controller);
        if action == RowAction::Close {
            self.closed = true;
        }
        action
    }

    /// The radio button for IME `index` changed.
    pub fn radio_changed(&mut self, index: usize) -> RowAction {
        let Some(row) = self.rows.get(index) else {
            warn!(index, rows = self.rows.len(), "radio change on missing row");
            return RowAction::None;
        };
        row.on_toggled(&mut self.controller)
    }

    /// The "select keyboard" button was pressed: open the keyboard list.
    ///
    /// Returns whether the list was launched. The popup stays open.
    pub fn press_button(&mut self) -> bool {
        if self.button_label().is_none() {
            return false;
        }
        let request = LaunchRequest::open_list(self.config.list_app_id.clone());
        if let Err(e) = self.launcher.send_launch_request(&request) {
            warn!(app_id = %request.app_id, error = %e, "launching keyboard list failed");
            return false;
        }
        true
    }

    /// The keyboard list finished. Returns whether the popup reloaded.
    pub fn on_launch_reply(&mut self, reply: &LaunchReply) -> bool {
        if reply.requires_reload() {
            self.update_window();
            true
        } else {
            debug!(?reply, "launch reply without changes");
            false
        }
    }

    /// Dismiss without choosing.
    pub fn dismiss(&mut self) {
        self.closed = true;
    }
}
