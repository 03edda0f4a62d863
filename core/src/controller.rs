//! Selection controller.
//!
//! Owns the service handle, the current catalog and the per-row checkbox
//! mirror. Screens hand [`RowContext`] values to their rows instead of raw
//! indices; a context carries the catalog generation it was created for, so
//! a tap that arrives after a reload is rejected instead of being applied to
//! whatever entry now sits at that index.
//!
//! Disabling an entry is a two-step request: [`SelectionController::request_toggle`]
//! returns [`ToggleOutcome::ConfirmationRequired`], the UI shows its warning,
//! then calls [`confirm`](SelectionController::confirm) or
//! [`cancel`](SelectionController::cancel). Only one toggle waits at a time;
//! flipping the same row again while it waits withdraws it.

use crate::catalog::{FilterPolicy, ImeCatalog};
use crate::config::Config;
use crate::error::ControlError;
use crate::service::ImeService;
use tracing::{debug, info, warn};

/// Typed handle to one catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowContext {
    index: usize,
    generation: u64,
}

impl RowContext {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A toggle waiting for the user to confirm or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    ctx: RowContext,
    enable: bool,
    label: String,
}

impl PendingToggle {
    pub fn context(&self) -> RowContext {
        self.ctx
    }

    /// State the toggle will have if confirmed.
    pub fn enable(&self) -> bool {
        self.enable
    }

    /// Label of the affected IME, for the warning text.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Result of a toggle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The service was asked to apply the change
    Applied,
    /// The UI must confirm before anything is sent to the service
    ConfirmationRequired(PendingToggle),
    /// The row was flipped back while its confirmation was open; the
    /// waiting toggle is dropped and nothing reached the service
    Withdrawn,
}

/// Where the active IME's configuration is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionTarget {
    /// A registered setup module, shown in place
    SetupModule(String),
    /// The service's own option window
    ServiceWindow,
}

/// Catalog state plus the operations that mutate it.
#[derive(Debug)]
pub struct SelectionController<S: ImeService> {
    service: S,
    catalog: ImeCatalog,
    checked: Vec<bool>,
    policy: FilterPolicy,
    confirm_on_enable: bool,
    generation: u64,
    awaiting: Option<RowContext>,
}

impl<S: ImeService> SelectionController<S> {
    /// Create a controller and perform the initial load.
    pub fn new(service: S, policy: FilterPolicy) -> Self {
        let mut controller = Self {
            service,
            catalog: ImeCatalog::empty(policy),
            checked: Vec::new(),
            policy,
            confirm_on_enable: false,
            generation: 0,
            awaiting: None,
        };
        controller.reload();
        controller
    }

    /// Ask for confirmation before enabling too.
    pub fn with_confirm_on_enable(mut self, confirm: bool) -> Self {
        self.confirm_on_enable = confirm;
        self
    }

    /// Rebuild the catalog and checkbox mirror from the service.
    ///
    /// The new catalog is built completely before it replaces the old one,
    /// and every previously issued [`RowContext`] becomes stale.
    pub fn reload(&mut self) {
        let generation = self.generation + 1;
        let catalog = ImeCatalog::load(&self.service, self.policy).with_generation(generation);
        let checked: Vec<bool> = (0..catalog.len())
            .map(|i| catalog.is_locked(i) || catalog.get(i).is_some_and(|e| e.is_enabled))
            .collect();

        self.catalog = catalog;
        self.checked = checked;
        self.generation = generation;
        self.awaiting = None;
    }

    pub fn catalog(&self) -> &ImeCatalog {
        &self.catalog
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    /// Checkbox state shown for `index` (false when out of range).
    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Handle for row `index` of the current catalog.
    pub fn row_context(&self, index: usize) -> Option<RowContext> {
        (index < self.catalog.len()).then_some(RowContext {
            index,
            generation: self.generation,
        })
    }

    /// Whether `ctx` still refers to the current catalog.
    pub fn is_current(&self, ctx: RowContext) -> bool {
        ctx.generation == self.generation && ctx.index < self.catalog.len()
    }

    fn resolve(&self, ctx: RowContext) -> Result<usize, ControlError> {
        if ctx.generation != self.generation {
            warn!(
                index = ctx.index,
                generation = ctx.generation,
                current = self.generation,
                "rejecting stale row context"
            );
            return Err(ControlError::StaleContext);
        }
        if ctx.index >= self.catalog.len() {
            warn!(index = ctx.index, len = self.catalog.len(), "rejecting out of range index");
            return Err(ControlError::InvalidIndex {
                index: ctx.index,
                len: self.catalog.len(),
            });
        }
        Ok(ctx.index)
    }

    /// Resolve a raw index from the UI into a context, rejecting bad indices.
    pub fn context_for(&self, index: usize) -> Result<RowContext, ControlError> {
        self.row_context(index).ok_or_else(|| {
            warn!(index, len = self.catalog.len(), "rejecting out of range index");
            ControlError::InvalidIndex {
                index,
                len: self.catalog.len(),
            }
        })
    }

    /// Make the entry at `ctx` the active IME.
    ///
    /// On success the active index moves immediately, before the next reload.
    pub fn set_active(&mut self, ctx: RowContext) -> Result<(), ControlError> {
        let index = self.resolve(ctx)?;
        let app_id = self.catalog.entries()[index].app_id.clone();
        if let Err(e) = self.service.set_active_ime(&app_id) {
            warn!(%app_id, error = %e, "setting active input method failed");
            return Err(e.into());
        }
        info!(%app_id, index, "active input method changed");
        self.catalog.set_active_index(index);
        self.checked[index] = true;
        Ok(())
    }

    /// Enable or disable the entry at `ctx` without confirmation.
    ///
    /// Preinstalled entries and the active entry are locked on; requests for
    /// them change nothing and never reach the service.
    pub fn set_enabled(&mut self, ctx: RowContext, enabled: bool) -> Result<(), ControlError> {
        let index = self.resolve(ctx)?;
        let entry = &self.catalog.entries()[index];
        if self.catalog.is_locked(index) {
            debug!(app_id = %entry.app_id, "ignoring toggle on locked entry");
            return Err(ControlError::Locked(entry.label.clone()));
        }
        let app_id = entry.app_id.clone();
        if let Err(e) = self.service.set_ime_enabled(&app_id, enabled) {
            warn!(%app_id, enabled, error = %e, "changing input method state failed");
            return Err(e.into());
        }
        self.checked[index] = enabled;
        Ok(())
    }

    /// Flip the toggle at `ctx`.
    ///
    /// Turning an entry off (and on, when `confirm_on_enable` is set) only
    /// flips the visual state and returns a [`PendingToggle`]; nothing is sent
    /// to the service until [`confirm`](Self::confirm). Flipping a row whose
    /// toggle is still waiting restores it and returns
    /// [`ToggleOutcome::Withdrawn`].
    pub fn request_toggle(&mut self, ctx: RowContext) -> Result<ToggleOutcome, ControlError> {
        let index = self.resolve(ctx)?;
        let entry = &self.catalog.entries()[index];
        if self.catalog.is_locked(index) {
            debug!(app_id = %entry.app_id, "ignoring toggle on locked entry");
            return Err(ControlError::Locked(entry.label.clone()));
        }

        if self.awaiting == Some(ctx) {
            self.checked[index] = !self.checked[index];
            self.awaiting = None;
            debug!(app_id = %entry.app_id, "waiting toggle withdrawn");
            return Ok(ToggleOutcome::Withdrawn);
        }
        if let Some(previous) = self.awaiting.take() {
            self.checked[previous.index] = !self.checked[previous.index];
            debug!(index = previous.index, "waiting toggle superseded");
        }

        let enable = !self.checked[index];
        if !enable || self.confirm_on_enable {
            let pending = PendingToggle {
                ctx,
                enable,
                label: entry.label.clone(),
            };
            self.checked[index] = enable;
            self.awaiting = Some(ctx);
            debug!(app_id = %entry.app_id, enable, "toggle awaiting confirmation");
            return Ok(ToggleOutcome::ConfirmationRequired(pending));
        }

        self.set_enabled(ctx, true)?;
        Ok(ToggleOutcome::Applied)
    }

    /// The row whose toggle is waiting for confirmation.
    pub fn awaiting(&self) -> Option<RowContext> {
        self.awaiting
    }

    /// Apply a confirmed toggle.
    pub fn confirm(&mut self, pending: PendingToggle) -> Result<(), ControlError> {
        let index = self.resolve(pending.ctx)?;
        if self.awaiting != Some(pending.ctx) {
            debug!(index, "confirmation for a toggle that is no longer waiting");
            return Err(ControlError::StaleContext);
        }
        self.awaiting = None;
        let result = self.set_enabled(pending.ctx, pending.enable);
        if result.is_err() {
            self.checked[index] = !pending.enable;
        }
        result
    }

    /// Drop a toggle and restore the checkbox it flipped.
    pub fn cancel(&mut self, pending: PendingToggle) -> Result<(), ControlError> {
        let index = self.resolve(pending.ctx)?;
        if self.awaiting != Some(pending.ctx) {
            debug!(index, "cancel for a toggle that is no longer waiting");
            return Err(ControlError::StaleContext);
        }
        self.awaiting = None;
        self.checked[index] = !pending.enable;
        debug!(index, "toggle cancelled");
        Ok(())
    }

    /// Open the active IME's configuration.
    pub fn open_option_window(&mut self, config: &Config) -> Result<OptionTarget, ControlError> {
        let Some(active) = self.catalog.active_entry() else {
            warn!("no active input method to configure");
            return Err(ControlError::NoActiveIme);
        };
        if !active.has_option {
            return Err(ControlError::NoOption(active.label.clone()));
        }
        if let Some(module) = config.setup_module_for(&active.app_id) {
            info!(module, "showing setup module");
            return Ok(OptionTarget::SetupModule(module.to_string()));
        }
        if let Err(e) = self.service.open_ime_option_window() {
            warn!(error = %e, "opening option window failed");
            return Err(e.into());
        }
        Ok(OptionTarget::ServiceWindow)
    }
}
