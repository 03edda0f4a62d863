//! IME catalog: display ordering and active-entry resolution.
//!
//! A catalog is rebuilt wholesale on every load. Building it:
//! 1. drops entries the [`FilterPolicy`] excludes
//! 2. partitions the rest into preinstalled and user-installed groups
//! 3. sorts each group by label, ignoring ASCII case (stable, so equal labels
//!    keep their service order)
//! 4. concatenates preinstalled first, then user-installed
//! 5. resolves the active app id to a position by linear scan

use crate::entry::ImeEntry;
use crate::service::ImeService;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Position of the active IME within a catalog, or `None` when the active
/// app id is unknown or matches no entry.
pub type ActiveIndex = Option<usize>;

/// Which installed IMEs a screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    /// Every installed IME, enabled or not
    #[default]
    Management,
    /// Only enabled IMEs
    Selector,
}

impl FilterPolicy {
    fn admits(self, entry: &ImeEntry) -> bool {
        match self {
            FilterPolicy::Management => true,
            FilterPolicy::Selector => entry.is_enabled,
        }
    }
}

/// Compare two labels the way `strcasecmp` does: byte-wise after ASCII
/// lowercasing.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Ordered list of IMEs plus the resolved active index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImeCatalog {
    entries: Vec<ImeEntry>,
    active: ActiveIndex,
    policy: FilterPolicy,
    generation: u64,
}

impl ImeCatalog {
    /// An empty catalog.
    pub fn empty(policy: FilterPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Build a catalog from raw service data.
    pub fn build(raw: Vec<ImeEntry>, active_app_id: Option<&str>, policy: FilterPolicy) -> Self {
        let mut seen = HashSet::new();
        let (mut preinstalled, mut user): (Vec<_>, Vec<_>) = raw
            .into_iter()
            .filter(|e| policy.admits(e))
            .filter(|e| {
                let fresh = seen.insert(e.app_id.clone());
                if !fresh {
                    debug!(app_id = %e.app_id, "dropping duplicate ime entry");
                }
                fresh
            })
            .partition(|e| e.is_preinstalled);

        preinstalled.sort_by(|a, b| compare_labels(&a.label, &b.label));
        user.sort_by(|a, b| compare_labels(&a.label, &b.label));
        preinstalled.append(&mut user);

        let active = active_app_id
            .and_then(|id| preinstalled.iter().position(|e| e.app_id == id));

        Self {
            entries: preinstalled,
            active,
            policy,
            generation: 0,
        }
    }

    /// Query the service and build a catalog.
    ///
    /// Service failures never propagate: a failed list query yields an empty
    /// catalog and a failed active query yields no active entry.
    pub fn load<S: ImeService + ?Sized>(service: &S, policy: FilterPolicy) -> Self {
        let raw = match service.list_all_ime() {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "listing input methods failed");
                Vec::new()
            }
        };
        let active_id = match service.get_active_ime() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "querying active input method failed");
                None
            }
        };

        let catalog = Self::build(raw, active_id.as_deref(), policy);
        if active_id.is_some() && catalog.active.is_none() && !catalog.is_empty() {
            debug!(active = ?active_id, "active input method not in catalog");
        }
        debug!(
            entries = catalog.len(),
            active = ?catalog.active,
            ?policy,
            "catalog loaded"
        );
        catalog
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Reload counter of the controller that built this catalog.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Filter used to build this catalog.
    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImeEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImeEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ImeEntry] {
        &self.entries
    }

    /// Position of the active IME.
    pub fn active_index(&self) -> ActiveIndex {
        self.active
    }

    /// The active IME's entry, if it is in this catalog.
    pub fn active_entry(&self) -> Option<&ImeEntry> {
        self.active.and_then(|i| self.entries.get(i))
    }

    /// Whether `index` is the active entry.
    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    /// Position of `app_id` in display order.
    pub fn position_of(&self, app_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.app_id == app_id)
    }

    /// Entries whose toggle is locked on: preinstalled ones and the active one.
    pub fn is_locked(&self, index: usize) -> bool {
        self.is_active(index) || self.get(index).is_some_and(|e| e.is_locked_on())
    }

    pub(crate) fn set_active_index(&mut self, index: usize) {
        if index < self.entries.len() {
            self.active = Some(index);
        }
    }
}

impl<'a> IntoIterator for &'a ImeCatalog {
    type Item = &'a ImeEntry;
    type IntoIter = std::slice::Iter<'a, ImeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
