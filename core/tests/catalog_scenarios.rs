// core/tests/catalog_scenarios.rs
//
// End-to-end behavior of the catalog model against an in-memory service.
//
// Tests cover:
// - Display ordering (preinstalled first, case-insensitive, stable ties)
// - Active index resolution and idempotent rebuilds
// - Locked entries and out-of-range indices leave state untouched
// - Disable confirmation, cancellation and withdrawal by a second toggle
// - Empty and failing services

use imesetting_core::{
    ControlError, FilterPolicy, ImeCatalog, ImeEntry, KeyboardRow, MemoryService, RowItem,
    SelectionController, SelectorRow, ServiceCall, ToggleOutcome,
};

fn labels(catalog: &ImeCatalog) -> Vec<String> {
    catalog.iter().map(|e| e.label.clone()).collect()
}

fn mixed_service() -> MemoryService {
    MemoryService::new(vec![
        ImeEntry::new("org.pre.zulu", "Zulu").preinstalled(true).enabled(true),
        ImeEntry::new("org.user.mango", "Mango").enabled(true),
        ImeEntry::new("org.pre.alpha", "Alpha").preinstalled(true).enabled(true),
        ImeEntry::new("org.user.kiwi", "kiwi"),
    ])
}

#[test]
fn scenario_a_partition_then_sort() {
    let raw = vec![
        ImeEntry::new("z", "Zulu").preinstalled(true),
        ImeEntry::new("a", "Alpha").preinstalled(true),
        ImeEntry::new("m", "Mango"),
    ];
    let catalog = ImeCatalog::build(raw, None, FilterPolicy::Management);
    assert_eq!(labels(&catalog), vec!["Alpha", "Zulu", "Mango"]);
}

#[test]
fn preinstalled_always_precede_user_entries() {
    let raw = vec![
        ImeEntry::new("u1", "aaa"),
        ImeEntry::new("p1", "zzz").preinstalled(true),
        ImeEntry::new("u2", "AAB"),
        ImeEntry::new("p2", "mmm").preinstalled(true),
    ];
    let catalog = ImeCatalog::build(raw, None, FilterPolicy::Management);
    let first_user = catalog.iter().position(|e| !e.is_preinstalled).unwrap();
    assert!(catalog.iter().skip(first_user).all(|e| !e.is_preinstalled));
    assert_eq!(labels(&catalog), vec!["mmm", "zzz", "aaa", "AAB"]);
}

#[test]
fn scenario_b_active_row_is_locked_and_checked() {
    let svc = mixed_service().with_active("org.user.mango");
    let ctl = SelectionController::new(svc, FilterPolicy::Management);
    // Alpha, Zulu, kiwi, Mango
    assert_eq!(ctl.catalog().active_index(), Some(3));

    let row = KeyboardRow::new(ctl.row_context(3).unwrap());
    let state = row.state(&ctl);
    assert!(state.control.checked);
    assert!(state.control.disabled);
}

#[test]
fn scenario_c_unknown_active_id() {
    let svc = mixed_service().with_active("org.removed.ime");
    let ctl = SelectionController::new(svc, FilterPolicy::Management);
    assert_eq!(ctl.catalog().active_index(), None);
    assert!(ctl.catalog().active_entry().is_none());
    for i in 0..ctl.catalog().len() {
        let row = SelectorRow::new(ctl.row_context(i).unwrap());
        assert!(!row.control_state(&ctl).checked);
    }
}

#[test]
fn scenario_d_cancelled_disable_reverts_without_service_call() {
    let svc = mixed_service().with_active("org.pre.alpha");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Management);
    let mango = ctl.catalog().position_of("org.user.mango").unwrap();
    assert!(ctl.is_checked(mango));

    let ctx = ctl.row_context(mango).unwrap();
    let outcome = ctl.request_toggle(ctx).unwrap();
    let ToggleOutcome::ConfirmationRequired(pending) = outcome else {
        panic!("disabling must ask for confirmation, got {:?}", outcome);
    };
    assert!(!pending.enable());
    assert_eq!(pending.label(), "Mango");
    assert!(!ctl.is_checked(mango));

    ctl.cancel(pending).unwrap();
    assert!(ctl.is_checked(mango));
    assert!(ctl.service().calls().is_empty());

    ctl.reload();
    let mango = ctl.catalog().position_of("org.user.mango").unwrap();
    assert!(ctl.catalog().get(mango).unwrap().is_enabled);
}

#[test]
fn confirmed_disable_reaches_service() {
    let svc = mixed_service().with_active("org.pre.alpha");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Management);
    let mango = ctl.catalog().position_of("org.user.mango").unwrap();
    let ctx = ctl.row_context(mango).unwrap();

    let ToggleOutcome::ConfirmationRequired(pending) = ctl.request_toggle(ctx).unwrap() else {
        panic!("expected confirmation");
    };
    ctl.confirm(pending).unwrap();

    assert_eq!(
        ctl.service().calls(),
        &[ServiceCall::SetEnabled("org.user.mango".into(), false)]
    );
    ctl.reload();
    let mango = ctl.catalog().position_of("org.user.mango").unwrap();
    assert!(!ctl.catalog().get(mango).unwrap().is_enabled);
}

#[test]
fn second_toggle_withdraws_waiting_disable() {
    let svc = mixed_service().with_active("org.pre.alpha");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Management);
    let mango = ctl.catalog().position_of("org.user.mango").unwrap();
    let ctx = ctl.row_context(mango).unwrap();

    let ToggleOutcome::ConfirmationRequired(pending) = ctl.request_toggle(ctx).unwrap() else {
        panic!("expected confirmation");
    };
    assert_eq!(ctl.request_toggle(ctx).unwrap(), ToggleOutcome::Withdrawn);
    assert!(ctl.is_checked(mango));
    assert_eq!(ctl.awaiting(), None);

    assert!(matches!(ctl.confirm(pending), Err(ControlError::StaleContext)));
    assert!(ctl.is_checked(mango));
    assert!(ctl.service().calls().is_empty());
}

#[test]
fn toggling_another_row_restores_the_waiting_one() {
    let svc = MemoryService::new(vec![
        ImeEntry::new("org.pre.alpha", "Alpha").preinstalled(true).enabled(true),
        ImeEntry::new("org.user.kiwi", "Kiwi").enabled(true),
        ImeEntry::new("org.user.mango", "Mango").enabled(true),
    ])
    .with_active("org.pre.alpha");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Management);
    let kiwi = ctl.row_context(1).unwrap();
    let mango = ctl.row_context(2).unwrap();

    let ToggleOutcome::ConfirmationRequired(first) = ctl.request_toggle(kiwi).unwrap() else {
        panic!("expected confirmation");
    };
    let ToggleOutcome::ConfirmationRequired(second) = ctl.request_toggle(mango).unwrap() else {
        panic!("expected confirmation");
    };
    assert!(ctl.is_checked(1));
    assert!(!ctl.is_checked(2));
    assert_eq!(ctl.awaiting(), Some(mango));

    assert!(matches!(ctl.confirm(first), Err(ControlError::StaleContext)));
    ctl.confirm(second).unwrap();
    assert_eq!(
        ctl.service().calls(),
        &[ServiceCall::SetEnabled("org.user.mango".into(), false)]
    );
}

#[test]
fn scenario_e_empty_service() {
    let ctl = SelectionController::new(MemoryService::new(Vec::new()), FilterPolicy::Management);
    assert!(ctl.catalog().is_empty());
    assert_eq!(ctl.catalog().active_index(), None);
    assert!(ctl.row_context(0).is_none());
}

#[test]
fn unavailable_service_degrades_to_empty_catalog() {
    let mut svc = mixed_service().with_active("org.pre.alpha");
    svc.set_unavailable(true);
    let mut ctl = SelectionController::new(svc, FilterPolicy::Management);
    assert!(ctl.catalog().is_empty());

    ctl.service_mut().set_unavailable(false);
    ctl.reload();
    assert_eq!(ctl.catalog().len(), 4);
    assert_eq!(ctl.catalog().active_index(), Some(0));
}

#[test]
fn rebuild_is_idempotent() {
    let svc = mixed_service().with_active("org.user.kiwi");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Management);
    let first = (labels(ctl.catalog()), ctl.catalog().active_index());
    ctl.reload();
    let second = (labels(ctl.catalog()), ctl.catalog().active_index());
    assert_eq!(first, second);
}

#[test]
fn set_enabled_ignores_preinstalled_and_active() {
    let svc = mixed_service().with_active("org.user.mango");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Management);
    let alpha = ctl.row_context(0).unwrap();
    let mango = ctl.row_context(ctl.catalog().active_index().unwrap()).unwrap();

    assert!(matches!(ctl.set_enabled(alpha, false), Err(ControlError::Locked(_))));
    assert!(matches!(ctl.set_enabled(mango, false), Err(ControlError::Locked(_))));
    assert!(matches!(ctl.request_toggle(mango), Err(ControlError::Locked(_))));
    assert!(ctl.is_checked(0));
    assert!(ctl.is_checked(3));
    assert!(ctl.service().calls().is_empty());
}

#[test]
fn out_of_range_indices_are_rejected() {
    let svc = mixed_service().with_active("org.pre.alpha");
    let ctl = SelectionController::new(svc, FilterPolicy::Management);
    let err = ctl.context_for(4).unwrap_err();
    assert!(matches!(err, ControlError::InvalidIndex { index: 4, len: 4 }));
    assert!(ctl.row_context(usize::MAX).is_none());
}

#[test]
fn catalog_shrink_invalidates_pending_confirmation() {
    let svc = mixed_service().with_active("org.pre.alpha");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Management);
    let mango = ctl.catalog().position_of("org.user.mango").unwrap();
    let ctx = ctl.row_context(mango).unwrap();
    let ToggleOutcome::ConfirmationRequired(pending) = ctl.request_toggle(ctx).unwrap() else {
        panic!("expected confirmation");
    };

    // Another app uninstalls an IME while the dialog is open.
    ctl.service_mut().state_mut().imes.retain(|e| e.app_id != "org.user.kiwi");
    ctl.reload();

    assert!(matches!(ctl.confirm(pending), Err(ControlError::StaleContext)));
    assert!(ctl.service().calls().is_empty());
}

#[test]
fn set_active_updates_index_before_reload() {
    let svc = mixed_service().with_active("org.pre.alpha");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Selector);
    // Selector shows enabled only: Alpha, Zulu, Mango
    assert_eq!(labels(ctl.catalog()), vec!["Alpha", "Zulu", "Mango"]);

    let ctx = ctl.row_context(2).unwrap();
    ctl.set_active(ctx).unwrap();
    assert_eq!(ctl.catalog().active_index(), Some(2));
    assert_eq!(
        ctl.service().calls(),
        &[ServiceCall::SetActive("org.user.mango".into())]
    );
}

#[test]
fn failed_set_active_keeps_previous_index() {
    let svc = mixed_service().with_active("org.pre.alpha");
    let mut ctl = SelectionController::new(svc, FilterPolicy::Selector);
    let ctx = ctl.row_context(1).unwrap();
    ctl.service_mut().set_unavailable(true);
    assert!(ctl.set_active(ctx).is_err());
    assert_eq!(ctl.catalog().active_index(), Some(0));
}
