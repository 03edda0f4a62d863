//! Integration tests for the keyboard list screen.
//!
//! Tests the screen layout for each caller type, the confirmation dialog
//! flow, launching the selector and reloading on its reply.

use imesetting_list::{
    AppType, Config, ControlKind, ImeEntry, LaunchReply, ListScreen, MemoryService, OptionTarget,
    RecordingLauncher, RowAction, ServiceCall,
};

fn service() -> MemoryService {
    MemoryService::new(vec![
        ImeEntry::new("org.tizen.ise-engine-default", "Tizen keyboard")
            .preinstalled(true)
            .enabled(true)
            .with_option(true),
        ImeEntry::new("com.example.swype", "Swype").enabled(true),
        ImeEntry::new("com.example.gboard", "Gboard"),
    ])
    .with_active("org.tizen.ise-engine-default")
}

fn screen(app_type: AppType) -> ListScreen<MemoryService, RecordingLauncher> {
    ListScreen::new(service(), RecordingLauncher::default(), Config::default(), app_type)
}

#[test]
fn test_settings_layout() {
    let screen = screen(AppType::Setting);
    let rows = screen.rows();
    let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Virtual keyboard",
            "Default keyboard",
            "Keyboard settings",
            "Keyboards",
            "Tizen keyboard",
            "Gboard",
            "Swype",
        ]
    );
    assert_eq!(rows[1].secondary_label.as_deref(), Some("Tizen keyboard"));
    assert!(!rows[2].disabled);
    assert_eq!(screen.first_keyboard_row(), 4);
    assert_eq!(rows[4].control.kind, ControlKind::Toggle);
}

#[test]
fn test_normal_layout_has_no_summary() {
    let screen = screen(AppType::Normal);
    let rows = screen.rows();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].label, "Keyboards");
    assert_eq!(screen.first_keyboard_row(), 1);
}

#[test]
fn test_disable_requires_confirmation_then_applies() {
    let mut screen = screen(AppType::Normal);
    // rows: header, Tizen keyboard, Gboard, Swype
    let action = screen.toggle(3);
    assert!(matches!(action, RowAction::Confirm(_)));

    let dialog = screen.pending_dialog().unwrap();
    assert_eq!(dialog.title, "Attention");
    assert!(dialog.text.contains("Swype"));
    assert_eq!(dialog.ok_label, "Disable");
    assert!(!screen.rows()[3].control.checked);

    assert!(screen.confirm_dialog());
    assert!(screen.pending_dialog().is_none());
    assert_eq!(
        screen.controller().service().calls(),
        &[ServiceCall::SetEnabled("com.example.swype".into(), false)]
    );
}

#[test]
fn test_cancel_restores_toggle() {
    let mut screen = screen(AppType::Normal);
    screen.tap(3);
    screen.cancel_dialog();
    assert!(screen.rows()[3].control.checked);
    assert!(screen.controller().service().calls().is_empty());
}

#[test]
fn test_enable_without_dialog() {
    let mut screen = screen(AppType::Normal);
    assert_eq!(screen.toggle(2), RowAction::Refresh);
    assert!(screen.pending_dialog().is_none());
    assert!(screen.rows()[2].control.checked);
}

#[test]
fn test_locked_rows_do_nothing() {
    let mut screen = screen(AppType::Normal);
    assert_eq!(screen.toggle(1), RowAction::None);
    assert_eq!(screen.tap(0), RowAction::None);
    assert_eq!(screen.tap(99), RowAction::None);
    assert!(screen.controller().service().calls().is_empty());
}

#[test]
fn test_default_keyboard_row_launches_selector() {
    let mut screen = screen(AppType::Setting);
    assert_eq!(screen.tap(1), RowAction::LaunchSelector);
    let requests = &screen.launcher().requests;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].app_id, Config::default().selector_app_id);
    assert_eq!(requests[0].caller, "settings");
}

#[test]
fn test_reply_reloads_catalog() {
    let mut screen = screen(AppType::Setting);
    screen
        .controller_mut()
        .service_mut()
        .state_mut()
        .active = Some("com.example.swype".into());

    assert!(!screen.on_launch_reply(&LaunchReply::default()));
    assert_eq!(screen.rows()[1].secondary_label.as_deref(), Some("Tizen keyboard"));

    assert!(screen.on_launch_reply(&LaunchReply::success("done")));
    let rows = screen.rows();
    assert_eq!(rows[1].secondary_label.as_deref(), Some("Swype"));
    // Keyboard settings greys out: Swype has no options
    assert!(rows[2].disabled);
}

#[test]
fn test_keyboard_settings_opens_service_window() {
    let mut screen = screen(AppType::Setting);
    assert_eq!(
        screen.tap(2),
        RowAction::OpenOption(OptionTarget::ServiceWindow)
    );
    assert_eq!(
        screen.controller().service().calls(),
        &[ServiceCall::OpenOptionWindow]
    );
}

#[test]
fn test_keyboard_settings_prefers_setup_module() {
    let mut config = Config::default();
    config.setup_modules = vec!["org.tizen.ise-engine-default-setup".into()];
    let mut screen = ListScreen::new(
        service(),
        RecordingLauncher::default(),
        config,
        AppType::Setting,
    );
    assert_eq!(
        screen.tap(2),
        RowAction::OpenOption(OptionTarget::SetupModule(
            "org.tizen.ise-engine-default-setup".into()
        ))
    );
    assert!(screen.controller().service().calls().is_empty());
}

#[test]
fn test_reload_drops_pending_dialog() {
    let mut screen = screen(AppType::Normal);
    screen.toggle(3);
    screen.update_window();
    assert!(screen.pending_dialog().is_none());
    assert!(!screen.confirm_dialog());
    assert!(screen.rows()[3].control.checked);
}

#[test]
fn test_confirm_on_enable_uses_enable_text() {
    let mut config = Config::default();
    config.confirm_on_enable = true;
    let mut screen = ListScreen::new(
        service(),
        RecordingLauncher::default(),
        config,
        AppType::Normal,
    );
    assert!(matches!(screen.toggle(2), RowAction::Confirm(_)));
    let dialog = screen.pending_dialog().unwrap();
    assert_eq!(dialog.ok_label, "Enable");
    assert!(dialog.text.contains("Gboard"));
}

#[test]
fn test_second_toggle_closes_dialog_without_service_calls() {
    let mut screen = screen(AppType::Normal);
    assert_eq!(screen.toggle(2), RowAction::Refresh);
    screen.controller_mut().service_mut().clear_calls();

    assert!(matches!(screen.toggle(3), RowAction::Confirm(_)));
    assert_eq!(screen.toggle(3), RowAction::Withdraw);
    assert!(screen.pending_dialog().is_none());
    assert!(screen.rows()[3].control.checked);

    assert!(!screen.confirm_dialog());
    assert!(screen.rows()[3].control.checked);
    assert!(screen.controller().service().calls().is_empty());
}

#[test]
fn test_toggling_another_row_replaces_dialog() {
    let mut screen = screen(AppType::Normal);
    assert_eq!(screen.toggle(2), RowAction::Refresh);
    screen.controller_mut().service_mut().clear_calls();

    screen.toggle(3);
    screen.toggle(2);
    let dialog = screen.pending_dialog().unwrap();
    assert!(dialog.text.contains("Gboard"));
    assert!(screen.rows()[3].control.checked);

    assert!(screen.confirm_dialog());
    assert_eq!(
        screen.controller().service().calls(),
        &[ServiceCall::SetEnabled("com.example.gboard".into(), false)]
    );
}
