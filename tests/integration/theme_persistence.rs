//! Theme resolution and persistence across controller instances.

use lotto::state::{FileStore, MemoryStore, PREFERENCES_FILE, PreferenceStore, Preferences};
use lotto::theme::{Theme, ThemeController, ThemeSource};

use crate::common::fixtures::Workspace;

#[test]
fn test_toggle_survives_restart() {
    let ws = Workspace::new();

    let mut first = ThemeController::init_theme(FileStore::in_dir(ws.path()), None);
    assert_eq!(first.theme(), Theme::Light);
    assert_eq!(first.source(), ThemeSource::Default);
    assert_eq!(first.toggle_theme().unwrap(), Theme::Dark);

    let second = ThemeController::init_theme(FileStore::in_dir(ws.path()), Some(Theme::Light));
    assert_eq!(second.theme(), Theme::Dark);
    assert_eq!(second.source(), ThemeSource::Saved);
    assert_eq!(second.view().toggle_label, Theme::Dark.toggle_label());
}

#[test]
fn test_environment_used_until_user_chooses() {
    let ws = Workspace::new();

    let store = FileStore::in_dir(ws.path());
    let mut controller = ThemeController::init_theme(store, Some(Theme::Dark));
    assert_eq!(controller.theme(), Theme::Dark);
    assert_eq!(controller.source(), ThemeSource::Environment);
    assert!(!ws.path().join(PREFERENCES_FILE).exists());

    controller.set_theme(Theme::Light).unwrap();
    let saved = FileStore::in_dir(ws.path()).load().unwrap();
    assert_eq!(saved.theme, Some(Theme::Light));
}

#[test]
fn test_corrupt_preferences_fall_back() {
    let ws = Workspace::new();
    let _ = ws.write(PREFERENCES_FILE, "{ not json");

    let mut controller = ThemeController::init_theme(FileStore::in_dir(ws.path()), None);
    assert_eq!(controller.theme(), Theme::Light);
    assert_eq!(controller.source(), ThemeSource::Default);

    // Saving repairs the file.
    controller.toggle_theme().unwrap();
    let raw = std::fs::read_to_string(ws.path().join(PREFERENCES_FILE)).unwrap();
    let prefs: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(prefs["theme"], "dark");
}

#[test]
fn test_state_dir_created_on_first_save() {
    let ws = Workspace::new();
    let nested = ws.path().join("deep").join("state");

    let mut controller = ThemeController::init_theme(FileStore::in_dir(&nested), None);
    controller.set_theme(Theme::Dark).unwrap();
    assert!(nested.join(PREFERENCES_FILE).is_file());
}

#[test]
fn test_memory_store_shared_between_clones() {
    let store = MemoryStore::with(Preferences {
        theme: Some(Theme::Dark),
    });
    let mut controller = ThemeController::init_theme(store.clone(), None);
    assert_eq!(controller.theme(), Theme::Dark);

    controller.toggle_theme().unwrap();
    assert_eq!(store.load().unwrap().theme, Some(Theme::Light));
}
