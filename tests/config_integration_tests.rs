//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Defaults for missing files and missing keys
//! - Environment overrides
//! - Integration with StateManager

use camino::Utf8PathBuf;
use quizdeck::{ConfigManager, Language, StateManager, UserConfig};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

fn no_env() -> HashMap<String, String> {
    HashMap::new()
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(
        manager.user_config_path(),
        config_path.join("QuizDeck Settings.yaml").as_path()
    );
}

#[test]
fn test_config_dir_is_created() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("QuizDeck Data");

    ConfigManager::new(&nested).unwrap();

    assert!(nested.is_dir());
}

#[test]
fn test_load_default_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let user_config = manager.load_user_config_with_env(no_env()).unwrap();

    assert_eq!(user_config.api_base(), "http://localhost:5000/api");
    assert_eq!(user_config.language, Language::En);
    assert_eq!(user_config.per_page, 12);
    assert_eq!(user_config.deck_size, 100);
    assert!(user_config.confirm_discard);
    assert!(!user_config.show_hints_by_default);
}

#[test]
fn test_save_and_load_user_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let config = UserConfig {
        api_base: "https://quiz.example.com/api".to_string(),
        language: Language::Ru,
        per_page: 24,
        confirm_discard: false,
        ..Default::default()
    };
    manager.save_user_config(&config).unwrap();

    let loaded = manager.load_user_config_with_env(no_env()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(manager.user_config_path(), "language: ru\ndeck_size: 20\n").unwrap();

    let loaded = manager.load_user_config_with_env(no_env()).unwrap();
    assert_eq!(loaded.language, Language::Ru);
    assert_eq!(loaded.deck_size, 20);
    assert_eq!(loaded.per_page, 12);
    assert_eq!(loaded.request_timeout_secs, 15);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(manager.user_config_path(), "per_page: 30\n").unwrap();

    let env = HashMap::from([
        ("QUIZDECK_PER_PAGE".to_string(), "50".to_string()),
        (
            "QUIZDECK_API_BASE".to_string(),
            "http://10.0.0.5:5000/api/".to_string(),
        ),
    ]);
    let loaded = manager.load_user_config_with_env(env).unwrap();

    assert_eq!(loaded.per_page, 50);
    assert_eq!(loaded.api_base(), "http://10.0.0.5:5000/api");
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(manager.user_config_path(), "per_page: [unclosed\n").unwrap();

    assert!(manager.load_user_config_with_env(no_env()).is_err());
}

#[test]
fn test_update_user_config_persists_language() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let updated = manager
        .update_user_config(|config| config.language = Language::Ru)
        .unwrap();
    assert_eq!(updated.language, Language::Ru);

    let contents = fs::read_to_string(manager.user_config_path()).unwrap();
    assert!(contents.contains("language: ru"));
}

#[test]
fn test_config_loads_into_state_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    manager
        .save_user_config(&UserConfig {
            language: Language::Ru,
            per_page: 6,
            ..Default::default()
        })
        .unwrap();

    let state = StateManager::new();
    let user_config = manager.load_user_config_with_env(no_env()).unwrap();
    state.load_from_user_config(&user_config);

    let (language, per_page) = state.read(|s| (s.language, s.browse.per_page));
    assert_eq!(language, Language::Ru);
    assert_eq!(per_page, 6);
}
