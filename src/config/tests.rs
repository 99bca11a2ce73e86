//! Tests for the configuration system: validation, presets, environment
//! parsing and file persistence.

use super::*;
use crate::error::EditTrieError;
use std::env;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_default_is_valid() {
    let config = TrieConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.top_l, 10);
    assert_eq!(config.build_capacity, 1_000_000);
    assert_eq!(config.zone_block_size, 256 * 1024);
    assert!(!config.normalize);
}

#[test]
fn test_all_presets_valid() {
    assert!(TrieConfig::performance_preset().validate().is_ok());
    assert!(TrieConfig::memory_preset().validate().is_ok());
    assert!(TrieConfig::realtime_preset().validate().is_ok());
    assert_eq!(TrieConfig::balanced_preset(), TrieConfig::default());
}

#[test]
fn test_validation_failures() {
    let config = TrieConfig {
        top_l: 0,
        ..TrieConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, EditTrieError::Configuration { .. }));
    assert!(err.to_string().contains("top_l"));

    let config = TrieConfig {
        build_capacity: 0,
        ..TrieConfig::default()
    };
    assert!(config.validate().is_err());

    let config = TrieConfig {
        zone_block_size: 16,
        ..TrieConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("zone_block_size"));
}

#[test]
fn test_builder() {
    let config = TrieConfig::builder()
        .top_l(3)
        .build_capacity(128)
        .zone_block_size(4096)
        .normalize(true)
        .build()
        .unwrap();
    assert_eq!(config.top_l, 3);
    assert_eq!(config.build_capacity, 128);
    assert_eq!(config.zone_block_size, 4096);
    assert!(config.normalize);

    assert!(TrieConfig::builder().top_l(0).build().is_err());
}

#[test]
fn test_env_initialization() {
    // Unique prefix keeps this test independent of the others.
    let prefix = "EDIT_TRIE_UNIT_ENV_";
    env::set_var(format!("{}TOP_L", prefix), "4");
    env::set_var(format!("{}BUILD_CAPACITY", prefix), "2048");
    env::set_var(format!("{}NORMALIZE", prefix), "yes");

    let config = TrieConfig::from_env_with_prefix(prefix).unwrap();
    assert_eq!(config.top_l, 4);
    assert_eq!(config.build_capacity, 2048);
    assert_eq!(config.zone_block_size, TrieConfig::default().zone_block_size);
    assert!(config.normalize);

    env::remove_var(format!("{}TOP_L", prefix));
    env::remove_var(format!("{}BUILD_CAPACITY", prefix));
    env::remove_var(format!("{}NORMALIZE", prefix));
}

#[test]
fn test_env_invalid_value_keeps_default() {
    let prefix = "EDIT_TRIE_UNIT_BAD_";
    env::set_var(format!("{}TOP_L", prefix), "many");
    let config = TrieConfig::from_env_with_prefix(prefix).unwrap();
    assert_eq!(config.top_l, 10);
    env::remove_var(format!("{}TOP_L", prefix));

    env::set_var(format!("{}TOP_L", prefix), "0");
    assert!(TrieConfig::from_env_with_prefix(prefix).is_err());
    env::remove_var(format!("{}TOP_L", prefix));
}

#[test]
fn test_parse_env_helpers() {
    assert_eq!(parse_env_var("EDIT_TRIE_UNIT_UNSET_VAR", 7usize), 7);
    assert!(parse_env_bool("EDIT_TRIE_UNIT_UNSET_BOOL", true));

    env::set_var("EDIT_TRIE_UNIT_BOOL", "ON");
    assert!(parse_env_bool("EDIT_TRIE_UNIT_BOOL", false));
    env::set_var("EDIT_TRIE_UNIT_BOOL", "nope");
    assert!(!parse_env_bool("EDIT_TRIE_UNIT_BOOL", true));
    env::remove_var("EDIT_TRIE_UNIT_BOOL");
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trie.json");

    let config = TrieConfig::memory_preset();
    config.save_to_file(&path).unwrap();

    let loaded = TrieConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_rejects_bad_files() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(TrieConfig::load_from_file(&missing).is_err());

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "{ not json").unwrap();
    assert!(TrieConfig::load_from_file(&garbage).is_err());

    let invalid = dir.path().join("invalid.json");
    fs::write(
        &invalid,
        r#"{"top_l":0,"build_capacity":10,"zone_block_size":1024,"normalize":false}"#,
    )
    .unwrap();
    assert!(TrieConfig::load_from_file(&invalid).is_err());
}

#[test]
fn test_validation_error_display() {
    let err = ValidationError::new("top_l", "0", "must be at least 1").with_suggestion("10");
    assert_eq!(
        err.to_string(),
        "Invalid configuration for field 'top_l': value '0' is invalid (must be at least 1). Suggested values: 10"
    );
}
