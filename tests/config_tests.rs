//! Config Tests
//!
//! Tests for the builder and the key=value config file.

use std::io::Write;
use std::path::PathBuf;

use scpstats::config::ConfigFile;
use scpstats::{Config, StatsError, StorageBackend};
use tempfile::NamedTempFile;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.host, "localhost");
    assert_eq!(config.storage, StorageBackend::Sqlite(PathBuf::from("scpstats.db")));
}

#[test]
fn test_builder_overrides() {
    let config = Config::builder()
        .host("10.0.0.5")
        .port(9000)
        .storage(StorageBackend::Memory)
        .build();

    assert_eq!(config.feed_addr(), "10.0.0.5:9000");
    assert_eq!(config.storage, StorageBackend::Memory);
}

// =============================================================================
// Config File Tests
// =============================================================================

#[test]
fn test_parse_key_values() {
    let file = ConfigFile::parse("port=7777\nhost = game.local \n");

    assert_eq!(file.get("port"), Some("7777"));
    assert_eq!(file.get("host"), Some("game.local"));
    assert_eq!(file.get("database"), None);
}

#[test]
fn test_parse_skips_comments_and_junk() {
    let file = ConfigFile::parse("# feed settings\n\nnot a pair\nport=1234\n");

    assert_eq!(file.port().unwrap(), 1234);
    assert_eq!(file.get("not a pair"), None);
}

#[test]
fn test_parse_splits_on_first_equals() {
    let file = ConfigFile::parse("database=/var/lib/stats=v2.db\n");
    assert_eq!(file.get("database"), Some("/var/lib/stats=v2.db"));
}

#[test]
fn test_first_occurrence_wins() {
    let file = ConfigFile::parse("port=1111\nport=2222\n");
    assert_eq!(file.port().unwrap(), 1111);
}

#[test]
fn test_missing_port_is_config_error() {
    let file = ConfigFile::parse("host=localhost\n");

    let err = file.port().unwrap_err();
    assert!(matches!(err, StatsError::Config(_)));
    assert!(err.to_string().contains("port"));
}

#[test]
fn test_invalid_port_is_config_error() {
    for raw in ["port=abc", "port=70000", "port=-1", "port="] {
        let err = ConfigFile::parse(raw).port().unwrap_err();
        assert!(matches!(err, StatsError::Config(_)), "input {:?}", raw);
    }
}

#[test]
fn test_from_file() {
    let file = write_config("port=7778\nhost=127.0.0.1\ndatabase=/tmp/stats.db\n");
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.feed_addr(), "127.0.0.1:7778");
    assert_eq!(config.storage, StorageBackend::Sqlite(PathBuf::from("/tmp/stats.db")));
}

#[test]
fn test_from_file_port_only_uses_defaults() {
    let file = write_config("port=7000\n");
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.feed_addr(), "localhost:7000");
    assert_eq!(config.storage, Config::default().storage);
}

#[test]
fn test_from_missing_file_is_config_error() {
    let err = Config::from_file("/definitely/not/here/config.cfg").unwrap_err();
    assert!(matches!(err, StatsError::Config(_)));
}
