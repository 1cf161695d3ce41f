//! Tests for config module

use issueq::config::{expand_tilde, Config, LogFormat, OutputFormat, ParserConfig};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.parser.max_token_size, None);
    assert_eq!(config.parser.read_buffer_size, 4096);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.output.format, OutputFormat::Json);
}

#[test]
fn test_expand_tilde() {
    let home = dirs::home_dir().unwrap();

    let expanded = expand_tilde(&PathBuf::from("~/foo")).unwrap();
    assert_eq!(expanded, home.join("foo"));

    let expanded = expand_tilde(&PathBuf::from("~")).unwrap();
    assert_eq!(expanded, home);

    let expanded = expand_tilde(&PathBuf::from("/absolute/path")).unwrap();
    assert_eq!(expanded, PathBuf::from("/absolute/path"));
}

#[test]
fn test_missing_file_gives_defaults() {
    let temp = tempdir().unwrap();
    let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_and_load() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.parser = ParserConfig {
        max_token_size: Some(1024),
        read_buffer_size: 256,
    };
    config.logging.level = "debug".to_string();
    config.logging.format = LogFormat::Json;
    config.output.format = OutputFormat::Yaml;
    config.save(&config_path).unwrap();

    let loaded = Config::load_from(&config_path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_parser_section_rejected() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[parser]\nmax_token_size = 10\nread_buffer_size = 100\n",
    )
    .unwrap();

    let err = Config::load_from(&config_path).unwrap_err();
    assert!(err.to_string().contains("max_token_size"));
}

#[test]
fn test_invalid_log_format_rejected() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");
    std::fs::write(&config_path, "[logging]\nformat = \"xml\"\n").unwrap();

    assert!(Config::load_from(&config_path).is_err());
}
