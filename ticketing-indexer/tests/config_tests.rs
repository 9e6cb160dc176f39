//! Configuration loading tests

use anyhow::Result;
use std::fs;
use tempfile::TempDir;
use ticketing_indexer::config::IndexerConfig;
use tokio_test::assert_ok;

fn create_test_config_content() -> String {
    r#"
[rpc]
url = "http://localhost:8899"
commitment = "finalized"
connect_timeout_secs = 5
read_timeout_secs = 20

[program]
program_id = "TiCKeTz1ycLXyRDXzmMT1tJ3VYBkvp3yBSxCUMzJgdu"

[cache]
stats_ttl_secs = 60

[monitoring]
log_level = "debug"
structured_logging = true
"#
    .to_string()
}

#[test]
fn test_config_loading_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("indexer.toml");
    fs::write(&config_path, create_test_config_content())?;

    let config = IndexerConfig::from_file(config_path.to_str().unwrap())?;

    assert_eq!(config.rpc.url, "http://localhost:8899");
    assert_eq!(config.rpc.commitment, "finalized");
    assert_eq!(config.rpc.read_timeout_secs, 20);
    assert_eq!(config.cache.stats_ttl_secs, 60);
    assert_eq!(config.monitoring.log_level, "debug");
    assert!(config.monitoring.structured_logging);
    assert_ok!(config.program_id());
    Ok(())
}

#[test]
fn test_invalid_url_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("indexer.toml");
    fs::write(&config_path, "[rpc]\nurl = \"not a url\"\n")?;

    assert!(IndexerConfig::from_file(config_path.to_str().unwrap()).is_err());
    Ok(())
}

#[test]
fn test_missing_file_falls_back_to_defaults() -> Result<()> {
    let config = IndexerConfig::from_file("/definitely/not/here/indexer.toml")?;
    let defaults = IndexerConfig::default();

    assert_eq!(config.rpc.url, defaults.rpc.url);
    assert_eq!(config.rpc.commitment, defaults.rpc.commitment);
    assert_eq!(config.program.program_id, defaults.program.program_id);
    assert_eq!(config.cache.stats_ttl_secs, 60);
    Ok(())
}

#[test]
fn test_toml_round_trip_through_serde() -> Result<()> {
    let config = IndexerConfig::default();
    let text = toml::to_string(&config)?;
    let parsed = IndexerConfig::from_toml_str(&text)?;
    assert_eq!(parsed.rpc.url, config.rpc.url);
    assert_eq!(parsed.cache.stats_ttl_secs, config.cache.stats_ttl_secs);
    Ok(())
}
