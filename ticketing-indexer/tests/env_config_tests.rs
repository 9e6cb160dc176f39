//! Environment overrides, kept in their own test binary so the variables
//! they set cannot leak into the file based config tests

use anyhow::Result;
use tempfile::TempDir;
use ticketing_indexer::config::IndexerConfig;

#[test]
fn test_env_overrides_apply_without_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("indexer.toml");

    std::env::set_var("TICKETING__CACHE__STATS_TTL_SECS", "15");
    std::env::set_var("TICKETING__RPC__URL", "http://localhost:8899");
    let loaded = IndexerConfig::from_file(missing.to_str().unwrap());
    std::env::remove_var("TICKETING__CACHE__STATS_TTL_SECS");
    std::env::remove_var("TICKETING__RPC__URL");

    let config = loaded?;
    assert_eq!(config.cache.stats_ttl_secs, 15);
    assert_eq!(config.rpc.url, "http://localhost:8899");
    assert_eq!(config.rpc.commitment, "confirmed");
    Ok(())
}
