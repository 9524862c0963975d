use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let config = parse_config(&content)?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Substitute environment variables and parse YAML
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    let config: AppConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> AppConfig {
    AppConfig {
        scanner: ScannerFilters::default(),
        oco: OcoConfig::default(),
        fees: FeeSchedule::default(),
        market_data: MarketDataSettings {
            provider: MarketDataProviderKind::Static,
            fixture_path: Some("fixtures/market.json".to_string()),
            api_key: None,
            base_url: default_polygon_base_url(),
            tickers: vec![
                "SPY".to_string(),
                "QQQ".to_string(),
                "AAPL".to_string(),
                "MSFT".to_string(),
            ],
        },
        logging: LoggingSettings::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &AppConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_config_is_valid() {
        let config = generate_default_config();
        let report = validate_config(&config);
        assert!(report.is_valid(), "{:?}", report.errors);
        assert_eq!(config.market_data.tickers.len(), 4);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spreadscan.yaml");

        let mut config = generate_default_config();
        config.scanner.spread_width = SpreadWidth::Five;
        config.oco.time_stop_days = 3;

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_parse_config_substitutes_env() {
        std::env::set_var("SPREADSCAN_PARSER_TEST_KEY", "k-123");
        let yaml = r#"
market_data:
  provider: polygon
  api_key: "${SPREADSCAN_PARSER_TEST_KEY}"
  tickers: [SPY]
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.market_data.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.market_data.provider, MarketDataProviderKind::Polygon);
        assert!(validate_config(&config).is_valid());
    }

    #[test]
    fn test_parse_config_rejects_bad_yaml() {
        assert!(parse_config("scanner: [not, a, map]").is_err());
    }
}
