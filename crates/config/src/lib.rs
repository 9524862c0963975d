use serde::{Deserialize, Serialize};
use std::fmt;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scanner: ScannerFilters,
    #[serde(default)]
    pub oco: OcoConfig,
    #[serde(default)]
    pub fees: FeeSchedule,
    #[serde(default)]
    pub market_data: MarketDataSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Screening thresholds shared by the scanner and the recommender
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScannerFilters {
    #[serde(default = "default_min_dte")]
    pub min_dte: u32,
    #[serde(default = "default_max_dte")]
    pub max_dte: u32,
    #[serde(default = "default_min_ivr")]
    pub min_ivr: f64,
    #[serde(default = "default_preferred_ivr")]
    pub preferred_ivr: f64,
    #[serde(default = "default_target_delta")]
    pub target_delta: f64,
    /// Tolerance around `target_delta`
    #[serde(default = "default_delta_range")]
    pub delta_range: f64,
    /// Fraction of width, e.g. 0.05 = 5%
    #[serde(default = "default_min_credit_percent")]
    pub min_credit_percent: f64,
    #[serde(default = "default_max_credit_percent")]
    pub max_credit_percent: f64,
    #[serde(default = "default_spread_width")]
    pub spread_width: SpreadWidth,
}

impl Default for ScannerFilters {
    fn default() -> Self {
        Self {
            min_dte: default_min_dte(),
            max_dte: default_max_dte(),
            min_ivr: default_min_ivr(),
            preferred_ivr: default_preferred_ivr(),
            target_delta: default_target_delta(),
            delta_range: default_delta_range(),
            min_credit_percent: default_min_credit_percent(),
            max_credit_percent: default_max_credit_percent(),
            spread_width: default_spread_width(),
        }
    }
}

impl ScannerFilters {
    /// Return the filters if they satisfy every validation rule
    pub fn validated(self) -> Result<Self, ConfigError> {
        let mut report = ValidationReport::new();
        validate_filters(&self, &mut report);
        report.into_result().map(|_| self)
    }
}

/// Supported spread widths in dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "SpreadWidthRepr", into = "String")]
pub enum SpreadWidth {
    TwoAndAHalf,
    Five,
}

impl SpreadWidth {
    pub fn as_f64(&self) -> f64 {
        match self {
            SpreadWidth::TwoAndAHalf => 2.5,
            SpreadWidth::Five => 5.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpreadWidth::TwoAndAHalf => "2.5",
            SpreadWidth::Five => "5",
        }
    }
}

impl fmt::Display for SpreadWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SpreadWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2.5" => Ok(SpreadWidth::TwoAndAHalf),
            "5" | "5.0" => Ok(SpreadWidth::Five),
            other => Err(format!("unsupported spread width '{}': must be 2.5 or 5", other)),
        }
    }
}

impl From<SpreadWidth> for String {
    fn from(width: SpreadWidth) -> Self {
        width.as_str().to_string()
    }
}

/// Accepts both `"2.5"` and `2.5` in config files
#[derive(Deserialize)]
#[serde(untagged)]
enum SpreadWidthRepr {
    Text(String),
    Number(f64),
}

impl TryFrom<SpreadWidthRepr> for SpreadWidth {
    type Error = String;

    fn try_from(repr: SpreadWidthRepr) -> Result<Self, Self::Error> {
        match repr {
            SpreadWidthRepr::Text(s) => s.parse(),
            SpreadWidthRepr::Number(n) if n == 2.5 => Ok(SpreadWidth::TwoAndAHalf),
            SpreadWidthRepr::Number(n) if n == 5.0 => Ok(SpreadWidth::Five),
            SpreadWidthRepr::Number(n) => {
                Err(format!("unsupported spread width {}: must be 2.5 or 5", n))
            }
        }
    }
}

/// Exit bracket settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OcoConfig {
    /// Fraction of the credit at which profit is taken
    #[serde(default = "default_take_profit_percent")]
    pub take_profit_percent: f64,
    /// Multiple of the credit at which the position is stopped out
    #[serde(default = "default_stop_loss_multiplier")]
    pub stop_loss_multiplier: f64,
    /// Calendar days from today for the time stop
    #[serde(default = "default_time_stop_days")]
    pub time_stop_days: u32,
}

impl Default for OcoConfig {
    fn default() -> Self {
        Self {
            take_profit_percent: default_take_profit_percent(),
            stop_loss_multiplier: default_stop_loss_multiplier(),
            time_stop_days: default_time_stop_days(),
        }
    }
}

impl OcoConfig {
    pub fn new(
        take_profit_percent: f64,
        stop_loss_multiplier: f64,
        time_stop_days: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            take_profit_percent,
            stop_loss_multiplier,
            time_stop_days,
        };
        let mut report = ValidationReport::new();
        validate_oco(&config, &mut report);
        report.into_result().map(|_| config)
    }
}

/// Per-contract broker fee schedule
///
/// Futures overrides take precedence over index overrides, which take
/// precedence over the equity defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeeSchedule {
    #[serde(default = "default_commission_per_contract")]
    pub commission_per_contract: f64,
    #[serde(default = "default_clearing_fee_per_contract")]
    pub clearing_fee_per_contract: f64,
    #[serde(default = "default_orf_fee_per_contract")]
    pub orf_fee_per_contract: f64,
    #[serde(default = "default_taf_fee_per_contract")]
    pub taf_fee_per_contract: f64,
    #[serde(default)]
    pub index: Option<FeeOverride>,
    #[serde(default)]
    pub futures: Option<FeeOverride>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            commission_per_contract: default_commission_per_contract(),
            clearing_fee_per_contract: default_clearing_fee_per_contract(),
            orf_fee_per_contract: default_orf_fee_per_contract(),
            taf_fee_per_contract: default_taf_fee_per_contract(),
            index: None,
            futures: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeeOverride {
    #[serde(default = "default_commission_per_contract")]
    pub commission_per_contract: f64,
    #[serde(default = "default_clearing_fee_per_contract")]
    pub clearing_fee_per_contract: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataProviderKind {
    /// Snapshots and chains read from a JSON fixture file
    Static,
    /// Polygon.io last-trade quotes
    Polygon,
}

impl MarketDataProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketDataProviderKind::Static => "static",
            MarketDataProviderKind::Polygon => "polygon",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MarketDataSettings {
    #[serde(default = "default_provider_kind")]
    pub provider: MarketDataProviderKind,
    #[serde(default)]
    pub fixture_path: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_polygon_base_url")]
    pub base_url: String,
    /// Default scan universe
    #[serde(default)]
    pub tickers: Vec<String>,
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        Self {
            provider: default_provider_kind(),
            fixture_path: None,
            api_key: None,
            base_url: default_polygon_base_url(),
            tickers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}
