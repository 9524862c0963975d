use crate::*;
use thiserror::Error;

/// Upper bound on a screening DTE window
pub const MAX_SCREEN_DTE: u32 = 45;

const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("min_dte must be between 1 and 45 days, got {0}")]
    MinDteOutOfRange(u32),

    #[error("max_dte ({max}) must be greater than or equal to min_dte ({min})")]
    MaxDteBelowMinDte { min: u32, max: u32 },

    #[error("{field} must be between 0 and 100, got {value}")]
    InvalidPercentageRange { field: String, value: f64 },

    #[error("preferred_ivr ({preferred}) must be greater than or equal to min_ivr ({min})")]
    PreferredIvrBelowMinIvr { min: f64, preferred: f64 },

    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidUnitRange { field: String, value: f64 },

    #[error("max_credit_percent ({max}) must be greater than or equal to min_credit_percent ({min})")]
    MaxCreditBelowMinCredit { min: f64, max: f64 },

    #[error("stop_loss_multiplier must be at least 1, got {0}")]
    InvalidStopLossMultiplier(f64),

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("{field} must be a non-negative amount, got {value}")]
    NegativeFee { field: String, value: f64 },

    #[error("market_data.fixture_path is required for the static provider")]
    MissingFixturePath,

    #[error("market_data.api_key is required for the polygon provider")]
    MissingApiKey,

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },

    #[error("Invalid log format '{0}'. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),
}

/// Configuration rejected at construction time
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ConfigError::Invalid(errors) => errors,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self.errors))
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &AppConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_filters(&config.scanner, &mut report);
    validate_oco(&config.oco, &mut report);
    validate_fees(&config.fees, &mut report);
    validate_market_data(&config.market_data, &mut report);
    validate_logging(&config.logging, &mut report);

    report
}

fn check_unit_range(field: &str, value: f64, report: &mut ValidationReport) {
    if !(0.0..=1.0).contains(&value) {
        report.add_error(ValidationError::InvalidUnitRange {
            field: field.to_string(),
            value,
        });
    }
}

fn check_percentage_range(field: &str, value: f64, report: &mut ValidationReport) {
    if !(0.0..=100.0).contains(&value) {
        report.add_error(ValidationError::InvalidPercentageRange {
            field: field.to_string(),
            value,
        });
    }
}

pub fn validate_filters(filters: &ScannerFilters, report: &mut ValidationReport) {
    if filters.min_dte < 1 || filters.min_dte > MAX_SCREEN_DTE {
        report.add_error(ValidationError::MinDteOutOfRange(filters.min_dte));
    }

    if filters.max_dte < filters.min_dte {
        report.add_error(ValidationError::MaxDteBelowMinDte {
            min: filters.min_dte,
            max: filters.max_dte,
        });
    } else if filters.max_dte > MAX_SCREEN_DTE {
        report.add_warning(
            "scanner.max_dte",
            &format!("max_dte above {} days is outside the short-dated playbook", MAX_SCREEN_DTE),
        );
    }

    check_percentage_range("min_ivr", filters.min_ivr, report);
    check_percentage_range("preferred_ivr", filters.preferred_ivr, report);

    if filters.preferred_ivr < filters.min_ivr {
        report.add_error(ValidationError::PreferredIvrBelowMinIvr {
            min: filters.min_ivr,
            preferred: filters.preferred_ivr,
        });
    }

    check_unit_range("target_delta", filters.target_delta, report);
    check_unit_range("delta_range", filters.delta_range, report);
    check_unit_range("min_credit_percent", filters.min_credit_percent, report);
    check_unit_range("max_credit_percent", filters.max_credit_percent, report);

    if filters.max_credit_percent < filters.min_credit_percent {
        report.add_error(ValidationError::MaxCreditBelowMinCredit {
            min: filters.min_credit_percent,
            max: filters.max_credit_percent,
        });
    }
}

pub fn validate_oco(oco: &OcoConfig, report: &mut ValidationReport) {
    check_unit_range("take_profit_percent", oco.take_profit_percent, report);

    if oco.stop_loss_multiplier.is_nan() || oco.stop_loss_multiplier < 1.0 {
        report.add_error(ValidationError::InvalidStopLossMultiplier(
            oco.stop_loss_multiplier,
        ));
    }

    if oco.time_stop_days == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "time_stop_days".to_string(),
        });
    }
}

pub fn validate_fees(fees: &FeeSchedule, report: &mut ValidationReport) {
    let mut amounts = vec![
        ("fees.commission_per_contract", fees.commission_per_contract),
        ("fees.clearing_fee_per_contract", fees.clearing_fee_per_contract),
        ("fees.orf_fee_per_contract", fees.orf_fee_per_contract),
        ("fees.taf_fee_per_contract", fees.taf_fee_per_contract),
    ];
    if let Some(index) = &fees.index {
        amounts.push(("fees.index.commission_per_contract", index.commission_per_contract));
        amounts.push(("fees.index.clearing_fee_per_contract", index.clearing_fee_per_contract));
    }
    if let Some(futures) = &fees.futures {
        amounts.push(("fees.futures.commission_per_contract", futures.commission_per_contract));
        amounts.push(("fees.futures.clearing_fee_per_contract", futures.clearing_fee_per_contract));
    }

    for (field, value) in amounts {
        if !value.is_finite() || value < 0.0 {
            report.add_error(ValidationError::NegativeFee {
                field: field.to_string(),
                value,
            });
        }
    }
}

fn validate_market_data(settings: &MarketDataSettings, report: &mut ValidationReport) {
    match settings.provider {
        MarketDataProviderKind::Static => {
            if settings.fixture_path.as_deref().map_or(true, str::is_empty) {
                report.add_error(ValidationError::MissingFixturePath);
            }
        }
        MarketDataProviderKind::Polygon => match settings.api_key.as_deref() {
            None | Some("") => report.add_error(ValidationError::MissingApiKey),
            Some(key) if has_unresolved_env_vars(key) => {
                report.add_error(ValidationError::InvalidEnvVar {
                    var: key
                        .trim_start_matches('$')
                        .trim_matches(|c| c == '{' || c == '}')
                        .to_string(),
                    message: "market_data.api_key placeholder was not substituted".to_string(),
                });
            }
            Some(_) => {}
        },
    }

    if settings.tickers.is_empty() {
        report.add_warning(
            "market_data.tickers",
            "No default tickers configured; pass --tickers to scan",
        );
    }
}

fn validate_logging(logging: &LoggingSettings, report: &mut ValidationReport) {
    let format = logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}
