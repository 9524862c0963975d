use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "master_config/spreadscan.yaml";

#[derive(Parser, Debug)]
#[command(name = "spreadscan")]
#[command(about = "SpreadScan - credit spread screening and trade evaluation")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Log output format; falls back to the config file, then pretty
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// Expose Prometheus metrics on this port
    #[arg(long, global = true)]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a ticker universe and print the ranked results
    Scan {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Comma-separated tickers; defaults to the configured universe
        #[arg(short, long, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build, price and gate a spread for one ticker
    Recommend {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        #[arg(short, long)]
        ticker: String,

        #[arg(short, long, value_enum)]
        side: SideArg,

        /// Days to expiry; defaults to the configured minimum
        #[arg(long)]
        dte: Option<u32>,

        /// Target short-leg delta magnitude; defaults to the configured target
        #[arg(long)]
        delta: Option<f64>,

        /// Spread width; defaults to the configured width
        #[arg(long)]
        width: Option<f64>,

        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print entry, exit and round-trip fees for a spread
    Fees {
        #[arg(short, long, value_enum)]
        side: SideArg,

        /// Number of spreads
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Use index option rates
        #[arg(long)]
        index: bool,

        /// Use futures option rates
        #[arg(long)]
        futures: bool,

        /// Read the fee schedule from this configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print take-profit, stop-loss and time-stop levels for a credit
    Oco {
        #[arg(long)]
        credit: f64,

        /// Fraction of the credit to take profit at
        #[arg(long)]
        take_profit: Option<f64>,

        /// Multiple of the credit to stop out at
        #[arg(long)]
        stop_loss: Option<f64>,

        /// Calendar days until the time stop
        #[arg(long)]
        time_stop_days: Option<u32>,
    },

    /// Validate configuration without scanning
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "spreadscan.yaml")]
        output: PathBuf,
    },
}

impl Commands {
    /// Configuration file the command reads, if any
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Scan { config, .. }
            | Commands::Recommend { config, .. }
            | Commands::Validate { config } => Some(config.as_path()),
            Commands::Fees { config, .. } => config.as_deref(),
            Commands::Oco { .. } | Commands::Init { .. } => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideArg {
    /// Bear call spread
    Call,
    /// Bull put spread
    Put,
}

impl SideArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideArg::Call => "call",
            SideArg::Put => "put",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_tickers_are_comma_separated() {
        let cli = Cli::try_parse_from(["spreadscan", "scan", "--tickers", "SPY,QQQ,AAPL"]).unwrap();

        match cli.command {
            Commands::Scan { tickers, config, json } => {
                assert_eq!(tickers, vec!["SPY", "QQQ", "AAPL"]);
                assert_eq!(config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "spreadscan",
            "recommend",
            "--ticker",
            "AAPL",
            "--side",
            "put",
            "--log-format",
            "json",
            "--metrics-port",
            "9100",
        ])
        .unwrap();

        assert_eq!(cli.log_format, Some(LogFormatArg::Json));
        assert_eq!(cli.metrics_port, Some(9100));
        match &cli.command {
            Commands::Recommend { side, dte, delta, .. } => {
                assert_eq!(*side, SideArg::Put);
                assert_eq!(*dte, None);
                assert_eq!(*delta, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(cli.command.config_path().is_some());
    }

    #[test]
    fn test_fees_and_oco() {
        let cli = Cli::try_parse_from(["spreadscan", "fees", "--side", "call", "-q", "3", "--index"]).unwrap();
        match &cli.command {
            Commands::Fees { quantity, index, futures, .. } => {
                assert_eq!(*quantity, 3);
                assert!(*index);
                assert!(!*futures);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(cli.command.config_path().is_none());

        assert!(Cli::try_parse_from(["spreadscan", "oco"]).is_err());
        assert!(Cli::try_parse_from(["spreadscan", "oco", "--credit", "0.35"]).is_ok());
    }
}
