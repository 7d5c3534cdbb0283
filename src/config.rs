use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::engine::{DEFAULT_HISTOGRAM_BINS, DEFAULT_TOP_N, EngineOptions};
use crate::data::filter::FilterSpec;
use crate::data::model::Bounds;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("--headless needs a data file to evaluate")]
    HeadlessWithoutPath,
    #[error("--{0} must be at least 1")]
    ZeroLimit(&'static str),
}

/// Command line of the dashboard binary.
#[derive(Debug, Parser)]
#[command(version, about = "Restaurant-delivery analytics dashboard")]
pub struct Cli {
    /// Listings file (.csv, .json or .parquet). Can also be opened from the GUI.
    pub path: Option<PathBuf>,

    /// Rows kept in the top restaurants table.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Bins per histogram.
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Print a JSON summary to stdout instead of opening a window.
    #[arg(long)]
    pub headless: bool,

    #[arg(long, requires = "headless")]
    pub city: Option<String>,
    #[arg(long, requires = "headless")]
    pub area: Option<String>,
    #[arg(long, requires = "headless")]
    pub food_type: Option<String>,
    #[arg(long, requires = "headless", requires = "rating_max")]
    pub rating_min: Option<f64>,
    #[arg(long, requires = "headless", requires = "rating_min")]
    pub rating_max: Option<f64>,
    #[arg(long, requires = "headless", requires = "price_max")]
    pub price_min: Option<f64>,
    #[arg(long, requires = "headless", requires = "price_min")]
    pub price_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    Gui,
    /// Evaluate once with these filters and print the result.
    Headless(FilterSpec),
}

/// Validated configuration handed to the state and engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: Option<PathBuf>,
    pub engine: EngineOptions,
    pub mode: RunMode,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: None,
            engine: EngineOptions::default(),
            mode: RunMode::Gui,
        }
    }
}

impl TryFrom<Cli> for DashboardConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.top_n == 0 {
            return Err(ConfigError::ZeroLimit("top-n"));
        }
        if cli.bins == 0 {
            return Err(ConfigError::ZeroLimit("bins"));
        }
        if cli.headless && cli.path.is_none() {
            return Err(ConfigError::HeadlessWithoutPath);
        }

        let mode = if cli.headless {
            RunMode::Headless(FilterSpec {
                rating_range: range(cli.rating_min, cli.rating_max),
                price_range: range(cli.price_min, cli.price_max),
                city: cli.city,
                area: cli.area,
                food_type: cli.food_type,
            })
        } else {
            RunMode::Gui
        };

        Ok(DashboardConfig {
            data_path: cli.path,
            engine: EngineOptions {
                top_n: cli.top_n,
                histogram_bins: cli.bins,
            },
            mode,
        })
    }
}

/// Both ends are enforced by clap; a lone bound never reaches here.
fn range(min: Option<f64>, max: Option<f64>) -> Option<Bounds> {
    Some(Bounds::new(min?, max?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<DashboardConfig, ConfigError> {
        let argv = std::iter::once("delivery-dashboard").chain(args.iter().copied());
        DashboardConfig::try_from(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.engine.top_n, 100);
        assert_eq!(cfg.engine.histogram_bins, 20);
    }

    #[test]
    fn headless_filters() {
        let cfg = config(&[
            "listings.csv",
            "--headless",
            "--city",
            "Delhi",
            "--rating-min",
            "4",
            "--rating-max",
            "5",
            "--price-min",
            "100",
            "--price-max",
            "300",
        ])
        .unwrap();
        let RunMode::Headless(spec) = cfg.mode else {
            panic!("expected headless mode");
        };
        assert_eq!(spec.city.as_deref(), Some("Delhi"));
        assert_eq!(spec.rating_range, Some(Bounds::new(4.0, 5.0)));
        assert_eq!(spec.price_range, Some(Bounds::new(100.0, 300.0)));
        assert_eq!(spec.area, None);
    }

    #[test]
    fn invalid_combinations() {
        assert_eq!(config(&["--headless"]), Err(ConfigError::HeadlessWithoutPath));
        assert_eq!(config(&["--top-n", "0"]), Err(ConfigError::ZeroLimit("top-n")));
        assert!(Cli::try_parse_from(["delivery-dashboard", "--city", "Delhi"]).is_err());
    }

    #[test]
    fn lone_range_bound_is_rejected() {
        let lone_min = ["delivery-dashboard", "x.csv", "--headless", "--rating-min", "4"];
        assert!(Cli::try_parse_from(lone_min).is_err());
        let lone_max = ["delivery-dashboard", "x.csv", "--headless", "--price-max", "300"];
        assert!(Cli::try_parse_from(lone_max).is_err());
    }
}
