use std::path::PathBuf;

use crate::currency::{Currency, Locale};

pub const DATA_PATH_ENV: &str = "BIKE_DATA_PATH";
pub const DEFAULT_DATA_PATH: &str = "all_data.csv";
pub const DEFAULT_UNIT_PRICE: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_path: PathBuf,
    pub currency: Currency,
    pub locale: Locale,
    /// Revenue per rental used for the estimated revenue metric.
    pub unit_price: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            currency: Currency::Aud,
            locale: Locale::EsCo,
            unit_price: DEFAULT_UNIT_PRICE,
        }
    }
}

impl Settings {
    /// An explicit path wins, then `BIKE_DATA_PATH`, then the default file name.
    pub fn resolve_data_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(DATA_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
    }
}

/// Accepts a finite, non-negative price per rental.
pub fn parse_unit_price(value: &str) -> Result<f64, String> {
    let price: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(format!("unit price must be a finite non-negative number, got '{value}'"));
    }
    Ok(price)
}
