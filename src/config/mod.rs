//! Configuration for the preparation pipeline.
//!
//! Every literal the pipeline depends on (the developed-country list, the bin
//! edges, the zero-population policy and the accepted date formats) lives here
//! so callers and tests can substitute their own tables.

use std::collections::HashSet;

use crate::derive::binning::BinScheme;
use crate::error::{Error, Result};

pub use crate::derive::rates::RatePolicy;

/// Countries classified as "Developed"; everything else is "Developing"
pub const DEVELOPED_COUNTRIES: [&str; 20] = [
    "United States",
    "Japan",
    "Germany",
    "United Kingdom",
    "France",
    "Italy",
    "Canada",
    "Australia",
    "South Korea",
    "Netherlands",
    "Switzerland",
    "Sweden",
    "Belgium",
    "Austria",
    "Denmark",
    "Finland",
    "Norway",
    "Ireland",
    "New Zealand",
    "Singapore",
];

/// Environment variable the report binary reads the data path from
pub const DATA_PATH_ENV: &str = "DISASTER_DATA_PATH";

/// Configuration for date format handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates, in order
    pub date_formats: Vec<String>,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%d/%m/%Y".to_string(), // UK: 15/01/2023
                "%d-%m-%Y".to_string(), // European: 15-01-2023
                "%d.%m.%Y".to_string(), // 15.01.2023
                "%Y%m%d".to_string(),   // Compact: 20230115
            ],
        }
    }
}

impl DateFormatConfig {
    /// Parse a date using the first matching format
    #[must_use]
    pub fn parse(&self, value: &str) -> Option<chrono::NaiveDate> {
        let value = value.trim();
        self.date_formats
            .iter()
            .find_map(|format| chrono::NaiveDate::parse_from_str(value, format).ok())
    }
}

/// Configuration for the preparation pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Exact, case-sensitive names of developed countries
    pub developed_countries: Vec<String>,
    /// Partition of `response_time_hours`
    pub response_bins: BinScheme,
    /// Partition of `affected_population`
    pub scale_bins: BinScheme,
    /// What to do when `affected_population` is zero
    pub rate_policy: RatePolicy,
    /// Accepted formats for the `date` column
    pub date_formats: DateFormatConfig,
    /// CSV field delimiter
    pub delimiter: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            developed_countries: DEVELOPED_COUNTRIES.iter().map(ToString::to_string).collect(),
            response_bins: BinScheme::response_default(),
            scale_bins: BinScheme::scale_default(),
            rate_policy: RatePolicy::default(),
            date_formats: DateFormatConfig::default(),
            delimiter: b',',
        }
    }
}

impl PipelineConfig {
    /// Replace the developed-country list
    #[must_use]
    pub fn with_developed_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.developed_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the response-time partition
    #[must_use]
    pub fn with_response_bins(mut self, bins: BinScheme) -> Self {
        self.response_bins = bins;
        self
    }

    /// Replace the affected-population partition
    #[must_use]
    pub fn with_scale_bins(mut self, bins: BinScheme) -> Self {
        self.scale_bins = bins;
        self
    }

    /// Set the zero-population policy
    #[must_use]
    pub const fn with_rate_policy(mut self, policy: RatePolicy) -> Self {
        self.rate_policy = policy;
        self
    }

    /// Replace the accepted date formats
    #[must_use]
    pub fn with_date_formats(mut self, formats: DateFormatConfig) -> Self {
        self.date_formats = formats;
        self
    }

    /// Sets the field delimiter (e.g. `b'\t'` for TSV files)
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Check that the configuration can drive the pipeline
    ///
    /// Bin schemes are already checked by their constructors and are checked
    /// again here with the rest of the fields.
    pub fn validate(&self) -> Result<()> {
        self.response_bins.validate()?;
        self.scale_bins.validate()?;

        let mut seen = HashSet::new();
        for country in &self.developed_countries {
            if !seen.insert(country.as_str()) {
                log::debug!("Duplicate developed country '{country}' in configuration");
            }
        }

        if self.date_formats.date_formats.is_empty() {
            return Err(Error::config("at least one date format is required"));
        }

        Ok(())
    }
}
