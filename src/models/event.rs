//! Event records before and after preparation.

use chrono::NaiveDate;

use crate::models::DevelopmentStatus;

/// One disaster occurrence as read from the input file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawEvent {
    pub event_id: String,
    pub date: NaiveDate,
    pub year: i32,
    pub country: String,
    pub event_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub affected_population: u64,
    pub deaths: u64,
    pub injuries: u64,
    pub duration_days: f64,
    pub infrastructure_damage_score: f64,
    pub economic_impact_million_usd: f64,
    pub international_aid_million_usd: f64,
    pub response_time_hours: f64,
}

/// A raw event together with its derived fields
///
/// Derived values are kept next to, never in place of, the raw ones.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedEvent {
    pub event: RawEvent,
    pub death_rate: f64,
    pub injury_rate: f64,
    pub status: DevelopmentStatus,
    /// `None` when the response time lies outside the configured bins
    pub response_bin: Option<String>,
    /// `None` when the population lies outside the configured bins
    pub scale: Option<String>,
}
