//! Column names of the raw input and of the prepared table.

pub const EVENT_ID: &str = "event_id";
pub const DATE: &str = "date";
pub const YEAR: &str = "year";
pub const COUNTRY: &str = "country";
pub const EVENT_TYPE: &str = "event_type";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const AFFECTED_POPULATION: &str = "affected_population";
pub const DEATHS: &str = "deaths";
pub const INJURIES: &str = "injuries";
pub const DURATION_DAYS: &str = "duration_days";
pub const INFRASTRUCTURE_DAMAGE_SCORE: &str = "infrastructure_damage_score";
pub const ECONOMIC_IMPACT: &str = "economic_impact_million_usd";
pub const INTERNATIONAL_AID: &str = "international_aid_million_usd";
pub const RESPONSE_TIME_HOURS: &str = "response_time_hours";

pub const DEATH_RATE: &str = "death_rate_%";
pub const INJURY_RATE: &str = "injury_rate_%";
pub const STATUS: &str = "status";
pub const RESPONSE_BIN: &str = "response_bin";
pub const SCALE: &str = "scale";

/// Columns the input file must provide; `year` is optional
pub const REQUIRED: [&str; 14] = [
    EVENT_ID,
    DATE,
    COUNTRY,
    EVENT_TYPE,
    LATITUDE,
    LONGITUDE,
    AFFECTED_POPULATION,
    DEATHS,
    INJURIES,
    DURATION_DAYS,
    INFRASTRUCTURE_DAMAGE_SCORE,
    ECONOMIC_IMPACT,
    INTERNATIONAL_AID,
    RESPONSE_TIME_HOURS,
];
