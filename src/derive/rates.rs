//! Death and injury rates as a percentage of the affected population.

/// Handling of records whose `affected_population` is zero
///
/// Whatever the policy, the same input always produces the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatePolicy {
    /// Both rates become NaN and the record is kept
    #[default]
    PropagateNan,
    /// Both rates become 0.0 and the record is kept
    ClampToZero,
    /// The record is dropped from the prepared table
    RejectRecord,
}

/// Derived rates for one record, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    /// `deaths / affected_population * 100`
    pub death_rate: f64,
    /// `injuries / affected_population * 100`
    pub injury_rate: f64,
}

/// Outcome of rate derivation for one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateDerivation {
    /// Population was positive
    Derived(Rates),
    /// Population was zero and the policy substituted a value
    Recovered(Rates),
    /// Population was zero and the policy drops the record
    Rejected,
}

impl RateDerivation {
    /// Rates to store, if the record is kept
    #[must_use]
    pub const fn rates(&self) -> Option<Rates> {
        match self {
            Self::Derived(rates) | Self::Recovered(rates) => Some(*rates),
            Self::Rejected => None,
        }
    }

    /// Whether the zero-population anomaly was hit
    #[must_use]
    pub const fn is_anomaly(&self) -> bool {
        !matches!(self, Self::Derived(_))
    }
}

/// `part / whole * 100`, or `None` when `whole` is zero
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_of(part: u64, whole: u64) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

/// Derive both rates for one record under `policy`
#[must_use]
pub fn derive_rates(
    deaths: u64,
    injuries: u64,
    affected_population: u64,
    policy: RatePolicy,
) -> RateDerivation {
    match (
        percent_of(deaths, affected_population),
        percent_of(injuries, affected_population),
    ) {
        (Some(death_rate), Some(injury_rate)) => RateDerivation::Derived(Rates {
            death_rate,
            injury_rate,
        }),
        _ => match policy {
            RatePolicy::PropagateNan => RateDerivation::Recovered(Rates {
                death_rate: f64::NAN,
                injury_rate: f64::NAN,
            }),
            RatePolicy::ClampToZero => RateDerivation::Recovered(Rates {
                death_rate: 0.0,
                injury_rate: 0.0,
            }),
            RatePolicy::RejectRecord => RateDerivation::Rejected,
        },
    }
}
