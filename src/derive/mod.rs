//! Derived fields computed from raw event records.
//!
//! Each submodule is a pure function of already-validated input and writes
//! to its own output column, so re-running a step never re-bins a binned value.

pub mod binning;
pub mod classify;
pub mod rates;

pub use binning::{BinScheme, ResolvedBins, TerminalEdge};
pub use classify::CountryClassifier;
pub use rates::{RateDerivation, RatePolicy, Rates, derive_rates};
