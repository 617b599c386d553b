//! Developed / Developing classification by country name.
//!
//! Matching is an exact, case-sensitive lookup. Name variants are not
//! unified, so "USA" and "United States" classify differently, and any name
//! missing from the list is reported as Developing without a warning.

use rustc_hash::FxHashSet;

use crate::config::DEVELOPED_COUNTRIES;
use crate::models::DevelopmentStatus;

/// Classifies countries against a fixed developed-country set
#[derive(Debug, Clone)]
pub struct CountryClassifier {
    developed: FxHashSet<String>,
}

impl Default for CountryClassifier {
    fn default() -> Self {
        Self::new(DEVELOPED_COUNTRIES)
    }
}

impl CountryClassifier {
    /// Create a classifier from the names that count as developed
    pub fn new<I, S>(developed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            developed: developed.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `country` is in the developed set
    #[must_use]
    pub fn is_developed(&self, country: &str) -> bool {
        self.developed.contains(country)
    }

    /// Classify one country name
    #[must_use]
    pub fn classify(&self, country: &str) -> DevelopmentStatus {
        if self.is_developed(country) {
            DevelopmentStatus::Developed
        } else {
            DevelopmentStatus::Developing
        }
    }

    /// Number of names in the developed set
    #[must_use]
    pub fn len(&self) -> usize {
        self.developed.len()
    }

    /// Whether the developed set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.developed.is_empty()
    }
}
