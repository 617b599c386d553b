use std::fmt;

/// Coarse two-class partition of countries used for aggregate comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DevelopmentStatus {
    Developed,
    Developing,
}

impl DevelopmentStatus {
    /// Both statuses in display order
    pub const ALL: [Self; 2] = [Self::Developed, Self::Developing];

    /// Label stored in the `status` column
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Developed => "Developed",
            Self::Developing => "Developing",
        }
    }

    /// Parse a stored label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == label)
    }
}

impl fmt::Display for DevelopmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
