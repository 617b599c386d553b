//! Fixed-edge interval partitioning.
//!
//! A [`BinScheme`] holds the lower edge and label of every bin. Bin `i`
//! covers `[edges[i], edges[i + 1])`; the last bin runs up to the terminal
//! edge, which is either unbounded or resolved from the data as
//! `max + 1`. Values below the first edge (and NaN) fall into no bin.

use crate::error::{Error, Result};

/// Upper bound of the last bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEdge {
    /// Last bin is `[edge, ∞)`
    Unbounded,
    /// Last bin is `[edge, max + 1)` where `max` is the largest observed value
    DataMaxPlusOne,
}

/// Ordered, left-inclusive partition of a numeric column into labelled bins
#[derive(Debug, Clone, PartialEq)]
pub struct BinScheme {
    edges: Vec<f64>,
    labels: Vec<String>,
    terminal: TerminalEdge,
}

impl BinScheme {
    /// Create a scheme from lower edges and labels
    ///
    /// # Errors
    /// Returns `Error::Config` when the lists are empty or of different
    /// lengths, when an edge is not finite, when edges are not strictly
    /// increasing, or when a label repeats.
    pub fn new<S: Into<String>>(
        edges: Vec<f64>,
        labels: Vec<S>,
        terminal: TerminalEdge,
    ) -> Result<Self> {
        let scheme = Self {
            edges,
            labels: labels.into_iter().map(Into::into).collect(),
            terminal,
        };
        scheme.validate()?;
        Ok(scheme)
    }

    /// `<6h`, `6-24h`, `24-72h`, `>72h`
    #[must_use]
    pub fn response_default() -> Self {
        Self {
            edges: vec![0.0, 6.0, 24.0, 72.0],
            labels: ["<6h", "6-24h", "24-72h", ">72h"]
                .map(String::from)
                .to_vec(),
            terminal: TerminalEdge::Unbounded,
        }
    }

    /// `<12h`, `12-24h`, `>24h`
    #[must_use]
    pub fn response_coarse() -> Self {
        Self {
            edges: vec![0.0, 12.0, 24.0],
            labels: ["<12h", "12-24h", ">24h"].map(String::from).to_vec(),
            terminal: TerminalEdge::Unbounded,
        }
    }

    /// `<100k`, `100k-1M`, `1M-5M`, `>5M (Mega-event)`, closed at `max + 1`
    #[must_use]
    pub fn scale_default() -> Self {
        Self {
            edges: vec![0.0, 100_000.0, 1_000_000.0, 5_000_000.0],
            labels: ["<100k", "100k-1M", "1M-5M", ">5M (Mega-event)"]
                .map(String::from)
                .to_vec(),
            terminal: TerminalEdge::DataMaxPlusOne,
        }
    }

    /// Lower edges, one per bin
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Labels in bin order
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// How the last bin is closed
    #[must_use]
    pub const fn terminal(&self) -> TerminalEdge {
        self.terminal
    }

    /// Check the scheme's structural invariants
    pub fn validate(&self) -> Result<()> {
        if self.edges.is_empty() {
            return Err(Error::config("bin scheme needs at least one edge"));
        }
        if self.edges.len() != self.labels.len() {
            return Err(Error::config(format!(
                "bin scheme has {} edges but {} labels",
                self.edges.len(),
                self.labels.len()
            )));
        }
        if let Some(edge) = self.edges.iter().find(|edge| !edge.is_finite()) {
            return Err(Error::config(format!("bin edge {edge} is not finite")));
        }
        if let Some(pair) = self.edges.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(Error::config(format!(
                "bin edges must be strictly increasing, found {} before {}",
                pair[0], pair[1]
            )));
        }
        for (i, label) in self.labels.iter().enumerate() {
            if self.labels[..i].contains(label) {
                return Err(Error::config(format!("duplicate bin label '{label}'")));
            }
        }
        Ok(())
    }

    /// Fix the terminal edge against the values about to be binned
    ///
    /// For [`TerminalEdge::DataMaxPlusOne`] the upper bound is `max + 1`,
    /// raised to the last lower edge when the data never reaches it so the
    /// edges stay monotonic (the last bin is then empty).
    #[must_use]
    pub fn resolve<I>(&self, values: I) -> ResolvedBins<'_>
    where
        I: IntoIterator<Item = f64>,
    {
        let last_edge = self.edges[self.edges.len() - 1];
        let upper = match self.terminal {
            TerminalEdge::Unbounded => f64::INFINITY,
            TerminalEdge::DataMaxPlusOne => values
                .into_iter()
                .filter(|v| !v.is_nan())
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
                .map_or(last_edge, |max| (max + 1.0).max(last_edge)),
        };
        ResolvedBins {
            scheme: self,
            upper,
        }
    }
}

/// A [`BinScheme`] whose terminal edge has been fixed
#[derive(Debug, Clone, Copy)]
pub struct ResolvedBins<'a> {
    scheme: &'a BinScheme,
    upper: f64,
}

impl ResolvedBins<'_> {
    /// Exclusive upper bound of the last bin
    #[must_use]
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    /// Index of the bin containing `value`
    #[must_use]
    pub fn index_of(&self, value: f64) -> Option<usize> {
        let edges = &self.scheme.edges;
        if value.is_nan() || value < edges[0] || value >= self.upper {
            return None;
        }
        // Number of lower edges <= value; at least 1 since value >= edges[0]
        Some(edges.partition_point(|edge| *edge <= value) - 1)
    }

    /// Label of the bin containing `value`
    #[must_use]
    pub fn label_of(&self, value: f64) -> Option<&str> {
        self.index_of(value)
            .map(|idx| self.scheme.labels[idx].as_str())
    }
}
