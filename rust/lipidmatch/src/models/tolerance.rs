use crate::errors::ConfigurationError;
use serde::{
    Deserialize,
    Serialize,
};

/// Tolerances used to decide whether two peaks correspond.
///
/// Example:
/// ```
/// use lipidmatch::AlignmentTolerance;
///
/// let tolerance = AlignmentTolerance::default();
/// assert_eq!(tolerance.mz, 0.05);
/// assert_eq!(tolerance.abundance, 25.0);
/// ```
///
/// Both windows are exclusive: a pair is accepted only if the absolute m/z
/// difference is strictly below `mz` and the abundance deficit
/// (`query - library`) is strictly above `-abundance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentTolerance {
    /// Absolute m/z window, in Da.
    #[serde(default = "default_mz_tolerance")]
    pub mz: f64,
    /// Abundance window, in relative abundance units (0-100 scale).
    #[serde(default = "default_abundance_tolerance")]
    pub abundance: f64,
}

fn default_mz_tolerance() -> f64 {
    0.05
}

fn default_abundance_tolerance() -> f64 {
    25.0
}

impl Default for AlignmentTolerance {
    fn default() -> Self {
        Self {
            mz: default_mz_tolerance(),
            abundance: default_abundance_tolerance(),
        }
    }
}

impl AlignmentTolerance {
    pub fn new(mz: f64, abundance: f64) -> Result<Self, ConfigurationError> {
        let out = Self { mz, abundance };
        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [("mz", self.mz), ("abundance", self.abundance)] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigurationError::NonPositiveTolerance { name, value });
            }
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn mz_within(&self, query_mz: f64, library_mz: f64) -> bool {
        (query_mz - library_mz).abs() < self.mz
    }

    #[inline]
    pub(crate) fn abundance_within(&self, deficit: f64) -> bool {
        deficit > -self.abundance
    }
}

/// Which spectrum drives the greedy walk.
///
/// - `QueryDriven`: query peaks are visited by priority, each one takes the
///   first library peak (by priority) inside both windows. Exhaustive.
/// - `LibraryDriven`: library peaks are visited by priority, each one takes
///   the query peak with the smallest abundance deviation inside both windows.
///   Stops at the first library peak without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchDirection {
    #[default]
    #[serde(rename = "query_driven")]
    QueryDriven,
    #[serde(rename = "library_driven")]
    LibraryDriven,
}
