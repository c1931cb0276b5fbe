use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub mz: f64,
    /// Relative abundance, 0-100.
    pub abundance: f64,
    /// Fraction of the total abundance of the spectrum this peak belongs to.
    pub weight: f64,
}

/// A validated spectrum with abundances and weights filled in.
///
/// Only obtainable through [`crate::normalize::normalize`], which is what
/// allows the matcher to assume finite values and weights summing to one.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSpectrum {
    pub(crate) peaks: Vec<Peak>,
}

impl NormalizedSpectrum {
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn abundances(&self) -> impl Iterator<Item = f64> + '_ {
        self.peaks.iter().map(|p| p.abundance)
    }

    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.peaks.iter().map(|p| p.weight)
    }
}
