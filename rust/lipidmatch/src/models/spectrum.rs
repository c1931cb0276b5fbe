use crate::errors::InvalidSpectrumError;
use serde::{
    Deserialize,
    Serialize,
};

/// The intensity column of a spectrum, as handed over by the caller.
///
/// `Abundance` values are already on the 0-100 relative scale and are used
/// verbatim. `Raw` values get rescaled so the most intense peak is 100.
#[derive(Debug, Clone, PartialEq)]
pub enum Intensities {
    Abundance(Vec<f64>),
    Raw(Vec<f64>),
}

impl Intensities {
    pub fn values(&self) -> &[f64] {
        match self {
            Intensities::Abundance(x) => x,
            Intensities::Raw(x) => x,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

/// A spectrum in caller input order.
///
/// Serialized with the column names used by the tabular sources (`mz` plus
/// `abd` or `int`). When a record carries both, `abd` wins.
/// ```
/// use lipidmatch::{Intensities, Spectrum};
///
/// let spec = Spectrum::with_intensities(vec![100.0, 150.0], vec![2000.0, 4000.0]);
/// assert!(matches!(spec.intensities, Intensities::Raw(_)));
/// assert_eq!(spec.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpectrumColumns", into = "SpectrumColumns")]
pub struct Spectrum {
    pub mz: Vec<f64>,
    pub intensities: Intensities,
}

/// Wire layout of [`Spectrum`].
#[derive(Debug, Serialize, Deserialize)]
struct SpectrumColumns {
    mz: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abd: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    int: Option<Vec<f64>>,
}

impl TryFrom<SpectrumColumns> for Spectrum {
    type Error = InvalidSpectrumError;

    fn try_from(x: SpectrumColumns) -> Result<Self, Self::Error> {
        let intensities = match (x.abd, x.int) {
            (Some(abd), _) => Intensities::Abundance(abd),
            (None, Some(int)) => Intensities::Raw(int),
            (None, None) => return Err(InvalidSpectrumError::MissingIntensities),
        };
        Ok(Self {
            mz: x.mz,
            intensities,
        })
    }
}

impl From<Spectrum> for SpectrumColumns {
    fn from(x: Spectrum) -> Self {
        let (abd, int) = match x.intensities {
            Intensities::Abundance(v) => (Some(v), None),
            Intensities::Raw(v) => (None, Some(v)),
        };
        SpectrumColumns { mz: x.mz, abd, int }
    }
}

impl Spectrum {
    pub fn with_abundances(mz: Vec<f64>, abundances: Vec<f64>) -> Self {
        Self {
            mz,
            intensities: Intensities::Abundance(abundances),
        }
    }

    pub fn with_intensities(mz: Vec<f64>, intensities: Vec<f64>) -> Self {
        Self {
            mz,
            intensities: Intensities::Raw(intensities),
        }
    }

    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    /// Checks everything the normalizer relies on.
    ///
    /// A spectrum that passes is guaranteed to produce finite abundances
    /// and weights.
    pub fn validate(&self) -> Result<(), InvalidSpectrumError> {
        if self.mz.is_empty() && self.intensities.is_empty() {
            return Err(InvalidSpectrumError::Empty);
        }
        if self.mz.len() != self.intensities.len() {
            return Err(InvalidSpectrumError::MismatchedLengths {
                mz: self.mz.len(),
                intensity: self.intensities.len(),
            });
        }

        if let Some((index, value)) = first_non_finite(&self.mz) {
            return Err(InvalidSpectrumError::NonFiniteValue {
                column: "mz",
                index,
                value,
            });
        }

        let (column, values) = match &self.intensities {
            Intensities::Abundance(x) => ("abd", x),
            Intensities::Raw(x) => ("int", x),
        };
        if let Some((index, value)) = first_non_finite(values) {
            return Err(InvalidSpectrumError::NonFiniteValue {
                column,
                index,
                value,
            });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v < 0.0) {
            return Err(InvalidSpectrumError::NegativeIntensity { index, value });
        }

        // Values are finite and non-negative here. Raw values are divided by
        // their maximum, which caps every abundance at 100 and keeps the sum
        // finite, so only the maximum needs checking.
        match &self.intensities {
            Intensities::Raw(x) => {
                let max = x.iter().copied().fold(0.0, f64::max);
                if !(max > 0.0) {
                    return Err(InvalidSpectrumError::NonPositiveTotal { total: 0.0 });
                }
            }
            Intensities::Abundance(x) => {
                let total: f64 = x.iter().sum();
                if !(total > 0.0) {
                    return Err(InvalidSpectrumError::NonPositiveTotal { total });
                }
                if !total.is_finite() {
                    return Err(InvalidSpectrumError::TotalOverflow { total });
                }
            }
        }
        Ok(())
    }
}

fn first_non_finite(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
        .map(|(i, v)| (i, *v))
}
