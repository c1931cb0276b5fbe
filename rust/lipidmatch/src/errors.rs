use thiserror::Error;

/// Reasons a spectrum is refused before normalization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidSpectrumError {
    #[error("spectrum has no peaks")]
    Empty,

    #[error("column lengths differ: {mz} m/z values but {intensity} intensity values")]
    MismatchedLengths { mz: usize, intensity: usize },

    #[error("non-finite value {value} in column '{column}' at index {index}")]
    NonFiniteValue {
        column: &'static str,
        index: usize,
        value: f64,
    },

    #[error("negative intensity {value} at index {index}")]
    NegativeIntensity { index: usize, value: f64 },

    #[error("total abundance must be positive, got {total}")]
    NonPositiveTotal { total: f64 },

    #[error("total abundance overflows ({total}), rescale the 'abd' column")]
    TotalOverflow { total: f64 },

    #[error("spectrum has neither an 'abd' nor an 'int' column")]
    MissingIntensities,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("tolerance '{name}' must be positive and finite, got {value}")]
    NonPositiveTolerance { name: &'static str, value: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    #[error("invalid spectrum: {0}")]
    InvalidSpectrum(#[from] InvalidSpectrumError),

    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, AlignmentError>;
