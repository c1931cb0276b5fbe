#![doc = include_str!("../README.md")]

pub mod aligner;
pub mod errors;
mod matching;
pub mod models;
pub mod normalize;
pub mod ordering;
pub mod scoring;

pub use aligner::{
    SpectrumAligner,
    align,
};
pub use errors::{
    AlignmentError,
    ConfigurationError,
    InvalidSpectrumError,
};
pub use models::{
    AlignmentResult,
    AlignmentTolerance,
    Correspondence,
    Intensities,
    MatchDirection,
    NormalizedSpectrum,
    PeakPair,
    Spectrum,
};
pub use scoring::AlignmentMetrics;
