mod peak;
mod results;
mod spectrum;
mod tolerance;

pub use peak::{
    NormalizedSpectrum,
    Peak,
};
pub use results::{
    AlignmentResult,
    Correspondence,
    PeakPair,
};
pub use spectrum::{
    Intensities,
    Spectrum,
};
pub use tolerance::{
    AlignmentTolerance,
    MatchDirection,
};
