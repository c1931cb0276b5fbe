//! Relative abundance scaling and per-peak weights.

use crate::errors::InvalidSpectrumError;
use crate::models::{
    Intensities,
    NormalizedSpectrum,
    Peak,
    Spectrum,
};

const MAX_ABUNDANCE: f64 = 100.0;

/// Rescales raw intensities so the most intense peak sits at 100.
///
/// Callers are expected to have rejected empty input and a non-positive
/// maximum already.
pub fn convert_to_abundance(intensities: &[f64]) -> Vec<f64> {
    let max_int = intensities.iter().copied().fold(f64::MIN, f64::max);
    intensities
        .iter()
        .map(|x| x / max_int * MAX_ABUNDANCE)
        .collect()
}

/// `abundance[i] / sum(abundance)`
pub fn weights(abundances: &[f64]) -> Vec<f64> {
    let total: f64 = abundances.iter().sum();
    abundances.iter().map(|x| x / total).collect()
}

/// Validates and normalizes a spectrum.
///
/// Example:
/// ```
/// use lipidmatch::Spectrum;
/// use lipidmatch::normalize::normalize;
///
/// let spec = Spectrum::with_intensities(vec![100.0, 150.0], vec![500.0, 1000.0]);
/// let norm = normalize(&spec).unwrap();
/// let abd: Vec<f64> = norm.abundances().collect();
/// assert_eq!(abd, vec![50.0, 100.0]);
/// ```
pub fn normalize(spectrum: &Spectrum) -> Result<NormalizedSpectrum, InvalidSpectrumError> {
    spectrum.validate()?;

    let abundances = match &spectrum.intensities {
        Intensities::Abundance(x) => x.clone(),
        Intensities::Raw(x) => convert_to_abundance(x),
    };
    let weights = weights(&abundances);

    let peaks = spectrum
        .mz
        .iter()
        .zip(abundances)
        .zip(weights)
        .map(|((&mz, abundance), weight)| Peak {
            mz,
            abundance,
            weight,
        })
        .collect();

    Ok(NormalizedSpectrum { peaks })
}
