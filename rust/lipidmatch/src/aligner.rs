use crate::errors::{
    AlignmentError,
    Result,
};
use crate::matching::greedy_match;
use crate::models::{
    AlignmentResult,
    AlignmentTolerance,
    MatchDirection,
    NormalizedSpectrum,
    Spectrum,
};
use crate::normalize::normalize;
use crate::ordering::RankedSpectrum;
use crate::scoring::aggregate::aggregate;
use rayon::prelude::*;
use tracing::{
    debug,
    instrument,
    warn,
};

/// Which role the single, fixed spectrum of a batch plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixedSide {
    Query,
    Library,
}

/// Aligns spectra with a fixed tolerance and matching direction.
///
/// The aligner itself holds no per-alignment state, every call builds its
/// own peak pools, so it can be shared freely across threads.
///
/// ```
/// use lipidmatch::{AlignmentTolerance, MatchDirection, Spectrum, SpectrumAligner};
///
/// let aligner =
///     SpectrumAligner::new(AlignmentTolerance::default(), MatchDirection::QueryDriven).unwrap();
/// let query = Spectrum::with_abundances(vec![100.0, 150.0], vec![80.0, 100.0]);
/// let library = Spectrum::with_abundances(vec![100.02, 150.0], vec![75.0, 100.0]);
///
/// let results = aligner.align(&query, &[library]).unwrap();
/// let res = results[0].as_ref().unwrap();
/// assert_eq!(res.npeak, 2);
/// assert!(res.score > 90.0 && res.score < 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumAligner {
    tolerance: AlignmentTolerance,
    direction: MatchDirection,
}

impl Default for SpectrumAligner {
    fn default() -> Self {
        Self {
            tolerance: AlignmentTolerance::default(),
            direction: MatchDirection::default(),
        }
    }
}

impl SpectrumAligner {
    pub fn new(tolerance: AlignmentTolerance, direction: MatchDirection) -> Result<Self> {
        tolerance.validate()?;
        Ok(Self {
            tolerance,
            direction,
        })
    }

    pub fn tolerance(&self) -> &AlignmentTolerance {
        &self.tolerance
    }

    pub fn direction(&self) -> MatchDirection {
        self.direction
    }

    /// Aligns one normalized pair. Pure and infallible.
    pub fn align_pair(
        &self,
        query: &NormalizedSpectrum,
        library: &NormalizedSpectrum,
    ) -> AlignmentResult {
        self.align_ranked(&RankedSpectrum::new(query), &RankedSpectrum::new(library))
    }

    fn align_ranked(
        &self,
        query: &RankedSpectrum<'_>,
        library: &RankedSpectrum<'_>,
    ) -> AlignmentResult {
        let outcome = greedy_match(query, library, &self.tolerance, self.direction);
        aggregate(outcome, library.spectrum())
    }

    /// Aligns one query against every library candidate.
    ///
    /// The outer error is only returned when the query itself is invalid.
    /// Candidates fail individually, in the same order as the input.
    #[instrument(skip_all, fields(num_candidates = candidates.len()))]
    pub fn align(
        &self,
        query: &Spectrum,
        candidates: &[Spectrum],
    ) -> Result<Vec<Result<AlignmentResult>>> {
        let query = normalize(query)?;
        let ranked = RankedSpectrum::new(&query);
        Ok(candidates
            .iter()
            .enumerate()
            .map(|(i, c)| self.align_against(&ranked, FixedSide::Query, c, i))
            .collect())
    }

    /// Parallel version of [`SpectrumAligner::align`], same output order.
    #[instrument(skip_all, fields(num_candidates = candidates.len()))]
    pub fn align_par(
        &self,
        query: &Spectrum,
        candidates: &[Spectrum],
    ) -> Result<Vec<Result<AlignmentResult>>> {
        let query = normalize(query)?;
        let ranked = RankedSpectrum::new(&query);
        Ok(candidates
            .par_iter()
            .enumerate()
            .map(|(i, c)| self.align_against(&ranked, FixedSide::Query, c, i))
            .collect())
    }

    /// Aligns one library spectrum against many queries.
    #[instrument(skip_all, fields(num_queries = queries.len()))]
    pub fn align_library(
        &self,
        library: &Spectrum,
        queries: &[Spectrum],
    ) -> Result<Vec<Result<AlignmentResult>>> {
        let library = normalize(library)?;
        let ranked = RankedSpectrum::new(&library);
        Ok(queries
            .iter()
            .enumerate()
            .map(|(i, q)| self.align_against(&ranked, FixedSide::Library, q, i))
            .collect())
    }

    /// Parallel version of [`SpectrumAligner::align_library`].
    #[instrument(skip_all, fields(num_queries = queries.len()))]
    pub fn align_library_par(
        &self,
        library: &Spectrum,
        queries: &[Spectrum],
    ) -> Result<Vec<Result<AlignmentResult>>> {
        let library = normalize(library)?;
        let ranked = RankedSpectrum::new(&library);
        Ok(queries
            .par_iter()
            .enumerate()
            .map(|(i, q)| self.align_against(&ranked, FixedSide::Library, q, i))
            .collect())
    }

    fn align_against(
        &self,
        fixed: &RankedSpectrum<'_>,
        side: FixedSide,
        other: &Spectrum,
        position: usize,
    ) -> Result<AlignmentResult> {
        let normalized = normalize(other).map_err(|e| {
            warn!("Skipping spectrum {}: {}", position, e);
            AlignmentError::from(e)
        })?;
        let other = RankedSpectrum::new(&normalized);
        let res = match side {
            FixedSide::Query => self.align_ranked(fixed, &other),
            FixedSide::Library => self.align_ranked(&other, fixed),
        };
        debug!(
            "Spectrum {}: score={:.3} npeak={} deviation_mz={:?}",
            position, res.score, res.npeak, res.deviation_mz
        );
        Ok(res)
    }
}

/// Aligns `query` against each candidate using the default (query driven)
/// direction.
pub fn align(
    query: &Spectrum,
    candidates: &[Spectrum],
    tolerance: AlignmentTolerance,
) -> Result<Vec<Result<AlignmentResult>>> {
    SpectrumAligner::new(tolerance, MatchDirection::default())?.align(query, candidates)
}
