//! Greedy one-to-one peak matching.
//!
//! One spectrum drives the walk (visited once, by priority) while the other
//! provides a pool of candidates that shrinks as peaks get claimed. The
//! [`MatchDirection`] decides which side drives and how a candidate is chosen:
//!
//! | direction        | driver  | candidate rule                        | on a miss |
//! |------------------|---------|---------------------------------------|-----------|
//! | `QueryDriven`    | query   | first acceptable, by priority         | continue  |
//! | `LibraryDriven`  | library | smallest absolute abundance deviation | stop      |
//!
//! Regardless of direction the acceptance test is always expressed from the
//! query side: `|query.mz - library.mz| < tol.mz` and
//! `query.abundance - library.abundance > -tol.abundance`.

use crate::models::{
    AlignmentTolerance,
    MatchDirection,
    Peak,
};
use crate::ordering::{
    PeakPool,
    RankedSpectrum,
};
use crate::scoring::ScoreAccumulator;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    First,
    SmallestAbundanceDeviation,
}

impl MatchDirection {
    fn selection(&self) -> Selection {
        match self {
            MatchDirection::QueryDriven => Selection::First,
            MatchDirection::LibraryDriven => Selection::SmallestAbundanceDeviation,
        }
    }

    fn stops_on_miss(&self) -> bool {
        matches!(self, MatchDirection::LibraryDriven)
    }
}

/// State left over after the greedy walk, consumed by the aggregation step.
#[derive(Debug)]
pub(crate) struct MatchOutcome {
    pub(crate) direction: MatchDirection,
    /// For each driver peak (input order) the claimed candidate, if any.
    pub(crate) partners: Vec<Option<usize>>,
    /// Candidate peaks nobody claimed stay here, in priority order.
    pub(crate) candidate_pool: PeakPool,
    pub(crate) accumulator: ScoreAccumulator,
}

struct GreedyMatcher<'a> {
    query: &'a RankedSpectrum<'a>,
    library: &'a RankedSpectrum<'a>,
    tolerance: &'a AlignmentTolerance,
    direction: MatchDirection,
}

impl<'a> GreedyMatcher<'a> {
    fn driver(&self) -> &'a RankedSpectrum<'a> {
        match self.direction {
            MatchDirection::QueryDriven => self.query,
            MatchDirection::LibraryDriven => self.library,
        }
    }

    fn candidates(&self) -> &'a RankedSpectrum<'a> {
        match self.direction {
            MatchDirection::QueryDriven => self.library,
            MatchDirection::LibraryDriven => self.query,
        }
    }

    /// Returns the (query, library) peaks for a (driver, candidate) index pair.
    #[inline]
    fn as_query_library(&self, driver_idx: usize, candidate_idx: usize) -> (&'a Peak, &'a Peak) {
        match self.direction {
            MatchDirection::QueryDriven => (
                &self.query.peaks()[driver_idx],
                &self.library.peaks()[candidate_idx],
            ),
            MatchDirection::LibraryDriven => (
                &self.query.peaks()[candidate_idx],
                &self.library.peaks()[driver_idx],
            ),
        }
    }

    #[inline]
    fn accepts(&self, query: &Peak, library: &Peak) -> bool {
        self.tolerance.mz_within(query.mz, library.mz)
            && self
                .tolerance
                .abundance_within(query.abundance - library.abundance)
    }

    fn select(&self, driver_idx: usize, pool: &PeakPool) -> Option<usize> {
        match self.direction.selection() {
            Selection::First => pool.remaining().find(|&c| {
                let (q, l) = self.as_query_library(driver_idx, c);
                self.accepts(q, l)
            }),
            Selection::SmallestAbundanceDeviation => {
                let mut best: Option<(usize, f64)> = None;
                for c in pool.remaining() {
                    let (q, l) = self.as_query_library(driver_idx, c);
                    if !self.accepts(q, l) {
                        continue;
                    }
                    let dev = (q.abundance - l.abundance).abs();
                    // Strict, so ties keep the higher priority candidate.
                    if best.is_none_or(|(_, best_dev)| dev < best_dev) {
                        best = Some((c, dev));
                    }
                }
                best.map(|(c, _)| c)
            }
        }
    }

    fn run(self) -> MatchOutcome {
        let driver = self.driver();
        let mut candidate_pool = PeakPool::from_order(self.candidates().order().to_vec());
        let mut partners = vec![None; driver.peaks().len()];
        let mut accumulator = ScoreAccumulator::default();

        for &driver_idx in driver.order() {
            if candidate_pool.is_exhausted() {
                break;
            }
            match self.select(driver_idx, &candidate_pool) {
                Some(candidate_idx) => {
                    candidate_pool.claim(candidate_idx);
                    partners[driver_idx] = Some(candidate_idx);

                    let (q, l) = self.as_query_library(driver_idx, candidate_idx);
                    accumulator.add_match(
                        q.abundance - l.abundance,
                        q.mz - l.mz,
                        l.weight,
                        self.tolerance,
                    );
                }
                None if self.direction.stops_on_miss() => {
                    trace!("No partner for driver peak {}, stopping", driver_idx);
                    break;
                }
                None => {}
            }
        }

        MatchOutcome {
            direction: self.direction,
            partners,
            candidate_pool,
            accumulator,
        }
    }
}

/// Runs the greedy walk between two ranked spectra.
pub(crate) fn greedy_match(
    query: &RankedSpectrum<'_>,
    library: &RankedSpectrum<'_>,
    tolerance: &AlignmentTolerance,
    direction: MatchDirection,
) -> MatchOutcome {
    GreedyMatcher {
        query,
        library,
        tolerance,
        direction,
    }
    .run()
}
