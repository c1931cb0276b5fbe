use crate::matching::MatchOutcome;
use crate::models::{
    AlignmentResult,
    Correspondence,
    MatchDirection,
    NormalizedSpectrum,
    PeakPair,
};

/// Turns the leftovers of a greedy walk into the final result.
///
/// Library peaks that were never claimed are charged their full weight, and
/// the correspondence table gets one row per driver peak (input order)
/// followed by one row per unclaimed candidate (priority order).
pub(crate) fn aggregate(outcome: MatchOutcome, library: &NormalizedSpectrum) -> AlignmentResult {
    let MatchOutcome {
        direction,
        partners,
        candidate_pool,
        mut accumulator,
    } = outcome;

    match direction {
        MatchDirection::QueryDriven => {
            for l in candidate_pool.remaining() {
                accumulator.add_unmatched_library(library.peaks()[l].weight);
            }
        }
        MatchDirection::LibraryDriven => {
            for (l, partner) in partners.iter().enumerate() {
                if partner.is_none() {
                    accumulator.add_unmatched_library(library.peaks()[l].weight);
                }
            }
        }
    }

    let as_pair = |driver: Option<usize>, candidate: Option<usize>| {
        let driver = driver.map(|x| x + 1);
        let candidate = candidate.map(|x| x + 1);
        match direction {
            MatchDirection::QueryDriven => PeakPair {
                q_id: driver,
                l_id: candidate,
            },
            MatchDirection::LibraryDriven => PeakPair {
                q_id: candidate,
                l_id: driver,
            },
        }
    };

    let mut pairs = Vec::with_capacity(partners.len() + candidate_pool.num_remaining());
    pairs.extend(
        partners
            .iter()
            .enumerate()
            .map(|(d, partner)| as_pair(Some(d), *partner)),
    );
    pairs.extend(candidate_pool.remaining().map(|c| as_pair(None, Some(c))));

    // Library weights sum to one, so both score forms agree.
    debug_assert!(
        (accumulator.score() - accumulator.gain_score()).abs() < 1e-6,
        "penalty score {} != gain score {}",
        accumulator.score(),
        accumulator.gain_score()
    );

    AlignmentResult {
        correspondence: Correspondence { pairs },
        score: accumulator.score(),
        deviation_mz: accumulator.mean_mz_deviation(),
        npeak: accumulator.npeak(),
    }
}
