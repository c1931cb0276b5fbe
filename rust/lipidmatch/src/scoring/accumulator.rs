//! Running sums collected while peaks get matched.

use crate::models::AlignmentTolerance;

const MAX_SCORE: f64 = 100.0;

/// Per-alignment accumulator.
///
/// Two score forms are tracked:
/// - `penalty`: clamped abundance deviation of every match plus the full
///   weight of every library peak left unmatched. Score is `100 * (1 - penalty)`.
/// - `gain`: `(1 - clamped deviation)` of every match. Score is `100 * gain`.
///
/// Since library weights sum to one both forms give the same number, up to
/// rounding. The penalty form is the one reported.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScoreAccumulator {
    penalty: f64,
    gain: f64,
    mz_deviation_sum: f64,
    npeak: usize,
}

impl ScoreAccumulator {
    /// Records an accepted pair.
    ///
    /// `abundance_deviation` is `query - library` and `mz_deviation` is
    /// `query.mz - library.mz`, both signed.
    pub fn add_match(
        &mut self,
        abundance_deviation: f64,
        mz_deviation: f64,
        library_weight: f64,
        tolerance: &AlignmentTolerance,
    ) {
        let clamped = abundance_deviation.abs().min(tolerance.abundance) / tolerance.abundance;
        self.penalty += clamped * library_weight;
        self.gain += (1.0 - clamped) * library_weight;
        // Kept signed so the mean shows systematic calibration drift.
        self.mz_deviation_sum += mz_deviation;
        self.npeak += 1;
    }

    /// A library peak nobody claimed counts as maximally wrong.
    pub fn add_unmatched_library(&mut self, library_weight: f64) {
        self.penalty += library_weight;
    }

    pub fn npeak(&self) -> usize {
        self.npeak
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn score(&self) -> f64 {
        (MAX_SCORE * (1.0 - self.penalty)).clamp(0.0, MAX_SCORE)
    }

    pub(crate) fn gain_score(&self) -> f64 {
        (MAX_SCORE * self.gain).clamp(0.0, MAX_SCORE)
    }

    pub fn mean_mz_deviation(&self) -> Option<f64> {
        if self.npeak == 0 {
            return None;
        }
        Some(self.mz_deviation_sum / self.npeak as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_accumulator() {
        let acc = ScoreAccumulator::default();
        assert_eq!(acc.score(), 100.0);
        assert_eq!(acc.mean_mz_deviation(), None);
        assert_eq!(acc.npeak(), 0);
    }

    #[test]
    fn test_deviation_is_clamped() {
        let tol = AlignmentTolerance::default();
        let mut acc = ScoreAccumulator::default();
        // Query far more abundant than the library, capped at the tolerance
        acc.add_match(90.0, 0.01, 0.5, &tol);
        acc.add_match(0.0, -0.03, 0.5, &tol);
        assert!((acc.penalty() - 0.5).abs() < 1e-12);
        assert!((acc.score() - 50.0).abs() < 1e-9);
        assert!((acc.gain_score() - 50.0).abs() < 1e-9);
        assert!((acc.mean_mz_deviation().unwrap() + 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_unmatched_library_peaks_are_full_penalty() {
        let tol = AlignmentTolerance::default();
        let mut acc = ScoreAccumulator::default();
        acc.add_match(12.5, 0.0, 0.6, &tol);
        acc.add_unmatched_library(0.4);
        // 0.5 * 0.6 + 0.4
        assert!((acc.score() - 30.0).abs() < 1e-9);
        assert!((acc.gain_score() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_bounded() {
        let mut acc = ScoreAccumulator::default();
        acc.add_unmatched_library(0.7);
        acc.add_unmatched_library(0.300_000_000_1);
        assert_eq!(acc.score(), 0.0);
    }
}
