//! Batch level counters.

use crate::errors::AlignmentError;
use crate::models::AlignmentResult;
use serde::Serialize;

/// Tally of how the candidates of a batch ended up.
///
/// # Example
///
/// ```ignore
/// let results = aligner.align_par(&query, &candidates)?;
/// let metrics: AlignmentMetrics = results.iter().collect();
/// println!("{} rejected", metrics.num_rejected);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignmentMetrics {
    /// Candidates that went through the matcher.
    pub num_aligned: usize,
    /// Aligned candidates with no matched peak (undefined m/z deviation).
    pub num_degenerate: usize,
    /// Candidates refused before matching.
    pub num_rejected: usize,
}

impl AlignmentMetrics {
    pub fn record(&mut self, result: &Result<AlignmentResult, AlignmentError>) {
        match result {
            Ok(res) => {
                self.num_aligned += 1;
                if res.is_degenerate() {
                    self.num_degenerate += 1;
                }
            }
            Err(_) => self.num_rejected += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.num_aligned + self.num_rejected
    }
}

impl std::ops::AddAssign for AlignmentMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.num_aligned += rhs.num_aligned;
        self.num_degenerate += rhs.num_degenerate;
        self.num_rejected += rhs.num_rejected;
    }
}

impl<'a> FromIterator<&'a Result<AlignmentResult, AlignmentError>> for AlignmentMetrics {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = &'a Result<AlignmentResult, AlignmentError>>,
    {
        iter.into_iter().fold(Self::default(), |mut acc, x| {
            acc.record(x);
            acc
        })
    }
}
