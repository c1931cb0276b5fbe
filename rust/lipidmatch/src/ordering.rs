//! Match priority: peaks ordered by descending abundance.

use crate::models::{
    NormalizedSpectrum,
    Peak,
};

/// Indices of `peaks` sorted by descending abundance.
///
/// The sort is stable, so equal abundances keep their input order.
///
/// ```
/// use lipidmatch::models::Peak;
/// use lipidmatch::ordering::priority_order;
///
/// let peaks: Vec<Peak> = [40.0, 100.0, 40.0]
///     .into_iter()
///     .map(|abundance| Peak { mz: 0.0, abundance, weight: 0.0 })
///     .collect();
/// assert_eq!(priority_order(&peaks), vec![1, 0, 2]);
/// ```
pub fn priority_order(peaks: &[Peak]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    // Abundances are validated to be finite before getting here.
    order.sort_by(|&a, &b| peaks[b].abundance.total_cmp(&peaks[a].abundance));
    order
}

/// A normalized spectrum paired with its priority order.
///
/// Built once for the fixed spectrum of a batch and reused for every partner.
#[derive(Debug, Clone)]
pub(crate) struct RankedSpectrum<'a> {
    spectrum: &'a NormalizedSpectrum,
    order: Vec<usize>,
}

impl<'a> RankedSpectrum<'a> {
    pub(crate) fn new(spectrum: &'a NormalizedSpectrum) -> Self {
        Self {
            spectrum,
            order: priority_order(spectrum.peaks()),
        }
    }

    pub(crate) fn spectrum(&self) -> &'a NormalizedSpectrum {
        self.spectrum
    }

    pub(crate) fn peaks(&self) -> &'a [Peak] {
        self.spectrum.peaks()
    }

    pub(crate) fn order(&self) -> &[usize] {
        &self.order
    }
}

/// The peaks of one spectrum still available for matching.
///
/// Claiming flips a marker instead of removing the index from the order, so
/// consumption is O(1) and positions stay valid for the rest of the run.
#[derive(Debug, Clone)]
pub struct PeakPool {
    order: Vec<usize>,
    claimed: Vec<bool>,
    num_claimed: usize,
}

impl PeakPool {
    pub fn new(peaks: &[Peak]) -> Self {
        Self::from_order(priority_order(peaks))
    }

    /// `order` must be a permutation of the peak indices.
    pub fn from_order(order: Vec<usize>) -> Self {
        Self {
            claimed: vec![false; order.len()],
            order,
            num_claimed: 0,
        }
    }

    /// Unclaimed peak indices in priority order.
    pub fn remaining(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied().filter(|&i| !self.claimed[i])
    }

    /// Marks a peak as used. Returns false if it was already claimed.
    pub fn claim(&mut self, idx: usize) -> bool {
        if self.claimed[idx] {
            return false;
        }
        self.claimed[idx] = true;
        self.num_claimed += 1;
        true
    }

    pub fn is_claimed(&self, idx: usize) -> bool {
        self.claimed[idx]
    }

    pub fn num_remaining(&self) -> usize {
        self.order.len() - self.num_claimed
    }

    pub fn is_exhausted(&self) -> bool {
        self.num_remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks(abundances: &[f64]) -> Vec<Peak> {
        abundances
            .iter()
            .enumerate()
            .map(|(i, &abundance)| Peak {
                mz: 100.0 + i as f64,
                abundance,
                weight: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_descending_with_stable_ties() {
        let p = peaks(&[10.0, 50.0, 100.0, 50.0, 10.0, 100.0]);
        let expected = vec![2, 5, 1, 3, 0, 4];
        for _ in 0..5 {
            assert_eq!(priority_order(&p), expected);
        }
    }

    #[test]
    fn test_empty() {
        assert!(priority_order(&[]).is_empty());
        let pool = PeakPool::new(&[]);
        assert!(pool.is_exhausted());
        assert_eq!(pool.remaining().count(), 0);
    }

    #[test]
    fn test_pool_claims_once() {
        let p = peaks(&[20.0, 100.0, 60.0]);
        let mut pool = PeakPool::new(&p);
        assert_eq!(pool.remaining().collect::<Vec<_>>(), vec![1, 2, 0]);

        assert!(pool.claim(2));
        assert!(!pool.claim(2));
        assert!(pool.is_claimed(2));
        assert_eq!(pool.num_remaining(), 2);
        assert_eq!(pool.remaining().collect::<Vec<_>>(), vec![1, 0]);

        pool.claim(1);
        pool.claim(0);
        assert!(pool.is_exhausted());
    }

    #[test]
    fn test_ranked_spectrum_reuses_order() {
        let spec = crate::normalize::normalize(&crate::Spectrum::with_abundances(
            vec![100.0, 200.0, 300.0],
            vec![20.0, 100.0, 60.0],
        ))
        .unwrap();
        let ranked = RankedSpectrum::new(&spec);
        assert_eq!(ranked.order(), &[1, 2, 0]);

        // Every pool built from the shared order starts fresh
        for _ in 0..2 {
            let mut pool = PeakPool::from_order(ranked.order().to_vec());
            assert_eq!(pool.remaining().collect::<Vec<_>>(), vec![1, 2, 0]);
            pool.claim(1);
            assert_eq!(pool.num_remaining(), 2);
        }
    }
}
