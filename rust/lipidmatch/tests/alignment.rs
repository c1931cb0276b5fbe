use lipidmatch::normalize::normalize;
use lipidmatch::{
    AlignmentResult,
    AlignmentTolerance,
    MatchDirection,
    Spectrum,
    SpectrumAligner,
    align,
};
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

const DIRECTIONS: [MatchDirection; 2] = [MatchDirection::QueryDriven, MatchDirection::LibraryDriven];

fn aligner(direction: MatchDirection) -> SpectrumAligner {
    SpectrumAligner::new(AlignmentTolerance::default(), direction).unwrap()
}

fn align_one(direction: MatchDirection, query: &Spectrum, library: &Spectrum) -> AlignmentResult {
    let mut out = aligner(direction)
        .align(query, std::slice::from_ref(library))
        .unwrap();
    out.pop().unwrap().unwrap()
}

/// Peaks at least 1 Da apart so only the intended partners can match.
fn random_spectrum(rng: &mut ChaCha8Rng, npeaks: usize, mz_offset: f64) -> Spectrum {
    let mut mz = 100.0 + mz_offset;
    let mut mzs = Vec::with_capacity(npeaks);
    let mut ints = Vec::with_capacity(npeaks);
    for _ in 0..npeaks {
        mz += rng.gen_range(1.0..20.0f64).round();
        mzs.push(mz);
        ints.push(rng.gen_range(1.0..10_000.0));
    }
    Spectrum::with_intensities(mzs, ints)
}

fn assert_well_formed(res: &AlignmentResult, nquery: usize, nlibrary: usize) {
    assert!(res.npeak <= nquery.min(nlibrary));
    assert!((0.0..=100.0).contains(&res.score), "score {}", res.score);

    let q_ids: Vec<usize> = res.correspondence.q_ids().flatten().collect();
    let l_ids: Vec<usize> = res.correspondence.l_ids().flatten().collect();
    assert_eq!(q_ids.iter().collect::<HashSet<_>>().len(), q_ids.len());
    assert_eq!(l_ids.iter().collect::<HashSet<_>>().len(), l_ids.len());

    // Every peak on both sides is accounted for
    assert_eq!(q_ids.len(), nquery);
    assert_eq!(l_ids.len(), nlibrary);
    assert!(q_ids.iter().all(|&i| i >= 1 && i <= nquery));
    assert!(l_ids.iter().all(|&i| i >= 1 && i <= nlibrary));

    assert_eq!(res.correspondence.matched().count(), res.npeak);
    assert_eq!(res.deviation_mz.is_none(), res.npeak == 0);
}

#[test]
fn test_documented_example() {
    let query = Spectrum::with_abundances(vec![100.00, 150.00], vec![80.0, 100.0]);
    let library = Spectrum::with_abundances(vec![100.02, 150.00], vec![75.0, 100.0]);

    let results = align(
        &query,
        std::slice::from_ref(&library),
        AlignmentTolerance::default(),
    )
    .unwrap();
    let res = results[0].as_ref().unwrap();

    assert_eq!(res.npeak, 2);
    // Signed: the query peak is lighter than the library one
    let dev = res.deviation_mz.unwrap();
    assert!((dev.abs() - 0.01).abs() < 1e-6, "Expected ~0.01, got {}", dev);
    assert!(dev < 0.0);
    // Only the 100 m/z pair deviates: 5 / 25 * 75 / 175
    let expected = 100.0 * (1.0 - 0.2 * 75.0 / 175.0);
    assert!((res.score - expected).abs() < 1e-6);
    assert!(res.score > 90.0);
    assert_eq!(
        res.correspondence.matched().collect::<Vec<_>>(),
        vec![(1, 1), (2, 2)]
    );

    // Same numbers when the library drives
    let res = align_one(MatchDirection::LibraryDriven, &query, &library);
    assert_eq!(res.npeak, 2);
    assert!((res.score - expected).abs() < 1e-6);
}

#[test]
fn test_identity() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for npeaks in [1, 2, 5, 20, 50] {
        let spec = random_spectrum(&mut rng, npeaks, 0.0);
        for direction in DIRECTIONS {
            let res = align_one(direction, &spec, &spec.clone());
            assert_well_formed(&res, npeaks, npeaks);
            assert_eq!(res.npeak, npeaks);
            assert!((res.score - 100.0).abs() < 1e-9, "score {}", res.score);
            assert_eq!(res.deviation_mz, Some(0.0));
            for (q, l) in res.correspondence.matched() {
                assert_eq!(q, l);
            }
        }
    }
}

#[test]
fn test_disjoint() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for npeaks in [1, 3, 10] {
        let library = random_spectrum(&mut rng, npeaks, 0.0);
        // Integer steps plus half a Da keeps every peak 0.5 away from the library
        let query = random_spectrum(&mut rng, npeaks + 2, 0.5);
        for direction in DIRECTIONS {
            let res = align_one(direction, &query, &library);
            assert_well_formed(&res, npeaks + 2, npeaks);
            assert_eq!(res.npeak, 0);
            assert_eq!(res.deviation_mz, None);
            assert!(res.score.abs() < 1e-9);
            assert_eq!(res.correspondence.len(), 2 * npeaks + 2);
        }
    }
}

#[test]
fn test_random_pairs_are_well_formed() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    for _ in 0..200 {
        let nquery = rng.gen_range(1..30);
        let nlibrary = rng.gen_range(1..30);
        // Dense m/z values so that plenty of pairs compete for each other
        let query_mz: Vec<f64> = (0..nquery).map(|_| rng.gen_range(100.0..101.0)).collect();
        let query_ab: Vec<f64> = (0..nquery).map(|_| rng.gen_range(0.0..100.0)).collect();
        let library_mz: Vec<f64> = (0..nlibrary).map(|_| rng.gen_range(100.0..101.0)).collect();
        let library_ab: Vec<f64> = (0..nlibrary).map(|_| rng.gen_range(0.1..100.0)).collect();
        let query = Spectrum::with_intensities(query_mz, query_ab);
        let library = Spectrum::with_abundances(library_mz, library_ab);
        if query.validate().is_err() {
            continue;
        }
        for direction in DIRECTIONS {
            let res = align_one(direction, &query, &library);
            assert_well_formed(&res, nquery, nlibrary);
        }
    }
}

#[test]
fn test_weights_sum_to_one() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for npeaks in 1..40 {
        let norm = normalize(&random_spectrum(&mut rng, npeaks, 0.0)).unwrap();
        let total: f64 = norm.weights().sum();
        assert!((total - 1.0).abs() < 1e-4);
        let max = norm.abundances().fold(f64::MIN, f64::max);
        assert!((max - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_score_decreases_with_abundance_deviation() {
    let library = Spectrum::with_abundances(vec![100.0, 200.0], vec![100.0, 50.0]);
    let mut last = f64::INFINITY;
    for abd in [50.0, 55.0, 60.0, 70.0, 90.0, 100.0] {
        let query = Spectrum::with_abundances(vec![100.0, 200.0], vec![100.0, abd]);
        let res = align_one(MatchDirection::QueryDriven, &query, &library);
        assert_eq!(res.npeak, 2);
        assert!(res.score <= last, "{} > {}", res.score, last);
        last = res.score;
    }
    // Deviations above the tolerance are capped: 50 * 1/3 weight lost
    assert!((last - 100.0 * (1.0 - 50.0 / 150.0)).abs() < 1e-9);
}

#[test]
fn test_score_decreases_with_unmatched_library_peaks() {
    let query = Spectrum::with_abundances(vec![100.0, 200.0, 300.0], vec![100.0, 60.0, 30.0]);
    for direction in DIRECTIONS {
        let mut last = f64::INFINITY;
        // Move library peaks out of reach, least abundant first
        for nmoved in 0..=3 {
            let mz: Vec<f64> = [300.0, 200.0, 100.0]
                .iter()
                .enumerate()
                .map(|(i, mz)| if i < nmoved { mz + 1.5 } else { *mz })
                .collect();
            let library = Spectrum::with_abundances(mz, vec![30.0, 60.0, 100.0]);
            let res = align_one(direction, &query, &library);
            assert_eq!(res.npeak, 3 - nmoved);
            assert!(res.score < last || (nmoved == 0 && res.score == 100.0));
            last = res.score;
        }
    }
}

#[test]
fn test_tie_break_is_deterministic() {
    // Two identical peaks in the query compete for a single library peak,
    // the one listed first always wins.
    let query = Spectrum::with_abundances(vec![100.0, 100.01, 100.02], vec![50.0, 50.0, 50.0]);
    let library = Spectrum::with_abundances(vec![100.01], vec![50.0]);
    for direction in DIRECTIONS {
        let first = align_one(direction, &query, &library);
        assert_eq!(first.correspondence.matched().collect::<Vec<_>>(), vec![(1, 1)]);
        for _ in 0..10 {
            assert_eq!(align_one(direction, &query, &library), first);
        }
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let query = random_spectrum(&mut rng, 15, 0.0);
    let candidates: Vec<Spectrum> = (0..64)
        .map(|i| {
            if i % 2 == 0 {
                query.clone()
            } else {
                random_spectrum(&mut rng, 10, 0.0)
            }
        })
        .collect();
    for direction in DIRECTIONS {
        let aligner = aligner(direction);
        assert_eq!(
            aligner.align(&query, &candidates).unwrap(),
            aligner.align_par(&query, &candidates).unwrap()
        );
    }
}
