use indicatif::{
    ProgressIterator,
    ProgressStyle,
};
use lipidmatch::{
    AlignmentMetrics,
    AlignmentResult,
    MatchDirection,
    Spectrum,
    SpectrumAligner,
};
use std::io::Write;
use std::time::Instant;
use tracing::{
    debug,
    info,
    instrument,
    warn,
};

use crate::error::CliError;
use crate::output::{
    ResultRecord,
    ResultSink,
};
use crate::spectra_io::LabeledSpectrum;

/// Aligns every query against every library entry and streams the records.
///
/// With the query driven direction each query is the fixed spectrum and the
/// whole library is aligned against it (in parallel). The library driven
/// direction flips that around. Records are always labeled by
/// (query id, library id).
#[instrument(skip_all)]
pub fn align_all<W: Write>(
    aligner: &SpectrumAligner,
    queries: &[LabeledSpectrum],
    library: &[LabeledSpectrum],
    sink: &mut ResultSink<W>,
) -> Result<AlignmentMetrics, CliError> {
    let (fixed, others) = match aligner.direction() {
        MatchDirection::QueryDriven => (queries, library),
        MatchDirection::LibraryDriven => (library, queries),
    };
    info!(
        "Aligning {} queries against {} library spectra ({:?})",
        queries.len(),
        library.len(),
        aligner.direction()
    );

    let other_spectra: Vec<Spectrum> = others.iter().map(|x| x.spectrum.clone()).collect();
    let mut metrics = AlignmentMetrics::default();
    let start = Instant::now();
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map_err(|e| CliError::Config(e.to_string()))?;

    for fixed_elem in fixed.iter().progress_with_style(style) {
        let label = |other: &'_ LabeledSpectrum| -> (String, String) {
            match aligner.direction() {
                MatchDirection::QueryDriven => (fixed_elem.id.clone(), other.id.clone()),
                MatchDirection::LibraryDriven => (other.id.clone(), fixed_elem.id.clone()),
            }
        };

        let batch = match aligner.direction() {
            MatchDirection::QueryDriven => aligner.align_par(&fixed_elem.spectrum, &other_spectra),
            MatchDirection::LibraryDriven => {
                aligner.align_library_par(&fixed_elem.spectrum, &other_spectra)
            }
        };

        let results: Vec<Result<AlignmentResult, _>> = match batch {
            Ok(x) => x,
            Err(e) => {
                warn!("Skipping spectrum '{}': {}", fixed_elem.id, e);
                for other in others {
                    let (q, l) = label(other);
                    sink.write(&ResultRecord::failed(&q, &l, &e))?;
                    metrics.num_rejected += 1;
                }
                continue;
            }
        };

        for (other, res) in others.iter().zip(results.iter()) {
            let (q, l) = label(other);
            if let Err(e) = res {
                warn!("Skipping pair ('{}', '{}'): {}", q, l, e);
            }
            sink.write(&ResultRecord::new(&q, &l, res))?;
            metrics.record(res);
        }

        if let Some(best) = results
            .iter()
            .zip(others.iter())
            .filter_map(|(r, o)| r.as_ref().ok().map(|r| (r.score, &o.id)))
            .max_by(|a, b| a.0.total_cmp(&b.0))
        {
            debug!("Best partner for '{}': '{}' ({:.2})", fixed_elem.id, best.1, best.0);
        }
    }

    info!(
        "Aligned {} pairs ({} without matches, {} rejected) in {:?}",
        metrics.total(),
        metrics.num_degenerate,
        metrics.num_rejected,
        start.elapsed()
    );
    Ok(metrics)
}
