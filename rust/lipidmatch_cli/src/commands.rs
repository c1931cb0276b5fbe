use std::time::Instant;
use tracing::{
    info,
    instrument,
};

use lipidmatch::SpectrumAligner;

use crate::cli::{
    AlignArgs,
    WriteTemplateArgs,
};
use crate::config::Config;
use crate::error::CliError;
use crate::output::ResultSink;
use crate::processing::align_all;
use crate::spectra_io::read_spectra_file;

/// Main function for the 'align' subcommand.
#[instrument(skip_all)]
pub fn main_align(args: AlignArgs) -> Result<(), CliError> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| CliError::Config(format!("Unable to set up {} threads: {}", threads, e)))?;
    }

    let config = Config::with_cli_args(&args)?.resolve()?;
    info!("Using tolerance settings: {:#?}", config.analysis.tolerance);
    let aligner = SpectrumAligner::new(config.analysis.tolerance, config.analysis.direction)?;

    let start = Instant::now();
    info!("Loading query spectra from {}", config.query_file.display());
    let queries = read_spectra_file(&config.query_file)?;
    info!("Loading library spectra from {}", config.library_file.display());
    let library = read_spectra_file(&config.library_file)?;
    info!(
        "Loaded {} query and {} library spectra in {:?}",
        queries.len(),
        library.len(),
        start.elapsed()
    );

    std::fs::create_dir_all(&config.output.directory)?;
    let out_path = config
        .output
        .directory
        .join(format!("results.{}", config.output.format.extension()));
    let mut sink = ResultSink::create(&out_path, config.output.format)?;
    let metrics = align_all(&aligner, &queries, &library, &mut sink)?;
    sink.finish()?;

    let metrics_path = config.output.directory.join("metrics.json");
    std::fs::write(&metrics_path, serde_json::to_string_pretty(&metrics)?)?;
    info!(
        "Wrote results to {} and metrics to {}",
        out_path.display(),
        metrics_path.display()
    );
    Ok(())
}

const CONFIG_TEMPLATE: &str = r#"{
  "input": {
    "query_file": "query_spectra_template.json",
    "library_file": "library_spectra_template.ndjson"
  },
  "analysis": {
    "tolerance": { "mz": 0.05, "abundance": 25.0 },
    "direction": "query_driven"
  },
  "output": {
    "directory": "lipidmatch_results",
    "format": "pretty_json"
  }
}"#;

const QUERY_SPECTRA_TEMPLATE: &str = r#"[
    {
        "id": "scan_1042",
        "mz": [184.0733, 496.3398, 524.3711, 760.5851],
        "int": [15230.0, 4120.0, 980.0, 22810.0]
    },
    {
        "id": "scan_1043",
        "mz": [184.0733, 760.5851],
        "abd": [100.0, 35.5]
    }
]"#;

const LIBRARY_SPECTRA_TEMPLATE: &str = r#"{"id": "PC 34:1 [M+H]+", "mz": [184.0733, 496.3398, 760.5851], "abd": [65.0, 20.0, 100.0]}
{"id": "PC 36:2 [M+H]+", "mz": [184.0733, 522.3554, 786.6007], "abd": [70.0, 15.0, 100.0]}
"#;

/// Main function for the 'write-template' subcommand.
pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let target_dir = args.output_path;
    std::fs::create_dir_all(&target_dir)?;

    let config_path = target_dir.join("config_template.json");
    std::fs::write(&config_path, CONFIG_TEMPLATE)?;
    println!("Wrote config template to: {}", config_path.display());

    let query_path = target_dir.join("query_spectra_template.json");
    let library_path = target_dir.join("library_spectra_template.ndjson");
    std::fs::write(&query_path, QUERY_SPECTRA_TEMPLATE)?;
    std::fs::write(&library_path, LIBRARY_SPECTRA_TEMPLATE)?;
    println!(
        "Wrote spectra templates to:\n- {}\n- {}",
        query_path.display(),
        library_path.display()
    );
    Ok(())
}
