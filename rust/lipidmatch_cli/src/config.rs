use lipidmatch::{
    AlignmentTolerance,
    MatchDirection,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

use crate::cli::{
    AlignArgs,
    SerializationFormat,
};
use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct InputConfig {
    pub query_file: Option<PathBuf>,
    pub library_file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub tolerance: AlignmentTolerance,
    #[serde(default)]
    pub direction: MatchDirection,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
    #[serde(default)]
    pub format: SerializationFormat,
}

/// A config where every required piece is known.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub query_file: PathBuf,
    pub library_file: PathBuf,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let conf = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Unable to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&conf)?)
    }

    /// Loads the config file (if any) and lets command line flags take precedence.
    pub fn with_cli_args(args: &AlignArgs) -> Result<Self, CliError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let input = config.input.get_or_insert_with(InputConfig::default);
        if let Some(query_file) = &args.query_file {
            input.query_file = Some(query_file.clone());
        }
        if let Some(library_file) = &args.library_file {
            input.library_file = Some(library_file.clone());
        }
        if let Some(direction) = args.direction {
            config.analysis.direction = direction.into();
        }
        if let Some(output_dir) = &args.output_dir {
            let format = config.output.as_ref().map(|x| x.format).unwrap_or_default();
            config.output = Some(OutputConfig {
                directory: output_dir.clone(),
                format,
            });
        }
        if let Some(format) = args.format {
            if let Some(output) = config.output.as_mut() {
                output.format = format;
            }
        }
        Ok(config)
    }

    pub fn resolve(self) -> Result<ResolvedConfig, CliError> {
        let input = self.input.unwrap_or_default();
        let query_file = input.query_file.ok_or_else(|| {
            CliError::Config(
                "No query spectra provided, please provide them in either the config file or with the --query-file flag".to_string(),
            )
        })?;
        let library_file = input.library_file.ok_or_else(|| {
            CliError::Config(
                "No library spectra provided, please provide them in either the config file or with the --library-file flag".to_string(),
            )
        })?;
        let output = self.output.ok_or_else(|| {
            CliError::Config(
                "No output directory provided, please provide one in either the config file or with the --output-dir flag".to_string(),
            )
        })?;
        self.analysis.tolerance.validate().map_err(|e| CliError::Config(e.to_string()))?;

        Ok(ResolvedConfig {
            query_file,
            library_file,
            analysis: self.analysis,
            output,
        })
    }
}
