use clap::{
    Parser,
    Subcommand,
};
use lipidmatch::MatchDirection;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Align query spectra against library spectra.
    Align(AlignArgs),
    /// Write template configuration and spectra files.
    WriteTemplate(WriteTemplateArgs),
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SerializationFormat {
    Json,
    #[default]
    PrettyJson,
    Ndjson,
    /// Summary table only (no peak correspondence).
    Csv,
}

impl SerializationFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SerializationFormat::Json | SerializationFormat::PrettyJson => "json",
            SerializationFormat::Ndjson => "ndjson",
            SerializationFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DirectionArg {
    QueryDriven,
    LibraryDriven,
}

impl From<DirectionArg> for MatchDirection {
    fn from(x: DirectionArg) -> Self {
        match x {
            DirectionArg::QueryDriven => MatchDirection::QueryDriven,
            DirectionArg::LibraryDriven => MatchDirection::LibraryDriven,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct AlignArgs {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the query spectra, json or ndjson (will over-write the config file)
    #[arg(short, long)]
    pub query_file: Option<PathBuf>,

    /// Path to the library spectra, json or ndjson (will over-write the config file)
    #[arg(short, long)]
    pub library_file: Option<PathBuf>,

    /// Path to the output directory (will over-write the config file)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Which spectrum drives the matching (will over-write the config file)
    #[arg(short, long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// The format to use for the output (will over-write the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<SerializationFormat>,

    /// Number of threads, defaults to all available cores
    #[arg(short, long)]
    pub threads: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The path to the output files.
    #[arg(short, long)]
    pub output_path: PathBuf,
}
