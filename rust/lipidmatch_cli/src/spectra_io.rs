//! Reading labeled spectra from JSON / NDJSON files.
//!
//! Each record carries an identifier plus the columns of one spectrum:
//! `{"id": "PC 34:1", "mz": [...], "abd": [...]}` or with `"int"` instead of
//! `"abd"` when the intensities still need normalizing.

use crate::error::CliError;
use lipidmatch::Spectrum;
use serde::{
    Deserialize,
    Serialize,
};
use std::io::{
    BufRead,
    BufReader,
    Read,
};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSpectrum {
    pub id: String,
    #[serde(flatten)]
    pub spectrum: Spectrum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectraFormat {
    Json,
    NdJson,
}

impl SpectraFormat {
    pub fn detect_from_path(path: &Path) -> Result<Self, CliError> {
        let path_str = path.to_string_lossy().to_lowercase();

        if path_str.ends_with(".ndjson") || path_str.ends_with(".jsonl") {
            Ok(SpectraFormat::NdJson)
        } else if path_str.ends_with(".json") {
            Ok(SpectraFormat::Json)
        } else {
            Self::detect_from_content(path)
        }
    }

    /// A JSON document holding many spectra starts with `[`, anything else
    /// is read line by line.
    fn detect_from_content(path: &Path) -> Result<Self, CliError> {
        let file = std::fs::File::open(path).map_err(|e| {
            CliError::DataReading(format!(
                "Error opening {} for format detection: {}",
                path.display(),
                e
            ))
        })?;

        let reader = BufReader::new(file);
        for byte in reader.bytes() {
            let byte = byte?;
            if byte.is_ascii_whitespace() {
                continue;
            }
            return Ok(if byte == b'[' {
                SpectraFormat::Json
            } else {
                SpectraFormat::NdJson
            });
        }
        Ok(SpectraFormat::NdJson)
    }
}

struct NdJsonReader<R: BufRead> {
    reader: R,
    line_num: usize,
}

impl<R: BufRead> NdJsonReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line_num: 0,
        }
    }
}

impl<R: BufRead> Iterator for NdJsonReader<R> {
    type Item = Result<LabeledSpectrum, CliError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            self.line_num += 1;
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) if line.trim().is_empty() => continue,
                Ok(_) => {
                    return Some(serde_json::from_str(&line).map_err(|e| {
                        CliError::DataReading(format!(
                            "Error parsing NDJSON line {}: {}",
                            self.line_num, e
                        ))
                    }));
                }
                Err(e) => return Some(Err(CliError::Io(e))),
            }
        }
    }
}

pub fn read_spectra<R: Read>(
    reader: R,
    format: SpectraFormat,
) -> Result<Vec<LabeledSpectrum>, CliError> {
    match format {
        SpectraFormat::Json => Ok(serde_json::from_reader(BufReader::new(reader))?),
        SpectraFormat::NdJson => NdJsonReader::new(BufReader::new(reader)).collect(),
    }
}

pub fn read_spectra_file(path: &Path) -> Result<Vec<LabeledSpectrum>, CliError> {
    let format = SpectraFormat::detect_from_path(path)?;
    let file = std::fs::File::open(path).map_err(|e| {
        CliError::DataReading(format!("Error opening {}: {}", path.display(), e))
    })?;
    read_spectra(file, format).map_err(|e| match e {
        CliError::DataReading(msg) => {
            CliError::DataReading(format!("{} (in {})", msg, path.display()))
        }
        CliError::Json(e) => {
            CliError::DataReading(format!("Error parsing {}: {}", path.display(), e))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipidmatch::Intensities;

    const NDJSON: &str = r#"{"id": "a", "mz": [100.0, 150.0], "abd": [80.0, 100.0]}

{"id": "b", "mz": [100.02], "int": [1234.0]}
"#;

    #[test]
    fn test_read_ndjson_skips_blank_lines() {
        let spectra = read_spectra(NDJSON.as_bytes(), SpectraFormat::NdJson).unwrap();
        assert_eq!(spectra.len(), 2);
        assert_eq!(spectra[0].id, "a");
        assert!(matches!(spectra[0].spectrum.intensities, Intensities::Abundance(_)));
        assert!(matches!(spectra[1].spectrum.intensities, Intensities::Raw(_)));
    }

    #[test]
    fn test_ndjson_error_names_the_line() {
        let text = "{\"id\": \"a\", \"mz\": [1.0], \"abd\": [1.0]}\n{\"id\": \"b\"}\n";
        let res = read_spectra(text.as_bytes(), SpectraFormat::NdJson);
        assert!(matches!(res, Err(CliError::DataReading(msg)) if msg.contains("line 2")));
    }

    #[test]
    fn test_detect_format() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("spectra.txt");
        std::fs::write(
            &json_path,
            "  \n[{\"id\": \"a\", \"mz\": [1.0], \"abd\": [1.0]}]",
        )
        .unwrap();
        assert_eq!(
            SpectraFormat::detect_from_path(&json_path).unwrap(),
            SpectraFormat::Json
        );
        assert_eq!(read_spectra_file(&json_path).unwrap().len(), 1);

        let nd_path = dir.path().join("spectra.ndjson");
        std::fs::write(&nd_path, NDJSON).unwrap();
        assert_eq!(
            SpectraFormat::detect_from_path(&nd_path).unwrap(),
            SpectraFormat::NdJson
        );
        assert_eq!(read_spectra_file(&nd_path).unwrap().len(), 2);
    }
}
