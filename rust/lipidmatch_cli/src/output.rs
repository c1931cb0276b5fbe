use lipidmatch::{
    AlignmentError,
    AlignmentResult,
};
use serde::Serialize;
use std::fs::File;
use std::io::{
    self,
    BufWriter,
    Write,
};
use std::path::Path;

use crate::cli::SerializationFormat;
use crate::error::CliError;

/// One (query, library) outcome as written to disk.
#[derive(Debug, Serialize)]
pub struct ResultRecord<'a> {
    pub query_id: &'a str,
    pub library_id: &'a str,
    #[serde(flatten)]
    pub result: Option<&'a AlignmentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> ResultRecord<'a> {
    pub fn new(
        query_id: &'a str,
        library_id: &'a str,
        result: &'a Result<AlignmentResult, AlignmentError>,
    ) -> Self {
        match result {
            Ok(res) => Self {
                query_id,
                library_id,
                result: Some(res),
                error: None,
            },
            Err(e) => Self::failed(query_id, library_id, e),
        }
    }

    pub fn failed(query_id: &'a str, library_id: &'a str, error: &AlignmentError) -> Self {
        Self {
            query_id,
            library_id,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Flat row of the CSV summary, the correspondence table is left out.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    query_id: &'a str,
    library_id: &'a str,
    score: Option<f64>,
    deviation_mz: Option<f64>,
    npeak: Option<usize>,
    error: Option<&'a str>,
}

impl<'a> From<&'a ResultRecord<'a>> for SummaryRow<'a> {
    fn from(x: &'a ResultRecord<'a>) -> Self {
        SummaryRow {
            query_id: x.query_id,
            library_id: x.library_id,
            score: x.result.map(|r| r.score),
            deviation_mz: x.result.and_then(|r| r.deviation_mz),
            npeak: x.result.map(|r| r.npeak),
            error: x.error.as_deref(),
        }
    }
}

/// The JSON layouts a [`JsonStreamSerializer`] can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    Array,
    PrettyArray,
    Lines,
}

pub struct JsonStreamSerializer<W: Write> {
    writer: W,
    layout: JsonLayout,
    is_first: bool,
}

impl<W: Write> JsonStreamSerializer<W> {
    pub fn new(writer: W, layout: JsonLayout) -> Self {
        Self {
            writer,
            layout,
            is_first: true,
        }
    }

    pub fn serialize<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        match self.layout {
            JsonLayout::Lines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                self.writer.write_all(b"\n")?;
            }
            JsonLayout::Array | JsonLayout::PrettyArray => {
                if self.is_first {
                    self.writer.write_all(b"[")?;
                    self.is_first = false;
                } else {
                    self.writer.write_all(b",")?;
                }

                if self.layout == JsonLayout::PrettyArray {
                    serde_json::to_writer_pretty(&mut self.writer, item)
                } else {
                    serde_json::to_writer(&mut self.writer, item)
                }
                .map_err(io::Error::other)?;
            }
        }
        Ok(())
    }

    /// Closes the JSON array, if any.
    pub fn finish(mut self) -> io::Result<()> {
        match self.layout {
            JsonLayout::Lines => {}
            JsonLayout::Array | JsonLayout::PrettyArray => {
                if self.is_first {
                    self.writer.write_all(b"[]")?;
                } else {
                    self.writer.write_all(b"]")?;
                }
            }
        }
        self.writer.flush()
    }
}

/// Destination of the result records, picked from the output format.
pub enum ResultSink<W: Write> {
    Json(JsonStreamSerializer<W>),
    Csv(csv::Writer<W>),
}

impl ResultSink<BufWriter<File>> {
    pub fn create(path: &Path, format: SerializationFormat) -> Result<Self, CliError> {
        let writer = BufWriter::new(File::create(path)?);
        Ok(Self::new(writer, format))
    }
}

impl<W: Write> ResultSink<W> {
    pub fn new(writer: W, format: SerializationFormat) -> Self {
        let layout = match format {
            SerializationFormat::Csv => return ResultSink::Csv(csv::Writer::from_writer(writer)),
            SerializationFormat::Json => JsonLayout::Array,
            SerializationFormat::PrettyJson => JsonLayout::PrettyArray,
            SerializationFormat::Ndjson => JsonLayout::Lines,
        };
        ResultSink::Json(JsonStreamSerializer::new(writer, layout))
    }

    pub fn write(&mut self, record: &ResultRecord) -> Result<(), CliError> {
        match self {
            ResultSink::Json(ser) => ser.serialize(record)?,
            ResultSink::Csv(wtr) => wtr.serialize(SummaryRow::from(record))?,
        }
        Ok(())
    }

    pub fn finish(self) -> Result<(), CliError> {
        match self {
            ResultSink::Json(ser) => ser.finish()?,
            ResultSink::Csv(mut wtr) => wtr.flush()?,
        }
        Ok(())
    }
}
