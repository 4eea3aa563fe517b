//! Output formatting for the gwadm CLI.
//!
//! Listing and info commands emit either JSON or CSV. CSV projections are
//! described per model through [`CsvRecordProducer`]; JSON comes straight
//! from the serde representation.

use csv::Writer;
use serde::Serialize;
use std::io::BufWriter;
use std::str::FromStr;
use strum::EnumIter;

pub const JSON: &str = "json";
pub const CSV: &str = "csv";

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),
    #[error("CSV writer into inner error: {0}")]
    CsvIntoInnerError(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
}

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct OutputFormatOptions {
    pub with_headers: bool,
    pub pretty: bool,
}

impl Default for OutputFormatOptions {
    fn default() -> Self {
        OutputFormatOptions {
            with_headers: true,
            pretty: true,
        }
    }
}

/// Enum representing the supported output formats
#[derive(Debug, Clone, PartialEq, PartialOrd, EnumIter)]
pub enum OutputFormat {
    /// CSV (Comma-Separated Values) format
    Csv(OutputFormatOptions),
    /// JSON (JavaScript Object Notation) format
    Json(OutputFormatOptions),
}

impl OutputFormat {
    pub fn from_string_with_options(
        format_str: &str,
        options: OutputFormatOptions,
    ) -> Result<OutputFormat, FormattingError> {
        match format_str.to_lowercase().as_str() {
            JSON => Ok(OutputFormat::Json(options)),
            CSV => Ok(OutputFormat::Csv(options)),
            other => Err(FormattingError::UnsupportedOutputFormat(other.to_string())),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json(OutputFormatOptions::default())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OutputFormat::Csv(_) => write!(f, "csv"),
            OutputFormat::Json(_) => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormattingError;

    fn from_str(format_str: &str) -> Result<OutputFormat, FormattingError> {
        Self::from_string_with_options(format_str, OutputFormatOptions::default())
    }
}

/// Trait for producing CSV records from data
pub trait CsvRecordProducer {
    /// Returns the header row for the CSV output
    fn csv_header() -> Vec<String>;

    /// Converts the data into CSV records
    fn as_csv_records(&self) -> Vec<Vec<String>>;

    /// Produces CSV output with or without a header row
    fn to_csv(&self, with_header: bool) -> Result<String, FormattingError> {
        let buf = BufWriter::new(Vec::new());
        let mut wtr = Writer::from_writer(buf);
        if with_header {
            wtr.write_record(Self::csv_header())?;
        }
        for record in self.as_csv_records() {
            wtr.write_record(&record)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| FormattingError::UnsupportedOutputFormat(e.to_string()))?
            .into_inner()
            .map_err(|e| FormattingError::UnsupportedOutputFormat(e.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl<T: CsvRecordProducer> CsvRecordProducer for Vec<T> {
    fn csv_header() -> Vec<String> {
        T::csv_header()
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        self.iter().flat_map(|item| item.as_csv_records()).collect()
    }
}

pub trait Formattable {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError>;
}

/// Formats any serializable, CSV-producing value per the requested format.
pub fn format_value<T>(value: &T, format: &OutputFormat) -> Result<String, FormattingError>
where
    T: Serialize + CsvRecordProducer,
{
    match format {
        OutputFormat::Json(options) => {
            if options.pretty {
                Ok(serde_json::to_string_pretty(value)?)
            } else {
                Ok(serde_json::to_string(value)?)
            }
        }
        OutputFormat::Csv(options) => value.to_csv(options.with_headers),
    }
}
