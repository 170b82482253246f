use polars::error::PolarsError;
use thiserror::Error;

/// Structural problems found while turning a provider payload into a climatology.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Header row containing '{marker}' not found")]
    HeaderNotFound { marker: &'static str },

    #[error("Line {line} has {found} fields, header has {expected}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("Expected {expected} data rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("Could not parse timestamp '{value}'")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unknown month label '{0}'")]
    UnknownMonth(String),

    #[error("Month '{0}' appears more than once")]
    DuplicateMonth(String),

    #[error("Reduced table has {rows} rows instead of twelve calendar months")]
    IncompleteCalendar { rows: usize },

    #[error("Malformed delimited text")]
    Csv(#[from] csv::Error),

    #[error("Input is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Failed to parse JSON data")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

/// Failures reaching a remote provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} answered {status} instead of 200 OK")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },
}
