//! Meteonorm hourly TMY exports (comma separated, US-style dates).

use crate::parsers::error::ParseError;
use crate::parsers::parse_date_and_time;
use crate::parsers::raw_table::{read_delimited, TextLayout};
use crate::pipeline::normalizer::{canonicalize, RowIndex};
use crate::types::canonical::CanonicalTimeSeries;
use crate::types::provider::ProviderFormat;

const COL_DATE: &str = "Date (MM/DD/YYYY)";
const COL_TIME: &str = "Time (HH:MM)";
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

const LAYOUT: TextLayout = TextLayout {
    delimiter: b',',
    header_marker: COL_DATE,
    comment_anywhere: false,
};

/// Meteonorm closes each day with `24:00`, which is read as midnight of the
/// same date rather than the next one.
fn timestamp(date: &str, time: &str) -> String {
    let time = if time == "24:00" { "00:00" } else { time };
    format!("{date} {time}")
}

/// Parses a Meteonorm TMY export.
pub(crate) fn extract_tmy(text: &str) -> Result<CanonicalTimeSeries, ParseError> {
    let format = ProviderFormat::MeteonormTmy;
    let raw = read_delimited(text, &LAYOUT)?;
    raw.require_columns(&[COL_DATE, COL_TIME])?;
    raw.require_columns(&format.source_columns())?;

    let stamps = parse_date_and_time(&raw, COL_DATE, COL_TIME, TIMESTAMP_FORMAT, timestamp)?;
    canonicalize(&raw, format, RowIndex::Timestamps(stamps))
}
