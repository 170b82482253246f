pub(crate) mod error;
pub(crate) mod meteonorm;
pub(crate) mod pvgis;
pub(crate) mod raw_table;
pub(crate) mod solargis;

use crate::parsers::error::ParseError;
use crate::parsers::raw_table::RawTable;
use crate::types::canonical::CanonicalTimeSeries;
use crate::types::provider::ProviderFormat;
use chrono::NaiveDateTime;

/// Turns a provider payload into its canonical time series.
///
/// Text formats must be UTF-8; PVGIS payloads are the raw JSON response body.
pub(crate) fn parse(
    format: ProviderFormat,
    payload: &[u8],
) -> Result<CanonicalTimeSeries, ParseError> {
    let text = || std::str::from_utf8(payload);
    match format {
        ProviderFormat::SolargisMonthlyAverages => solargis::extract_monthly_averages(text()?),
        ProviderFormat::SolargisTmy => solargis::extract_tmy(text()?),
        ProviderFormat::SolargisHistoric => solargis::extract_historic(text()?),
        ProviderFormat::MeteonormTmy => meteonorm::extract_tmy(text()?),
        ProviderFormat::PvgisTmy => pvgis::extract_tmy(payload),
    }
}

pub(crate) fn parse_timestamp(value: &str, fmt: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, fmt).map_err(|source| ParseError::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}

/// Parses one timestamp per row from separate date and time columns, joined by `join`.
pub(crate) fn parse_date_and_time(
    raw: &RawTable,
    date_column: &str,
    time_column: &str,
    fmt: &str,
    join: fn(&str, &str) -> String,
) -> Result<Vec<NaiveDateTime>, ParseError> {
    let dates = raw.column(date_column)?;
    let times = raw.column(time_column)?;
    dates
        .into_iter()
        .zip(times)
        .map(|(date, time)| parse_timestamp(&join(date, time), fmt))
        .collect()
}
