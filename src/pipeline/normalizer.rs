//! Renames provider columns onto the canonical set and attaches the time index.

use crate::parsers::error::ParseError;
use crate::parsers::raw_table::RawTable;
use crate::types::canonical::{CanonicalTimeSeries, COL_DATE, COL_MONTH, COL_YEAR};
use crate::types::provider::ProviderFormat;
use chrono::{Datelike, NaiveDateTime};
use polars::prelude::*;

/// The per-row time key a parser derived for a raw table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RowIndex {
    /// Calendar month numbers (1..=12) of pre-aggregated rows.
    Months(Vec<i32>),
    /// One timestamp per hourly or sub-daily row.
    Timestamps(Vec<NaiveDateTime>),
}

impl RowIndex {
    fn len(&self) -> usize {
        match self {
            RowIndex::Months(months) => months.len(),
            RowIndex::Timestamps(stamps) => stamps.len(),
        }
    }

    fn into_columns(self) -> Vec<Column> {
        match self {
            RowIndex::Months(months) => vec![Column::new(COL_MONTH.into(), months)],
            RowIndex::Timestamps(stamps) => {
                let months: Vec<i32> = stamps.iter().map(|ts| ts.month() as i32).collect();
                let years: Vec<i32> = stamps.iter().map(|ts| ts.year()).collect();
                let dates = DatetimeChunked::from_naive_datetime(
                    COL_DATE.into(),
                    stamps,
                    TimeUnit::Milliseconds,
                );
                vec![
                    Column::from(dates.into_series()),
                    Column::new(COL_MONTH.into(), months),
                    Column::new(COL_YEAR.into(), years),
                ]
            }
        }
    }
}

/// Builds the canonical time series for `format` from its raw table.
///
/// Every mapped source column is looked up before any value is converted, so a
/// renamed upstream column fails with its name rather than a positional error.
pub(crate) fn canonicalize(
    raw: &RawTable,
    format: ProviderFormat,
    index: RowIndex,
) -> Result<CanonicalTimeSeries, ParseError> {
    raw.require_columns(&format.source_columns())?;

    if index.len() != raw.height() {
        return Err(ParseError::RowCount {
            expected: raw.height(),
            found: index.len(),
        });
    }

    let mut columns = index.into_columns();
    for mapping in format.column_mappings() {
        let cells = Column::new(mapping.canonical.name().into(), raw.column(mapping.source)?);
        // Non-strict: unparseable cells become null
        columns.push(cells.cast(&DataType::Float64)?);
    }
    Ok(CanonicalTimeSeries::new(DataFrame::new(columns)?))
}
