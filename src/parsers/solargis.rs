//! Solargis exports: monthly averages, typical meteorological year and historic records.
//!
//! All three are semicolon separated with a `#`-commented preamble.

use crate::parsers::error::ParseError;
use crate::parsers::raw_table::{read_delimited, RawTable, TextLayout};
use crate::parsers::parse_date_and_time;
use crate::pipeline::normalizer::{canonicalize, RowIndex};
use crate::types::canonical::CanonicalTimeSeries;
use crate::types::provider::ProviderFormat;
use chrono::{Duration, Month, NaiveDate, NaiveDateTime};
use log::debug;
use std::collections::HashSet;

const MONTHLY_AVERAGES_LAYOUT: TextLayout = TextLayout {
    delimiter: b';',
    header_marker: "Month",
    comment_anywhere: false,
};

const TMY_LAYOUT: TextLayout = TextLayout {
    delimiter: b';',
    header_marker: "Day",
    comment_anywhere: true,
};

const HISTORIC_LAYOUT: TextLayout = TextLayout {
    delimiter: b';',
    header_marker: "Date",
    comment_anywhere: true,
};

const COL_MONTH_LABEL: &str = "Month";
/// Label of the trailing whole-year aggregate in monthly-average exports.
const YEAR_ROW_LABEL: &str = "Year";

/// A TMY holds one non-leap year of hourly rows.
pub(crate) const TMY_HOURS: usize = 8760;

const COL_DATE: &str = "Date";
const COL_TIME: &str = "Time";
const HISTORIC_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Resolves a month label: three-letter abbreviation, full English name or 1-12.
fn month_number(label: &str) -> Option<i32> {
    if let Ok(number) = label.parse::<u8>() {
        return Month::try_from(number).ok().map(|m| m.number_from_month() as i32);
    }
    let lowered = label.to_ascii_lowercase();
    (1..=12u8)
        .filter_map(|n| Month::try_from(n).ok())
        .find(|m| {
            let name = m.name().to_ascii_lowercase();
            name == lowered || name.get(..3) == Some(lowered.as_str())
        })
        .map(|m| m.number_from_month() as i32)
}

/// Drops the aggregate `Year` row and resolves the remaining month labels.
fn month_rows(mut raw: RawTable) -> Result<(RawTable, Vec<i32>), ParseError> {
    let label_idx = raw
        .header
        .iter()
        .position(|h| h == COL_MONTH_LABEL)
        .ok_or_else(|| ParseError::MissingColumn {
            column: COL_MONTH_LABEL.to_string(),
        })?;
    raw.rows.retain(|row| row.fields[label_idx] != YEAR_ROW_LABEL);

    let mut seen = HashSet::new();
    let mut months = Vec::with_capacity(raw.height());
    for row in &raw.rows {
        let label = &row.fields[label_idx];
        let month = month_number(label).ok_or_else(|| ParseError::UnknownMonth(label.clone()))?;
        if !seen.insert(month) {
            return Err(ParseError::DuplicateMonth(label.clone()));
        }
        months.push(month);
    }
    Ok((raw, months))
}

/// Parses a Solargis monthly-averages export. Rows are already monthly kWh/m² values.
pub(crate) fn extract_monthly_averages(text: &str) -> Result<CanonicalTimeSeries, ParseError> {
    let format = ProviderFormat::SolargisMonthlyAverages;
    let raw = read_delimited(text, &MONTHLY_AVERAGES_LAYOUT)?;
    raw.require_columns(&[COL_MONTH_LABEL])?;
    raw.require_columns(&format.source_columns())?;

    let (raw, months) = month_rows(raw)?;
    debug!("Solargis monthly averages: {} month rows", months.len());
    canonicalize(&raw, format, RowIndex::Months(months))
}

fn tmy_start() -> NaiveDateTime {
    // 1900 is not a leap year; the reference year itself carries no meaning
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 30, 0))
        .unwrap_or_default()
}

/// Hourly timestamps for a typical year, starting at 00:30 on January 1st.
pub(crate) fn synthetic_year(periods: usize) -> Vec<NaiveDateTime> {
    let start = tmy_start();
    (0..periods)
        .map(|hour| start + Duration::hours(hour as i64))
        .collect()
}

/// Parses a Solargis TMY export. The `Day`/`Time` columns are ignored in favour
/// of a synthetic hourly sequence, so exactly 8760 rows are required.
pub(crate) fn extract_tmy(text: &str) -> Result<CanonicalTimeSeries, ParseError> {
    let format = ProviderFormat::SolargisTmy;
    let raw = read_delimited(text, &TMY_LAYOUT)?;
    raw.require_columns(&format.source_columns())?;

    if raw.height() != TMY_HOURS {
        return Err(ParseError::RowCount {
            expected: TMY_HOURS,
            found: raw.height(),
        });
    }
    canonicalize(&raw, format, RowIndex::Timestamps(synthetic_year(TMY_HOURS)))
}

/// Solargis writes dates as `dd.mm.yyyy`; the parser expects slashes.
fn historic_timestamp(date: &str, time: &str) -> String {
    format!("{} {}", date.replace('.', "/"), time)
}

/// Parses a Solargis multi-year historic export.
pub(crate) fn extract_historic(text: &str) -> Result<CanonicalTimeSeries, ParseError> {
    let format = ProviderFormat::SolargisHistoric;
    let raw = read_delimited(text, &HISTORIC_LAYOUT)?;
    raw.require_columns(&[COL_DATE, COL_TIME])?;
    raw.require_columns(&format.source_columns())?;

    let stamps = parse_date_and_time(
        &raw,
        COL_DATE,
        COL_TIME,
        HISTORIC_TIMESTAMP_FORMAT,
        historic_timestamp,
    )?;
    debug!("Solargis historic: {} timestamped rows", stamps.len());
    canonicalize(&raw, format, RowIndex::Timestamps(stamps))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::Datelike;
    use std::fmt::Write;

    /// A Solargis TMY export where every row of `month` has GHI `ghi`, every
    /// other row GHI 0, TEMP equal to the month number and WS 2.
    pub(crate) fn tmy_text(month: u32, ghi: f64) -> String {
        let mut text = String::from("#Solargis TMY export\n#Site: test\n");
        text.push_str("#Columns: GHI, DNI, DIF in Wh/m2\n");
        text.push_str("Day;Time;GHI;DNI;DIF;TEMP;WS;RH\n");
        for (i, ts) in synthetic_year(TMY_HOURS).iter().enumerate() {
            let value = if ts.month() == month { ghi } else { 0.0 };
            writeln!(
                text,
                "{};{};{};{};{};{};2;55",
                i / 24 + 1,
                ts.format("%H:%M"),
                value,
                value / 2.0,
                value / 4.0,
                ts.month()
            )
            .unwrap();
        }
        text
    }

    pub(crate) fn monthly_averages_text(months: &[&str]) -> String {
        let mut text = String::from("#Solargis monthly averages\n#Site: test\n");
        text.push_str("Month;GHIm;DNIm;Diffm;T24;WSm;ALBm;RHm;PWATm;PRECm;SNOWDm;CDDm;HDDm\n");
        for (i, label) in months.iter().enumerate() {
            let n = i as f64 + 1.0;
            writeln!(
                text,
                "{label};{};{};{};{};{};0.2;60;10;30;0;0;0",
                n * 10.0,
                n * 5.0,
                n * 2.0,
                n,
                n / 10.0
            )
            .unwrap();
        }
        text.push_str("Year;780;390;156;6.5;0.65;0.2;60;10;360;0;0;0\n");
        text
    }
}
