//! The twelve-row monthly table handed to downstream yield calculations.

use crate::parsers::error::ParseError;
use crate::types::canonical::{COL_DHI, COL_DNI, COL_GHI, COL_MONTH, COL_TEMP, COL_WS};
use chrono::Month;
use polars::prelude::*;

/// One calendar month of a climatology.
///
/// Irradiance fields are monthly energy sums in kWh/m²; `temp` (°C) and `ws`
/// (m/s) are monthly means. `None` means the source had no samples for the month.
#[derive(Debug, PartialEq, Clone)]
pub struct MonthlyIrradiation {
    pub month: Month,
    pub ghi: Option<f64>,  // GHI
    pub dhi: Option<f64>,  // DHI
    pub dni: Option<f64>,  // DNI
    pub temp: Option<f64>, // TEMP
    pub ws: Option<f64>,   // WS
}

impl MonthlyIrradiation {
    /// Checks if every field is `None`.
    pub fn is_empty(&self) -> bool {
        self.ghi.is_none()
            && self.dhi.is_none()
            && self.dni.is_none()
            && self.temp.is_none()
            && self.ws.is_none()
    }
}

/// Exactly twelve [`MonthlyIrradiation`] rows, January through December.
#[derive(Debug, PartialEq, Clone)]
pub struct MonthlyClimatology {
    months: Vec<MonthlyIrradiation>,
}

fn get_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Column, ParseError> {
    df.column(col).map_err(|_| ParseError::MissingColumn {
        column: col.to_string(),
    })
}

fn get_opt_float(df: &DataFrame, col: &str, idx: usize) -> Result<Option<f64>, ParseError> {
    Ok(get_column(df, col)?.f64()?.get(idx))
}

impl MonthlyClimatology {
    /// Builds the climatology from a reduced frame holding an Int32 `Month`
    /// column (1..=12, in calendar order) and the Float64 canonical columns.
    pub(crate) fn from_frame(df: &DataFrame) -> Result<Self, ParseError> {
        if df.height() != 12 {
            return Err(ParseError::IncompleteCalendar { rows: df.height() });
        }
        let month_numbers = get_column(df, COL_MONTH)?.i32()?;

        let mut months = Vec::with_capacity(12);
        for idx in 0..df.height() {
            let number = month_numbers
                .get(idx)
                .and_then(|m| u8::try_from(m).ok())
                .filter(|m| usize::from(*m) == idx + 1)
                .ok_or(ParseError::IncompleteCalendar { rows: df.height() })?;
            let month = Month::try_from(number)
                .map_err(|_| ParseError::IncompleteCalendar { rows: df.height() })?;

            months.push(MonthlyIrradiation {
                month,
                ghi: get_opt_float(df, COL_GHI, idx)?,
                dhi: get_opt_float(df, COL_DHI, idx)?,
                dni: get_opt_float(df, COL_DNI, idx)?,
                temp: get_opt_float(df, COL_TEMP, idx)?,
                ws: get_opt_float(df, COL_WS, idx)?,
            });
        }
        Ok(Self { months })
    }

    /// Builds a climatology from rows that must run January through December.
    pub fn from_months(months: Vec<MonthlyIrradiation>) -> Result<Self, ParseError> {
        let in_order = months.len() == 12
            && months
                .iter()
                .enumerate()
                .all(|(idx, m)| m.month.number_from_month() as usize == idx + 1);
        if !in_order {
            return Err(ParseError::IncompleteCalendar { rows: months.len() });
        }
        Ok(Self { months })
    }

    /// All twelve months, January first.
    pub fn months(&self) -> &[MonthlyIrradiation] {
        &self.months
    }

    pub fn get(&self, month: Month) -> &MonthlyIrradiation {
        // `from_frame` guarantees index == month number - 1
        &self.months[month.number_from_month() as usize - 1]
    }

    /// Sum of the twelve monthly GHI values, skipping missing months.
    pub fn annual_ghi(&self) -> f64 {
        self.months.iter().filter_map(|m| m.ghi).sum()
    }

    /// Renders the climatology as a frame keyed by the English month name.
    ///
    /// ```
    /// use chrono::Month;
    /// use solar_resource::{MonthlyClimatology, MonthlyIrradiation};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let months = (1..=12u8)
    ///     .map(|n| MonthlyIrradiation {
    ///         month: Month::try_from(n).unwrap(),
    ///         ghi: Some(f64::from(n) * 10.0),
    ///         dhi: None,
    ///         dni: None,
    ///         temp: None,
    ///         ws: None,
    ///     })
    ///     .collect();
    /// let climatology = MonthlyClimatology::from_months(months)?;
    ///
    /// let df = climatology.to_frame()?;
    /// assert_eq!(df.height(), 12);
    /// assert_eq!(df.get_column_names()[0].as_str(), "Month");
    /// assert_eq!(df.column("Month")?.str()?.get(2), Some("March"));
    /// assert_eq!(df.column("GHI")?.f64()?.get(2), Some(30.0));
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let names: Vec<&str> = self.months.iter().map(|m| m.month.name()).collect();
        let values = |f: fn(&MonthlyIrradiation) -> Option<f64>| -> Vec<Option<f64>> {
            self.months.iter().map(f).collect()
        };
        DataFrame::new(vec![
            Column::new(COL_MONTH.into(), names),
            Column::new(COL_GHI.into(), values(|m| m.ghi)),
            Column::new(COL_DHI.into(), values(|m| m.dhi)),
            Column::new(COL_DNI.into(), values(|m| m.dni)),
            Column::new(COL_TEMP.into(), values(|m| m.temp)),
            Column::new(COL_WS.into(), values(|m| m.ws)),
        ])
    }
}
