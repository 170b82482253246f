//! Canonical column names and the source-independent time series every parser produces.

use polars::frame::DataFrame;

pub(crate) const COL_DATE: &str = "Date";
pub(crate) const COL_MONTH: &str = "Month";
pub(crate) const COL_YEAR: &str = "Year";

pub(crate) const COL_GHI: &str = "GHI"; // Global horizontal
pub(crate) const COL_DHI: &str = "DHI"; // Diffuse horizontal
pub(crate) const COL_DNI: &str = "DNI"; // Direct normal
pub(crate) const COL_TEMP: &str = "TEMP";
pub(crate) const COL_WS: &str = "WS";

/// One of the five physical quantities carried through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalColumn {
    Ghi,
    Dhi,
    Dni,
    Temp,
    Ws,
}

impl CanonicalColumn {
    pub const ALL: [CanonicalColumn; 5] = [
        CanonicalColumn::Ghi,
        CanonicalColumn::Dhi,
        CanonicalColumn::Dni,
        CanonicalColumn::Temp,
        CanonicalColumn::Ws,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CanonicalColumn::Ghi => COL_GHI,
            CanonicalColumn::Dhi => COL_DHI,
            CanonicalColumn::Dni => COL_DNI,
            CanonicalColumn::Temp => COL_TEMP,
            CanonicalColumn::Ws => COL_WS,
        }
    }

    /// Irradiance components are summed per month; the rest are averaged.
    pub fn is_irradiance(&self) -> bool {
        matches!(
            self,
            CanonicalColumn::Ghi | CanonicalColumn::Dhi | CanonicalColumn::Dni
        )
    }
}

/// A provider table after renaming and type coercion.
///
/// The frame holds `Month` (Int32) and the Float64 canonical columns. Timestamped
/// sources also carry `Date` (Datetime) and `Year` (Int32). Values are in the
/// provider's native accumulation; unit factors are applied after reduction.
#[derive(Debug, Clone)]
pub struct CanonicalTimeSeries {
    pub frame: DataFrame,
}

impl CanonicalTimeSeries {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}
