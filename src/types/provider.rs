//! Defines the closed set of supported data providers and the per-provider
//! schema table (reduction mode and column mapping).

use crate::error::ResourceError;
use crate::types::canonical::CanonicalColumn;
use std::fmt;
use std::str::FromStr;

/// Accumulated Wh/m² per kWh/m².
pub const WH_PER_KWH: f64 = 1000.0;

/// Every label offered by the provider selector, in display order.
///
/// Only the first five have a parser; the rest fail with
/// [`ResourceError::UnsupportedProvider`] when parsed.
pub const PROVIDER_CATALOG: [&str; 10] = [
    "Solargis - Monthly Averages",
    "Solargis - TMY",
    "Solargis - Historic",
    "Meteonorm - TMY",
    "PVGIS - TMY",
    "NASA - TMY",
    "NREL - Historic",
    "SolarAnywhere - TMY",
    "SiAR - Monthly Averages",
    "Other",
];

/// A data source format the pipeline knows how to turn into a
/// [`crate::MonthlyClimatology`].
///
/// # Examples
///
/// ```
/// use solar_resource::ProviderFormat;
///
/// let format: ProviderFormat = "Meteonorm - TMY".parse().unwrap();
/// assert_eq!(format, ProviderFormat::MeteonormTmy);
/// assert_eq!(format.to_string(), "Meteonorm - TMY");
/// assert!("NASA - TMY".parse::<ProviderFormat>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderFormat {
    /// Solargis export with one row per calendar month, already in kWh/m².
    SolargisMonthlyAverages,
    /// Solargis typical meteorological year, 8760 hourly rows.
    SolargisTmy,
    /// Solargis multi-year observed record.
    SolargisHistoric,
    /// Meteonorm typical meteorological year, comma separated.
    MeteonormTmy,
    /// PVGIS typical meteorological year, fetched by coordinates.
    PvgisTmy,
}

/// The reduction applied to reach twelve monthly rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reduction {
    PreAggregated,
    SingleYear,
    MultiYear,
}

/// Maps one upstream column onto a canonical one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ColumnMapping {
    pub source: &'static str,
    pub canonical: CanonicalColumn,
    /// The reduced monthly value is divided by this to reach canonical units.
    pub divisor: f64,
}

const fn map(source: &'static str, canonical: CanonicalColumn, divisor: f64) -> ColumnMapping {
    ColumnMapping {
        source,
        canonical,
        divisor,
    }
}

impl ProviderFormat {
    pub const ALL: [ProviderFormat; 5] = [
        ProviderFormat::SolargisMonthlyAverages,
        ProviderFormat::SolargisTmy,
        ProviderFormat::SolargisHistoric,
        ProviderFormat::MeteonormTmy,
        ProviderFormat::PvgisTmy,
    ];

    /// The catalog label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderFormat::SolargisMonthlyAverages => "Solargis - Monthly Averages",
            ProviderFormat::SolargisTmy => "Solargis - TMY",
            ProviderFormat::SolargisHistoric => "Solargis - Historic",
            ProviderFormat::MeteonormTmy => "Meteonorm - TMY",
            ProviderFormat::PvgisTmy => "PVGIS - TMY",
        }
    }

    /// Whether the format is fetched by coordinates rather than read from a file.
    pub fn is_remote(&self) -> bool {
        matches!(self, ProviderFormat::PvgisTmy)
    }

    pub(crate) fn reduction(&self) -> Reduction {
        match self {
            ProviderFormat::SolargisMonthlyAverages => Reduction::PreAggregated,
            ProviderFormat::SolargisHistoric => Reduction::MultiYear,
            ProviderFormat::SolargisTmy
            | ProviderFormat::MeteonormTmy
            | ProviderFormat::PvgisTmy => Reduction::SingleYear,
        }
    }

    pub(crate) fn column_mappings(&self) -> [ColumnMapping; 5] {
        use CanonicalColumn::*;
        match self {
            ProviderFormat::SolargisMonthlyAverages => [
                map("GHIm", Ghi, 1.0),
                map("Diffm", Dhi, 1.0),
                map("DNIm", Dni, 1.0),
                map("T24", Temp, 1.0),
                map("WSm", Ws, 1.0),
            ],
            ProviderFormat::SolargisTmy | ProviderFormat::SolargisHistoric => [
                map("GHI", Ghi, WH_PER_KWH),
                map("DIF", Dhi, WH_PER_KWH),
                map("DNI", Dni, WH_PER_KWH),
                map("TEMP", Temp, 1.0),
                map("WS", Ws, 1.0),
            ],
            ProviderFormat::MeteonormTmy => [
                map("GHI (W/m^2)", Ghi, WH_PER_KWH),
                map("DHI (W/m^2)", Dhi, WH_PER_KWH),
                map("DNI (W/m^2)", Dni, WH_PER_KWH),
                map("Dry-bulb (C)", Temp, 1.0),
                map("Wspd (m/s)", Ws, 1.0),
            ],
            ProviderFormat::PvgisTmy => [
                map("G(h)", Ghi, WH_PER_KWH),
                map("Gd(h)", Dhi, WH_PER_KWH),
                map("Gb(n)", Dni, WH_PER_KWH),
                map("T2m", Temp, 1.0),
                map("WS10m", Ws, 1.0),
            ],
        }
    }

    /// Source column names of the mapping table, in canonical order.
    pub(crate) fn source_columns(&self) -> [&'static str; 5] {
        self.column_mappings().map(|m| m.source)
    }
}

impl FromStr for ProviderFormat {
    type Err = ResourceError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        ProviderFormat::ALL
            .into_iter()
            .find(|format| format.label() == label)
            .ok_or_else(|| ResourceError::UnsupportedProvider(label.to_string()))
    }
}

/// Formats a `ProviderFormat` using its catalog label.
impl fmt::Display for ProviderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
