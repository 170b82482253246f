//! Provider-independent stages: normalize, reduce to months, convert units.

pub(crate) mod aggregator;
pub(crate) mod normalizer;
pub(crate) mod units;

use crate::parsers::error::ParseError;
use crate::types::canonical::CanonicalTimeSeries;
use crate::types::climatology::MonthlyClimatology;
use crate::types::provider::ProviderFormat;

/// Runs the monthly reduction and unit conversion for a parsed series.
pub(crate) fn to_climatology(
    series: CanonicalTimeSeries,
    format: ProviderFormat,
) -> Result<MonthlyClimatology, ParseError> {
    let monthly = aggregator::reduce_to_months(series, format.reduction())?;
    let df = units::to_canonical_units(monthly, &format.column_mappings()).collect()?;
    MonthlyClimatology::from_frame(&df)
}
