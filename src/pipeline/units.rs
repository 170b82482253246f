use crate::types::provider::ColumnMapping;
use polars::prelude::*;

/// Rescales each canonical column by its mapping's divisor, e.g. accumulated
/// Wh/m² monthly sums to kWh/m².
pub(crate) fn to_canonical_units(frame: LazyFrame, mappings: &[ColumnMapping]) -> LazyFrame {
    let rescaled: Vec<Expr> = mappings
        .iter()
        .map(|m| {
            let name = m.canonical.name();
            (col(name) / lit(m.divisor)).alias(name)
        })
        .collect();
    frame.with_columns(rescaled)
}
