//! Reduces a canonical time series to one row per calendar month.

use crate::parsers::error::ParseError;
use crate::types::canonical::{CanonicalColumn, CanonicalTimeSeries, COL_MONTH, COL_YEAR};
use crate::types::provider::Reduction;
use polars::prelude::*;

/// Distinct years observed per month in a multi-year record.
pub(crate) const COL_COVERAGE: &str = "NM";

/// Irradiance sums, temperature and wind means.
fn monthly_reductions() -> Vec<Expr> {
    CanonicalColumn::ALL
        .iter()
        .map(|c| {
            if c.is_irradiance() {
                col(c.name()).sum()
            } else {
                col(c.name()).mean()
            }
        })
        .collect()
}

fn output_columns() -> Vec<Expr> {
    std::iter::once(col(COL_MONTH))
        .chain(CanonicalColumn::ALL.iter().map(|c| col(c.name())))
        .collect()
}

/// Number of distinct years observed for each month present in `frame`.
pub(crate) fn coverage_counts(frame: LazyFrame) -> LazyFrame {
    frame.group_by([col(COL_MONTH)]).agg([col(COL_YEAR)
        .n_unique()
        .cast(DataType::Float64)
        .alias(COL_COVERAGE)])
}

fn reduce_single_year(frame: LazyFrame) -> LazyFrame {
    frame
        .group_by([col(COL_MONTH)])
        .agg(monthly_reductions())
}

/// Per-month sums divided by the month's coverage so a month observed in more
/// years does not outweigh one observed in fewer.
fn reduce_multi_year(frame: LazyFrame) -> LazyFrame {
    let coverage = coverage_counts(frame.clone());
    let normalized: Vec<Expr> = CanonicalColumn::ALL
        .iter()
        .filter(|c| c.is_irradiance())
        .map(|c| (col(c.name()) / col(COL_COVERAGE)).alias(c.name()))
        .collect();

    reduce_single_year(frame)
        .left_join(coverage, col(COL_MONTH), col(COL_MONTH))
        .with_columns(normalized)
}

fn calendar() -> PolarsResult<DataFrame> {
    DataFrame::new(vec![Column::new(
        COL_MONTH.into(),
        (1..=12).collect::<Vec<i32>>(),
    )])
}

/// Left-joins `reduced` onto months 1..=12 so absent months become null rows.
fn complete_calendar(reduced: LazyFrame) -> PolarsResult<LazyFrame> {
    Ok(calendar()?
        .lazy()
        .left_join(reduced, col(COL_MONTH), col(COL_MONTH))
        .sort_by_exprs(vec![col(COL_MONTH)], SortMultipleOptions::default())
        .select(output_columns()))
}

/// Produces an unscaled twelve-row frame (`Month` plus the canonical columns),
/// January first.
pub(crate) fn reduce_to_months(
    series: CanonicalTimeSeries,
    reduction: Reduction,
) -> Result<LazyFrame, ParseError> {
    let frame = series.frame.lazy();
    let reduced = match reduction {
        Reduction::PreAggregated => frame.select(output_columns()),
        Reduction::SingleYear => reduce_single_year(frame),
        Reduction::MultiYear => reduce_multi_year(frame),
    };
    Ok(complete_calendar(reduced)?)
}
