//! Folds raw upstream records into daily per-category sales totals.
//!
//! Each pipeline only decides how one typed record turns into a
//! [`Contribution`]; the fold, the drop policy and the logging are shared.

pub mod invoice;
pub mod order;

use crate::domain::category::Category;
use crate::domain::record::{RawRecord, RecordContract};
use crate::domain::sales::{AddError, AggregationResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

pub use invoice::InvoicePipeline;
pub use order::OrderPipeline;

/// Why a single record was left out of the aggregation. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAnomaly {
    #[error("record does not match the collection contract: {0}")]
    Shape(String),
    #[error("date field is missing")]
    MissingDate,
    #[error("date field is not a calendar date: {0:?}")]
    InvalidDate(String),
    #[error("amount is zero or not numeric")]
    ZeroAmount,
    #[error("amount is negative: {0}")]
    NegativeAmount(Decimal),
    #[error("amount {0} overflows the running total")]
    AmountOverflow(Decimal),
}

/// What one surviving record adds to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub date: NaiveDate,
    pub category: Category,
    pub amount: Decimal,
}

pub trait SalesPipeline {
    type Record: RecordContract;

    /// Short name used in logs.
    const NAME: &'static str;

    fn contribution(&self, record: &Self::Record) -> Result<Contribution, ParseAnomaly>;

    /// Property projection this pipeline needs from upstream.
    fn properties(&self) -> &'static [&'static str] {
        Self::Record::PROPERTIES
    }
}

pub fn aggregate<P: SalesPipeline>(pipeline: &P, records: &[RawRecord]) -> AggregationResult {
    let mut result = AggregationResult::new();
    let mut dropped: usize = 0;

    for (idx, raw) in records.iter().enumerate() {
        let outcome = P::Record::from_raw(raw)
            .map_err(|e| ParseAnomaly::Shape(e.to_string()))
            .and_then(|record| pipeline.contribution(&record))
            .and_then(|c| {
                result
                    .add(c.date, c.category, c.amount)
                    .map_err(|e| match e {
                        AddError::NotPositive(_) => ParseAnomaly::ZeroAmount,
                        AddError::Overflow { .. } => ParseAnomaly::AmountOverflow(c.amount),
                    })
            });

        if let Err(anomaly) = outcome {
            dropped += 1;
            tracing::trace!(pipeline = P::NAME, idx, %anomaly, "record dropped");
        }
    }

    tracing::debug!(
        pipeline = P::NAME,
        total = records.len(),
        kept = records.len() - dropped,
        dropped,
        "aggregated records"
    );
    result
}

/// Calendar date from an upstream timestamp such as `2024-01-05 00:00:00`.
///
/// Only the part before the first space (or ISO `T` separator) is considered. Accepts `YYYY-MM-DD`
/// and the compact `YYYYMMDD` some IDO collections emit.
pub(crate) fn extract_date(field: Option<&str>) -> Result<NaiveDate, ParseAnomaly> {
    let raw = field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ParseAnomaly::MissingDate)?;
    let date_part = raw
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(raw);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y%m%d"))
        .map_err(|_| ParseAnomaly::InvalidDate(date_part.to_string()))
}

/// Decimal amount; anything missing or non-numeric reads as zero.
pub(crate) fn parse_amount(field: Option<&str>) -> Decimal {
    let Some(raw) = field.map(str::trim).filter(|s| !s.is_empty()) else {
        return Decimal::ZERO;
    };
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO)
}
