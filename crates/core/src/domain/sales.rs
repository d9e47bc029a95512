use crate::domain::category::Category;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-category totals for one calendar date.
pub type DailyBucket = BTreeMap<Category, Decimal>;

/// Date → category → summed amount.
///
/// Entries only exist once something positive was added to them, so a bucket
/// never holds an untouched zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    days: BTreeMap<NaiveDate, DailyBucket>,
}

impl AggregationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the (date, category) entry. A rejected amount leaves the
    /// result untouched.
    pub fn add(
        &mut self,
        date: NaiveDate,
        category: Category,
        amount: Decimal,
    ) -> Result<(), AddError> {
        if amount <= Decimal::ZERO {
            return Err(AddError::NotPositive(amount));
        }
        let current = self.get(date, category).unwrap_or(Decimal::ZERO);
        let total = current
            .checked_add(amount)
            .ok_or(AddError::Overflow { date, category })?;
        self.days.entry(date).or_default().insert(category, total);
        Ok(())
    }

    pub fn get(&self, date: NaiveDate, category: Category) -> Option<Decimal> {
        self.days.get(&date)?.get(&category).copied()
    }

    pub fn bucket(&self, date: NaiveDate) -> Option<&DailyBucket> {
        self.days.get(&date)
    }

    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &DailyBucket)> {
        self.days.iter()
    }

    pub fn total_for(&self, date: NaiveDate) -> Decimal {
        self.days
            .get(&date)
            .map(|bucket| bucket.values().copied().sum())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// One entry per populated (date, category) pair.
    pub fn flatten(&self) -> Vec<SalesEntry> {
        self.days
            .iter()
            .flat_map(|(date, bucket)| {
                bucket.iter().map(|(category, amount)| SalesEntry {
                    date: *date,
                    category: *category,
                    amount: *amount,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddError {
    #[error("amount is not positive: {0}")]
    NotPositive(Decimal),
    #[error("running total for {date} {category} would overflow")]
    Overflow { date: NaiveDate, category: Category },
}

/// Wire shape consumed by the dashboards: `{date, type, amount}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesEntry {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub category: Category,
    pub amount: Decimal,
}
