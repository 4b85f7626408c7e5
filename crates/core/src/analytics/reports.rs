//! Report rows built from an aggregation outcome.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::engine::AggregationOutcome;
use super::error::AnalyticsError;
use super::period::PeriodKey;

/// Report envelope, serialized as `{ "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport<T> {
    /// Report rows.
    pub data: Vec<T>,
}

impl<T> SalesReport<T> {
    /// Wraps report rows.
    #[must_use]
    pub const fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Row order of the monthly sales report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Chronological.
    #[default]
    Period,
    /// Highest total first, ties chronological.
    Amount,
}

impl FromStr for SortKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "period" => Ok(Self::Period),
            "amount" => Ok(Self::Amount),
            _ => Err(AnalyticsError::InvalidSortKey(s.to_string())),
        }
    }
}

/// Total of one period with its growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSalesRow {
    /// Period.
    pub period: PeriodKey,
    /// Sum of invoice amounts.
    pub total_invoice: Decimal,
    /// Sum of quantities.
    pub total_quantity: i64,
    /// Total of the preceding period.
    pub previous_total: Decimal,
    /// Growth against the preceding period.
    pub growth_percent: Option<Decimal>,
}

/// Ranked entries of one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPeriodRow {
    /// Period.
    pub period: PeriodKey,
    /// Sum of all invoice amounts in the period, before any floor.
    pub total_invoice: Decimal,
    /// Sum of all quantities in the period.
    pub total_quantity: i64,
    /// Ranked entries, best first.
    pub entries: Vec<RankedEntryRow>,
}

/// One ranked dimension value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntryRow {
    /// Dimension value, e.g. a salesperson name.
    pub name: String,
    /// Amount.
    pub amount: Decimal,
    /// Quantity.
    pub quantity: i64,
    /// 1-based rank.
    pub rank: usize,
    /// Amount of the same value in the preceding period, when growth is reported.
    pub previous_amount: Option<Decimal>,
    /// Growth against the preceding period, when growth is reported.
    pub growth_percent: Option<Decimal>,
}

/// Rounds an amount to whole currency units for display.
#[must_use]
pub fn whole_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// One row per bucket of the outcome, chronological.
#[must_use]
pub fn period_rows(outcome: &AggregationOutcome) -> Vec<PeriodSalesRow> {
    outcome
        .buckets
        .iter()
        .map(|(period, bucket)| {
            let growth = outcome.growth_for(*period);
            PeriodSalesRow {
                period: *period,
                total_invoice: bucket.total_amount,
                total_quantity: bucket.total_quantity,
                previous_total: growth.map_or(Decimal::ZERO, |g| g.previous_amount),
                growth_percent: growth.and_then(|g| g.growth_percent),
            }
        })
        .collect()
}

/// Orders period rows by `sort`.
pub fn sort_period_rows(rows: &mut [PeriodSalesRow], sort: SortKey) {
    match sort {
        SortKey::Period => rows.sort_by_key(|row| row.period),
        SortKey::Amount => rows.sort_by(|a, b| {
            b.total_invoice
                .cmp(&a.total_invoice)
                .then_with(|| a.period.cmp(&b.period))
        }),
    }
}

/// One row per bucket with its ranked entries, chronological.
///
/// Periods whose entries were all dropped by a floor are kept with an empty
/// entry list.
#[must_use]
pub fn ranked_rows(outcome: &AggregationOutcome) -> Vec<RankedPeriodRow> {
    let with_growth = !outcome.growth.is_empty();

    outcome
        .buckets
        .iter()
        .map(|(period, bucket)| {
            let entries = outcome
                .ranked
                .get(period)
                .map(|ranked| {
                    ranked
                        .iter()
                        .map(|entry| {
                            let growth = outcome
                                .dimensional_growth_for(*period, &entry.dimension_key)
                                .filter(|_| with_growth);
                            RankedEntryRow {
                                name: entry.dimension_key.clone(),
                                amount: entry.amount,
                                quantity: entry.quantity,
                                rank: entry.rank,
                                previous_amount: growth.map(|g| g.previous_amount),
                                growth_percent: growth.and_then(|g| g.growth_percent),
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();

            RankedPeriodRow {
                period: *period,
                total_invoice: bucket.total_amount,
                total_quantity: bucket.total_quantity,
                entries,
            }
        })
        .collect()
}
