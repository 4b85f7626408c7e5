//! Grouping of facts into period buckets.

use std::collections::{BTreeMap, BTreeSet};

use super::error::AnalyticsError;
use super::period::{Granularity, PeriodKey, PeriodRange};
use super::types::{Bucket, DimensionFilter, DimensionSelector, Fact};

/// Buckets the facts that fall inside `range` by calendar period.
///
/// Facts outside the range are skipped. With a `dimension`, every bucket also
/// accumulates per-key totals.
pub fn group<'a, I>(
    facts: I,
    range: &PeriodRange,
    granularity: Granularity,
    dimension: Option<DimensionSelector>,
) -> BTreeMap<PeriodKey, Bucket>
where
    I: IntoIterator<Item = &'a Fact>,
{
    let mut buckets: BTreeMap<PeriodKey, Bucket> = BTreeMap::new();

    for fact in facts {
        if !range.contains(fact.occurred_on) {
            continue;
        }

        let key = PeriodKey::for_date(fact.occurred_on, granularity);
        let dimension_key = dimension.map(|selector| fact.dimension_key(selector));
        buckets.entry(key).or_default().add(fact, dimension_key);
    }

    buckets
}

/// Inserts an empty bucket for every requested period that has none.
pub fn zero_fill(buckets: &mut BTreeMap<PeriodKey, Bucket>, requested: &BTreeSet<PeriodKey>) {
    for key in requested {
        buckets.entry(*key).or_default();
    }
}

/// Keeps the facts inside `range` matching `filter`.
///
/// `range` may reach past `window` for growth lookback; the filter value must
/// still occur inside `window` itself.
///
/// # Errors
///
/// Returns `AnalyticsError::UnknownDimensionValue` when no fact inside
/// `window` carries the filtered value.
pub fn filter_facts<'a>(
    facts: &'a [Fact],
    range: &PeriodRange,
    window: &PeriodRange,
    filter: &DimensionFilter,
) -> Result<Vec<&'a Fact>, AnalyticsError> {
    let matching: Vec<&Fact> = facts
        .iter()
        .filter(|fact| range.contains(fact.occurred_on) && filter.matches(fact))
        .collect();

    if !matching.iter().any(|fact| window.contains(fact.occurred_on)) {
        return Err(AnalyticsError::UnknownDimensionValue {
            dimension: filter.selector,
            value: filter.value.clone(),
        });
    }

    Ok(matching)
}
