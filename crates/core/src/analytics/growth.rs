//! Period-over-period growth.
//!
//! A period is compared with the immediately preceding period of the same
//! granularity (and the same dimension key, for dimensional growth).

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use super::period::PeriodKey;
use super::types::{Bucket, DimensionalGrowthEntry, GrowthEntry};

/// Percentage change from `previous` to `amount`, one decimal place.
///
/// - `previous > 0`: the rounded percentage change
/// - otherwise, earliest requested period with `amount > 0`: zero
/// - otherwise: `None`
///
/// Also `None` if the percentage does not fit a `Decimal`.
#[must_use]
pub fn growth_percent(amount: Decimal, previous: Decimal, is_earliest: bool) -> Option<Decimal> {
    if previous > Decimal::ZERO {
        let change = amount.checked_sub(previous)?;
        let percent = change
            .checked_mul(Decimal::ONE_HUNDRED)?
            .checked_div(previous)?;
        return round_tenth(percent);
    }

    if is_earliest && amount > Decimal::ZERO {
        Some(Decimal::ZERO)
    } else {
        None
    }
}

/// Rounds to one decimal place, halves toward positive infinity.
#[must_use]
pub fn round_tenth(value: Decimal) -> Option<Decimal> {
    let ten = Decimal::TEN;
    let shifted = value.checked_mul(ten)?.checked_add(Decimal::new(5, 1))?;
    shifted.floor().checked_div(ten)
}

/// One growth entry per requested period, ascending.
///
/// Requested periods without a bucket have amount zero. The preceding
/// period is looked up in `buckets` whether or not it was requested.
#[must_use]
pub fn annotate_growth(
    buckets: &BTreeMap<PeriodKey, Bucket>,
    requested: &BTreeSet<PeriodKey>,
) -> Vec<GrowthEntry> {
    let earliest = requested.first().copied();
    let total = |key: &PeriodKey| buckets.get(key).map_or(Decimal::ZERO, |b| b.total_amount);

    requested
        .iter()
        .map(|key| {
            let amount = total(key);
            let previous_amount = total(&key.previous());
            GrowthEntry {
                period: *key,
                amount,
                previous_amount,
                growth_percent: growth_percent(amount, previous_amount, earliest == Some(*key)),
            }
        })
        .collect()
}

/// Growth of every dimension key present in each requested period.
///
/// Sorted by period, then dimension key.
#[must_use]
pub fn annotate_dimensional_growth(
    buckets: &BTreeMap<PeriodKey, Bucket>,
    requested: &BTreeSet<PeriodKey>,
) -> Vec<DimensionalGrowthEntry> {
    let earliest = requested.first().copied();
    let mut entries = Vec::new();

    for key in requested {
        let Some(bucket) = buckets.get(key) else {
            continue;
        };
        let previous = buckets.get(&key.previous());
        let is_earliest = earliest == Some(*key);

        for (dimension_key, totals) in &bucket.entries {
            let previous_amount =
                previous.map_or(Decimal::ZERO, |b| b.entry_amount(dimension_key));
            entries.push(DimensionalGrowthEntry {
                period: *key,
                dimension_key: dimension_key.clone(),
                amount: totals.amount,
                previous_amount,
                growth_percent: growth_percent(totals.amount, previous_amount, is_earliest),
            });
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use crate::analytics::types::Fact;

    fn year_buckets(totals: &[(i32, &str, Decimal)]) -> BTreeMap<PeriodKey, Bucket> {
        let mut buckets: BTreeMap<PeriodKey, Bucket> = BTreeMap::new();
        for (year, key, amount) in totals {
            let fact = Fact::new(NaiveDate::from_ymd_opt(*year, 6, 1).unwrap(), *amount);
            buckets
                .entry(PeriodKey::Year(*year))
                .or_default()
                .add(&fact, Some(*key));
        }
        buckets
    }

    fn years(list: &[i32]) -> BTreeSet<PeriodKey> {
        list.iter().map(|y| PeriodKey::Year(*y)).collect()
    }

    #[rstest]
    #[case(dec!(1500), dec!(1000), false, Some(dec!(50.0)))]
    #[case(dec!(500), dec!(1000), false, Some(dec!(-50.0)))]
    #[case(dec!(4), dec!(3), false, Some(dec!(33.3)))]
    #[case(dec!(5), dec!(3), false, Some(dec!(66.7)))]
    #[case(dec!(0), dec!(1000), true, Some(dec!(-100.0)))]
    #[case(dec!(100), dec!(0), true, Some(dec!(0)))]
    #[case(dec!(100), dec!(0), false, None)]
    #[case(dec!(0), dec!(0), true, None)]
    #[case(dec!(100), dec!(-50), false, None)]
    fn test_growth_percent(
        #[case] amount: Decimal,
        #[case] previous: Decimal,
        #[case] is_earliest: bool,
        #[case] expected: Option<Decimal>,
    ) {
        assert_eq!(growth_percent(amount, previous, is_earliest), expected);
    }

    #[rstest]
    #[case(dec!(0.25), dec!(0.3))]
    #[case(dec!(-0.25), dec!(-0.2))]
    #[case(dec!(-0.05), dec!(0))]
    #[case(dec!(12.34), dec!(12.3))]
    #[case(dec!(12.35), dec!(12.4))]
    fn test_round_tenth_halves_up(#[case] value: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_tenth(value), Some(expected));
    }

    #[test]
    fn test_growth_overflow_is_none() {
        assert_eq!(growth_percent(Decimal::MAX, dec!(1), false), None);
    }

    #[test]
    fn test_annotate_growth_uses_unrequested_prior_year() {
        let buckets = year_buckets(&[(2022, "A", dec!(1000)), (2023, "A", dec!(1500))]);

        let growth = annotate_growth(&buckets, &years(&[2023]));

        assert_eq!(growth.len(), 1);
        assert_eq!(growth[0].previous_amount, dec!(1000));
        assert_eq!(growth[0].growth_percent, Some(dec!(50.0)));
    }

    #[test]
    fn test_annotate_growth_missing_periods() {
        let buckets = year_buckets(&[(2021, "A", dec!(200))]);

        let growth = annotate_growth(&buckets, &years(&[2021, 2023]));

        assert_eq!(growth[0].growth_percent, Some(Decimal::ZERO));
        assert_eq!(growth[1].amount, Decimal::ZERO);
        assert_eq!(growth[1].previous_amount, Decimal::ZERO);
        assert_eq!(growth[1].growth_percent, None);
    }

    #[test]
    fn test_dimensional_growth_per_key() {
        let buckets = year_buckets(&[
            (2022, "Ana", dec!(100)),
            (2022, "Budi", dec!(80)),
            (2023, "Ana", dec!(150)),
            (2023, "Citra", dec!(40)),
        ]);

        let growth = annotate_dimensional_growth(&buckets, &years(&[2022, 2023]));

        let summary: Vec<(String, &str, Option<Decimal>)> = growth
            .iter()
            .map(|e| (e.period.to_string(), e.dimension_key.as_str(), e.growth_percent))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("2022".to_string(), "Ana", Some(Decimal::ZERO)),
                ("2022".to_string(), "Budi", Some(Decimal::ZERO)),
                ("2023".to_string(), "Ana", Some(dec!(50.0))),
                ("2023".to_string(), "Citra", None),
            ]
        );
    }
}
