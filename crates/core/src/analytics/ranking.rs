//! Top-N ranking of bucket entries.

use std::cmp::Ordering;

use super::types::{Bucket, EntryTotals, Measure, RankedEntry, TopN};

/// Ranks a bucket's entries by amount and keeps the first `top_n`.
#[must_use]
pub fn rank(bucket: &Bucket, top_n: TopN) -> Vec<RankedEntry> {
    rank_by(bucket, top_n, Measure::Amount)
}

/// Ranks a bucket's entries by `measure` and keeps the first `top_n`.
///
/// Entries are sorted descending by the measure; equal values are ordered by
/// dimension key ascending.
#[must_use]
pub fn rank_by(bucket: &Bucket, top_n: TopN, measure: Measure) -> Vec<RankedEntry> {
    let mut ranked = rank_all(bucket, measure);
    ranked.truncate(top_n.get());
    ranked
}

/// Ranks every entry of a bucket by `measure`, without truncation.
#[must_use]
pub fn rank_all(bucket: &Bucket, measure: Measure) -> Vec<RankedEntry> {
    let mut entries: Vec<(&String, &EntryTotals)> = bucket.entries.iter().collect();
    entries.sort_by(|(key_a, a), (key_b, b)| compare(measure, key_a, a, key_b, b));

    entries
        .into_iter()
        .enumerate()
        .map(|(index, (key, totals))| RankedEntry {
            dimension_key: key.clone(),
            amount: totals.amount,
            quantity: totals.quantity,
            rank: index + 1,
        })
        .collect()
}

fn compare(
    measure: Measure,
    key_a: &str,
    a: &EntryTotals,
    key_b: &str,
    b: &EntryTotals,
) -> Ordering {
    measure
        .value(b)
        .cmp(&measure.value(a))
        .then_with(|| key_a.cmp(key_b))
}
