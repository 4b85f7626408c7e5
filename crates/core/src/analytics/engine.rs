//! The aggregation pipeline.
//!
//! Every report runs the same steps: filter, group, zero-fill, annotate
//! growth, floor and rank. `AggregationConfig` selects which steps apply.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use tracing::debug;

use super::error::AnalyticsError;
use super::grouping::{filter_facts, group, zero_fill};
use super::growth::{annotate_dimensional_growth, annotate_growth};
use super::period::{CalendarMonth, Granularity, PeriodKey, PeriodRange, YearSet};
use super::ranking::{rank_all, rank_by};
use super::types::{
    Bucket, DimensionFilter, DimensionSelector, DimensionalGrowthEntry, Fact, GrowthEntry,
    Measure, RankedEntry, TopN,
};

/// The periods a report covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodRequest {
    /// A contiguous month range such as `Jan2023..=Jun2023`.
    Range(PeriodRange),
    /// An arbitrary set of years.
    Years(YearSet),
}

impl PeriodRequest {
    /// Keys of the requested periods at `granularity`, ascending.
    #[must_use]
    pub fn requested_keys(&self, granularity: Granularity) -> BTreeSet<PeriodKey> {
        match (self, granularity) {
            (Self::Range(range), Granularity::Month) => {
                range.months().into_iter().map(PeriodKey::Month).collect()
            }
            (Self::Range(range), Granularity::Year) => range.years().map(PeriodKey::Year).collect(),
            (Self::Years(years), Granularity::Year) => {
                years.requested().iter().copied().map(PeriodKey::Year).collect()
            }
            (Self::Years(years), Granularity::Month) => years
                .requested()
                .iter()
                .flat_map(|year| (1..=12).filter_map(move |m| CalendarMonth::new(*year, m)))
                .map(PeriodKey::Month)
                .collect(),
        }
    }

    /// The smallest date range covering every requested period.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidYearFormat` for an empty or
    /// out-of-calendar year set.
    pub fn span(&self) -> Result<PeriodRange, AnalyticsError> {
        match self {
            Self::Range(range) => Ok(*range),
            Self::Years(years) => match (years.first(), years.last()) {
                (Some(first), Some(last)) => PeriodRange::for_years(first, last),
                _ => Err(AnalyticsError::InvalidYearFormat { tokens: Vec::new() }),
            },
        }
    }

    /// The range facts must be loaded for.
    ///
    /// With `lookback`, the span is extended back by one period so the first
    /// requested period can be compared with its predecessor.
    ///
    /// # Errors
    ///
    /// Same as [`PeriodRequest::span`].
    pub fn fetch_range(
        &self,
        granularity: Granularity,
        lookback: bool,
    ) -> Result<PeriodRange, AnalyticsError> {
        let span = self.span()?;
        Ok(if lookback {
            span.extended_back(granularity)
        } else {
            span
        })
    }
}

/// Which pipeline steps a report applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Bucket size.
    pub granularity: Granularity,
    /// Secondary grouping axis; without one, buckets only keep totals.
    pub dimension: Option<DimensionSelector>,
    /// Restricts facts to one dimension value.
    pub filter: Option<DimensionFilter>,
    /// Value entries are ranked by.
    pub measure: Measure,
    /// Ranking size; `None` ranks every entry.
    pub top_n: Option<TopN>,
    /// Entries must strictly exceed this amount to be ranked.
    pub min_amount_floor: Option<Decimal>,
    /// Emit an empty bucket for requested periods without facts.
    pub zero_fill_requested_periods: bool,
    /// Annotate period-over-period growth.
    pub growth: bool,
}

impl AggregationConfig {
    /// Plain totals at `granularity`.
    #[must_use]
    pub const fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            dimension: None,
            filter: None,
            measure: Measure::Amount,
            top_n: None,
            min_amount_floor: None,
            zero_fill_requested_periods: false,
            growth: false,
        }
    }

    /// Groups entries by `dimension`.
    #[must_use]
    pub const fn with_dimension(mut self, dimension: DimensionSelector) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Restricts facts to `filter`, if any.
    #[must_use]
    pub fn with_filter(mut self, filter: Option<DimensionFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Ranks by `measure`.
    #[must_use]
    pub const fn with_measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    /// Keeps the first `top_n` ranked entries.
    #[must_use]
    pub const fn with_top_n(mut self, top_n: TopN) -> Self {
        self.top_n = Some(top_n);
        self
    }

    /// Drops entries not exceeding `floor` before ranking.
    #[must_use]
    pub const fn with_floor(mut self, floor: Decimal) -> Self {
        self.min_amount_floor = Some(floor);
        self
    }

    /// Emits every requested period, empty or not.
    #[must_use]
    pub const fn zero_filled(mut self) -> Self {
        self.zero_fill_requested_periods = true;
        self
    }

    /// Annotates growth.
    #[must_use]
    pub const fn with_growth(mut self) -> Self {
        self.growth = true;
        self
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationOutcome {
    /// Requested period keys.
    pub requested: BTreeSet<PeriodKey>,
    /// Buckets of requested periods.
    pub buckets: BTreeMap<PeriodKey, Bucket>,
    /// Ranked entries per bucket; empty without a dimension.
    pub ranked: BTreeMap<PeriodKey, Vec<RankedEntry>>,
    /// Growth of bucket totals, one entry per requested period.
    pub growth: Vec<GrowthEntry>,
    /// Growth per dimension key.
    pub dimensional_growth: Vec<DimensionalGrowthEntry>,
}

impl AggregationOutcome {
    /// Growth annotation of `period`.
    #[must_use]
    pub fn growth_for(&self, period: PeriodKey) -> Option<&GrowthEntry> {
        self.growth.iter().find(|entry| entry.period == period)
    }

    /// Growth annotation of `dimension_key` within `period`.
    #[must_use]
    pub fn dimensional_growth_for(
        &self,
        period: PeriodKey,
        dimension_key: &str,
    ) -> Option<&DimensionalGrowthEntry> {
        self.dimensional_growth
            .iter()
            .find(|entry| entry.period == period && entry.dimension_key == dimension_key)
    }
}

/// Runs the aggregation pipeline.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Aggregates `facts` over the periods of `request`.
    ///
    /// Growth is computed before the amount floor is applied, so a dropped
    /// entry still serves as the previous value of the next period.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::UnknownDimensionValue` when the configured
    /// filter matches no fact in the requested window, or a period error from
    /// the request.
    pub fn run(
        facts: &[Fact],
        request: &PeriodRequest,
        config: &AggregationConfig,
    ) -> Result<AggregationOutcome, AnalyticsError> {
        let window = request.span()?;
        let fetch_range = request.fetch_range(config.granularity, config.growth)?;
        let requested = request.requested_keys(config.granularity);

        let selected: Vec<&Fact> = match &config.filter {
            Some(filter) => filter_facts(facts, &fetch_range, &window, filter)?,
            None => facts.iter().collect(),
        };

        let mut grouped = group(selected, &fetch_range, config.granularity, config.dimension);
        if config.zero_fill_requested_periods {
            zero_fill(&mut grouped, &requested);
        }

        let (growth, dimensional_growth) = if config.growth {
            let dimensional = if config.dimension.is_some() {
                annotate_dimensional_growth(&grouped, &requested)
            } else {
                Vec::new()
            };
            (annotate_growth(&grouped, &requested), dimensional)
        } else {
            (Vec::new(), Vec::new())
        };

        let buckets: BTreeMap<PeriodKey, Bucket> = grouped
            .into_iter()
            .filter(|(key, _)| requested.contains(key))
            .collect();

        let ranked = if config.dimension.is_some() {
            buckets
                .iter()
                .map(|(key, bucket)| (*key, Self::rank_bucket(bucket, config)))
                .collect()
        } else {
            BTreeMap::new()
        };

        debug!(
            granularity = ?config.granularity,
            dimension = ?config.dimension,
            facts = facts.len(),
            requested = requested.len(),
            buckets = buckets.len(),
            "Aggregated sales facts"
        );

        Ok(AggregationOutcome {
            requested,
            buckets,
            ranked,
            growth,
            dimensional_growth,
        })
    }

    fn rank_bucket(bucket: &Bucket, config: &AggregationConfig) -> Vec<RankedEntry> {
        let bucket = match config.min_amount_floor {
            Some(floor) => {
                let mut floored = bucket.clone();
                floored.retain_above(floor);
                Cow::Owned(floored)
            }
            None => Cow::Borrowed(bucket),
        };

        match config.top_n {
            Some(top_n) => rank_by(&bucket, top_n, config.measure),
            None => rank_all(&bucket, config.measure),
        }
    }
}
