//! Sales analytics data types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AnalyticsError;
use super::period::PeriodKey;

/// Label used for facts that carry no value for a dimension.
pub const UNKNOWN_DIMENSION: &str = "Unknown";

/// Optional grouping labels attached to a fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactLabels {
    /// Salesperson name.
    pub salesperson: Option<String>,
    /// Purchase-order type name.
    pub po_type: Option<String>,
    /// Product name (invoice lines only).
    pub product: Option<String>,
}

/// One revenue-bearing record: an invoice or an invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Invoice date.
    pub occurred_on: NaiveDate,
    /// Signed amount in the company currency.
    pub amount: Decimal,
    /// Units, when the record carries a count.
    pub quantity: Option<i64>,
    /// Grouping labels.
    pub labels: FactLabels,
}

impl Fact {
    /// Creates a fact without labels or quantity.
    #[must_use]
    pub fn new(occurred_on: NaiveDate, amount: Decimal) -> Self {
        Self {
            occurred_on,
            amount,
            quantity: None,
            labels: FactLabels::default(),
        }
    }

    /// Sets the unit count.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the salesperson label.
    #[must_use]
    pub fn with_salesperson(mut self, name: impl Into<String>) -> Self {
        self.labels.salesperson = Some(name.into());
        self
    }

    /// Sets the PO-type label.
    #[must_use]
    pub fn with_po_type(mut self, name: impl Into<String>) -> Self {
        self.labels.po_type = Some(name.into());
        self
    }

    /// Sets the product label.
    #[must_use]
    pub fn with_product(mut self, name: impl Into<String>) -> Self {
        self.labels.product = Some(name.into());
        self
    }

    /// The label this fact is grouped under for `selector`.
    ///
    /// Missing or blank labels read as [`UNKNOWN_DIMENSION`].
    #[must_use]
    pub fn dimension_key(&self, selector: DimensionSelector) -> &str {
        let label = match selector {
            DimensionSelector::Salesperson => self.labels.salesperson.as_deref(),
            DimensionSelector::PoType => self.labels.po_type.as_deref(),
            DimensionSelector::Product => self.labels.product.as_deref(),
        };

        label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(UNKNOWN_DIMENSION)
    }
}

/// Secondary grouping axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSelector {
    /// Group by salesperson.
    Salesperson,
    /// Group by purchase-order type.
    PoType,
    /// Group by product.
    Product,
}

impl fmt::Display for DimensionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Salesperson => write!(f, "salesperson"),
            Self::PoType => write!(f, "PO type"),
            Self::Product => write!(f, "product"),
        }
    }
}

/// Restricts a report to facts carrying one dimension value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionFilter {
    /// Dimension the value belongs to.
    pub selector: DimensionSelector,
    /// Value to match, compared against [`Fact::dimension_key`].
    pub value: String,
}

impl DimensionFilter {
    /// Builds a filter from an optional request parameter.
    ///
    /// Missing or blank values mean "no filter".
    #[must_use]
    pub fn from_param(selector: DimensionSelector, value: Option<&str>) -> Option<Self> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Self {
                selector,
                value: v.to_string(),
            })
    }

    /// Returns true if `fact` carries the filtered value.
    #[must_use]
    pub fn matches(&self, fact: &Fact) -> bool {
        fact.dimension_key(self.selector) == self.value
    }
}

/// Value entries are ranked by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Invoice amount.
    #[default]
    Amount,
    /// Units sold.
    Quantity,
}

impl Measure {
    /// Reads the measure from accumulated totals.
    #[must_use]
    pub fn value(self, totals: &EntryTotals) -> Decimal {
        match self {
            Self::Amount => totals.amount,
            Self::Quantity => Decimal::from(totals.quantity),
        }
    }
}

/// Accumulated totals for one dimension key inside a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryTotals {
    /// Sum of amounts.
    pub amount: Decimal,
    /// Sum of quantities.
    pub quantity: i64,
}

impl EntryTotals {
    fn add(&mut self, fact: &Fact) {
        self.amount += fact.amount;
        self.quantity = self.quantity.saturating_add(fact.quantity.unwrap_or(0));
    }
}

/// Accumulated totals for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Sum of all fact amounts in the period.
    pub total_amount: Decimal,
    /// Sum of all fact quantities in the period.
    pub total_quantity: i64,
    /// Per-dimension totals; empty when grouping without a dimension.
    pub entries: BTreeMap<String, EntryTotals>,
}

impl Bucket {
    /// Adds a fact to the bucket total and, when given, to `key`'s entry.
    pub fn add(&mut self, fact: &Fact, key: Option<&str>) {
        self.total_amount += fact.amount;
        self.total_quantity = self
            .total_quantity
            .saturating_add(fact.quantity.unwrap_or(0));

        if let Some(key) = key {
            self.entries.entry(key.to_string()).or_default().add(fact);
        }
    }

    /// Drops entries whose amount does not exceed `floor`.
    ///
    /// Bucket totals are left untouched.
    pub fn retain_above(&mut self, floor: Decimal) {
        self.entries.retain(|_, totals| totals.amount > floor);
    }

    /// Amount accumulated for `key`, zero when absent.
    #[must_use]
    pub fn entry_amount(&self, key: &str) -> Decimal {
        self.entries
            .get(key)
            .map_or(Decimal::ZERO, |totals| totals.amount)
    }
}

/// Validated ranking size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopN(usize);

impl TopN {
    /// Default ranking size.
    pub const DEFAULT: Self = Self(5);
    /// Default ranking size of the products-sold-by-salesperson report.
    pub const PRODUCTS_BY_SALESPERSON: Self = Self(3);

    /// Validates a requested ranking size.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidTopN` when `value <= 0`.
    pub fn new(value: i64) -> Result<Self, AnalyticsError> {
        if value <= 0 {
            return Err(AnalyticsError::InvalidTopN(value.to_string()));
        }
        Ok(Self(usize::try_from(value).unwrap_or(usize::MAX)))
    }

    /// Parses an optional request parameter, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidTopN` when a value is given and is not a
    /// positive integer.
    pub fn or_default(value: Option<&str>, default: Self) -> Result<Self, AnalyticsError> {
        value.map_or(Ok(default), str::parse)
    }

    /// The ranking size.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for TopN {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(value) if value > 0 => Self::new(value),
            _ => Err(AnalyticsError::InvalidTopN(s.to_string())),
        }
    }
}

/// One entry of a ranked bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// Dimension value.
    pub dimension_key: String,
    /// Accumulated amount.
    pub amount: Decimal,
    /// Accumulated quantity.
    pub quantity: i64,
    /// 1-based position.
    pub rank: usize,
}

/// Growth annotation of one period total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthEntry {
    /// Period.
    pub period: PeriodKey,
    /// Total for the period, zero when it had no facts.
    pub amount: Decimal,
    /// Total of the immediately preceding period, zero when absent.
    pub previous_amount: Decimal,
    /// Percentage change, one decimal place.
    pub growth_percent: Option<Decimal>,
}

/// Growth annotation of one dimension value within a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionalGrowthEntry {
    /// Period.
    pub period: PeriodKey,
    /// Dimension value.
    pub dimension_key: String,
    /// Amount for the period.
    pub amount: Decimal,
    /// Amount of the same key in the preceding period, zero when absent.
    pub previous_amount: Decimal,
    /// Percentage change, one decimal place.
    pub growth_percent: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn fact(amount: Decimal) -> Fact {
        Fact::new(NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(), amount)
    }

    #[test]
    fn test_missing_or_blank_labels_are_unknown() {
        let bare = fact(dec!(10));
        assert_eq!(bare.dimension_key(DimensionSelector::Salesperson), "Unknown");

        let blank = fact(dec!(10)).with_po_type("   ");
        assert_eq!(blank.dimension_key(DimensionSelector::PoType), "Unknown");

        let named = fact(dec!(10)).with_product(" Widget ");
        assert_eq!(named.dimension_key(DimensionSelector::Product), "Widget");
    }

    #[test]
    fn test_filter_from_param() {
        assert_eq!(
            DimensionFilter::from_param(DimensionSelector::Salesperson, None),
            None
        );
        assert_eq!(
            DimensionFilter::from_param(DimensionSelector::Salesperson, Some("  ")),
            None
        );

        let filter =
            DimensionFilter::from_param(DimensionSelector::Salesperson, Some(" Ana ")).unwrap();
        assert!(filter.matches(&fact(dec!(1)).with_salesperson("Ana")));
        assert!(!filter.matches(&fact(dec!(1)).with_salesperson("Budi")));
    }

    #[test]
    fn test_bucket_accumulates_exactly() {
        let mut bucket = Bucket::default();
        bucket.add(&fact(dec!(0.1)).with_quantity(2), Some("A"));
        bucket.add(&fact(dec!(0.2)).with_quantity(3), Some("A"));
        bucket.add(&fact(dec!(-0.3)), Some("B"));

        assert_eq!(bucket.total_amount, Decimal::ZERO);
        assert_eq!(bucket.total_quantity, 5);
        assert_eq!(bucket.entry_amount("A"), dec!(0.3));
        assert_eq!(bucket.entry_amount("B"), dec!(-0.3));
        assert_eq!(bucket.entry_amount("C"), Decimal::ZERO);
    }

    #[test]
    fn test_retain_above_keeps_totals() {
        let mut bucket = Bucket::default();
        bucket.add(&fact(dec!(100)), Some("A"));
        bucket.add(&fact(dec!(50)), Some("B"));
        bucket.add(&fact(dec!(10)), Some("C"));

        bucket.retain_above(dec!(50));

        assert_eq!(bucket.entries.keys().collect::<Vec<_>>(), ["A"]);
        assert_eq!(bucket.total_amount, dec!(160));
    }

    #[test]
    fn test_top_n_validation() {
        assert_eq!(TopN::new(0), Err(AnalyticsError::InvalidTopN("0".to_string())));
        assert_eq!(TopN::new(-3), Err(AnalyticsError::InvalidTopN("-3".to_string())));
        assert_eq!(TopN::new(7).unwrap().get(), 7);
        assert_eq!(TopN::default().get(), 5);
        assert_eq!(TopN::or_default(None, TopN::PRODUCTS_BY_SALESPERSON).unwrap().get(), 3);
        assert!(TopN::or_default(Some("0"), TopN::DEFAULT).is_err());
        assert_eq!(TopN::or_default(Some(" 4 "), TopN::DEFAULT).unwrap().get(), 4);
    }

    #[rstest]
    #[case("four")]
    #[case("2.5")]
    #[case("")]
    #[case("-1")]
    fn test_top_n_parse_error_keeps_token(#[case] token: &str) {
        let err = token.parse::<TopN>().unwrap_err();
        assert_eq!(err, AnalyticsError::InvalidTopN(token.to_string()));
        assert!(err.to_string().contains(&format!("'{token}'")));
    }

    #[test]
    fn test_measure_value() {
        let totals = EntryTotals {
            amount: dec!(12.5),
            quantity: 4,
        };
        assert_eq!(Measure::Amount.value(&totals), dec!(12.5));
        assert_eq!(Measure::Quantity.value(&totals), dec!(4));
    }
}
