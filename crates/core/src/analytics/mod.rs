//! Sales analytics.
//!
//! A request-scoped pipeline over invoice facts:
//! - Period parsing (`Jan2023`, `2023`) into calendar boundaries
//! - Grouping facts into yearly or monthly buckets, optionally per dimension
//! - Ranking the entries of a bucket (top-N)
//! - Year-over-year / period-over-period growth
//!
//! `SalesAggregator` runs the whole pipeline from an `AggregationConfig`;
//! `SalesAnalyticsService` wraps it with the tenant check and fact loading
//! and exposes one method per report shape.

pub mod engine;
pub mod error;
pub mod grouping;
pub mod growth;
pub mod period;
pub mod ranking;
pub mod reports;
pub mod service;
pub mod source;
pub mod types;


pub use engine::{AggregationConfig, AggregationOutcome, PeriodRequest, SalesAggregator};
pub use error::AnalyticsError;
pub use period::{
    CalendarMonth, Granularity, MONTH_ABBREVIATIONS, PeriodKey, PeriodRange, YearSet,
    build_range, parse_period, parse_year,
};
pub use reports::{PeriodSalesRow, RankedEntryRow, RankedPeriodRow, SalesReport, SortKey};
pub use service::SalesAnalyticsService;
pub use source::{FactKind, FactQuery, SalesFactSource, TenantContext};
pub use types::*;
