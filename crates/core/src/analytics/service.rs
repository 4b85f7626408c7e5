//! Sales analytics service.
//!
//! One method per report. Each method validates its parameters, checks the
//! tenant once, loads facts through the [`SalesFactSource`] and runs the
//! [`SalesAggregator`].

use salesdesk_shared::AnalyticsConfig;
use salesdesk_shared::types::CompanyId;
use tracing::{debug, warn};

use super::engine::{AggregationConfig, AggregationOutcome, PeriodRequest, SalesAggregator};
use super::error::AnalyticsError;
use super::period::{Granularity, YearSet, build_range};
use super::reports::{
    PeriodSalesRow, RankedPeriodRow, SalesReport, SortKey, period_rows, ranked_rows,
    sort_period_rows,
};
use super::source::{FactKind, FactQuery, SalesFactSource, TenantContext};
use super::types::{DimensionFilter, DimensionSelector, Measure, TopN};

/// Builds sales reports for one company at a time.
pub struct SalesAnalyticsService<S> {
    source: S,
    config: AnalyticsConfig,
}

impl<S: SalesFactSource> SalesAnalyticsService<S> {
    /// Creates a service over `source` with the given thresholds.
    pub const fn new(source: S, config: AnalyticsConfig) -> Self {
        Self { source, config }
    }

    /// Thresholds in use.
    pub const fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Yearly totals with year-over-year growth.
    ///
    /// Every requested year appears, with zero totals when it had no sales.
    pub async fn yearly_sales<Y: AsRef<str> + Sync>(
        &self,
        company_id: CompanyId,
        years: &[Y],
    ) -> Result<SalesReport<PeriodSalesRow>, AnalyticsError> {
        let request = PeriodRequest::Years(YearSet::parse(years)?);
        let config = AggregationConfig::new(Granularity::Year)
            .zero_filled()
            .with_growth();

        let outcome = self
            .aggregate(company_id, &request, FactKind::Invoices, &config)
            .await?;
        Ok(SalesReport::new(period_rows(&outcome)))
    }

    /// Monthly totals over a month range with month-over-month growth.
    pub async fn monthly_sales(
        &self,
        company_id: CompanyId,
        start: &str,
        end: &str,
        sort: SortKey,
    ) -> Result<SalesReport<PeriodSalesRow>, AnalyticsError> {
        let request = PeriodRequest::Range(build_range(start, end)?);
        let config = AggregationConfig::new(Granularity::Month).with_growth();

        let outcome = self
            .aggregate(company_id, &request, FactKind::Invoices, &config)
            .await?;
        let mut rows = period_rows(&outcome);
        sort_period_rows(&mut rows, sort);
        Ok(SalesReport::new(rows))
    }

    /// Top salespersons per year with per-salesperson growth.
    ///
    /// Only salespersons whose yearly total exceeds the annual floor are
    /// ranked.
    pub async fn yearly_sales_by_salesperson<Y: AsRef<str> + Sync>(
        &self,
        company_id: CompanyId,
        years: &[Y],
        salesperson: Option<&str>,
        top_n: Option<&str>,
    ) -> Result<SalesReport<RankedPeriodRow>, AnalyticsError> {
        let request = PeriodRequest::Years(YearSet::parse(years)?);
        let top_n = TopN::or_default(top_n, TopN::DEFAULT)?;
        let config = AggregationConfig::new(Granularity::Year)
            .with_dimension(DimensionSelector::Salesperson)
            .with_filter(DimensionFilter::from_param(
                DimensionSelector::Salesperson,
                salesperson,
            ))
            .with_top_n(top_n)
            .with_floor(self.config.annual_top_salesperson_floor)
            .with_growth();

        let outcome = self
            .aggregate(company_id, &request, FactKind::Invoices, &config)
            .await?;
        Ok(SalesReport::new(ranked_rows(&outcome)))
    }

    /// Top salespersons per month.
    ///
    /// Only salespersons whose monthly total exceeds the monthly floor are
    /// ranked.
    pub async fn monthly_top_salespersons(
        &self,
        company_id: CompanyId,
        start: &str,
        end: &str,
        top_n: Option<&str>,
    ) -> Result<SalesReport<RankedPeriodRow>, AnalyticsError> {
        let request = PeriodRequest::Range(build_range(start, end)?);
        let top_n = TopN::or_default(top_n, TopN::DEFAULT)?;
        let config = AggregationConfig::new(Granularity::Month)
            .with_dimension(DimensionSelector::Salesperson)
            .with_top_n(top_n)
            .with_floor(self.config.monthly_top_salesperson_floor);

        let outcome = self
            .aggregate(company_id, &request, FactKind::Invoices, &config)
            .await?;
        Ok(SalesReport::new(ranked_rows(&outcome)))
    }

    /// Sales per PO type per year, every type ranked, with growth.
    pub async fn yearly_sales_by_po_type<Y: AsRef<str> + Sync>(
        &self,
        company_id: CompanyId,
        years: &[Y],
        po_type: Option<&str>,
    ) -> Result<SalesReport<RankedPeriodRow>, AnalyticsError> {
        let request = PeriodRequest::Years(YearSet::parse(years)?);
        let config = AggregationConfig::new(Granularity::Year)
            .with_dimension(DimensionSelector::PoType)
            .with_filter(DimensionFilter::from_param(DimensionSelector::PoType, po_type))
            .with_growth();

        let outcome = self
            .aggregate(company_id, &request, FactKind::Invoices, &config)
            .await?;
        Ok(SalesReport::new(ranked_rows(&outcome)))
    }

    /// Best-selling products per month by units sold, optionally for one
    /// salesperson.
    pub async fn products_sold_by_salesperson(
        &self,
        company_id: CompanyId,
        start: &str,
        end: &str,
        salesperson: Option<&str>,
        top_n: Option<&str>,
    ) -> Result<SalesReport<RankedPeriodRow>, AnalyticsError> {
        let request = PeriodRequest::Range(build_range(start, end)?);
        let top_n = TopN::or_default(top_n, TopN::PRODUCTS_BY_SALESPERSON)?;
        let config = AggregationConfig::new(Granularity::Month)
            .with_dimension(DimensionSelector::Product)
            .with_filter(DimensionFilter::from_param(
                DimensionSelector::Salesperson,
                salesperson,
            ))
            .with_measure(Measure::Quantity)
            .with_top_n(top_n);

        let outcome = self
            .aggregate(company_id, &request, FactKind::InvoiceLines, &config)
            .await?;
        Ok(SalesReport::new(ranked_rows(&outcome)))
    }

    async fn tenant(&self, company_id: CompanyId) -> Result<TenantContext, AnalyticsError> {
        self.source
            .find_tenant(company_id)
            .await?
            .ok_or(AnalyticsError::TenantNotFound(company_id))
    }

    async fn aggregate(
        &self,
        company_id: CompanyId,
        request: &PeriodRequest,
        kind: FactKind,
        config: &AggregationConfig,
    ) -> Result<AggregationOutcome, AnalyticsError> {
        let tenant = self.tenant(company_id).await?;

        let query = FactQuery {
            range: request.fetch_range(config.granularity, config.growth)?,
            kind,
            filter: config.filter.clone(),
        };

        let facts = self
            .source
            .load_facts(&tenant, &query)
            .await
            .inspect_err(|e| {
                warn!(company_id = %company_id, error = %e, "Failed to load sales facts");
            })?;

        debug!(
            company_id = %company_id,
            kind = ?kind,
            facts = facts.len(),
            "Loaded sales facts"
        );

        SalesAggregator::run(&facts, request, config)
    }
}
