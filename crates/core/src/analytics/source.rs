//! Data-access seam for sales facts.
//!
//! Implemented by the database layer; the analytics core only awaits it to
//! obtain the tenant and the facts of a request.

use async_trait::async_trait;
use salesdesk_shared::types::CompanyId;
use serde::Serialize;

use super::error::AnalyticsError;
use super::period::PeriodRange;
use super::types::{DimensionFilter, Fact};

/// A company confirmed to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantContext {
    /// Company ID.
    pub company_id: CompanyId,
    /// Company display name.
    pub name: String,
}

impl TenantContext {
    /// Creates a tenant context.
    #[must_use]
    pub fn new(company_id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            company_id,
            name: name.into(),
        }
    }
}

/// Granularity of the facts a report needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    /// One fact per invoice, amount = invoice total.
    Invoices,
    /// One fact per invoice line, with product and quantity.
    InvoiceLines,
}

/// What to load for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactQuery {
    /// Inclusive date window, already extended for growth lookback.
    pub range: PeriodRange,
    /// Invoice or line facts.
    pub kind: FactKind,
    /// Optional dimension filter; sources may push it down or ignore it.
    pub filter: Option<DimensionFilter>,
}

/// Supplies tenants and facts to the analytics service.
#[async_trait]
pub trait SalesFactSource: Send + Sync {
    /// Looks up a company, `None` when it does not exist.
    async fn find_tenant(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<TenantContext>, AnalyticsError>;

    /// Loads the facts of `tenant` matching `query`.
    async fn load_facts(
        &self,
        tenant: &TenantContext,
        query: &FactQuery,
    ) -> Result<Vec<Fact>, AnalyticsError>;
}
