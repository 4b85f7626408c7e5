//! Sales fact repository.
//!
//! Reads invoices and invoice lines as analytics facts. This is the database
//! implementation of [`SalesFactSource`].

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
    sea_query::{Alias, Expr, Func, IntoIden, SimpleExpr},
};
use tracing::{debug, error};

use salesdesk_core::analytics::{
    AnalyticsError, DimensionFilter, DimensionSelector, Fact, FactKind, FactLabels, FactQuery,
    PeriodRange, SalesFactSource, TenantContext, UNKNOWN_DIMENSION,
};
use salesdesk_shared::types::CompanyId;

use crate::entities::{companies, invoice_items, invoices, po_types, products, salespersons};

#[derive(Debug, FromQueryResult)]
struct InvoiceFactRow {
    invoice_date: NaiveDate,
    total_amount: Decimal,
    salesperson_name: Option<String>,
    po_type_name: Option<String>,
}

impl From<InvoiceFactRow> for Fact {
    fn from(row: InvoiceFactRow) -> Self {
        Self {
            occurred_on: row.invoice_date,
            amount: row.total_amount,
            quantity: None,
            labels: FactLabels {
                salesperson: row.salesperson_name,
                po_type: row.po_type_name,
                product: None,
            },
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct LineFactRow {
    invoice_date: NaiveDate,
    line_total: Decimal,
    quantity: i64,
    product_name: Option<String>,
    salesperson_name: Option<String>,
    po_type_name: Option<String>,
}

impl From<LineFactRow> for Fact {
    fn from(row: LineFactRow) -> Self {
        Self {
            occurred_on: row.invoice_date,
            amount: row.line_total,
            quantity: Some(row.quantity),
            labels: FactLabels {
                salesperson: row.salesperson_name,
                po_type: row.po_type_name,
                product: row.product_name,
            },
        }
    }
}

/// Loads sales facts for the analytics service.
#[derive(Debug, Clone)]
pub struct SalesFactRepository {
    db: DatabaseConnection,
}

impl SalesFactRepository {
    /// Creates a new sales fact repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// One fact per invoice of `company_id` dated inside `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn invoice_facts(
        &self,
        company_id: CompanyId,
        range: &PeriodRange,
        filter: Option<&DimensionFilter>,
    ) -> Result<Vec<Fact>, DbErr> {
        let query = invoices::Entity::find()
            .select_only()
            .column_as(invoices::Column::InvoiceDate, "invoice_date")
            .column_as(invoices::Column::TotalAmount, "total_amount")
            .column_as(salespersons::Column::Name, "salesperson_name")
            .column_as(po_types::Column::Name, "po_type_name")
            .join(JoinType::LeftJoin, invoices::Relation::Salespersons.def())
            .join(JoinType::LeftJoin, invoices::Relation::PoTypes.def())
            .filter(invoices::Column::CompanyId.eq(company_id.into_inner()))
            .filter(invoices::Column::InvoiceDate.between(range.start(), range.end()));

        let rows = push_down(query, filter, FactKind::Invoices)
            .order_by_asc(invoices::Column::InvoiceDate)
            .into_model::<InvoiceFactRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Fact::from).collect())
    }

    /// One fact per invoice line of `company_id` dated inside `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn line_facts(
        &self,
        company_id: CompanyId,
        range: &PeriodRange,
        filter: Option<&DimensionFilter>,
    ) -> Result<Vec<Fact>, DbErr> {
        let query = invoice_items::Entity::find()
            .select_only()
            .column_as(invoices::Column::InvoiceDate, "invoice_date")
            .column_as(invoice_items::Column::LineTotal, "line_total")
            .column_as(invoice_items::Column::Quantity, "quantity")
            .column_as(products::Column::Name, "product_name")
            .column_as(salespersons::Column::Name, "salesperson_name")
            .column_as(po_types::Column::Name, "po_type_name")
            .join(JoinType::InnerJoin, invoice_items::Relation::Invoices.def())
            .join(JoinType::LeftJoin, invoice_items::Relation::Products.def())
            .join(JoinType::LeftJoin, invoices::Relation::Salespersons.def())
            .join(JoinType::LeftJoin, invoices::Relation::PoTypes.def())
            .filter(invoices::Column::CompanyId.eq(company_id.into_inner()))
            .filter(invoices::Column::InvoiceDate.between(range.start(), range.end()));

        let rows = push_down(query, filter, FactKind::InvoiceLines)
            .order_by_asc(invoices::Column::InvoiceDate)
            .into_model::<LineFactRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Fact::from).collect())
    }
}

/// Adds the dimension filter to the query where SQL can express it.
///
/// Names are compared trimmed, the way the analytics core labels facts. The
/// `Unknown` label stands for missing names and is left to the analytics
/// core, as are product filters on invoice facts.
fn push_down<E: EntityTrait>(
    query: Select<E>,
    filter: Option<&DimensionFilter>,
    kind: FactKind,
) -> Select<E> {
    let Some(filter) = filter.filter(|f| f.value != UNKNOWN_DIMENSION) else {
        return query;
    };
    let value = filter.value.as_str();

    match (filter.selector, kind) {
        (DimensionSelector::Salesperson, _) => query.filter(trimmed_name_eq(
            salespersons::Entity,
            salespersons::Column::Name,
            value,
        )),
        (DimensionSelector::PoType, _) => {
            query.filter(trimmed_name_eq(po_types::Entity, po_types::Column::Name, value))
        }
        (DimensionSelector::Product, FactKind::InvoiceLines) => {
            query.filter(trimmed_name_eq(products::Entity, products::Column::Name, value))
        }
        (DimensionSelector::Product, FactKind::Invoices) => query,
    }
}

/// `TRIM(table.column) = value`
fn trimmed_name_eq<T: IntoIden + 'static, C: IntoIden + 'static>(table: T, column: C, value: &str) -> SimpleExpr {
    Expr::expr(Func::cust(Alias::new("TRIM")).arg(Expr::col((table, column)))).eq(value)
}

fn data_source_error(err: &DbErr) -> AnalyticsError {
    error!(error = %err, "Sales fact query failed");
    AnalyticsError::DataSource(err.to_string())
}

#[async_trait]
impl SalesFactSource for SalesFactRepository {
    async fn find_tenant(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<TenantContext>, AnalyticsError> {
        let company = companies::Entity::find_by_id(company_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| data_source_error(&e))?;

        Ok(company.map(|c| TenantContext::new(company_id, c.name)))
    }

    async fn load_facts(
        &self,
        tenant: &TenantContext,
        query: &FactQuery,
    ) -> Result<Vec<Fact>, AnalyticsError> {
        let filter = query.filter.as_ref();
        let facts = match query.kind {
            FactKind::Invoices => {
                self.invoice_facts(tenant.company_id, &query.range, filter)
                    .await
            }
            FactKind::InvoiceLines => {
                self.line_facts(tenant.company_id, &query.range, filter)
                    .await
            }
        }
        .map_err(|e| data_source_error(&e))?;

        debug!(
            company_id = %tenant.company_id,
            kind = ?query.kind,
            count = facts.len(),
            "Loaded facts from database"
        );

        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_invoice_row_into_fact() {
        let fact = Fact::from(InvoiceFactRow {
            invoice_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            total_amount: dec!(1500.2500),
            salesperson_name: Some("Ana".to_string()),
            po_type_name: None,
        });

        assert_eq!(fact.amount, dec!(1500.25));
        assert_eq!(fact.quantity, None);
        assert_eq!(fact.dimension_key(DimensionSelector::Salesperson), "Ana");
        assert_eq!(fact.dimension_key(DimensionSelector::PoType), "Unknown");
    }

    #[test]
    fn test_line_row_into_fact() {
        let fact = Fact::from(LineFactRow {
            invoice_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            line_total: dec!(30),
            quantity: 3,
            product_name: Some("Bolt".to_string()),
            salesperson_name: None,
            po_type_name: Some("Retail".to_string()),
        });

        assert_eq!(fact.quantity, Some(3));
        assert_eq!(fact.dimension_key(DimensionSelector::Product), "Bolt");
        assert_eq!(fact.dimension_key(DimensionSelector::Salesperson), "Unknown");
    }

    #[rstest]
    #[case(DimensionSelector::Salesperson, "Ana", r#"TRIM("salespersons"."name") = 'Ana'"#)]
    #[case(DimensionSelector::PoType, "Retail", r#"TRIM("po_types"."name") = 'Retail'"#)]
    #[case(DimensionSelector::Product, "Bolt", r#"TRIM("products"."name") = 'Bolt'"#)]
    fn test_push_down_compares_trimmed_names(
        #[case] selector: DimensionSelector,
        #[case] value: &str,
        #[case] expected: &str,
    ) {
        let filter = DimensionFilter::from_param(selector, Some(value)).unwrap();
        let sql = push_down(invoice_items::Entity::find(), Some(&filter), FactKind::InvoiceLines)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(expected), "{sql}");
    }

    #[test]
    fn test_push_down_skips_unknown_label() {
        let filter =
            DimensionFilter::from_param(DimensionSelector::Salesperson, Some(UNKNOWN_DIMENSION))
                .unwrap();
        let sql = push_down(invoices::Entity::find(), Some(&filter), FactKind::Invoices)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("TRIM"), "{sql}");
    }
}
