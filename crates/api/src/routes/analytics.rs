//! Sales analytics routes.
//!
//! Every report is scoped to the company in the path, which must be the
//! company of the caller's token.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use salesdesk_core::analytics::{
    AnalyticsError, PeriodSalesRow, RankedEntryRow, RankedPeriodRow, SalesAnalyticsService,
    SalesReport, SortKey, reports::whole_units,
};
use salesdesk_db::SalesFactRepository;
use salesdesk_shared::AppError;

/// Creates the analytics routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/analytics/yearly-sales",
            get(get_yearly_sales),
        )
        .route(
            "/companies/{company_id}/analytics/monthly-sales",
            get(get_monthly_sales),
        )
        .route(
            "/companies/{company_id}/analytics/salespersons/yearly",
            get(get_yearly_sales_by_salesperson),
        )
        .route(
            "/companies/{company_id}/analytics/salespersons/monthly-top",
            get(get_monthly_top_salespersons),
        )
        .route(
            "/companies/{company_id}/analytics/po-types/yearly",
            get(get_yearly_sales_by_po_type),
        )
        .route(
            "/companies/{company_id}/analytics/products/by-salesperson",
            get(get_products_sold_by_salesperson),
        )
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters shared by the analytics reports.
///
/// Each report reads the subset it needs.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// Comma-separated years, e.g. `2022,2023`.
    pub years: Option<String>,
    /// First month of the range, e.g. `Jan2023`.
    pub start: Option<String>,
    /// Last month of the range, e.g. `Dec2023`.
    pub end: Option<String>,
    /// Salesperson name filter.
    pub salesperson: Option<String>,
    /// PO type name filter.
    pub po_type: Option<String>,
    /// Number of ranked entries per period, validated by the report.
    pub top_n: Option<String>,
    /// Row order of the monthly report: `period` or `amount`.
    pub sort: Option<String>,
}

impl AnalyticsQuery {
    fn years(&self) -> Result<Vec<&str>, ApiError> {
        let years = required(self.years.as_deref(), "years")?;
        Ok(years.split(',').collect())
    }

    fn range(&self) -> Result<(&str, &str), ApiError> {
        Ok((
            required(self.start.as_deref(), "start")?,
            required(self.end.as_deref(), "end")?,
        ))
    }

    fn sort(&self) -> Result<SortKey, ApiError> {
        self.sort
            .as_deref()
            .map_or(Ok(SortKey::default()), str::parse)
            .map_err(ApiError::from)
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError(AppError::Validation(format!("'{name}' is required"))))
}

// ============================================================================
// Response Types
// ============================================================================

/// Report envelope.
#[derive(Debug, Serialize)]
pub struct ReportResponse<T> {
    /// Report rows.
    pub data: Vec<T>,
}

impl<R, T: From<R>> From<SalesReport<R>> for ReportResponse<T> {
    fn from(report: SalesReport<R>) -> Self {
        Self {
            data: report.data.into_iter().map(T::from).collect(),
        }
    }
}

/// Total of one period.
#[derive(Debug, Serialize)]
pub struct PeriodSalesResponse {
    /// Period, e.g. `2023` or `Jan2023`.
    pub period: String,
    /// Total invoiced, in whole currency units.
    pub total_invoice: String,
    /// Units sold.
    pub total_quantity: i64,
    /// Total of the preceding period.
    pub previous_total: String,
    /// Growth percent, `null` when there is nothing to compare against.
    pub growth_percent: Option<f64>,
}

impl From<PeriodSalesRow> for PeriodSalesResponse {
    fn from(row: PeriodSalesRow) -> Self {
        Self {
            period: row.period.to_string(),
            total_invoice: money(row.total_invoice),
            total_quantity: row.total_quantity,
            previous_total: money(row.previous_total),
            growth_percent: row.growth_percent.and_then(|g| g.to_f64()),
        }
    }
}

/// Ranked entries of one period.
#[derive(Debug, Serialize)]
pub struct RankedPeriodResponse {
    /// Period, e.g. `2023` or `Jan2023`.
    pub period: String,
    /// Total invoiced in the period, in whole currency units.
    pub total_invoice: String,
    /// Units sold in the period.
    pub total_quantity: i64,
    /// Ranked entries, best first.
    pub entries: Vec<RankedEntryResponse>,
}

impl From<RankedPeriodRow> for RankedPeriodResponse {
    fn from(row: RankedPeriodRow) -> Self {
        Self {
            period: row.period.to_string(),
            total_invoice: money(row.total_invoice),
            total_quantity: row.total_quantity,
            entries: row.entries.into_iter().map(Into::into).collect(),
        }
    }
}

/// One ranked salesperson, PO type or product.
#[derive(Debug, Serialize)]
pub struct RankedEntryResponse {
    /// Dimension value.
    pub name: String,
    /// Amount, in whole currency units.
    pub amount: String,
    /// Units sold.
    pub quantity: i64,
    /// 1-based rank.
    pub rank: usize,
    /// Amount in the preceding period; absent on reports without growth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_amount: Option<String>,
    /// Growth percent; `null` when there is nothing to compare against.
    pub growth_percent: Option<f64>,
}

impl From<RankedEntryRow> for RankedEntryResponse {
    fn from(row: RankedEntryRow) -> Self {
        Self {
            name: row.name,
            amount: money(row.amount),
            quantity: row.quantity,
            rank: row.rank,
            previous_amount: row.previous_amount.map(money),
            growth_percent: row.growth_percent.and_then(|g| g.to_f64()),
        }
    }
}

fn money(amount: Decimal) -> String {
    whole_units(amount).to_string()
}

// ============================================================================
// Errors
// ============================================================================

/// Error returned by analytics handlers, rendered as `{ "error", "message" }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!(error = %self.0, "Analytics request failed");
        }
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.to_body())).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

type ReportResult<T> = Result<Json<ReportResponse<T>>, ApiError>;

fn analytics_service(state: &AppState) -> SalesAnalyticsService<SalesFactRepository> {
    SalesAnalyticsService::new(
        SalesFactRepository::new(state.db.as_ref().clone()),
        state.analytics.clone(),
    )
}

/// GET /companies/{company_id}/analytics/yearly-sales?years=2022,2023
async fn get_yearly_sales(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ReportResult<PeriodSalesResponse> {
    let company_id = auth.require_sales_access(company_id)?;
    let years = query.years()?;

    let report = analytics_service(&state)
        .yearly_sales(company_id, &years)
        .await?;
    Ok(Json(report.into()))
}

/// GET /companies/{company_id}/analytics/monthly-sales?start=Jan2023&end=Dec2023&sort=amount
async fn get_monthly_sales(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ReportResult<PeriodSalesResponse> {
    let company_id = auth.require_sales_access(company_id)?;
    let (start, end) = query.range()?;
    let sort = query.sort()?;

    let report = analytics_service(&state)
        .monthly_sales(company_id, start, end, sort)
        .await?;
    Ok(Json(report.into()))
}

/// GET /companies/{company_id}/analytics/salespersons/yearly?years=2023&salesperson=Ana&top_n=5
async fn get_yearly_sales_by_salesperson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ReportResult<RankedPeriodResponse> {
    let company_id = auth.require_sales_access(company_id)?;
    let years = query.years()?;

    let report = analytics_service(&state)
        .yearly_sales_by_salesperson(
            company_id,
            &years,
            query.salesperson.as_deref(),
            query.top_n.as_deref(),
        )
        .await?;
    Ok(Json(report.into()))
}

/// GET /companies/{company_id}/analytics/salespersons/monthly-top?start=Jan2023&end=Mar2023
async fn get_monthly_top_salespersons(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ReportResult<RankedPeriodResponse> {
    let company_id = auth.require_sales_access(company_id)?;
    let (start, end) = query.range()?;

    let report = analytics_service(&state)
        .monthly_top_salespersons(company_id, start, end, query.top_n.as_deref())
        .await?;
    Ok(Json(report.into()))
}

/// GET /companies/{company_id}/analytics/po-types/yearly?years=2023&po_type=Retail
async fn get_yearly_sales_by_po_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ReportResult<RankedPeriodResponse> {
    let company_id = auth.require_sales_access(company_id)?;
    let years = query.years()?;

    let report = analytics_service(&state)
        .yearly_sales_by_po_type(company_id, &years, query.po_type.as_deref())
        .await?;
    Ok(Json(report.into()))
}

/// GET /companies/{company_id}/analytics/products/by-salesperson?start=Jan2023&end=Jun2023&salesperson=Ana
async fn get_products_sold_by_salesperson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> ReportResult<RankedPeriodResponse> {
    let company_id = auth.require_sales_access(company_id)?;
    let (start, end) = query.range()?;

    let report = analytics_service(&state)
        .products_sold_by_salesperson(
            company_id,
            start,
            end,
            query.salesperson.as_deref(),
            query.top_n.as_deref(),
        )
        .await?;
    Ok(Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use axum::{
        body::Body,
        http::{Request, header::AUTHORIZATION},
    };
    use http_body_util::BodyExt;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use salesdesk_core::analytics::PeriodKey;
    use salesdesk_shared::{AnalyticsConfig, JwtConfig, JwtService, Role};
    use sea_orm::DatabaseConnection;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// State whose database is never reachable, so any request that gets
    /// past validation fails with a database error.
    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "test-secret-key-for-testing".to_string(),
                access_token_expires_minutes: 15,
            })),
            analytics: AnalyticsConfig::default(),
        }
    }

    fn token(state: &AppState, company_id: Uuid, role: Role) -> String {
        state
            .jwt_service
            .issue_access_token(Uuid::new_v4(), company_id, role)
            .expect("should issue token")
    }

    async fn get(state: AppState, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = create_router(state)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn yearly_uri(company_id: Uuid, query: &str) -> String {
        format!("/api/v1/companies/{company_id}/analytics/yearly-sales?{query}")
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (status, body) = get(test_state(), &yearly_uri(Uuid::new_v4(), "years=2023"), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
        assert_eq!(
            body["message"],
            "Authorization header with Bearer token is required"
        );
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let (status, body) = get(
            test_state(),
            &yearly_uri(Uuid::new_v4(), "years=2023"),
            Some("not-a-jwt"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
        assert_eq!(body["message"], "Invalid or malformed token");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_unauthorized() {
        let forged = JwtService::new(JwtConfig {
            secret: "some-other-secret".to_string(),
            access_token_expires_minutes: 15,
        })
        .issue_access_token(Uuid::new_v4(), Uuid::new_v4(), Role::Owner)
        .unwrap();

        let (status, body) = get(
            test_state(),
            &yearly_uri(Uuid::new_v4(), "years=2023"),
            Some(&forged),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
        assert_eq!(body["message"], "Invalid or malformed token");
    }

    #[tokio::test]
    async fn test_other_company_is_forbidden() {
        let state = test_state();
        let token = token(&state, Uuid::new_v4(), Role::Owner);

        let (status, body) = get(state, &yearly_uri(Uuid::new_v4(), "years=2023"), Some(&token)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_role_without_analytics_access_is_forbidden() {
        let state = test_state();
        let company_id = Uuid::new_v4();
        let token = token(&state, company_id, Role::Cashier);

        let (status, _) = get(state, &yearly_uri(company_id, "years=2023"), Some(&token)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[case::bad_year("yearly-sales?years=2023,20x3")]
    #[case::missing_years("yearly-sales")]
    #[case::blank_years("yearly-sales?years=")]
    #[case::bad_period("monthly-sales?start=Foo2023&end=Dec2023")]
    #[case::reversed_range("monthly-sales?start=Dec2023&end=Jan2023")]
    #[case::missing_end("monthly-sales?start=Jan2023")]
    #[case::bad_sort("monthly-sales?start=Jan2023&end=Dec2023&sort=total")]
    #[case::zero_top_n("salespersons/yearly?years=2023&top_n=0")]
    #[case::negative_top_n("salespersons/monthly-top?start=Jan2023&end=Feb2023&top_n=-1")]
    #[case::non_numeric_top_n("salespersons/yearly?years=2023&top_n=abc")]
    #[case::fractional_top_n("products/by-salesperson?start=Jan2023&end=Feb2023&top_n=2.5")]
    #[case::empty_year_token("yearly-sales?years=2022,,2023")]
    #[case::bad_products_period("products/by-salesperson?start=Jan23&end=Feb2023")]
    #[case::bad_po_type_year("po-types/yearly?years=abcd")]
    #[tokio::test]
    async fn test_invalid_parameters_rejected_before_database(#[case] path: &str) {
        let state = test_state();
        let company_id = Uuid::new_v4();
        let token = token(&state, company_id, Role::SalesManager);
        let uri = format!("/api/v1/companies/{company_id}/analytics/{path}");

        let (status, body) = get(state, &uri, Some(&token)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_database_failure_does_not_leak_details() {
        let state = test_state();
        let company_id = Uuid::new_v4();
        let token = token(&state, company_id, Role::Viewer);

        let (status, body) = get(state, &yearly_uri(company_id, "years=2023"), Some(&token)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = get(test_state(), "/api/v1/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], "down");
    }

    #[test]
    fn test_period_row_response_formats_money_and_growth() {
        let response = PeriodSalesResponse::from(PeriodSalesRow {
            period: PeriodKey::Year(2023),
            total_invoice: dec!(1500.50),
            total_quantity: 7,
            previous_total: dec!(1000),
            growth_percent: Some(dec!(50.0)),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["period"], "2023");
        assert_eq!(json["total_invoice"], "1501");
        assert_eq!(json["previous_total"], "1000");
        assert_eq!(json["growth_percent"], json!(50.0));
    }

    #[test]
    fn test_ranked_entry_without_growth_omits_previous_amount() {
        let response = RankedEntryResponse::from(RankedEntryRow {
            name: "Ana".to_string(),
            amount: dec!(200),
            quantity: 0,
            rank: 1,
            previous_amount: None,
            growth_percent: None,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["name"], "Ana");
        assert!(json.get("previous_amount").is_none());
        assert_eq!(json["growth_percent"], Value::Null);
    }
}
