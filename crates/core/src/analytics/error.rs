//! Sales analytics error types.

use salesdesk_shared::AppError;
use salesdesk_shared::types::CompanyId;
use thiserror::Error;

use super::period::CalendarMonth;
use super::types::DimensionSelector;

/// Errors raised while building a sales report.
///
/// Everything except `DataSource` is a precondition violation by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// Period string is not a month abbreviation followed by a four-digit year.
    #[error("Invalid period format: '{0}' (expected e.g. Jan2023)")]
    InvalidPeriodFormat(String),

    /// One or more year tokens are not four-digit years.
    #[error("Invalid year format: {}", describe_tokens(.tokens))]
    InvalidYearFormat {
        /// Every offending token, in input order.
        tokens: Vec<String>,
    },

    /// Start period is after end period.
    #[error("Invalid range order: {start} is after {end}")]
    InvalidRangeOrder {
        /// Requested start month.
        start: CalendarMonth,
        /// Requested end month.
        end: CalendarMonth,
    },

    /// Ranking size must be at least one.
    #[error("Invalid top N: '{0}' (must be an integer of at least 1)")]
    InvalidTopN(String),

    /// Sort key is neither `period` nor `amount`.
    #[error("Invalid sort key: '{0}' (expected period or amount)")]
    InvalidSortKey(String),

    /// Company does not exist.
    #[error("Company not found: {0}")]
    TenantNotFound(CompanyId),

    /// Filter value matches no fact in the requested window.
    #[error("Unknown {dimension} value: {value}")]
    UnknownDimensionValue {
        /// Dimension the filter applies to.
        dimension: DimensionSelector,
        /// The filter value as supplied.
        value: String,
    },

    /// The data-access collaborator failed.
    #[error("Data source error: {0}")]
    DataSource(String),
}

fn describe_tokens(tokens: &[String]) -> String {
    if tokens.is_empty() {
        "no years given".to_string()
    } else {
        tokens
            .iter()
            .map(|t| format!("'{t}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::TenantNotFound(_) => Self::NotFound(err.to_string()),
            AnalyticsError::DataSource(msg) => Self::Database(msg),
            AnalyticsError::InvalidPeriodFormat(_)
            | AnalyticsError::InvalidYearFormat { .. }
            | AnalyticsError::InvalidRangeOrder { .. }
            | AnalyticsError::InvalidTopN(_)
            | AnalyticsError::InvalidSortKey(_)
            | AnalyticsError::UnknownDimensionValue { .. } => Self::Validation(err.to_string()),
        }
    }
}
