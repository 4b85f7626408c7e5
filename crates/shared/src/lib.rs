//! Shared types, errors, and configuration for Salesdesk.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - JWT claims, roles and token validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Role};
pub use config::{AnalyticsConfig, AppConfig};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
