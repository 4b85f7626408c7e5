//! Core business logic for Salesdesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `analytics` - Period-bucketed sales aggregation: period parsing, grouping,
//!   ranking, growth and the report catalogue built on top of them

pub mod analytics;
