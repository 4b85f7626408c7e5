//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod company;
pub mod sales_fact;

pub use company::CompanyRepository;
pub use sales_fact::SalesFactRepository;
