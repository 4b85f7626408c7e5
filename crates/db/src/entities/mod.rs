//! `SeaORM` entities for the sales schema.

pub mod companies;
pub mod invoice_items;
pub mod invoices;
pub mod po_types;
pub mod products;
pub mod salespersons;
