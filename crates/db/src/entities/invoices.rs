//! `SeaORM` Entity for invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: Date,
    pub salesperson_id: Option<Uuid>,
    pub po_type_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub total_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(
        belongs_to = "super::salespersons::Entity",
        from = "Column::SalespersonId",
        to = "super::salespersons::Column::Id"
    )]
    Salespersons,
    #[sea_orm(
        belongs_to = "super::po_types::Entity",
        from = "Column::PoTypeId",
        to = "super::po_types::Column::Id"
    )]
    PoTypes,
    #[sea_orm(has_many = "super::invoice_items::Entity")]
    InvoiceItems,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::salespersons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salespersons.def()
    }
}

impl Related<super::po_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PoTypes.def()
    }
}

impl Related<super::invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
