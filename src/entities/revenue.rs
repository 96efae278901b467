//! Revenue entity - Monthly revenue entries for a company. Append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Revenue database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revenues")]
pub struct Model {
    /// Opaque document identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Company the revenue belongs to
    pub company_id: String,
    /// Calendar year
    pub year: i32,
    /// Calendar month (1-12)
    pub month: i32,
    /// Revenue amount
    pub amount: f64,
    /// When the entry was added
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
