//! Company entity - A registered small business.
//!
//! Companies own employees, attendance, payroll and revenue records by convention
//! (those documents carry a `company_id`). The `pin` gates the company dashboard.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Opaque document identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name of the company
    pub name: String,
    /// Free-form business type (e.g. "Retail")
    pub business_type: String,
    /// Contact phone number, digits only
    pub contact: String,
    /// Address or city
    pub location: String,
    /// Plaintext access code for the dashboard
    pub pin: String,
    /// Optional government registration number
    pub registration_number: Option<String>,
    /// Optional tax identifier
    pub tax_id: Option<String>,
    /// `file://` URI of the locally stored logo
    pub logo_url: Option<String>,
    /// When the company was created
    pub created_at: DateTimeUtc,
}

/// Companies are referenced by convention only; no foreign keys are declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
