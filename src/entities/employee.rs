//! Employee entity - A person on a company's payroll.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Opaque document identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Company this employee belongs to
    pub company_id: String,
    /// Full name
    pub name: String,
    /// Job role, `Staff` unless specified
    pub role: String,
    /// Contact phone number, digits only
    pub contact: String,
    /// Base monthly salary
    pub salary: f64,
    /// 13-digit national identity number, stored as entered
    pub cnic: String,
    /// Postal address
    pub address: String,
    /// First working day
    pub joining_date: Date,
    /// When the employee was created
    pub created_at: DateTimeUtc,
}

/// Employees are referenced by convention only; no foreign keys are declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
