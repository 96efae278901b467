//! Payroll entity - A calculated salary for one employee and month.
//!
//! Records are produced by the payroll calculation and only ever move from
//! `pending` to `paid`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment status of a payroll record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    /// Calculated, not yet paid out
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid out; terminal
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Payroll database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll")]
pub struct Model {
    /// Opaque document identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Employee being paid
    pub employee_id: String,
    /// Employee's company
    pub company_id: String,
    /// Calendar month (1-12)
    pub month: i32,
    /// Calendar year
    pub year: i32,
    /// Base monthly salary used for the calculation
    pub monthly_salary: f64,
    /// Days with status Present
    pub present_days: i32,
    /// Days with status Half-day
    pub half_days: i32,
    /// Days with status Absent (Sundays included)
    pub absent_days: i32,
    /// Sum of hours over the month
    pub total_hours: i32,
    /// Amount owed for the month
    pub total_salary: f64,
    /// Date by which the salary should be paid
    pub deadline_date: Date,
    /// Payment status
    pub status: PayrollStatus,
    /// When the record was (re)calculated
    pub calculated_at: DateTimeUtc,
}

/// Payroll records are referenced by convention only; no foreign keys are declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
