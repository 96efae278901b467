//! Attendance entity - One employee's attendance for one calendar month.
//!
//! The document ID is the composite `{employee_id}_{year}_{month}`, and the
//! `days` column holds one entry per calendar day of the month. Records are
//! always written whole; individual days are never patched.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance status of a single day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Worked at least the full-day threshold
    Present,
    /// Marked as worked, but below the full-day threshold
    #[serde(rename = "Half-day")]
    HalfDay,
    /// Not marked
    Absent,
}

/// One calendar day inside an attendance record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    /// Day of month, starting at 1
    pub day: u32,
    /// Hours worked (0 for absent days)
    pub hours: u32,
    /// Status derived from the hours when the month was saved
    pub status: AttendanceStatus,
}

/// Ordered day entries stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct DayList(pub Vec<DayEntry>);

/// Attendance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    /// Composite key `{employee_id}_{year}_{month}`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Employee the month belongs to
    pub employee_id: String,
    /// Employee's company at the time of saving
    pub company_id: String,
    /// Calendar year
    pub year: i32,
    /// Calendar month (1-12)
    pub month: i32,
    /// One entry per day of the month
    #[sea_orm(column_type = "Json")]
    pub days: DayList,
    /// When this version of the month was saved
    pub created_at: DateTimeUtc,
}

/// Attendance records are referenced by convention only; no foreign keys are declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
