//! Appointment entity - The record of a single booking.
//!
//! An appointment snapshots the slot and patient at booking time. It is written
//! once and never updated, so it can outlive the slot it refers to.

use super::doctor::Slot;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Patient details recorded with an appointment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Patient {
    /// Patient identifier
    pub id: String,
    /// Patient name
    pub name: String,
    /// Patient contact number
    pub contact: String,
    /// Reason for the visit, may be empty
    pub reason: String,
}

/// Appointment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    /// Opaque document identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Doctor who was booked
    pub doctor_id: String,
    /// Doctor name at booking time
    pub doctor_name: String,
    /// Hospital the booking was made through
    pub hospital_id: String,
    /// Hospital name at booking time
    pub hospital_name: String,
    /// Slot as it was before booking
    #[sea_orm(column_type = "Json")]
    pub slot: Slot,
    /// Who the appointment is for
    #[sea_orm(column_type = "Json")]
    pub patient: Patient,
    /// Always `booked`
    pub status: String,
    /// When the booking was made
    pub created_at: DateTimeUtc,
}

/// Appointments are referenced by convention only; no foreign keys are declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
