//! Doctor entity - A doctor and the appointment slots they offer.
//!
//! Slots are embedded in the doctor document as a JSON array. Every write to the
//! array bumps `slots_version`, which lets writers detect concurrent changes.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Patient details attached to a booked slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedBy {
    /// Patient identifier (`temp-{millis}` for walk-ins)
    pub patient_id: String,
    /// Patient name
    pub name: String,
    /// Patient contact number
    pub contact: String,
    /// Reason for the visit, may be empty
    pub reason: String,
}

/// An appointment time offered by a doctor.
///
/// `available == false` exactly when `booked_by` is present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Slot identifier, unique within the doctor
    pub id: String,
    /// Date as `YYYY-MM-DD`
    pub date: String,
    /// Time as `HH:MM`
    pub time: String,
    /// Whether the slot can still be booked
    pub available: bool,
    /// Who booked the slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked_by: Option<BookedBy>,
}

impl Slot {
    /// Checks that the availability flag agrees with the booking payload.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.available == self.booked_by.is_none()
    }
}

/// Ordered slot list stored as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SlotList(pub Vec<Slot>);

/// Doctor database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    /// Opaque document identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Full name
    pub name: String,
    /// Plaintext access code for the doctor dashboard
    pub pin: String,
    /// Medical specialization
    pub specialization: String,
    /// Contact phone number
    pub contact: String,
    /// Offered slots in insertion order
    #[sea_orm(column_type = "Json")]
    pub slots: SlotList,
    /// Incremented on every slot list write
    pub slots_version: i64,
    /// When the doctor was created
    pub created_at: DateTimeUtc,
}

/// Doctors are referenced by convention only; no foreign keys are declared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
