//! Appointment booking - reserving one open slot for a patient.
//!
//! Booking happens in two steps. [`prepare_booking`] validates the patient,
//! reads the doctor's slots fresh and computes the new slot array without
//! writing anything. [`commit_booking`] writes the slot array and then records
//! the appointment. The slot write goes through
//! [`write_slots`](crate::core::doctor::write_slots), so under the
//! compare-and-swap policy a commit built on a stale read fails with
//! [`Error::SlotConflict`] instead of double-booking the slot.
//!
//! The slot write and the appointment insert are separate writes. If the
//! insert fails the slot stays booked without an appointment.

use crate::{
    core::{doctor, hospital, new_document_id, validation},
    entities::{
        appointment::{self, Patient},
        doctor::{BookedBy, Slot},
    },
    errors::{Error, Result},
    store::{ChangeKind, Collection, Store},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// Status recorded on every new appointment.
pub const BOOKED_STATUS: &str = "booked";

/// Patient details typed into the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    /// Patient name (required)
    pub name: String,
    /// Contact number (required)
    pub contact: String,
    /// Reason for the visit
    pub reason: String,
}

/// A booking as chosen on the booking screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Hospital the booking is made through
    pub hospital_id: String,
    /// Doctor to book
    pub doctor_id: String,
    /// Slot picked from the doctor's list
    pub slot_id: String,
    /// Who the appointment is for
    pub patient: PatientForm,
    /// Known patient identifier; walk-ins get a temporary one
    pub patient_id: Option<String>,
}

/// A validated booking, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPlan {
    doctor_id: String,
    doctor_name: String,
    hospital_id: String,
    hospital_name: String,
    read_version: i64,
    slot: Slot,
    updated_slots: Vec<Slot>,
    patient: Patient,
}

impl BookingPlan {
    /// The slot as it was read, before booking.
    #[must_use]
    pub const fn slot(&self) -> &Slot {
        &self.slot
    }

    /// The slot array that will be written.
    #[must_use]
    pub fn updated_slots(&self) -> &[Slot] {
        &self.updated_slots
    }

    /// Patient recorded on the appointment.
    #[must_use]
    pub const fn patient(&self) -> &Patient {
        &self.patient
    }
}

/// The result of a committed booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOutcome {
    /// The new appointment record
    pub appointment: appointment::Model,
    /// The doctor's slot array as written, for refreshing the screen
    pub slots: Vec<Slot>,
}

/// Marks `slot_id` as booked by `booked_by` in a copy of `slots`.
///
/// Every other slot is left untouched.
///
/// # Errors
/// - [`Error::NotFound`] if no slot has that ID
/// - [`Error::SlotUnavailable`] if the slot is already booked
pub fn apply_booking(slots: &[Slot], slot_id: &str, booked_by: BookedBy) -> Result<(Slot, Vec<Slot>)> {
    let position = slots
        .iter()
        .position(|slot| slot.id == slot_id)
        .ok_or_else(|| Error::not_found("Slot", slot_id))?;
    let before = slots[position].clone();
    if !before.available {
        return Err(Error::SlotUnavailable {
            slot_id: slot_id.to_string(),
        });
    }

    let mut updated = slots.to_vec();
    updated[position] = Slot {
        available: false,
        booked_by: Some(booked_by),
        ..before.clone()
    };
    Ok((before, updated))
}

/// Identifier given to patients without one.
fn temporary_patient_id() -> String {
    format!("temp-{}", Utc::now().timestamp_millis())
}

/// Validates the request and computes the booking against a fresh read of the doctor.
#[instrument(skip(store, request), fields(doctor_id = %request.doctor_id, slot_id = %request.slot_id))]
pub async fn prepare_booking(store: &Store, request: &BookingRequest) -> Result<BookingPlan> {
    const MISSING: &str = "Please fill all required fields";
    let name = validation::required(&request.patient.name, MISSING)?;
    let contact = validation::required(&request.patient.contact, MISSING)?;
    let reason = request.patient.reason.trim().to_string();
    let patient_id = request
        .patient_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or_else(temporary_patient_id, str::to_string);

    let hospital = hospital::require_hospital(store, &request.hospital_id).await?;
    let doctor = doctor::require_doctor(store, &request.doctor_id).await?;

    let booked_by = BookedBy {
        patient_id: patient_id.clone(),
        name: name.clone(),
        contact: contact.clone(),
        reason: reason.clone(),
    };
    let (slot, updated_slots) = apply_booking(&doctor.slots.0, &request.slot_id, booked_by)?;

    Ok(BookingPlan {
        doctor_id: doctor.id,
        doctor_name: doctor.name,
        hospital_id: hospital.id,
        hospital_name: hospital.name,
        read_version: doctor.slots_version,
        slot,
        updated_slots,
        patient: Patient {
            id: patient_id,
            name,
            contact,
            reason,
        },
    })
}

/// Writes the slot array and records the appointment.
#[instrument(skip(store, plan), fields(doctor_id = %plan.doctor_id, slot_id = %plan.slot.id))]
pub async fn commit_booking(store: &Store, plan: BookingPlan) -> Result<BookingOutcome> {
    doctor::write_slots(
        store.db(),
        store.slot_write_policy(),
        &plan.doctor_id,
        plan.read_version,
        plan.updated_slots.clone(),
    )
    .await?;
    store.publish(Collection::Doctors, &plan.doctor_id, ChangeKind::Updated);

    let id = new_document_id();
    let record = appointment::ActiveModel {
        id: Set(id.clone()),
        doctor_id: Set(plan.doctor_id),
        doctor_name: Set(plan.doctor_name),
        hospital_id: Set(plan.hospital_id),
        hospital_name: Set(plan.hospital_name),
        slot: Set(plan.slot),
        patient: Set(plan.patient),
        status: Set(BOOKED_STATUS.to_string()),
        created_at: Set(Utc::now()),
    };
    let appointment = record.insert(store.db()).await?;
    store.publish(Collection::Appointments, &id, ChangeKind::Created);

    info!(
        "Booked {} {} with {} for {}",
        appointment.slot.date, appointment.slot.time, appointment.doctor_name, appointment.patient.name
    );
    Ok(BookingOutcome {
        appointment,
        slots: plan.updated_slots,
    })
}

/// Books a slot in one go.
pub async fn book_appointment(store: &Store, request: &BookingRequest) -> Result<BookingOutcome> {
    let plan = prepare_booking(store, request).await?;
    commit_booking(store, plan).await
}
