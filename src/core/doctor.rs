//! Doctor business logic - registration and slot management.
//!
//! A doctor's slots live in one JSON array on the doctor record. Every change to
//! the array (adding, removing or booking a slot) rewrites the whole array
//! through [`write_slots`], which applies the store's [`SlotWritePolicy`].

use crate::{
    config::SlotWritePolicy,
    core::{new_document_id, validation},
    entities::{
        Appointment, Doctor, appointment,
        doctor::{self, Slot, SlotList},
    },
    errors::{Error, Result},
    store::{ChangeKind, Collection, Store},
};
use chrono::{NaiveTime, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*, sea_query::Expr};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Specialization used when the form leaves it blank.
pub const DEFAULT_SPECIALIZATION: &str = "General Physician";

/// Raw input from the "add doctor" form.
#[derive(Debug, Clone, Default)]
pub struct DoctorForm {
    /// Full name (required)
    pub name: String,
    /// Dashboard PIN (required)
    pub pin: String,
    /// Specialization, defaults to `General Physician`
    pub specialization: String,
    /// Contact number (required)
    pub contact: String,
}

/// Validates the form and stores a doctor with no slots.
#[instrument(skip(store, form), fields(name = %form.name))]
pub async fn create_doctor(store: &Store, form: &DoctorForm) -> Result<doctor::Model> {
    const MISSING: &str = "Please fill all required fields";
    let name = validation::required(&form.name, MISSING)?;
    let contact = validation::required(&form.contact, MISSING)?;
    let pin = validation::required(&form.pin, MISSING)?;
    let specialization = validation::optional(Some(form.specialization.as_str()))
        .unwrap_or_else(|| DEFAULT_SPECIALIZATION.to_string());

    let id = new_document_id();
    let doctor = doctor::ActiveModel {
        id: Set(id.clone()),
        name: Set(name),
        pin: Set(pin),
        specialization: Set(specialization),
        contact: Set(contact),
        slots: Set(SlotList::default()),
        slots_version: Set(0),
        created_at: Set(Utc::now()),
    };
    let created = doctor.insert(store.db()).await?;

    store.publish(Collection::Doctors, &id, ChangeKind::Created);
    info!("Doctor '{}' added", created.name);
    Ok(created)
}

/// Finds a doctor by ID.
pub async fn get_doctor(store: &Store, doctor_id: &str) -> Result<Option<doctor::Model>> {
    Doctor::find_by_id(doctor_id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Finds a doctor by ID, failing if it does not exist.
pub async fn require_doctor(store: &Store, doctor_id: &str) -> Result<doctor::Model> {
    get_doctor(store, doctor_id)
        .await?
        .ok_or_else(|| Error::not_found("Doctor", doctor_id))
}

/// All doctors ordered by name.
pub async fn list_doctors(store: &Store) -> Result<Vec<doctor::Model>> {
    Doctor::find()
        .order_by_asc(doctor::Column::Name)
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// Replaces a doctor's slot array and bumps its version.
///
/// Under [`SlotWritePolicy::CompareAndSwap`] the write only applies if the
/// stored version still equals `read_version`. Under
/// [`SlotWritePolicy::LastWriterWins`] it applies unconditionally.
///
/// # Errors
/// - [`Error::SlotConflict`] if another write landed after `read_version` was read
/// - [`Error::NotFound`] if the doctor does not exist
pub(crate) async fn write_slots<C: ConnectionTrait>(
    db: &C,
    policy: SlotWritePolicy,
    doctor_id: &str,
    read_version: i64,
    slots: Vec<Slot>,
) -> Result<()> {
    let mut update = Doctor::update_many()
        .col_expr(doctor::Column::Slots, Expr::value(SlotList(slots)))
        .col_expr(
            doctor::Column::SlotsVersion,
            Expr::col(doctor::Column::SlotsVersion).add(1),
        )
        .filter(doctor::Column::Id.eq(doctor_id));
    if policy == SlotWritePolicy::CompareAndSwap {
        update = update.filter(doctor::Column::SlotsVersion.eq(read_version));
    }

    let result = update.exec(db).await?;
    if result.rows_affected > 0 {
        return Ok(());
    }

    let exists = Doctor::find_by_id(doctor_id).one(db).await?.is_some();
    if exists {
        debug!(
            "Slot write for doctor {} rejected at version {}",
            doctor_id, read_version
        );
        Err(Error::SlotConflict {
            doctor_id: doctor_id.to_string(),
        })
    } else {
        Err(Error::not_found("Doctor", doctor_id))
    }
}

/// Appends an available slot. `date` is `YYYY-MM-DD` and `time` is `HH:MM`.
#[instrument(skip(store))]
pub async fn add_slot(store: &Store, doctor_id: &str, date: &str, time: &str) -> Result<doctor::Model> {
    const MISSING: &str = "Please select both date and time";
    let date = validation::required(date, MISSING)?;
    let time = validation::required(time, MISSING)?;
    let date = validation::calendar_date(&date)?;
    let time = NaiveTime::parse_from_str(&time, "%H:%M")
        .map_err(|_| Error::validation("Time must be in HH:MM format"))?;

    let doctor = require_doctor(store, doctor_id).await?;
    let mut slots = doctor.slots.0;
    let slot_id = new_document_id();
    slots.push(Slot {
        id: slot_id.clone(),
        date: date.format("%Y-%m-%d").to_string(),
        time: time.format("%H:%M").to_string(),
        available: true,
        booked_by: None,
    });

    write_slots(
        store.db(),
        store.slot_write_policy(),
        doctor_id,
        doctor.slots_version,
        slots,
    )
    .await?;
    store.publish(Collection::Doctors, doctor_id, ChangeKind::Updated);
    info!("Slot {} added for {} at {} {}", slot_id, doctor.name, date, time.format("%H:%M"));
    require_doctor(store, doctor_id).await
}

/// Removes a slot whether or not it is booked.
///
/// Returns `true` if the removed slot was booked. Its appointment record is
/// left in place and shows up in [`orphaned_appointments`].
#[instrument(skip(store))]
pub async fn remove_slot(store: &Store, doctor_id: &str, slot_id: &str) -> Result<bool> {
    let doctor = require_doctor(store, doctor_id).await?;
    let mut slots = doctor.slots.0;
    let position = slots
        .iter()
        .position(|slot| slot.id == slot_id)
        .ok_or_else(|| Error::not_found("Slot", slot_id))?;
    let removed = slots.remove(position);

    write_slots(
        store.db(),
        store.slot_write_policy(),
        doctor_id,
        doctor.slots_version,
        slots,
    )
    .await?;
    store.publish(Collection::Doctors, doctor_id, ChangeKind::Updated);

    let was_booked = !removed.available;
    if was_booked {
        warn!(
            "Removed booked slot {} of doctor {}; its appointment now has no slot",
            slot_id, doctor_id
        );
    } else {
        info!("Slot {} removed for doctor {}", slot_id, doctor_id);
    }
    Ok(was_booked)
}

/// Appointments of a doctor whose slot no longer exists on the doctor.
pub async fn orphaned_appointments(
    store: &Store,
    doctor_id: &str,
) -> Result<Vec<appointment::Model>> {
    let doctor = require_doctor(store, doctor_id).await?;
    let slot_ids: HashSet<&str> = doctor.slots.0.iter().map(|s| s.id.as_str()).collect();

    let appointments = Appointment::find()
        .filter(appointment::Column::DoctorId.eq(doctor_id))
        .order_by_asc(appointment::Column::CreatedAt)
        .all(store.db())
        .await?;

    Ok(appointments
        .into_iter()
        .filter(|a| !slot_ids.contains(a.slot.id.as_str()))
        .collect())
}
