//! Patient directory - patients of a hospital, built from its appointments.
//!
//! There is no patient collection. A patient is everyone who booked under the
//! same patient ID.

use crate::{
    entities::{Appointment, appointment},
    errors::Result,
    store::Store,
};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::HashMap;

/// Shown in the treatment history when the booking gave no reason.
pub const NO_REASON: &str = "No reason provided";

/// One patient as listed on the patient management screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    /// Patient identifier
    pub id: String,
    /// Name from the first booking
    pub name: String,
    /// Contact from the first booking
    pub contact: String,
    /// Latest slot date booked, `YYYY-MM-DD`
    pub last_appointment: String,
    /// Doctor of the most recent booking
    pub doctor_name: String,
    /// Reasons of every booking, oldest first
    pub treatment_history: Vec<String>,
}

/// Folds appointments (oldest booking first) into one record per patient.
#[must_use]
pub fn fold_patients(appointments: &[appointment::Model]) -> Vec<PatientRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut patients: HashMap<String, PatientRecord> = HashMap::new();

    for appointment in appointments {
        let patient = &appointment.patient;
        let reason = if patient.reason.trim().is_empty() {
            NO_REASON.to_string()
        } else {
            patient.reason.clone()
        };

        match patients.get_mut(&patient.id) {
            Some(record) => {
                if appointment.slot.date > record.last_appointment {
                    record.last_appointment.clone_from(&appointment.slot.date);
                }
                record.doctor_name.clone_from(&appointment.doctor_name);
                record.treatment_history.push(reason);
            }
            None => {
                order.push(patient.id.clone());
                patients.insert(
                    patient.id.clone(),
                    PatientRecord {
                        id: patient.id.clone(),
                        name: patient.name.clone(),
                        contact: patient.contact.clone(),
                        last_appointment: appointment.slot.date.clone(),
                        doctor_name: appointment.doctor_name.clone(),
                        treatment_history: vec![reason],
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .filter_map(|id| patients.remove(&id))
        .collect()
}

/// Every patient who booked through a hospital, in order of first booking.
pub async fn hospital_patients(store: &Store, hospital_id: &str) -> Result<Vec<PatientRecord>> {
    let appointments = Appointment::find()
        .filter(appointment::Column::HospitalId.eq(hospital_id))
        .order_by_asc(appointment::Column::CreatedAt)
        .all(store.db())
        .await?;
    Ok(fold_patients(&appointments))
}

/// Matches name or doctor name case-insensitively, or contact by substring.
///
/// A blank query returns every patient.
#[must_use]
pub fn search_patients<'a>(patients: &'a [PatientRecord], query: &str) -> Vec<&'a PatientRecord> {
    let query = query.trim();
    if query.is_empty() {
        return patients.iter().collect();
    }
    let lowered = query.to_lowercase();
    patients
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&lowered)
                || p.contact.contains(query)
                || p.doctor_name.to_lowercase().contains(&lowered)
        })
        .collect()
}
