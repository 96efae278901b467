//! Hospital business logic - registration and the hospital directory.
//!
//! A hospital lists its doctors by ID. IDs that no longer resolve to a doctor
//! are skipped when the hospital is shown.

use crate::{
    core::{doctor, new_document_id, validation},
    entities::{
        Doctor, Hospital,
        doctor as doctor_entity,
        hospital::{self, StringList},
    },
    errors::{Error, Result},
    store::{ChangeKind, Collection, Store},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Facility tags a hospital can advertise.
pub const FACILITY_OPTIONS: [&str; 5] = ["Emergency", "ICU", "Pharmacy", "Lab", "Ambulance"];

/// Hospital type used when the form leaves it blank.
pub const DEFAULT_HOSPITAL_TYPE: &str = "General";

/// Raw input from the "add hospital" form.
#[derive(Debug, Clone, Default)]
pub struct HospitalForm {
    /// Hospital name (required)
    pub name: String,
    /// Hospital type, defaults to `General`
    pub hospital_type: String,
    /// Street address (required)
    pub address: String,
    /// Phone number (required)
    pub phone: String,
    /// Contact e-mail (required)
    pub email: String,
    /// Founding year or date
    pub established_at: Option<String>,
    /// Selected facility tags
    pub facilities: Vec<String>,
    /// Selected doctors
    pub doctor_ids: Vec<String>,
}

/// A hospital together with the doctors that still exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalDetails {
    /// The hospital
    pub hospital: hospital::Model,
    /// Doctors listed by the hospital, in the hospital's order
    pub doctors: Vec<doctor_entity::Model>,
}

fn validate_form(form: &HospitalForm) -> Result<hospital::ActiveModel> {
    const MISSING: &str = "Please fill all required fields";
    let name = validation::required(&form.name, MISSING)?;
    let address = validation::required(&form.address, MISSING)?;
    let phone = validation::required(&form.phone, MISSING)?;
    let email = validation::required(&form.email, MISSING)?;
    let hospital_type = validation::optional(Some(form.hospital_type.as_str()))
        .unwrap_or_else(|| DEFAULT_HOSPITAL_TYPE.to_string());

    let mut facilities: Vec<String> = Vec::with_capacity(form.facilities.len());
    for facility in &form.facilities {
        if !FACILITY_OPTIONS.contains(&facility.as_str()) {
            return Err(Error::validation(format!("Unknown facility: {facility}")));
        }
        if !facilities.contains(facility) {
            facilities.push(facility.clone());
        }
    }

    let mut doctor_ids: Vec<String> = Vec::with_capacity(form.doctor_ids.len());
    for id in form.doctor_ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !doctor_ids.iter().any(|existing| existing == id) {
            doctor_ids.push(id.to_string());
        }
    }

    Ok(hospital::ActiveModel {
        name: Set(name),
        hospital_type: Set(hospital_type),
        address: Set(address),
        phone: Set(phone),
        email: Set(email),
        established_at: Set(validation::optional(form.established_at.as_deref())),
        facilities: Set(StringList(facilities)),
        doctor_ids: Set(StringList(doctor_ids)),
        ..Default::default()
    })
}

/// Validates the form and stores a new hospital.
#[instrument(skip(store, form), fields(name = %form.name))]
pub async fn create_hospital(store: &Store, form: &HospitalForm) -> Result<hospital::Model> {
    let mut hospital = validate_form(form)?;
    let id = new_document_id();
    hospital.id = Set(id.clone());
    hospital.created_at = Set(Utc::now());

    let created = hospital.insert(store.db()).await?;
    store.publish(Collection::Hospitals, &id, ChangeKind::Created);
    info!(
        "Hospital '{}' added with {} doctors",
        created.name,
        created.doctor_ids.0.len()
    );
    Ok(created)
}

/// All hospitals ordered by name.
pub async fn list_hospitals(store: &Store) -> Result<Vec<hospital::Model>> {
    Hospital::find()
        .order_by_asc(hospital::Column::Name)
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// Finds a hospital by ID, failing if it does not exist.
pub async fn require_hospital(store: &Store, hospital_id: &str) -> Result<hospital::Model> {
    Hospital::find_by_id(hospital_id)
        .one(store.db())
        .await?
        .ok_or_else(|| Error::not_found("Hospital", hospital_id))
}

fn resolve_doctors(
    doctors: &HashMap<String, doctor_entity::Model>,
    hospital: hospital::Model,
) -> HospitalDetails {
    let resolved = hospital
        .doctor_ids
        .0
        .iter()
        .filter_map(|id| {
            let doctor = doctors.get(id);
            if doctor.is_none() {
                warn!("Hospital {} lists unknown doctor {}", hospital.id, id);
            }
            doctor.cloned()
        })
        .collect();
    HospitalDetails {
        hospital,
        doctors: resolved,
    }
}

/// A hospital with its doctors.
pub async fn hospital_details(store: &Store, hospital_id: &str) -> Result<HospitalDetails> {
    let hospital = require_hospital(store, hospital_id).await?;
    let doctors: HashMap<String, doctor_entity::Model> = Doctor::find()
        .filter(doctor_entity::Column::Id.is_in(hospital.doctor_ids.0.iter().map(String::as_str)))
        .all(store.db())
        .await?
        .into_iter()
        .map(|d| (d.id.clone(), d))
        .collect();
    Ok(resolve_doctors(&doctors, hospital))
}

/// Every hospital with its doctors, for the booking and dashboard screens.
pub async fn hospital_directory(store: &Store) -> Result<Vec<HospitalDetails>> {
    let hospitals = list_hospitals(store).await?;
    let doctors: HashMap<String, doctor_entity::Model> = doctor::list_doctors(store)
        .await?
        .into_iter()
        .map(|d| (d.id.clone(), d))
        .collect();

    let mut directory = Vec::with_capacity(hospitals.len());
    for hospital in hospitals {
        directory.push(resolve_doctors(&doctors, hospital));
    }
    Ok(directory)
}
