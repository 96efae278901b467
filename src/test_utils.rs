//! Shared test utilities for `BethelCity`.
//!
//! This module provides common helper functions for setting up test stores
//! and creating test entities with sensible defaults.

use crate::{
    config::{SlotWritePolicy, database},
    core::{
        company::{self, CompanyForm},
        doctor::{self, DoctorForm},
        employee::{self, EmployeeForm},
        hospital::{self, HospitalForm},
    },
    entities,
    errors::Result,
    store::Store,
};

/// Installs a test-friendly tracing subscriber once per test binary.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates a store over an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all store tests.
pub async fn setup_test_store() -> Result<Store> {
    setup_test_store_with_policy(SlotWritePolicy::CompareAndSwap).await
}

/// Same as [`setup_test_store`] with an explicit slot write policy.
pub async fn setup_test_store_with_policy(policy: SlotWritePolicy) -> Result<Store> {
    init_test_tracing();
    let db = database::create_connection("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(Store::new(db, policy))
}

/// A valid company form.
///
/// # Defaults
/// * `business_type`: "Retail"
/// * `contact`: "03001234567"
/// * `pin`: "1234"
pub fn company_form(name: &str) -> CompanyForm {
    CompanyForm {
        name: name.to_string(),
        business_type: "Retail".to_string(),
        contact: "03001234567".to_string(),
        location: "Lahore".to_string(),
        pin: "1234".to_string(),
        ..Default::default()
    }
}

/// A valid employee form for `company_id`.
///
/// # Defaults
/// * `role`: "Staff"
/// * `salary`: "30000"
/// * `joining_date`: "2024-01-15"
pub fn employee_form(company_id: &str, name: &str) -> EmployeeForm {
    EmployeeForm {
        company_id: company_id.to_string(),
        name: name.to_string(),
        role: "Staff".to_string(),
        contact: "03007654321".to_string(),
        salary: "30000".to_string(),
        cnic: "35202-1234567-1".to_string(),
        address: "12 Mall Road".to_string(),
        joining_date: "2024-01-15".to_string(),
    }
}

/// A valid doctor form with PIN "4321".
pub fn doctor_form(name: &str) -> DoctorForm {
    DoctorForm {
        name: name.to_string(),
        pin: "4321".to_string(),
        specialization: "Cardiology".to_string(),
        contact: "03111234567".to_string(),
    }
}

/// A valid hospital form listing `doctor_ids`, with no type and no facilities.
pub fn hospital_form(name: &str, doctor_ids: Vec<String>) -> HospitalForm {
    HospitalForm {
        name: name.to_string(),
        address: "1 Jail Road".to_string(),
        phone: "0421234567".to_string(),
        email: "info@hospital.test".to_string(),
        doctor_ids,
        ..Default::default()
    }
}

/// Creates an employee in `company_id` from [`employee_form`].
pub async fn create_test_employee(
    store: &Store,
    company_id: &str,
    name: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(store, &employee_form(company_id, name)).await
}

/// Creates a doctor from [`doctor_form`].
pub async fn create_test_doctor(store: &Store, name: &str) -> Result<entities::doctor::Model> {
    doctor::create_doctor(store, &doctor_form(name)).await
}

/// Creates a hospital from [`hospital_form`].
pub async fn create_test_hospital(
    store: &Store,
    name: &str,
    doctor_ids: Vec<String>,
) -> Result<entities::hospital::Model> {
    hospital::create_hospital(store, &hospital_form(name, doctor_ids)).await
}

/// Sets up a store with one company.
/// Returns (store, company) for common test scenarios.
pub async fn setup_with_company() -> Result<(Store, entities::company::Model)> {
    let store = setup_test_store().await?;
    let company = company::create_company(&store, &company_form("Acme Traders")).await?;
    Ok((store, company))
}

/// Sets up a store with one company and one employee.
/// Returns (store, company, employee) for attendance and payroll tests.
pub async fn setup_with_employee() -> Result<(
    Store,
    entities::company::Model,
    entities::employee::Model,
)> {
    let (store, company) = setup_with_company().await?;
    let employee = create_test_employee(&store, &company.id, "Ali Khan").await?;
    Ok((store, company, employee))
}
