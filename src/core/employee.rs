//! Employee business logic - Handles creating, updating, deleting and listing employees.
//!
//! Forms are validated before any store call. An employee must reference an
//! existing company at the time it is created or updated.

use crate::{
    core::{company, new_document_id, validation},
    entities::{Employee, employee},
    errors::{Error, Result},
    store::{ChangeKind, Collection, Store},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument, warn};

/// Role assigned when the form leaves it blank.
pub const DEFAULT_ROLE: &str = "Staff";

/// Raw input from the add/update employee forms.
#[derive(Debug, Clone, Default)]
pub struct EmployeeForm {
    /// Selected company
    pub company_id: String,
    /// Full name
    pub name: String,
    /// Role, defaults to `Staff`
    pub role: String,
    /// Contact number
    pub contact: String,
    /// Monthly salary as typed
    pub salary: String,
    /// National identity number
    pub cnic: String,
    /// Postal address
    pub address: String,
    /// Joining date as `YYYY-MM-DD`
    pub joining_date: String,
}

fn validate_form(form: &EmployeeForm) -> Result<employee::ActiveModel> {
    const MISSING: &str = "Please fill all required fields";
    let company_id = validation::required(&form.company_id, "Please select a company")?;
    let name = validation::required(&form.name, MISSING)?;
    let contact = validation::required(&form.contact, MISSING)?;
    let salary = validation::required(&form.salary, MISSING)?;
    let cnic = validation::required(&form.cnic, MISSING)?;
    let address = validation::required(&form.address, MISSING)?;
    let joining_date = validation::required(&form.joining_date, MISSING)?;

    let contact = validation::contact_number(&contact)?;
    let cnic = validation::cnic(&cnic)?;
    let joining_date = validation::calendar_date(&joining_date)?;
    let salary = validation::positive_amount(&salary)?;
    let role = validation::optional(Some(form.role.as_str())).unwrap_or_else(|| DEFAULT_ROLE.to_string());

    Ok(employee::ActiveModel {
        company_id: Set(company_id),
        name: Set(name),
        role: Set(role),
        contact: Set(contact),
        salary: Set(salary),
        cnic: Set(cnic),
        address: Set(address),
        joining_date: Set(joining_date),
        ..Default::default()
    })
}

/// Validates the form and adds a new employee to the selected company.
#[instrument(skip(store, form), fields(company_id = %form.company_id))]
pub async fn create_employee(store: &Store, form: &EmployeeForm) -> Result<employee::Model> {
    let mut employee = validate_form(form)?;
    company::require_company(store, form.company_id.trim()).await?;

    let id = new_document_id();
    employee.id = Set(id.clone());
    employee.created_at = Set(Utc::now());

    let created = employee.insert(store.db()).await?;
    store.publish(Collection::Employees, &id, ChangeKind::Created);
    info!("Employee '{}' added", created.name);
    Ok(created)
}

/// Replaces an employee's details with the validated form.
#[instrument(skip(store, form))]
pub async fn update_employee(
    store: &Store,
    employee_id: &str,
    form: &EmployeeForm,
) -> Result<employee::Model> {
    let mut changes = validate_form(form)?;
    company::require_company(store, form.company_id.trim()).await?;
    let existing = require_employee(store, employee_id).await?;

    changes.id = Set(existing.id);
    changes.created_at = Set(existing.created_at);
    let updated = changes.update(store.db()).await?;

    store.publish(Collection::Employees, employee_id, ChangeKind::Updated);
    info!("Employee '{}' updated", updated.name);
    Ok(updated)
}

/// Removes an employee. Attendance and payroll history is left in place.
#[instrument(skip(store))]
pub async fn delete_employee(store: &Store, employee_id: &str) -> Result<()> {
    let result = Employee::delete_by_id(employee_id).exec(store.db()).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Employee", employee_id));
    }

    store.publish(Collection::Employees, employee_id, ChangeKind::Deleted);
    warn!("Employee {} deleted; their attendance and payroll remain", employee_id);
    Ok(())
}

/// Finds an employee by ID.
pub async fn get_employee(store: &Store, employee_id: &str) -> Result<Option<employee::Model>> {
    Employee::find_by_id(employee_id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Finds an employee by ID, failing if it does not exist.
pub async fn require_employee(store: &Store, employee_id: &str) -> Result<employee::Model> {
    get_employee(store, employee_id)
        .await?
        .ok_or_else(|| Error::not_found("Employee", employee_id))
}

/// All employees of a company, ordered by name.
pub async fn list_company_employees(
    store: &Store,
    company_id: &str,
) -> Result<Vec<employee::Model>> {
    Employee::find()
        .filter(employee::Column::CompanyId.eq(company_id))
        .order_by_asc(employee::Column::Name)
        .all(store.db())
        .await
        .map_err(Into::into)
}
