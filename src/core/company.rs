//! Company business logic - registration, lookup, listing and search.

use crate::{
    core::{new_document_id, validation},
    entities::{Company, Employee, company, employee},
    errors::{Error, Result},
    store::{ChangeKind, Collection, Store},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Allowed PIN lengths for company dashboards.
pub const COMPANY_PIN_LENGTH: std::ops::RangeInclusive<usize> = 4..=6;

/// Raw input from the "add company" form.
#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    /// Company name (required)
    pub name: String,
    /// Business type (required)
    pub business_type: String,
    /// Contact number (required, at least 10 digits)
    pub contact: String,
    /// Location (required)
    pub location: String,
    /// Dashboard PIN (required, 4-6 characters)
    pub pin: String,
    /// Registration number
    pub registration_number: Option<String>,
    /// Tax ID
    pub tax_id: Option<String>,
    /// `file://` URI returned by [`crate::core::media::store_company_logo`]
    pub logo_url: Option<String>,
}

/// A company together with its head count, as shown in the company list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySummary {
    /// The company
    pub company: company::Model,
    /// Number of employees referencing the company
    pub employee_count: u64,
}

fn validate_form(form: &CompanyForm) -> Result<company::ActiveModel> {
    const MISSING: &str = "Please fill all required fields";
    let name = validation::required(&form.name, MISSING)?;
    let business_type = validation::required(&form.business_type, MISSING)?;
    let contact = validation::required(&form.contact, MISSING)?;
    let location = validation::required(&form.location, MISSING)?;
    let pin = validation::required(&form.pin, MISSING)?;

    if !COMPANY_PIN_LENGTH.contains(&pin.chars().count()) {
        return Err(Error::validation(
            "PIN must be between 4 and 6 characters",
        ));
    }
    let contact = validation::contact_number(&contact)?;

    Ok(company::ActiveModel {
        name: Set(name),
        business_type: Set(business_type),
        contact: Set(contact),
        location: Set(location),
        pin: Set(pin),
        registration_number: Set(validation::optional(form.registration_number.as_deref())),
        tax_id: Set(validation::optional(form.tax_id.as_deref())),
        logo_url: Set(validation::optional(form.logo_url.as_deref())),
        ..Default::default()
    })
}

/// Validates the form and stores a new company.
#[instrument(skip(store, form), fields(name = %form.name))]
pub async fn create_company(store: &Store, form: &CompanyForm) -> Result<company::Model> {
    let mut company = validate_form(form)?;
    let id = new_document_id();
    company.id = Set(id.clone());
    company.created_at = Set(Utc::now());

    let created = company.insert(store.db()).await?;
    store.publish(Collection::Companies, &id, ChangeKind::Created);
    info!("Company '{}' created", created.name);
    Ok(created)
}

/// Finds a company by its ID.
pub async fn get_company(store: &Store, company_id: &str) -> Result<Option<company::Model>> {
    Company::find_by_id(company_id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Finds a company by its ID, failing if it does not exist.
pub async fn require_company(store: &Store, company_id: &str) -> Result<company::Model> {
    get_company(store, company_id)
        .await?
        .ok_or_else(|| Error::not_found("Company", company_id))
}

/// All companies ordered by name.
pub async fn list_companies(store: &Store) -> Result<Vec<company::Model>> {
    Company::find()
        .order_by_asc(company::Column::Name)
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// All companies with the number of employees in each.
pub async fn list_companies_with_employee_counts(store: &Store) -> Result<Vec<CompanySummary>> {
    let companies = list_companies(store).await?;
    let mut summaries = Vec::with_capacity(companies.len());

    for company in companies {
        let employee_count = Employee::find()
            .filter(employee::Column::CompanyId.eq(company.id.as_str()))
            .count(store.db())
            .await?;
        summaries.push(CompanySummary {
            company,
            employee_count,
        });
    }

    Ok(summaries)
}

/// Case-insensitive substring search over company names.
#[must_use]
pub fn search_companies<'a>(companies: &'a [CompanySummary], query: &str) -> Vec<&'a CompanySummary> {
    let query = query.trim().to_lowercase();
    companies
        .iter()
        .filter(|summary| summary.company.name.to_lowercase().contains(&query))
        .collect()
}
