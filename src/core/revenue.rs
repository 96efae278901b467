//! Revenue business logic - monthly revenue entries per company.
//!
//! Entries are append-only. Several entries for the same month are allowed and
//! kept side by side.

use crate::{
    core::{calendar::Period, company, new_document_id, validation},
    entities::{Revenue, revenue},
    errors::Result,
    store::{ChangeKind, Collection, Store},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Records revenue for a company's month.
///
/// # Errors
/// Returns [`crate::errors::Error::InvalidAmount`] if `amount_input` is not a
/// number, or `NotFound` if the company does not exist.
#[instrument(skip(store))]
pub async fn add_revenue(
    store: &Store,
    company_id: &str,
    period: Period,
    amount_input: &str,
) -> Result<revenue::Model> {
    let amount = validation::amount(amount_input)?;
    company::require_company(store, company_id).await?;

    let id = new_document_id();
    let entry = revenue::ActiveModel {
        id: Set(id.clone()),
        company_id: Set(company_id.to_string()),
        year: Set(period.year()),
        month: Set(period.month_column()),
        amount: Set(amount),
        created_at: Set(Utc::now()),
    };
    let created = entry.insert(store.db()).await?;

    store.publish(Collection::Revenues, &id, ChangeKind::Created);
    info!("Revenue of {:.2} recorded for {}", amount, period.label());
    Ok(created)
}

/// A company's revenue entries, oldest month first.
pub async fn list_revenues(store: &Store, company_id: &str) -> Result<Vec<revenue::Model>> {
    Revenue::find()
        .filter(revenue::Column::CompanyId.eq(company_id))
        .order_by_asc(revenue::Column::Year)
        .order_by_asc(revenue::Column::Month)
        .all(store.db())
        .await
        .map_err(Into::into)
}
