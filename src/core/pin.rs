//! PIN gates in front of the company and doctor dashboards.
//!
//! The stored PIN is compared as plain text with an exact match. This is a
//! convenience gate for a shared device, not authentication: there is no
//! hashing, attempt counter or lockout.

use crate::{
    entities::{company, doctor},
    errors::{Error, Result},
    navigation::Route,
};
use tracing::{debug, info};

/// Outcome of comparing an entered PIN with the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCheck {
    /// Nothing was entered; prompt again
    Empty,
    /// The PIN does not match; prompt again
    Incorrect,
    /// The PIN matches
    Granted,
}

/// Compares `entered` with `stored` exactly.
#[must_use]
pub fn check_pin(stored: &str, entered: &str) -> PinCheck {
    if entered.is_empty() {
        PinCheck::Empty
    } else if entered == stored {
        PinCheck::Granted
    } else {
        PinCheck::Incorrect
    }
}

fn require_granted(stored: &str, entered: &str) -> Result<()> {
    match check_pin(stored, entered) {
        PinCheck::Granted => Ok(()),
        PinCheck::Empty => Err(Error::validation("Please enter the PIN to continue.")),
        PinCheck::Incorrect => Err(Error::validation("The entered PIN is incorrect.")),
    }
}

/// Opens a company's dashboard if the PIN matches.
pub fn enter_company_dashboard(company: &company::Model, entered: &str) -> Result<Route> {
    require_granted(&company.pin, entered).inspect_err(|_| {
        debug!("PIN rejected for company {}", company.id);
    })?;
    info!("Opening dashboard of company {}", company.name);
    Ok(Route::CompanyDashboard {
        company_id: company.id.clone(),
        company_name: Some(company.name.clone()),
    })
}

/// Opens a doctor's dashboard if the PIN matches.
pub fn enter_doctor_dashboard(doctor: &doctor::Model, entered: &str) -> Result<Route> {
    require_granted(&doctor.pin, entered).inspect_err(|_| {
        debug!("PIN rejected for doctor {}", doctor.id);
    })?;
    info!("Opening dashboard of {}", doctor.name);
    Ok(Route::DoctorDashboard {
        doctor_id: doctor.id.clone(),
    })
}
