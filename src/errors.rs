//! Unified error type for the crate.
//!
//! Every fallible operation returns [`Result`]. Errors fall into the three
//! classes the screens care about (see [`ErrorKind`]): validation problems caught
//! before touching the store, store failures, and missing documents.

use thiserror::Error;

/// Broad classification used when turning an error into a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input, rejected before any store call
    Validation,
    /// A read or write against the store failed
    Store,
    /// A referenced document does not exist
    NotFound,
}

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// User input failed validation
    #[error("Validation failed: {message}")]
    Validation {
        /// Message suitable for showing to the operator
        message: String,
    },

    /// A referenced document is missing
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of document (e.g. "Employee")
        entity: &'static str,
        /// Document ID that was looked up
        id: String,
    },

    /// No attendance record exists for the requested month
    #[error("No attendance found for employee {employee_id} in {month}/{year}")]
    NoAttendance {
        /// Employee the payroll was requested for
        employee_id: String,
        /// Calendar year
        year: i32,
        /// Calendar month (1-12)
        month: u32,
    },

    /// A monetary amount was non-numeric, non-finite or out of range
    #[error("Invalid amount: {input}")]
    InvalidAmount {
        /// The rejected input as entered
        input: String,
    },

    /// A (year, month) pair does not name a real month
    #[error("Invalid period: {year}-{month}")]
    InvalidPeriod {
        /// Year as given
        year: i32,
        /// Month as given
        month: i64,
    },

    /// The chosen slot is already booked
    #[error("Slot {slot_id} is no longer available")]
    SlotUnavailable {
        /// Slot that was requested
        slot_id: String,
    },

    /// The doctor's slot list changed between read and write
    #[error("Slots for doctor {doctor_id} changed since they were read")]
    SlotConflict {
        /// Doctor whose slot list was written concurrently
        doctor_id: String,
    },

    /// A paid payroll record cannot be recalculated
    #[error("Payroll {payroll_id} has already been paid")]
    PayrollAlreadyPaid {
        /// The existing paid record
        payroll_id: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Integer conversion error
    #[error("Integer conversion error: {0}")]
    TryFromInt(#[from] std::num::TryFromIntError),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for building a [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Classifies the error for display.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. }
            | Self::Validation { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidPeriod { .. }
            | Self::SlotUnavailable { .. }
            | Self::PayrollAlreadyPaid { .. }
            | Self::Json(_)
            | Self::TryFromInt(_) => ErrorKind::Validation,
            Self::NotFound { .. } | Self::NoAttendance { .. } => ErrorKind::NotFound,
            Self::SlotConflict { .. } | Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => {
                ErrorKind::Store
            }
        }
    }

    /// Store failures may succeed if the user tries again; nothing else will.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Io(_) | Self::SlotConflict { .. }
        )
    }

    /// Message shown to the operator when an action fails.
    ///
    /// Validation and not-found errors carry their own specific text; store
    /// failures collapse into a generic message and are logged instead.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::NotFound => self.to_string(),
            ErrorKind::Store => {
                tracing::error!("Store operation failed: {}", self);
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
