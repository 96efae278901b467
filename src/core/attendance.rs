//! Attendance business logic - marking a month and persisting it.
//!
//! Marking happens in memory on an [`AttendanceSheet`]: the operator toggles
//! worked days and adjusts their hours. Saving derives a status for every day
//! of the month and overwrites the month's record as a whole.

use crate::{
    core::{calendar::Period, employee},
    entities::{
        Attendance,
        attendance::{self, AttendanceStatus, DayEntry, DayList},
    },
    errors::{Error, Result},
    store::{ChangeKind, Collection, Store},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Hours a newly toggled day starts with.
pub const DEFAULT_MARKED_HOURS: u32 = 8;

/// Marked days with at least this many hours count as Present; fewer count as Half-day.
pub const FULL_DAY_HOURS: u32 = 4;

/// Most hours that can be recorded for a single day.
pub const MAX_DAY_HOURS: u32 = 24;

/// Builds the document ID of an employee's month.
#[must_use]
pub fn attendance_id(employee_id: &str, period: Period) -> String {
    format!("{employee_id}_{}_{}", period.year(), period.month())
}

/// Status of a day, given the hours entered for it (or `None` if unmarked).
#[must_use]
pub const fn derive_status(hours: Option<u32>) -> AttendanceStatus {
    match hours {
        None => AttendanceStatus::Absent,
        Some(h) if h >= FULL_DAY_HOURS => AttendanceStatus::Present,
        Some(_) => AttendanceStatus::HalfDay,
    }
}

/// Per-status day counts and total hours of a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayTally {
    /// Days with status Present
    pub present_days: u32,
    /// Days with status Half-day
    pub half_days: u32,
    /// Days with status Absent
    pub absent_days: u32,
    /// Sum of hours over all days
    pub total_hours: u32,
}

impl DayTally {
    /// Counts statuses exactly as stored, without re-deriving them from hours.
    #[must_use]
    pub fn from_days(days: &[DayEntry]) -> Self {
        days.iter().fold(Self::default(), |mut tally, entry| {
            match entry.status {
                AttendanceStatus::Present => tally.present_days += 1,
                AttendanceStatus::HalfDay => tally.half_days += 1,
                AttendanceStatus::Absent => tally.absent_days += 1,
            }
            tally.total_hours = tally.total_hours.saturating_add(entry.hours);
            tally
        })
    }

    /// Number of day entries counted.
    #[must_use]
    pub const fn total_days(&self) -> u32 {
        self.present_days + self.half_days + self.absent_days
    }
}

/// In-memory marks for one employee and month, before saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSheet {
    employee_id: String,
    period: Period,
    marks: BTreeMap<u32, u32>,
}

impl AttendanceSheet {
    /// Starts an empty sheet.
    #[must_use]
    pub fn new(employee_id: impl Into<String>, period: Period) -> Self {
        Self {
            employee_id: employee_id.into(),
            period,
            marks: BTreeMap::new(),
        }
    }

    /// Employee this sheet is for.
    #[must_use]
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// Month this sheet covers.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Marked days and their hours, in day order.
    #[must_use]
    pub const fn marks(&self) -> &BTreeMap<u32, u32> {
        &self.marks
    }

    fn check_markable(&self, day: u32) -> Result<()> {
        if day == 0 || day > self.period.days_in_month() {
            return Err(Error::validation(format!(
                "Day {day} is not in {}",
                self.period.long_name()
            )));
        }
        if self.period.is_rest_day(day) {
            return Err(Error::validation("Sundays cannot be marked"));
        }
        Ok(())
    }

    /// Marks `day` as worked with the default hours, or unmarks it.
    ///
    /// Returns whether the day is marked afterwards.
    pub fn toggle(&mut self, day: u32) -> Result<bool> {
        self.check_markable(day)?;
        if self.marks.remove(&day).is_some() {
            return Ok(false);
        }
        self.marks.insert(day, DEFAULT_MARKED_HOURS);
        Ok(true)
    }

    /// Changes the hours of an already marked day.
    ///
    /// Hours must be within `0..=MAX_DAY_HOURS`.
    pub fn set_hours(&mut self, day: u32, hours: u32) -> Result<()> {
        self.check_markable(day)?;
        if hours > MAX_DAY_HOURS {
            return Err(Error::validation(format!(
                "Hours must be between 0 and {MAX_DAY_HOURS}"
            )));
        }
        let entry = self
            .marks
            .get_mut(&day)
            .ok_or_else(|| Error::validation(format!("Day {day} is not marked")))?;
        *entry = hours;
        Ok(())
    }

    /// Removes every mark.
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// One entry per calendar day with the status derived from the marks.
    #[must_use]
    pub fn derive_days(&self) -> Vec<DayEntry> {
        (1..=self.period.days_in_month())
            .map(|day| {
                let hours = self.marks.get(&day).copied();
                DayEntry {
                    day,
                    hours: hours.unwrap_or(0),
                    status: derive_status(hours),
                }
            })
            .collect()
    }
}

/// Saves the whole month, replacing any earlier save of the same month.
///
/// The employee's company is looked up first; if it cannot be resolved nothing
/// is written.
#[instrument(skip(store, sheet), fields(employee_id = %sheet.employee_id, period = %sheet.period.label()))]
pub async fn save_attendance(store: &Store, sheet: &AttendanceSheet) -> Result<attendance::Model> {
    let employee = employee::require_employee(store, &sheet.employee_id).await?;
    if employee.company_id.trim().is_empty() {
        return Err(Error::not_found("Company for employee", &sheet.employee_id));
    }

    let id = attendance_id(&sheet.employee_id, sheet.period);
    let record = attendance::ActiveModel {
        id: Set(id.clone()),
        employee_id: Set(sheet.employee_id.clone()),
        company_id: Set(employee.company_id),
        year: Set(sheet.period.year()),
        month: Set(sheet.period.month_column()),
        days: Set(DayList(sheet.derive_days())),
        created_at: Set(Utc::now()),
    };

    let txn = store.db().begin().await?;
    let existed = Attendance::delete_by_id(id.as_str()).exec(&txn).await?.rows_affected > 0;
    let saved = record.insert(&txn).await?;
    txn.commit().await?;

    let kind = if existed {
        ChangeKind::Updated
    } else {
        ChangeKind::Created
    };
    store.publish(Collection::Attendance, &id, kind);
    info!(
        "Saved attendance {} ({} days marked)",
        id,
        sheet.marks.len()
    );
    Ok(saved)
}

/// The saved record for an employee's month, if any.
pub async fn get_attendance(
    store: &Store,
    employee_id: &str,
    period: Period,
) -> Result<Option<attendance::Model>> {
    debug!("Looking up attendance for {} in {}", employee_id, period.label());
    Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Year.eq(period.year()))
        .filter(attendance::Column::Month.eq(period.month_column()))
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Every saved month of an employee, oldest first.
pub async fn list_employee_attendance(
    store: &Store,
    employee_id: &str,
) -> Result<Vec<attendance::Model>> {
    Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .order_by_asc(attendance::Column::Year)
        .order_by_asc(attendance::Column::Month)
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// Every saved month of every employee of a company, most recently saved first.
pub async fn list_company_attendance(
    store: &Store,
    company_id: &str,
) -> Result<Vec<attendance::Model>> {
    Attendance::find()
        .filter(attendance::Column::CompanyId.eq(company_id))
        .order_by_desc(attendance::Column::CreatedAt)
        .all(store.db())
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn april_2024() -> Period {
        Period::new(2024, 4).unwrap()
    }

    #[test]
    fn test_derive_status_thresholds() {
        assert_eq!(derive_status(None), AttendanceStatus::Absent);
        assert_eq!(derive_status(Some(8)), AttendanceStatus::Present);
        assert_eq!(derive_status(Some(4)), AttendanceStatus::Present);
        assert_eq!(derive_status(Some(3)), AttendanceStatus::HalfDay);
        assert_eq!(derive_status(Some(0)), AttendanceStatus::HalfDay);
    }

    #[test]
    fn test_toggle_and_set_hours() {
        let mut sheet = AttendanceSheet::new("emp-1", april_2024());
        assert!(sheet.toggle(1).unwrap());
        assert_eq!(sheet.marks().get(&1), Some(&DEFAULT_MARKED_HOURS));
        sheet.set_hours(1, 3).unwrap();
        assert_eq!(sheet.marks().get(&1), Some(&3));
        assert!(!sheet.toggle(1).unwrap());
        assert!(sheet.marks().is_empty());

        // Unmarked days cannot have hours
        assert!(sheet.set_hours(2, 5).is_err());
    }

    #[test]
    fn test_set_hours_bounded_to_one_day() {
        let mut sheet = AttendanceSheet::new("emp-1", april_2024());
        sheet.toggle(1).unwrap();
        sheet.set_hours(1, MAX_DAY_HOURS).unwrap();
        assert_eq!(sheet.marks().get(&1), Some(&24));
        sheet.set_hours(1, 0).unwrap();

        let err = sheet.set_hours(1, 25).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(sheet.set_hours(1, u32::MAX).is_err());
        assert_eq!(sheet.marks().get(&1), Some(&0));
    }

    #[test]
    fn test_tally_saturates_on_corrupt_hours() {
        let days = vec![
            DayEntry {
                day: 1,
                hours: u32::MAX,
                status: AttendanceStatus::Present,
            },
            DayEntry {
                day: 2,
                hours: u32::MAX,
                status: AttendanceStatus::Present,
            },
        ];
        let tally = DayTally::from_days(&days);
        assert_eq!(tally.present_days, 2);
        assert_eq!(tally.total_hours, u32::MAX);
    }

    #[test]
    fn test_sundays_and_out_of_range_rejected() {
        let mut sheet = AttendanceSheet::new("emp-1", april_2024());
        let err = sheet.toggle(7).unwrap_err();
        assert!(err.to_string().contains("Sundays cannot be marked"));
        assert!(sheet.toggle(0).is_err());
        assert!(sheet.toggle(31).is_err());
        assert!(sheet.marks().is_empty());
    }

    #[test]
    fn test_derive_days_covers_month_and_is_deterministic() {
        let mut sheet = AttendanceSheet::new("emp-1", april_2024());
        sheet.toggle(1).unwrap();
        sheet.toggle(2).unwrap();
        sheet.set_hours(2, 2).unwrap();

        let days = sheet.derive_days();
        assert_eq!(days.len(), 30);
        assert_eq!(days, sheet.derive_days());
        assert_eq!(
            days[0],
            DayEntry {
                day: 1,
                hours: 8,
                status: AttendanceStatus::Present
            }
        );
        assert_eq!(days[1].status, AttendanceStatus::HalfDay);
        assert_eq!(days[1].hours, 2);
        assert_eq!(days[2].status, AttendanceStatus::Absent);
        assert_eq!(days[2].hours, 0);

        let tally = DayTally::from_days(&days);
        assert_eq!(tally.present_days, 1);
        assert_eq!(tally.half_days, 1);
        assert_eq!(tally.absent_days, 28);
        assert_eq!(tally.total_hours, 10);
        assert_eq!(tally.total_days(), 30);
    }

    #[tokio::test]
    async fn test_save_attendance_overwrites_month() -> Result<()> {
        let (store, company, employee) = setup_with_employee().await?;
        let mut feed = store.subscribe(Collection::Attendance);

        let mut sheet = AttendanceSheet::new(employee.id.clone(), april_2024());
        sheet.toggle(1).unwrap();
        sheet.toggle(2).unwrap();
        let first = save_attendance(&store, &sheet).await?;
        assert_eq!(first.id, format!("{}_2024_4", employee.id));
        assert_eq!(first.company_id, company.id);
        assert_eq!(first.days.0.len(), 30);
        assert_eq!(feed.try_next().unwrap().kind, ChangeKind::Created);

        // Second save replaces the first rather than merging with it
        sheet.clear();
        sheet.toggle(3).unwrap();
        save_attendance(&store, &sheet).await?;
        assert_eq!(feed.try_next().unwrap().kind, ChangeKind::Updated);

        let saved = get_attendance(&store, &employee.id, april_2024())
            .await?
            .unwrap();
        let tally = DayTally::from_days(&saved.days.0);
        assert_eq!(tally.present_days, 1);
        assert_eq!(saved.days.0[2].status, AttendanceStatus::Present);
        assert_eq!(saved.days.0[0].status, AttendanceStatus::Absent);
        assert_eq!(list_employee_attendance(&store, &employee.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_attendance_requires_employee() -> Result<()> {
        let store = setup_test_store().await?;
        let sheet = AttendanceSheet::new("ghost", april_2024());
        assert!(matches!(
            save_attendance(&store, &sheet).await,
            Err(Error::NotFound { entity: "Employee", .. })
        ));
        assert!(get_attendance(&store, "ghost", april_2024()).await?.is_none());
        Ok(())
    }
}
