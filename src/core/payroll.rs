//! Payroll business logic - salary calculation from a month's attendance.
//!
//! The pay for a month is proportional: the monthly salary is spread over the
//! working days (every day except Sunday), Present days earn a full day and
//! Half-day days earn half of one. Absent days earn nothing, so the total can
//! never exceed the monthly salary.
//!
//! There is one payroll record per employee and month. Recalculating a pending
//! record overwrites it; a paid record is final.

use crate::{
    core::{
        attendance::{self, DayTally},
        calendar::{HOURS_PER_WORKING_DAY, Period},
        employee, new_document_id, validation,
    },
    entities::{
        Employee, Payroll, attendance::DayEntry,
        payroll::{self, PayrollStatus},
    },
    errors::{Error, Result},
    store::{ChangeKind, Collection, Store},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Name shown for payroll records whose employee no longer exists.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

/// Parses the salary typed into the payroll form.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for empty, non-numeric, non-finite or
/// non-positive input.
pub fn parse_salary(input: &str) -> Result<f64> {
    validation::positive_amount(input)
}

/// The computed pay figures for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayrollBreakdown {
    /// Days in the month that are not Sundays
    pub working_days: u32,
    /// Days with status Present
    pub present_days: u32,
    /// Days with status Half-day
    pub half_days: u32,
    /// Days with status Absent
    pub absent_days: u32,
    /// Sum of hours over the month
    pub total_hours: u32,
    /// Monthly salary divided by working days
    pub salary_per_day: f64,
    /// Daily rate divided by the hours in a working day
    pub salary_per_hour: f64,
    /// Earned by Present days
    pub present_salary: f64,
    /// Earned by Half-day days
    pub half_day_salary: f64,
    /// Amount owed for the month
    pub total_salary: f64,
}

/// Computes the pay for `period` from stored day entries.
///
/// Statuses are taken as stored; hours only feed `total_hours`.
#[must_use]
pub fn compute_breakdown(period: Period, days: &[DayEntry], monthly_salary: f64) -> PayrollBreakdown {
    let working_days = period.working_days();
    let tally = DayTally::from_days(days);

    let salary_per_day = monthly_salary / f64::from(working_days);
    let salary_per_hour = monthly_salary / f64::from(working_days * HOURS_PER_WORKING_DAY);
    let present_salary = f64::from(tally.present_days) * salary_per_day;
    let half_day_salary = f64::from(tally.half_days) * (salary_per_day / 2.0);

    PayrollBreakdown {
        working_days,
        present_days: tally.present_days,
        half_days: tally.half_days,
        absent_days: tally.absent_days,
        total_hours: tally.total_hours,
        salary_per_day,
        salary_per_hour,
        present_salary,
        half_day_salary,
        total_salary: present_salary + half_day_salary,
    }
}

/// Everything the payroll form collects.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRequest {
    /// Employee to pay
    pub employee_id: String,
    /// Month to pay for
    pub period: Period,
    /// Salary as typed, prefilled from the employee record
    pub monthly_salary: String,
    /// Date by which the salary should be paid
    pub deadline: NaiveDate,
}

/// Result of a payroll calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollOutcome {
    /// Figures for immediate display
    pub breakdown: PayrollBreakdown,
    /// The stored record
    pub record: payroll::Model,
    /// Whether an earlier pending calculation was replaced
    pub replaced: bool,
}

/// Calculates an employee's pay for a month and stores it as a pending record.
///
/// # Errors
/// - [`Error::InvalidAmount`] if the salary is not a positive number (checked
///   before anything is read)
/// - [`Error::NotFound`] if the employee does not exist
/// - [`Error::NoAttendance`] if the month has no saved attendance; nothing is written
/// - [`Error::PayrollAlreadyPaid`] if the month was already paid
#[instrument(skip(store, request), fields(employee_id = %request.employee_id, period = %request.period.label()))]
pub async fn calculate_payroll(store: &Store, request: &PayrollRequest) -> Result<PayrollOutcome> {
    let monthly_salary = parse_salary(&request.monthly_salary)?;
    let employee = employee::require_employee(store, &request.employee_id).await?;
    let period = request.period;

    let record = attendance::get_attendance(store, &employee.id, period)
        .await?
        .ok_or_else(|| Error::NoAttendance {
            employee_id: employee.id.clone(),
            year: period.year(),
            month: period.month(),
        })?;
    let breakdown = compute_breakdown(period, &record.days.0, monthly_salary);

    let txn = store.db().begin().await?;
    let existing = Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee.id.as_str()))
        .filter(payroll::Column::Year.eq(period.year()))
        .filter(payroll::Column::Month.eq(period.month_column()))
        .one(&txn)
        .await?;

    if let Some(paid) = existing.as_ref().filter(|p| p.status == PayrollStatus::Paid) {
        return Err(Error::PayrollAlreadyPaid {
            payroll_id: paid.id.clone(),
        });
    }

    let replaced = existing.is_some();
    let id = existing.map_or_else(new_document_id, |p| p.id);
    let model = payroll::ActiveModel {
        id: Set(id.clone()),
        employee_id: Set(employee.id.clone()),
        company_id: Set(employee.company_id.clone()),
        month: Set(period.month_column()),
        year: Set(period.year()),
        monthly_salary: Set(monthly_salary),
        present_days: Set(i32::try_from(breakdown.present_days)?),
        half_days: Set(i32::try_from(breakdown.half_days)?),
        absent_days: Set(i32::try_from(breakdown.absent_days)?),
        total_hours: Set(i32::try_from(breakdown.total_hours)?),
        total_salary: Set(breakdown.total_salary),
        deadline_date: Set(request.deadline),
        status: Set(PayrollStatus::Pending),
        calculated_at: Set(Utc::now()),
    };

    let saved = if replaced {
        model.update(&txn).await?
    } else {
        model.insert(&txn).await?
    };
    txn.commit().await?;

    let kind = if replaced {
        ChangeKind::Updated
    } else {
        ChangeKind::Created
    };
    store.publish(Collection::Payroll, &id, kind);
    info!(
        "Payroll for {} in {}: {:.2} of {:.2}",
        employee.name,
        period.long_name(),
        breakdown.total_salary,
        monthly_salary
    );

    Ok(PayrollOutcome {
        breakdown,
        record: saved,
        replaced,
    })
}

/// Moves a payroll record from pending to paid. Paying it twice changes nothing.
#[instrument(skip(store))]
pub async fn mark_payroll_paid(store: &Store, payroll_id: &str) -> Result<payroll::Model> {
    let record = Payroll::find_by_id(payroll_id)
        .one(store.db())
        .await?
        .ok_or_else(|| Error::not_found("Payroll", payroll_id))?;

    if record.status == PayrollStatus::Paid {
        debug!("Payroll {} already paid", payroll_id);
        return Ok(record);
    }

    let mut active: payroll::ActiveModel = record.into();
    active.status = Set(PayrollStatus::Paid);
    let updated = active.update(store.db()).await?;

    store.publish(Collection::Payroll, payroll_id, ChangeKind::Updated);
    info!("Payroll {} marked as paid", payroll_id);
    Ok(updated)
}

/// A payroll record joined with the employee's name.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollListing {
    /// The stored record
    pub record: payroll::Model,
    /// Current employee name, or [`UNKNOWN_EMPLOYEE`]
    pub employee_name: String,
}

async fn with_employee_names(
    store: &Store,
    records: Vec<payroll::Model>,
) -> Result<Vec<PayrollListing>> {
    let mut ids: Vec<&str> = records.iter().map(|r| r.employee_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();

    let names: HashMap<String, String> = Employee::find()
        .filter(crate::entities::employee::Column::Id.is_in(ids))
        .all(store.db())
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    Ok(records
        .into_iter()
        .map(|record| {
            let employee_name = names
                .get(&record.employee_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_EMPLOYEE.to_string());
            PayrollListing {
                record,
                employee_name,
            }
        })
        .collect())
}

/// Every payroll record of a company, most recently calculated first.
pub async fn list_company_payrolls(store: &Store, company_id: &str) -> Result<Vec<PayrollListing>> {
    let records = Payroll::find()
        .filter(payroll::Column::CompanyId.eq(company_id))
        .order_by_desc(payroll::Column::CalculatedAt)
        .all(store.db())
        .await?;
    with_employee_names(store, records).await
}

/// Case-insensitive filter on employee name.
#[must_use]
pub fn filter_payrolls<'a>(payrolls: &'a [PayrollListing], query: &str) -> Vec<&'a PayrollListing> {
    let query = query.trim().to_lowercase();
    payrolls
        .iter()
        .filter(|p| p.employee_name.to_lowercase().contains(&query))
        .collect()
}

/// The company's payroll records with the latest deadlines first.
pub async fn recent_payroll_deadlines(
    store: &Store,
    company_id: &str,
    limit: u64,
) -> Result<Vec<payroll::Model>> {
    Payroll::find()
        .filter(payroll::Column::CompanyId.eq(company_id))
        .order_by_desc(payroll::Column::DeadlineDate)
        .limit(limit)
        .all(store.db())
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::attendance::AttendanceSheet;
    use crate::entities::attendance::AttendanceStatus;
    use crate::test_utils::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    fn entries(present: u32, half: u32, period: Period) -> Vec<DayEntry> {
        (1..=period.days_in_month())
            .map(|day| {
                let (hours, status) = if day <= present {
                    (8, AttendanceStatus::Present)
                } else if day <= present + half {
                    (2, AttendanceStatus::HalfDay)
                } else {
                    (0, AttendanceStatus::Absent)
                };
                DayEntry { day, hours, status }
            })
            .collect()
    }

    /// A sheet for October 2023 with 20 full days and 2 two-hour days.
    fn october_sheet(employee_id: &str) -> AttendanceSheet {
        let period = Period::new(2023, 10).unwrap();
        let mut sheet = AttendanceSheet::new(employee_id, period);
        let workable: Vec<u32> = (1..=31).filter(|d| !period.is_rest_day(*d)).collect();
        for day in &workable[..20] {
            sheet.toggle(*day).unwrap();
        }
        for day in &workable[20..22] {
            sheet.toggle(*day).unwrap();
            sheet.set_hours(*day, 2).unwrap();
        }
        sheet
    }

    fn request(employee_id: &str, salary: &str) -> PayrollRequest {
        PayrollRequest {
            employee_id: employee_id.to_string(),
            period: Period::new(2023, 10).unwrap(),
            monthly_salary: salary.to_string(),
            deadline: NaiveDate::from_ymd_opt(2023, 11, 5).unwrap(),
        }
    }

    #[test]
    fn test_parse_salary() {
        assert_eq!(parse_salary("30000").unwrap(), 30000.0);
        assert!(parse_salary("abc").is_err());
        assert!(parse_salary("").is_err());
        assert!(parse_salary("-1").is_err());
        assert!(parse_salary("NaN").is_err());
    }

    #[test]
    fn test_breakdown_april_example() {
        // April 2024 has 26 working days
        let period = Period::new(2024, 4).unwrap();
        let breakdown = compute_breakdown(period, &entries(20, 2, period), 26000.0);
        assert_eq!(breakdown.working_days, 26);
        assert_approx(breakdown.salary_per_day, 1000.0);
        assert_approx(breakdown.salary_per_hour, 125.0);
        assert_approx(breakdown.present_salary, 20000.0);
        assert_approx(breakdown.half_day_salary, 1000.0);
        assert_approx(breakdown.total_salary, 21000.0);
        assert_eq!(breakdown.absent_days, 8);
        assert_eq!(breakdown.total_hours, 164);
    }

    #[test]
    fn test_total_never_exceeds_salary() {
        let period = Period::new(2024, 2).unwrap();
        let working = period.working_days();
        for present in 0..=working {
            for half in 0..=(working - present) {
                let breakdown = compute_breakdown(period, &entries(present, half, period), 45000.0);
                assert!(breakdown.total_salary <= 45000.0 + 1e-6);
            }
        }
        let full = compute_breakdown(period, &entries(working, 0, period), 45000.0);
        assert_approx(full.total_salary, 45000.0);
    }

    #[tokio::test]
    async fn test_calculate_payroll_end_to_end() -> Result<()> {
        let (store, company, employee) = setup_with_employee().await?;
        attendance::save_attendance(&store, &october_sheet(&employee.id)).await?;

        let outcome = calculate_payroll(&store, &request(&employee.id, "30000")).await?;
        let b = outcome.breakdown;
        assert_eq!(b.working_days, 26);
        assert_eq!(b.present_days, 20);
        assert_eq!(b.half_days, 2);
        assert_eq!(b.absent_days, 9);
        assert_eq!(b.total_hours, 164);
        assert_approx(b.salary_per_day, 1153.85);
        assert_approx(b.present_salary, 23076.92);
        assert_approx(b.half_day_salary, 1153.85);
        assert_approx(b.total_salary, 24230.77);

        assert!(!outcome.replaced);
        assert_eq!(outcome.record.status, PayrollStatus::Pending);
        assert_eq!(outcome.record.company_id, company.id);
        assert_eq!(outcome.record.month, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_recalculation_overwrites_pending() -> Result<()> {
        let (store, company, employee) = setup_with_employee().await?;
        attendance::save_attendance(&store, &october_sheet(&employee.id)).await?;

        let first = calculate_payroll(&store, &request(&employee.id, "30000")).await?;
        let second = calculate_payroll(&store, &request(&employee.id, "26000")).await?;
        assert!(second.replaced);
        assert_eq!(second.record.id, first.record.id);

        let listed = list_company_payrolls(&store, &company.id).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].record.monthly_salary, 26000.0);
        assert_eq!(listed[0].employee_name, employee.name);
        Ok(())
    }

    #[tokio::test]
    async fn test_paid_payroll_is_final() -> Result<()> {
        let (store, _company, employee) = setup_with_employee().await?;
        attendance::save_attendance(&store, &october_sheet(&employee.id)).await?;

        let outcome = calculate_payroll(&store, &request(&employee.id, "30000")).await?;
        let paid = mark_payroll_paid(&store, &outcome.record.id).await?;
        assert_eq!(paid.status, PayrollStatus::Paid);

        // Paying again is a no-op
        let again = mark_payroll_paid(&store, &outcome.record.id).await?;
        assert_eq!(again, paid);

        assert!(matches!(
            calculate_payroll(&store, &request(&employee.id, "99999")).await,
            Err(Error::PayrollAlreadyPaid { .. })
        ));
        assert!(matches!(
            mark_payroll_paid(&store, "missing").await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_attendance_writes_nothing() -> Result<()> {
        let (store, company, employee) = setup_with_employee().await?;

        assert!(matches!(
            calculate_payroll(&store, &request(&employee.id, "30000")).await,
            Err(Error::NoAttendance { month: 10, .. })
        ));
        // Bad salary is rejected before the employee is even looked up
        assert!(matches!(
            calculate_payroll(&store, &request("ghost", "abc")).await,
            Err(Error::InvalidAmount { .. })
        ));
        assert!(list_company_payrolls(&store, &company.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_listing_unknown_employee_and_filter() -> Result<()> {
        let (store, company, employee) = setup_with_employee().await?;
        let other = create_test_employee(&store, &company.id, "Bilal").await?;
        attendance::save_attendance(&store, &october_sheet(&employee.id)).await?;
        attendance::save_attendance(&store, &october_sheet(&other.id)).await?;
        calculate_payroll(&store, &request(&employee.id, "30000")).await?;
        calculate_payroll(&store, &request(&other.id, "30000")).await?;

        crate::core::employee::delete_employee(&store, &other.id).await?;
        let listed = list_company_payrolls(&store, &company.id).await?;
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|p| p.employee_name == UNKNOWN_EMPLOYEE));

        let found = filter_payrolls(&listed, &employee.name.to_uppercase());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.employee_id, employee.id);

        let deadlines = recent_payroll_deadlines(&store, &company.id, 1).await?;
        assert_eq!(deadlines.len(), 1);
        Ok(())
    }
}
