//! Company dashboard overview - the figures on the company's landing tab.
//!
//! Attendance percentages count Present day entries against all day entries of
//! a month, Sundays and Half-days included in the denominator.

use crate::{
    core::{attendance as attendance_log, calendar::Period, payroll, revenue},
    entities::{
        Employee, attendance::{self, AttendanceStatus}, employee,
        payroll::PayrollStatus, revenue as revenue_entity,
    },
    errors::Result,
    store::Store,
};
use sea_orm::prelude::*;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Employees shown in the "recent employees" list.
pub const RECENT_EMPLOYEE_LIMIT: usize = 5;

/// Payroll deadlines loaded for the overview.
pub const PAYROLL_DEADLINE_LIMIT: u64 = 3;

/// Share of Present days in one month across all employees.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAttendance {
    /// Month summarized
    pub period: Period,
    /// `month/year` label
    pub label: String,
    /// Percentage rounded to two decimals
    pub percentage: f64,
}

/// Everything the overview tab shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyOverview {
    /// Distinct employees with at least one saved month
    pub total_employees: usize,
    /// Mean of the monthly percentages, rounded to one decimal; `None` without attendance
    pub average_attendance: Option<f64>,
    /// Per-month percentages, oldest first
    pub monthly_attendance: Vec<MonthlyAttendance>,
    /// Employees with recently saved attendance
    pub recent_employees: Vec<employee::Model>,
    /// All revenue entries, oldest first
    pub revenues: Vec<revenue_entity::Model>,
    /// Amount of the newest revenue entry
    pub latest_revenue: Option<f64>,
    /// Status of the payroll with the latest deadline
    pub upcoming_payroll: Option<PayrollStatus>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Monthly attendance percentages and their average for a set of records.
#[must_use]
pub fn attendance_summary(records: &[attendance::Model]) -> (Vec<MonthlyAttendance>, Option<f64>) {
    let mut months: BTreeMap<(i32, i32), (u32, u32)> = BTreeMap::new();
    for record in records {
        let (present, total) = months.entry((record.year, record.month)).or_default();
        for day in &record.days.0 {
            *total += 1;
            if day.status == AttendanceStatus::Present {
                *present += 1;
            }
        }
    }

    let ratios: Vec<((i32, i32), f64)> = months
        .into_iter()
        .filter(|(_, (_, total))| *total > 0)
        .map(|(key, (present, total))| (key, f64::from(present) / f64::from(total)))
        .collect();

    let average = if ratios.is_empty() {
        None
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean = ratios.iter().map(|(_, r)| r).sum::<f64>() / ratios.len() as f64;
        Some(round_to(mean * 100.0, 1))
    };

    let monthly = ratios
        .into_iter()
        .filter_map(|((year, month), ratio)| {
            let period = Period::from_columns(year, month).ok()?;
            Some(MonthlyAttendance {
                period,
                label: period.label(),
                percentage: round_to(ratio * 100.0, 2),
            })
        })
        .collect();

    (monthly, average)
}

/// Builds the overview tab for a company.
pub async fn company_overview(store: &Store, company_id: &str) -> Result<CompanyOverview> {
    let revenues = revenue::list_revenues(store, company_id).await?;
    let deadlines =
        payroll::recent_payroll_deadlines(store, company_id, PAYROLL_DEADLINE_LIMIT).await?;

    let records = attendance_log::list_company_attendance(store, company_id).await?;

    let mut seen = HashSet::new();
    let employee_ids: Vec<&str> = records
        .iter()
        .map(|r| r.employee_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect();
    let total_employees = employee_ids.len();

    let recent_ids: Vec<&str> = employee_ids
        .iter()
        .copied()
        .take(RECENT_EMPLOYEE_LIMIT)
        .collect();
    let mut recent_employees = Employee::find()
        .filter(employee::Column::Id.is_in(recent_ids.iter().copied()))
        .all(store.db())
        .await?;
    recent_employees.sort_by_key(|e| recent_ids.iter().position(|id| *id == e.id));

    let (monthly_attendance, average_attendance) = attendance_summary(&records);
    debug!(
        "Overview for {}: {} employees over {} months",
        company_id,
        total_employees,
        monthly_attendance.len()
    );

    Ok(CompanyOverview {
        total_employees,
        average_attendance,
        monthly_attendance,
        recent_employees,
        latest_revenue: revenues.last().map(|r| r.amount),
        revenues,
        upcoming_payroll: deadlines.first().map(|p| p.status),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::attendance::{AttendanceSheet, save_attendance};
    use crate::core::payroll::{PayrollRequest, calculate_payroll, mark_payroll_paid};
    use crate::test_utils::*;
    use chrono::NaiveDate;

    async fn mark_working_days(
        store: &Store,
        employee_id: &str,
        period: Period,
        count: usize,
    ) -> Result<()> {
        let mut sheet = AttendanceSheet::new(employee_id, period);
        let days: Vec<u32> = (1..=period.days_in_month())
            .filter(|d| !period.is_rest_day(*d))
            .take(count)
            .collect();
        for day in days {
            sheet.toggle(day)?;
        }
        save_attendance(store, &sheet).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_overview_without_data() -> Result<()> {
        let (store, company) = setup_with_company().await?;
        let overview = company_overview(&store, &company.id).await?;
        assert_eq!(overview.total_employees, 0);
        assert_eq!(overview.average_attendance, None);
        assert!(overview.monthly_attendance.is_empty());
        assert!(overview.recent_employees.is_empty());
        assert_eq!(overview.latest_revenue, None);
        assert_eq!(overview.upcoming_payroll, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_overview_percentages() -> Result<()> {
        let (store, company, ali) = setup_with_employee().await?;
        let sara = create_test_employee(&store, &company.id, "Sara").await?;
        let april = Period::new(2024, 4)?;
        let june = Period::new(2024, 6)?;

        // April: 60 entries, 41 present
        mark_working_days(&store, &ali.id, april, 15).await?;
        mark_working_days(&store, &sara.id, april, 26).await?;
        // June: 30 entries, 3 present
        mark_working_days(&store, &ali.id, june, 3).await?;

        let overview = company_overview(&store, &company.id).await?;
        assert_eq!(overview.total_employees, 2);
        assert_eq!(overview.recent_employees.len(), 2);

        let labels: Vec<_> = overview
            .monthly_attendance
            .iter()
            .map(|m| m.label.as_str())
            .collect();
        assert_eq!(labels, vec!["4/2024", "6/2024"]);
        // 41 / 60
        assert_eq!(overview.monthly_attendance[0].percentage, 68.33);
        // 3 / 30
        assert_eq!(overview.monthly_attendance[1].percentage, 10.0);
        // (0.68333 + 0.1) / 2
        assert_eq!(overview.average_attendance, Some(39.2));
        Ok(())
    }

    #[tokio::test]
    async fn test_overview_revenue_and_payroll() -> Result<()> {
        let (store, company, employee) = setup_with_employee().await?;
        let april = Period::new(2024, 4)?;
        revenue::add_revenue(&store, &company.id, Period::new(2024, 3)?, "1000").await?;
        revenue::add_revenue(&store, &company.id, april, "2500").await?;
        mark_working_days(&store, &employee.id, april, 10).await?;

        let outcome = calculate_payroll(
            &store,
            &PayrollRequest {
                employee_id: employee.id.clone(),
                period: april,
                monthly_salary: "26000".to_string(),
                deadline: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            },
        )
        .await?;

        let overview = company_overview(&store, &company.id).await?;
        assert_eq!(overview.latest_revenue, Some(2500.0));
        assert_eq!(overview.revenues.len(), 2);
        assert_eq!(overview.upcoming_payroll, Some(PayrollStatus::Pending));

        mark_payroll_paid(&store, &outcome.record.id).await?;
        let overview = company_overview(&store, &company.id).await?;
        assert_eq!(overview.upcoming_payroll, Some(PayrollStatus::Paid));
        Ok(())
    }
}
