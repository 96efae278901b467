//! Employee performance - per-month attendance summaries.

use crate::{
    core::{attendance::DayTally, calendar::Period},
    entities::{Attendance, attendance},
    errors::Result,
    store::Store,
};
use sea_orm::{QueryOrder, prelude::*};

/// Attendance totals for one saved month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyPerformance {
    /// Month summarized
    pub period: Period,
    /// Day counts and hours
    pub tally: DayTally,
}

/// One summary per saved month, newest first.
pub async fn employee_performance(
    store: &Store,
    employee_id: &str,
) -> Result<Vec<MonthlyPerformance>> {
    let records = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .order_by_desc(attendance::Column::Year)
        .order_by_desc(attendance::Column::Month)
        .all(store.db())
        .await?;

    records
        .into_iter()
        .map(|record| {
            Ok(MonthlyPerformance {
                period: Period::from_columns(record.year, record.month)?,
                tally: DayTally::from_days(&record.days.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::attendance::{AttendanceSheet, save_attendance};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_performance_newest_first() -> Result<()> {
        let (store, _company, employee) = setup_with_employee().await?;

        for (year, month, marked) in [(2023, 12, 3), (2024, 2, 1), (2024, 1, 2)] {
            let period = Period::new(year, month).unwrap();
            let mut sheet = AttendanceSheet::new(employee.id.clone(), period);
            let days: Vec<u32> = (1..=period.days_in_month())
                .filter(|d| !period.is_rest_day(*d))
                .take(marked)
                .collect();
            for day in days {
                sheet.toggle(day).unwrap();
            }
            save_attendance(&store, &sheet).await?;
        }

        let months = employee_performance(&store, &employee.id).await?;
        let labels: Vec<_> = months.iter().map(|m| m.period.label()).collect();
        assert_eq!(labels, vec!["2/2024", "1/2024", "12/2023"]);
        assert_eq!(months[0].tally.present_days, 1);
        assert_eq!(months[2].tally.present_days, 3);
        assert_eq!(months[2].tally.total_hours, 24);
        assert_eq!(months[2].tally.absent_days, 28);

        assert!(employee_performance(&store, "nobody").await?.is_empty());
        Ok(())
    }
}
