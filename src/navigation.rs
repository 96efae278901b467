//! The screen graph - every screen and the parameters it needs.
//!
//! A [`Route`] serializes as `{"screen": <name>, "params": {...}}` with
//! camelCase parameter names. Screens without parameters carry no `params`.

use serde::{Deserialize, Serialize};

/// A destination in the app, with its typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "params", rename_all_fields = "camelCase")]
pub enum Route {
    /// Admin login
    Login,
    /// Landing screen after login
    Home {
        /// Logged-in user
        username: String,
    },
    /// Business management home
    BusinessHome,
    /// Company registration form
    AddCompany,
    /// Employee registration form
    AddEmployee,
    /// Hospital management home
    HospitalHome,
    /// Hospital registration form
    AddHospital,
    /// Slot booking
    BookAppointment,
    /// Company list with PIN gate
    BusinessDashboard,
    /// Employees of one company
    CompanyEmployees {
        /// Company shown
        company_id: String,
        /// Company name for the header
        company_name: String,
    },
    /// One employee's hub
    EmployeeDashboard {
        /// Employee shown
        employee_id: String,
        /// Employee name for the header
        employee_name: String,
    },
    /// Monthly attendance marking
    AttendanceScreen {
        /// Employee marked
        employee_id: String,
        /// Employee name for the header
        employee_name: String,
    },
    /// Per-month attendance summaries
    PerformanceScreen {
        /// Employee shown
        employee_id: String,
        /// Employee name for the header
        employee_name: String,
    },
    /// Payroll calculation
    PayrollScreen {
        /// Employee paid
        employee_id: String,
        /// Employee name for the header
        employee_name: String,
    },
    /// Doctor registration form
    AddDoctor,
    /// Hospital list
    HospitalDashboard,
    /// One hospital with its doctors
    HospitalDetails {
        /// Hospital shown
        hospital_id: String,
    },
    /// Slot management for one doctor
    DoctorDashboard {
        /// Doctor shown
        doctor_id: String,
    },
    /// Doctor list with PIN gate
    AllDoctors,
    /// Company overview, employees, payroll and revenue tabs
    CompanyDashboard {
        /// Company shown
        company_id: String,
        /// Company name for the header
        #[serde(default, skip_serializing_if = "Option::is_none")]
        company_name: Option<String>,
    },
    /// Employee edit form
    UpdateEmployee {
        /// Employee edited
        employee_id: String,
        /// Employee's company
        company_id: String,
    },
    /// Patients of a hospital
    PatientManagement,
}

impl Route {
    /// Screen name as serialized.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Home { .. } => "Home",
            Self::BusinessHome => "BusinessHome",
            Self::AddCompany => "AddCompany",
            Self::AddEmployee => "AddEmployee",
            Self::HospitalHome => "HospitalHome",
            Self::AddHospital => "AddHospital",
            Self::BookAppointment => "BookAppointment",
            Self::BusinessDashboard => "BusinessDashboard",
            Self::CompanyEmployees { .. } => "CompanyEmployees",
            Self::EmployeeDashboard { .. } => "EmployeeDashboard",
            Self::AttendanceScreen { .. } => "AttendanceScreen",
            Self::PerformanceScreen { .. } => "PerformanceScreen",
            Self::PayrollScreen { .. } => "PayrollScreen",
            Self::AddDoctor => "AddDoctor",
            Self::HospitalDashboard => "HospitalDashboard",
            Self::HospitalDetails { .. } => "HospitalDetails",
            Self::DoctorDashboard { .. } => "DoctorDashboard",
            Self::AllDoctors => "AllDoctors",
            Self::CompanyDashboard { .. } => "CompanyDashboard",
            Self::UpdateEmployee { .. } => "UpdateEmployee",
            Self::PatientManagement => "PatientManagement",
        }
    }

    /// Header title of the screen.
    #[must_use]
    pub fn title(&self) -> String {
        let title = match self {
            Self::Login => "Login",
            Self::Home { .. } => "Bethel City Management",
            Self::BusinessHome => "Business Management",
            Self::AddCompany => "Add New Company",
            Self::AddEmployee => "Add Employee",
            Self::HospitalHome => "Hospital Management",
            Self::AddHospital => "Add New Hospital",
            Self::BookAppointment => "Book Appointment",
            Self::BusinessDashboard => "Company Dashboard",
            Self::CompanyEmployees { .. } => "Company Employees",
            Self::EmployeeDashboard { employee_name, .. } if !employee_name.is_empty() => {
                employee_name.as_str()
            }
            Self::EmployeeDashboard { .. } => "Employee Dashboard",
            Self::AttendanceScreen { .. } => "Attendance",
            Self::PerformanceScreen { .. } => "Performance Review",
            Self::PayrollScreen { .. } => "Payroll",
            Self::AddDoctor => "Add Doctor",
            Self::HospitalDashboard => "Hospital Dashboard",
            Self::HospitalDetails { .. } => "Hospital Details",
            Self::DoctorDashboard { .. } => "Doctor Dashboard",
            Self::AllDoctors => "All Doctors",
            Self::CompanyDashboard {
                company_name: Some(name),
                ..
            } if !name.is_empty() => name.as_str(),
            Self::CompanyDashboard { .. } => "Company Dashboard",
            Self::UpdateEmployee { .. } => "Update Employee",
            Self::PatientManagement => "Patient Management",
        };
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_routes_serialize_with_camel_case_params() {
        let route = Route::PayrollScreen {
            employee_id: "emp-1".to_string(),
            employee_name: "Ali".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&route).unwrap(),
            json!({
                "screen": "PayrollScreen",
                "params": { "employeeId": "emp-1", "employeeName": "Ali" }
            })
        );
        assert_eq!(
            serde_json::to_value(Route::AllDoctors).unwrap(),
            json!({ "screen": "AllDoctors" })
        );
    }

    #[test]
    fn test_optional_company_name() {
        let without = Route::CompanyDashboard {
            company_id: "co-1".to_string(),
            company_name: None,
        };
        assert_eq!(
            serde_json::to_value(&without).unwrap(),
            json!({ "screen": "CompanyDashboard", "params": { "companyId": "co-1" } })
        );
        assert_eq!(without.title(), "Company Dashboard");

        let parsed: Route = serde_json::from_value(json!({
            "screen": "CompanyDashboard",
            "params": { "companyId": "co-1", "companyName": "Acme" }
        }))
        .unwrap();
        assert_eq!(parsed.title(), "Acme");
        assert_eq!(parsed.name(), "CompanyDashboard");
    }

    #[test]
    fn test_missing_required_params_rejected() {
        let missing = serde_json::from_value::<Route>(json!({
            "screen": "UpdateEmployee",
            "params": { "employeeId": "emp-1" }
        }));
        assert!(missing.is_err());

        let unknown = serde_json::from_value::<Route>(json!({ "screen": "Settings" }));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_names_match_serialized_screen() {
        let routes = [
            Route::Login,
            Route::Home {
                username: "admin".to_string(),
            },
            Route::HospitalDetails {
                hospital_id: "h-1".to_string(),
            },
            Route::PatientManagement,
        ];
        for route in routes {
            let value = serde_json::to_value(&route).unwrap();
            assert_eq!(value["screen"], route.name());
        }
    }
}
