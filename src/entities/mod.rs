//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity corresponds to one document collection. Embedded arrays and
//! objects are stored as JSON columns, and no entity declares foreign keys:
//! references between collections are maintained by convention.

pub mod appointment;
pub mod attendance;
pub mod company;
pub mod doctor;
pub mod employee;
pub mod hospital;
pub mod payroll;
pub mod revenue;

// Re-export specific types to avoid conflicts
pub use appointment::{
    Column as AppointmentColumn, Entity as Appointment, Model as AppointmentModel,
};
pub use attendance::{Column as AttendanceColumn, Entity as Attendance, Model as AttendanceModel};
pub use company::{Column as CompanyColumn, Entity as Company, Model as CompanyModel};
pub use doctor::{Column as DoctorColumn, Entity as Doctor, Model as DoctorModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use hospital::{Column as HospitalColumn, Entity as Hospital, Model as HospitalModel};
pub use payroll::{Column as PayrollColumn, Entity as Payroll, Model as PayrollModel};
pub use revenue::{Column as RevenueColumn, Entity as Revenue, Model as RevenueModel};
