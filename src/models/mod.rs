//! Wire models for the HR backend.

pub mod attendance;
pub mod auth;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod notification;
pub mod reference;

pub use attendance::AttendanceRecord;
pub use auth::{EmployeeRole, LoginRequest, LoginResponse, Role, StoredEmployee, StoredUser};
pub use employee::{CreateEmployee, Employee, UpdateEmployee};
pub use holiday::{Holiday, HolidayInput};
pub use leave::{
    DayType, DecisionPayload, LeaveRequest, LeaveRequestId, LeaveStats, LeaveStatus, LeaveType, LeaveTypeInput,
};
pub use notification::Notification;
pub use reference::{DropdownKind, DropdownOption, OverviewStats};
