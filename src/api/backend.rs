//! Remote backend contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::leave::NewLeaveRequest;
use crate::models::{
    AttendanceRecord, CreateEmployee, DecisionPayload, DropdownKind, DropdownOption, Employee, Holiday,
    HolidayInput, LeaveRequest, LeaveRequestId, LeaveStats, LeaveType, LeaveTypeInput, LoginRequest,
    LoginResponse, Notification, OverviewStats, UpdateEmployee,
};

/// Which slice of leave requests to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveScope {
    /// The logged-in actor's own requests.
    Mine,
    /// Requests from the reporting manager's team.
    Team,
    /// Every request (admin/HR).
    All,
    /// Requests covering today.
    Today,
    /// The most recent `n` requests.
    Last(u32),
}

impl LeaveScope {
    /// Path under `/leave-requests/`.
    pub fn path(&self) -> String {
        match self {
            Self::Mine => "/leave-requests/my".to_string(),
            Self::Team => "/leave-requests/team".to_string(),
            Self::All => "/leave-requests/all".to_string(),
            Self::Today => "/leave-requests/today".to_string(),
            Self::Last(n) => format!("/leave-requests/last/{n}"),
        }
    }
}

/// Everything the client asks of the HR server.
///
/// Views and services hold an `Arc<dyn HrBackend>`; the production
/// implementation is [`ApiClient`](super::ApiClient).
#[async_trait]
pub trait HrBackend: Send + Sync {
    // Auth
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;
    async fn logout(&self) -> Result<()>;

    // Employee directory
    async fn list_employees(&self) -> Result<Vec<Employee>>;
    async fn get_employee(&self, id: i64) -> Result<Employee>;
    async fn create_employee(&self, data: &CreateEmployee) -> Result<Employee>;
    async fn update_employee(&self, id: i64, data: &UpdateEmployee) -> Result<Employee>;
    async fn delete_employee(&self, id: i64) -> Result<()>;
    async fn dropdown(&self, kind: DropdownKind) -> Result<Vec<DropdownOption>>;

    // Leave types
    async fn list_leave_types(&self) -> Result<Vec<LeaveType>>;
    async fn create_leave_type(&self, data: &LeaveTypeInput) -> Result<LeaveType>;
    async fn update_leave_type(&self, id: i64, data: &LeaveTypeInput) -> Result<LeaveType>;
    async fn delete_leave_type(&self, id: i64) -> Result<()>;

    // Holidays
    async fn list_holidays(&self) -> Result<Vec<Holiday>>;
    async fn create_holiday(&self, data: &HolidayInput) -> Result<Holiday>;
    async fn update_holiday(&self, id: i64, data: &HolidayInput) -> Result<Holiday>;
    async fn delete_holiday(&self, id: i64) -> Result<()>;

    // Leave requests
    async fn list_leave_requests(&self, scope: LeaveScope) -> Result<Vec<LeaveRequest>>;
    async fn leave_stats(&self) -> Result<LeaveStats>;
    async fn submit_leave_request(&self, request: &NewLeaveRequest) -> Result<LeaveRequest>;
    async fn approve_leave_request(&self, id: LeaveRequestId, payload: &DecisionPayload) -> Result<LeaveRequest>;
    async fn reject_leave_request(&self, id: LeaveRequestId, payload: &DecisionPayload) -> Result<LeaveRequest>;

    // Dashboard and attendance
    async fn overview_stats(&self) -> Result<OverviewStats>;
    async fn today_attendance(&self) -> Result<Vec<AttendanceRecord>>;
    async fn attendance_history(&self) -> Result<Vec<AttendanceRecord>>;
    async fn check_in(&self) -> Result<AttendanceRecord>;
    async fn check_out(&self) -> Result<AttendanceRecord>;

    // Notifications
    async fn list_notifications(&self) -> Result<Vec<Notification>>;
    async fn mark_notification_read(&self, id: i64) -> Result<()>;
    async fn mark_all_notifications_read(&self) -> Result<()>;
}
