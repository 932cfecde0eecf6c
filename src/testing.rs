//! In-memory backend and fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};

use crate::api::{HrBackend, LeaveScope};
use crate::error::{AppError, Result};
use crate::leave::NewLeaveRequest;
use crate::models::{
    AttendanceRecord, CreateEmployee, DayType, DecisionPayload, DropdownKind, DropdownOption, Employee,
    EmployeeRole, Holiday, HolidayInput, LeaveRequest, LeaveRequestId, LeaveStats, LeaveStatus, LeaveType,
    LeaveTypeInput, LoginRequest, LoginResponse, Notification, OverviewStats, StoredEmployee, StoredUser,
    UpdateEmployee,
};

/// Scripted failure for one backend method.
#[derive(Debug, Clone, Copy)]
pub enum Fail {
    Network,
    Status(u16),
}

impl Fail {
    fn error(self) -> AppError {
        match self {
            Fail::Network => AppError::Network("connection refused".to_string()),
            Fail::Status(status) => AppError::from_status(status, None),
        }
    }
}

/// Records every call and serves data from memory.
pub struct FakeBackend {
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, Fail>>,
    pub role_name: String,
    pub leave_requests: Mutex<Vec<LeaveRequest>>,
    pub employees: Mutex<Vec<Employee>>,
    pub overview: OverviewStats,
    pub attendance: Vec<AttendanceRecord>,
    pub stats: LeaveStats,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            role_name: "Employee".to_string(),
            leave_requests: Mutex::new(Vec::new()),
            employees: Mutex::new(Vec::new()),
            overview: OverviewStats::default(),
            attendance: Vec::new(),
            stats: LeaveStats::default(),
        }
    }

    pub fn with_role(mut self, role_name: &str) -> Self {
        self.role_name = role_name.to_string();
        self
    }

    pub fn with_requests(self, requests: Vec<LeaveRequest>) -> Self {
        *self.leave_requests.lock().unwrap() = requests;
        self
    }

    /// Make `method` fail until cleared.
    pub fn fail(&self, method: &'static str, fail: Fail) {
        self.failures.lock().unwrap().insert(method, fail);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|m| **m == method).count()
    }

    fn record(&self, method: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(method);
        match self.failures.lock().unwrap().get(method) {
            Some(fail) => Err(fail.error()),
            None => Ok(()),
        }
    }

    fn decide(&self, id: LeaveRequestId, status: LeaveStatus, payload: &DecisionPayload) -> Result<LeaveRequest> {
        let mut requests = self.leave_requests.lock().unwrap();
        let request = requests.iter_mut().find(|r| r.id == id).ok_or(AppError::NotFound)?;
        if request.status.is_terminal() {
            return Err(AppError::from_status(409, Some("Leave request already decided".to_string())));
        }
        request.status = status;
        request.approval_reason = payload.reason.clone();
        request.decided_at = Some(Utc::now());
        Ok(request.clone())
    }
}

#[async_trait]
impl HrBackend for FakeBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.record("login")?;
        Ok(login_response(&request.email, &self.role_name))
    }

    async fn logout(&self) -> Result<()> {
        self.record("logout")
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        self.record("list_employees")?;
        Ok(self.employees.lock().unwrap().clone())
    }

    async fn get_employee(&self, id: i64) -> Result<Employee> {
        self.record("get_employee")?;
        self.employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn create_employee(&self, data: &CreateEmployee) -> Result<Employee> {
        self.record("create_employee")?;
        let mut employees = self.employees.lock().unwrap();
        let employee = Employee {
            id: employees.len() as i64 + 1,
            employee_code: data.employee_code.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            department_id: data.department_id,
            designation_id: data.designation_id,
            employee_type_id: data.employee_type_id,
            role_id: data.role_id,
            reporting_manager_id: data.reporting_manager_id,
            joining_date: Some(data.joining_date),
            is_active: true,
        };
        employees.push(employee.clone());
        Ok(employee)
    }

    async fn update_employee(&self, id: i64, data: &UpdateEmployee) -> Result<Employee> {
        self.record("update_employee")?;
        let mut employees = self.employees.lock().unwrap();
        let employee = employees.iter_mut().find(|e| e.id == id).ok_or(AppError::NotFound)?;
        if let Some(active) = data.is_active {
            employee.is_active = active;
        }
        Ok(employee.clone())
    }

    async fn delete_employee(&self, id: i64) -> Result<()> {
        self.record("delete_employee")?;
        self.employees.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }

    async fn dropdown(&self, _kind: DropdownKind) -> Result<Vec<DropdownOption>> {
        self.record("dropdown")?;
        Ok(Vec::new())
    }

    async fn list_leave_types(&self) -> Result<Vec<LeaveType>> {
        self.record("list_leave_types")?;
        Ok(vec![LeaveType {
            id: 1,
            name: "Annual".to_string(),
            number_of_leaves: 12,
            employee_type_scope: "All".to_string(),
            role_id: None,
        }])
    }

    async fn create_leave_type(&self, data: &LeaveTypeInput) -> Result<LeaveType> {
        self.record("create_leave_type")?;
        Ok(LeaveType {
            id: 2,
            name: data.name.clone(),
            number_of_leaves: data.number_of_leaves,
            employee_type_scope: data.employee_type_scope.clone(),
            role_id: data.role_id,
        })
    }

    async fn update_leave_type(&self, id: i64, data: &LeaveTypeInput) -> Result<LeaveType> {
        self.record("update_leave_type")?;
        Ok(LeaveType {
            id,
            name: data.name.clone(),
            number_of_leaves: data.number_of_leaves,
            employee_type_scope: data.employee_type_scope.clone(),
            role_id: data.role_id,
        })
    }

    async fn delete_leave_type(&self, _id: i64) -> Result<()> {
        self.record("delete_leave_type")
    }

    async fn list_holidays(&self) -> Result<Vec<Holiday>> {
        self.record("list_holidays")?;
        Ok(Vec::new())
    }

    async fn create_holiday(&self, data: &HolidayInput) -> Result<Holiday> {
        self.record("create_holiday")?;
        Ok(Holiday {
            id: 1,
            name: data.name.clone(),
            date: data.date,
            description: data.description.clone(),
        })
    }

    async fn update_holiday(&self, id: i64, data: &HolidayInput) -> Result<Holiday> {
        self.record("update_holiday")?;
        Ok(Holiday {
            id,
            name: data.name.clone(),
            date: data.date,
            description: data.description.clone(),
        })
    }

    async fn delete_holiday(&self, _id: i64) -> Result<()> {
        self.record("delete_holiday")
    }

    async fn list_leave_requests(&self, scope: LeaveScope) -> Result<Vec<LeaveRequest>> {
        self.record("list_leave_requests")?;
        let requests = self.leave_requests.lock().unwrap().clone();
        Ok(match scope {
            LeaveScope::Last(n) => requests.into_iter().take(n as usize).collect(),
            _ => requests,
        })
    }

    async fn leave_stats(&self) -> Result<LeaveStats> {
        self.record("leave_stats")?;
        Ok(self.stats.clone())
    }

    async fn submit_leave_request(&self, request: &NewLeaveRequest) -> Result<LeaveRequest> {
        self.record("submit_leave_request")?;
        let mut requests = self.leave_requests.lock().unwrap();
        let created = LeaveRequest {
            id: requests.len() as i64 + 100,
            employee_id: 42,
            employee_name: None,
            leave_type_id: request.leave_type_id,
            leave_type_name: None,
            cover_up_employee_id: request.cover_up_employee_id,
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason.clone(),
            description: request.description.clone(),
            day_type: request.day_type,
            status: LeaveStatus::Pending,
            approval_reason: None,
            decided_at: None,
            created_at: Utc::now(),
        };
        requests.push(created.clone());
        Ok(created)
    }

    async fn approve_leave_request(&self, id: LeaveRequestId, payload: &DecisionPayload) -> Result<LeaveRequest> {
        self.record("approve_leave_request")?;
        self.decide(id, LeaveStatus::Approved, payload)
    }

    async fn reject_leave_request(&self, id: LeaveRequestId, payload: &DecisionPayload) -> Result<LeaveRequest> {
        self.record("reject_leave_request")?;
        self.decide(id, LeaveStatus::Rejected, payload)
    }

    async fn overview_stats(&self) -> Result<OverviewStats> {
        self.record("overview_stats")?;
        Ok(self.overview.clone())
    }

    async fn today_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        self.record("today_attendance")?;
        Ok(self.attendance.clone())
    }

    async fn attendance_history(&self) -> Result<Vec<AttendanceRecord>> {
        self.record("attendance_history")?;
        Ok(self.attendance.clone())
    }

    async fn check_in(&self) -> Result<AttendanceRecord> {
        self.record("check_in")?;
        Ok(attendance_record(1, date(2025, 3, 10)))
    }

    async fn check_out(&self) -> Result<AttendanceRecord> {
        self.record("check_out")?;
        Ok(attendance_record(1, date(2025, 3, 10)))
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.record("list_notifications")?;
        Ok(Vec::new())
    }

    async fn mark_notification_read(&self, _id: i64) -> Result<()> {
        self.record("mark_notification_read")
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.record("mark_all_notifications_read")
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn login_response(email: &str, role_name: &str) -> LoginResponse {
    LoginResponse {
        token: "token-123".to_string(),
        user: StoredUser {
            id: 7,
            email: email.to_string(),
            extra: Default::default(),
        },
        employee: StoredEmployee {
            id: 42,
            first_name: "Lan".to_string(),
            last_name: "Tran".to_string(),
            role: Some(EmployeeRole {
                role_id: 3,
                role_name: role_name.to_string(),
            }),
            extra: Default::default(),
        },
    }
}

pub fn leave_request(id: LeaveRequestId, status: LeaveStatus) -> LeaveRequest {
    LeaveRequest {
        id,
        employee_id: 42,
        employee_name: Some("Lan Tran".to_string()),
        leave_type_id: 1,
        leave_type_name: Some("Annual".to_string()),
        cover_up_employee_id: None,
        start_date: date(2025, 3, 10),
        end_date: date(2025, 3, 12),
        reason: "Family trip".to_string(),
        description: None,
        day_type: DayType::Full,
        status,
        approval_reason: None,
        decided_at: None,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap() + chrono::Duration::minutes(id),
    }
}

pub fn attendance_record(id: i64, day: NaiveDate) -> AttendanceRecord {
    AttendanceRecord {
        id,
        employee_id: 42,
        employee_name: Some("Lan Tran".to_string()),
        date: day,
        check_in: Some(Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap()),
        check_out: None,
        status: "Present".to_string(),
    }
}
