//! Form state for the CRUD dialogs and the leave application.

use chrono::{Local, NaiveDate};

use crate::leave::{LeaveDraft, ValidationErrors};
use crate::models::{
    CreateEmployee, Employee, Holiday, HolidayInput, LeaveRequestId, LeaveType, LeaveTypeInput, UpdateEmployee,
};

use super::components::parse_flexible_date;

#[derive(Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub submitting: bool,
}

/// Form state for employee CRUD.
#[derive(Default, Clone)]
pub struct EmployeeForm {
    pub id: Option<i64>,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub department_id: Option<i64>,
    pub designation_id: Option<i64>,
    pub employee_type_id: Option<i64>,
    pub role_id: Option<i64>,
    pub reporting_manager_id: Option<i64>,
    pub joining_date: Option<NaiveDate>,
    pub joining_date_input: String,
    pub is_active: bool,
    pub is_open: bool,
    pub is_editing: bool,
}

impl EmployeeForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Blank form for a new hire starting today.
    pub fn create() -> Self {
        let today = Local::now().date_naive();
        Self {
            is_active: true,
            joining_date: Some(today),
            joining_date_input: today.format("%Y-%m-%d").to_string(),
            is_open: true,
            ..Default::default()
        }
    }

    /// Create a form pre-filled for editing an existing employee.
    pub fn edit(emp: &Employee) -> Self {
        Self {
            id: Some(emp.id),
            employee_code: emp.employee_code.clone(),
            first_name: emp.first_name.clone(),
            last_name: emp.last_name.clone(),
            email: emp.email.clone(),
            phone: emp.phone.clone().unwrap_or_default(),
            password: String::new(),
            department_id: emp.department_id,
            designation_id: emp.designation_id,
            employee_type_id: emp.employee_type_id,
            role_id: emp.role_id,
            reporting_manager_id: emp.reporting_manager_id,
            joining_date: emp.joining_date,
            joining_date_input: emp.joining_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            is_active: emp.is_active,
            is_open: true,
            is_editing: true,
        }
    }

    pub fn set_joining_date_input(&mut self) {
        self.joining_date = parse_flexible_date(&self.joining_date_input);
    }

    fn check_common(&self) -> Result<(), String> {
        if self.employee_code.trim().is_empty() {
            return Err("Employee code is required".to_string());
        }
        if self.first_name.trim().is_empty() {
            return Err("First name is required".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if !email.contains('@') {
            return Err("Email address is not valid".to_string());
        }
        Ok(())
    }

    fn phone(&self) -> Option<String> {
        Some(self.phone.trim()).filter(|p| !p.is_empty()).map(str::to_string)
    }

    pub fn to_create(&self) -> Result<CreateEmployee, String> {
        self.check_common()?;
        if self.password.len() < 6 {
            return Err("Password must be at least 6 characters".to_string());
        }
        let joining_date = self.joining_date.ok_or("Joining date is required")?;

        Ok(CreateEmployee {
            employee_code: self.employee_code.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: self.phone(),
            department_id: self.department_id,
            designation_id: self.designation_id,
            employee_type_id: self.employee_type_id,
            role_id: self.role_id,
            reporting_manager_id: self.reporting_manager_id,
            joining_date,
        })
    }

    pub fn to_update(&self) -> Result<(i64, UpdateEmployee), String> {
        self.check_common()?;
        let id = self.id.ok_or("No employee selected")?;
        if !self.joining_date_input.trim().is_empty() && self.joining_date.is_none() {
            return Err("Joining date is not a valid date".to_string());
        }

        Ok((
            id,
            UpdateEmployee {
                employee_code: Some(self.employee_code.trim().to_string()),
                first_name: Some(self.first_name.trim().to_string()),
                last_name: Some(self.last_name.trim().to_string()),
                email: Some(self.email.trim().to_string()),
                phone: self.phone(),
                department_id: self.department_id,
                designation_id: self.designation_id,
                employee_type_id: self.employee_type_id,
                role_id: self.role_id,
                reporting_manager_id: self.reporting_manager_id,
                joining_date: self.joining_date,
                is_active: Some(self.is_active),
            },
        ))
    }
}

#[derive(Default, Clone)]
pub struct LeaveTypeForm {
    pub id: Option<i64>,
    pub name: String,
    pub number_of_leaves: String,
    pub employee_type_scope: String,
    pub role_id: Option<i64>,
    pub is_open: bool,
    pub is_editing: bool,
}

impl LeaveTypeForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn create() -> Self {
        Self {
            employee_type_scope: "All".to_string(),
            is_open: true,
            ..Default::default()
        }
    }

    pub fn edit(leave_type: &LeaveType) -> Self {
        Self {
            id: Some(leave_type.id),
            name: leave_type.name.clone(),
            number_of_leaves: leave_type.number_of_leaves.to_string(),
            employee_type_scope: leave_type.employee_type_scope.clone(),
            role_id: leave_type.role_id,
            is_open: true,
            is_editing: true,
        }
    }

    pub fn to_input(&self) -> Result<LeaveTypeInput, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Leave type name is required".to_string());
        }
        let number_of_leaves = self
            .number_of_leaves
            .trim()
            .parse::<u32>()
            .map_err(|_| "Number of leaves must be a whole number".to_string())?;

        Ok(LeaveTypeInput {
            name: name.to_string(),
            number_of_leaves,
            employee_type_scope: self.employee_type_scope.trim().to_string(),
            role_id: self.role_id,
        })
    }
}

#[derive(Default, Clone)]
pub struct HolidayForm {
    pub id: Option<i64>,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub date_input: String,
    pub description: String,
    pub is_open: bool,
    pub is_editing: bool,
}

impl HolidayForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn create() -> Self {
        Self {
            is_open: true,
            ..Default::default()
        }
    }

    pub fn edit(holiday: &Holiday) -> Self {
        Self {
            id: Some(holiday.id),
            name: holiday.name.clone(),
            date: Some(holiday.date),
            date_input: holiday.date.format("%Y-%m-%d").to_string(),
            description: holiday.description.clone().unwrap_or_default(),
            is_open: true,
            is_editing: true,
        }
    }

    pub fn to_input(&self) -> Result<HolidayInput, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Holiday name is required".to_string());
        }
        let date = self.date.ok_or("A valid date is required (YYYY-MM-DD)")?;
        Ok(HolidayInput {
            name: name.to_string(),
            date,
            description: Some(self.description.trim())
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }
}

/// Leave application page state.
#[derive(Clone)]
pub struct LeaveForm {
    pub draft: LeaveDraft,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub errors: ValidationErrors,
    pub server_error: Option<String>,
    pub submitting: bool,
}

impl Default for LeaveForm {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            draft: LeaveDraft::default(),
            start: today,
            end: today,
            errors: ValidationErrors::default(),
            server_error: None,
            submitting: false,
        }
    }
}

impl LeaveForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copy the picked dates into the draft.
    pub fn sync_dates(&mut self) {
        self.draft.start_date = Some(self.start);
        self.draft.end_date = Some(self.end);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    Approve,
    Reject,
}

/// Approve / reject dialog on the approvals screen.
#[derive(Debug, Clone)]
pub struct DecisionDialog {
    pub id: LeaveRequestId,
    pub employee: String,
    pub kind: DecisionKind,
    pub reason: String,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_create_requires_password() {
        let mut form = EmployeeForm::create();
        form.employee_code = "E001".to_string();
        form.first_name = "Minh".to_string();
        form.email = "minh@example.com".to_string();

        assert_eq!(
            form.to_create().unwrap_err(),
            "Password must be at least 6 characters"
        );

        form.password = "secret1".to_string();
        let data = form.to_create().unwrap();
        assert_eq!(data.email, "minh@example.com");
        assert!(data.phone.is_none());
    }

    #[test]
    fn test_employee_update_rejects_bad_date() {
        let mut form = EmployeeForm {
            id: Some(3),
            employee_code: "E003".to_string(),
            first_name: "Lan".to_string(),
            email: "lan@example.com".to_string(),
            joining_date_input: "not a date".to_string(),
            is_editing: true,
            ..Default::default()
        };
        form.set_joining_date_input();
        assert!(form.to_update().is_err());

        form.joining_date_input = "2024/01/15".to_string();
        form.set_joining_date_input();
        let (id, data) = form.to_update().unwrap();
        assert_eq!(id, 3);
        assert_eq!(data.joining_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_employee_email_checked() {
        let form = EmployeeForm {
            employee_code: "E1".to_string(),
            first_name: "A".to_string(),
            email: "nobody".to_string(),
            ..EmployeeForm::create()
        };
        assert_eq!(form.to_create().unwrap_err(), "Email address is not valid");
    }

    #[test]
    fn test_leave_type_form() {
        let mut form = LeaveTypeForm::create();
        form.name = "Sick".to_string();
        form.number_of_leaves = "x".to_string();
        assert!(form.to_input().is_err());

        form.number_of_leaves = " 10 ".to_string();
        let input = form.to_input().unwrap();
        assert_eq!(input.number_of_leaves, 10);
        assert_eq!(input.employee_type_scope, "All");
    }

    #[test]
    fn test_holiday_form() {
        let mut form = HolidayForm::create();
        form.name = "Tet".to_string();
        assert!(form.to_input().is_err());

        form.date = NaiveDate::from_ymd_opt(2026, 2, 17);
        let input = form.to_input().unwrap();
        assert_eq!(input.description, None);
    }
}
