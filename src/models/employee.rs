//! Employee directory records and DTOs for create and update operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Employee {
    #[serde(rename = "EmployeeID", alias = "id")]
    pub id: i64,
    #[serde(default)]
    pub employee_code: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "DepartmentID", default)]
    pub department_id: Option<i64>,
    #[serde(rename = "DesignationID", default)]
    pub designation_id: Option<i64>,
    #[serde(rename = "EmployeeTypeID", default)]
    pub employee_type_id: Option<i64>,
    #[serde(rename = "RoleID", default)]
    pub role_id: Option<i64>,
    #[serde(rename = "ReportingManagerID", default)]
    pub reporting_manager_id: Option<i64>,
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// DTO for onboarding an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateEmployee {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "DepartmentID", skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(rename = "DesignationID", skip_serializing_if = "Option::is_none")]
    pub designation_id: Option<i64>,
    #[serde(rename = "EmployeeTypeID", skip_serializing_if = "Option::is_none")]
    pub employee_type_id: Option<i64>,
    #[serde(rename = "RoleID", skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    #[serde(rename = "ReportingManagerID", skip_serializing_if = "Option::is_none")]
    pub reporting_manager_id: Option<i64>,
    pub joining_date: NaiveDate,
}

/// DTO for updating an employee. Unset fields are left unchanged by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateEmployee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "DepartmentID", skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(rename = "DesignationID", skip_serializing_if = "Option::is_none")]
    pub designation_id: Option<i64>,
    #[serde(rename = "EmployeeTypeID", skip_serializing_if = "Option::is_none")]
    pub employee_type_id: Option<i64>,
    #[serde(rename = "RoleID", skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    #[serde(rename = "ReportingManagerID", skip_serializing_if = "Option::is_none")]
    pub reporting_manager_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_employee_defaults() {
        let emp: Employee = serde_json::from_str(
            r#"{ "EmployeeID": 5, "FirstName": "Minh", "LastName": "Le", "Email": "minh@example.com" }"#,
        )
        .unwrap();
        assert_eq!(emp.full_name(), "Minh Le");
        assert!(emp.is_active);
        assert!(emp.department_id.is_none());
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let data = UpdateEmployee {
            department_id: Some(4),
            is_active: Some(false),
            ..Default::default()
        };
        let body = serde_json::to_value(&data).unwrap();
        assert_eq!(body, serde_json::json!({ "DepartmentID": 4, "IsActive": false }));
    }
}
