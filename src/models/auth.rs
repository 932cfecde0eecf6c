//! Login payloads, stored identity and roles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: StoredUser,
    pub employee: StoredEmployee,
}

/// Authenticated user account as returned by the server.
///
/// Unknown fields are kept so the stored copy matches what the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredUser {
    #[serde(rename = "UserID", alias = "id")]
    pub id: i64,
    #[serde(alias = "email")]
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Employee record of the logged-in actor, including its role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredEmployee {
    #[serde(rename = "EmployeeID", alias = "id")]
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "role", alias = "Role", default)]
    pub role: Option<EmployeeRole>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nested `role` object of the stored employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRole {
    #[serde(rename = "RoleID")]
    pub role_id: i64,
    #[serde(rename = "RoleName")]
    pub role_name: String,
}

impl StoredEmployee {
    /// Display name, falling back to the employee id.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            format!("Employee #{}", self.id)
        } else {
            name.to_string()
        }
    }

    /// Role derived from `role.RoleName`.
    pub fn role(&self) -> Option<Role> {
        self.role.as_ref().and_then(|r| Role::from_name(&r.role_name))
    }
}

/// Capability of the logged-in actor. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Hr,
    Rm,
    Employee,
}

impl Role {
    /// Parse a server role name; matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = name.trim().to_lowercase().replace(['_', '-'], " ");
        match tag.as_str() {
            "admin" | "administrator" => Some(Self::Admin),
            "hr" => Some(Self::Hr),
            "rm" | "reporting manager" => Some(Self::Rm),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Lowercase role tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Hr => "hr",
            Self::Rm => "rm",
            Self::Employee => "employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_name() {
        assert_eq!(Role::from_name("Admin"), Some(Role::Admin));
        assert_eq!(Role::from_name("HR"), Some(Role::Hr));
        assert_eq!(Role::from_name("RM"), Some(Role::Rm));
        assert_eq!(Role::from_name("Reporting_Manager"), Some(Role::Rm));
        assert_eq!(Role::from_name(" employee "), Some(Role::Employee));
        assert_eq!(Role::from_name("contractor"), None);
    }

    #[test]
    fn test_parse_login_response() {
        let body = r#"{
            "token": "abc.def",
            "user": { "UserID": 7, "Email": "rm@example.com", "IsActive": true },
            "employee": {
                "EmployeeID": 42,
                "FirstName": "Lan",
                "LastName": "Tran",
                "DepartmentID": 3,
                "role": { "RoleID": 3, "RoleName": "RM" }
            }
        }"#;

        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.token, "abc.def");
        assert_eq!(resp.user.email, "rm@example.com");
        assert_eq!(resp.employee.role(), Some(Role::Rm));
        assert_eq!(resp.employee.display_name(), "Lan Tran");

        // Unknown fields survive a store round trip.
        let stored = serde_json::to_value(&resp.employee).unwrap();
        assert_eq!(stored["DepartmentID"], 3);
        assert_eq!(stored["role"]["RoleName"], "RM");
    }

    #[test]
    fn test_employee_without_role() {
        let emp: StoredEmployee = serde_json::from_str(r#"{ "EmployeeID": 1 }"#).unwrap();
        assert_eq!(emp.role(), None);
        assert_eq!(emp.display_name(), "Employee #1");
    }
}
