//! Reference data served by `/dropdown/*` and the overview statistics.

use serde::{Deserialize, Serialize};

/// Kind of reference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropdownKind {
    Departments,
    Designations,
    EmployeeTypes,
    Roles,
    ReportingManagers,
}

impl DropdownKind {
    /// Path segment under `/dropdown/`.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Designations => "designations",
            Self::EmployeeTypes => "employee-types",
            Self::Roles => "roles",
            Self::ReportingManagers => "reporting-managers",
        }
    }

    pub const ALL: [DropdownKind; 5] = [
        Self::Departments,
        Self::Designations,
        Self::EmployeeTypes,
        Self::Roles,
        Self::ReportingManagers,
    ];
}

/// One selectable reference entry. Each list names its id/name columns after
/// its table, so the common spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    #[serde(
        alias = "ID",
        alias = "Id",
        alias = "DepartmentID",
        alias = "DesignationID",
        alias = "EmployeeTypeID",
        alias = "RoleID",
        alias = "EmployeeID"
    )]
    pub id: i64,
    #[serde(
        alias = "Name",
        alias = "DepartmentName",
        alias = "DesignationName",
        alias = "EmployeeTypeName",
        alias = "RoleName",
        alias = "FullName"
    )]
    pub name: String,
}

/// Find the display name for an optional id.
pub fn option_name(options: &[DropdownOption], id: Option<i64>) -> &str {
    id.and_then(|id| options.iter().find(|o| o.id == id))
        .map(|o| o.name.as_str())
        .unwrap_or("-")
}

/// Organisation-wide counters for the admin overview.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OverviewStats {
    pub total_employees: u32,
    pub present_today: u32,
    pub on_leave_today: u32,
    pub pending_requests: u32,
    pub upcoming_holidays: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropdown_aliases() {
        let opts: Vec<DropdownOption> = serde_json::from_str(
            r#"[
                { "DepartmentID": 1, "DepartmentName": "Engineering" },
                { "id": 2, "name": "Finance" }
            ]"#,
        )
        .unwrap();
        assert_eq!(opts[0].name, "Engineering");
        assert_eq!(option_name(&opts, Some(2)), "Finance");
        assert_eq!(option_name(&opts, Some(9)), "-");
        assert_eq!(option_name(&opts, None), "-");
    }

    #[test]
    fn test_overview_stats_missing_fields_default_to_zero() {
        let stats: OverviewStats = serde_json::from_str(r#"{ "TotalEmployees": 40 }"#).unwrap();
        assert_eq!(stats.total_employees, 40);
        assert_eq!(stats.pending_requests, 0);
    }
}
