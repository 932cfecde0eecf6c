//! Attendance records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One employee's attendance for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttendanceRecord {
    #[serde(rename = "AttendanceID", alias = "id")]
    pub id: i64,
    #[serde(rename = "EmployeeID")]
    pub employee_id: i64,
    #[serde(default)]
    pub employee_name: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: String,
}

impl AttendanceRecord {
    /// Hours between check-in and check-out, when both are present.
    pub fn work_hours(&self) -> Option<f64> {
        let (start, end) = (self.check_in?, self.check_out?);
        let duration = end - start;
        Some(duration.num_minutes() as f64 / 60.0)
    }

    /// Checked in but not yet out.
    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }
}
