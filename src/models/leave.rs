//! Leave requests and leave types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned leave request identifier.
pub type LeaveRequestId = i64;

/// Status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    #[serde(alias = "Pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "Approved", alias = "APPROVED")]
    Approved,
    #[serde(alias = "Rejected", alias = "REJECTED")]
    Rejected,
}

impl LeaveStatus {
    /// Approved and rejected requests accept no further decision from this client.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether a manager decision may move a request from `self` to `next`.
    pub fn can_transition_to(&self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// Full or half day leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    #[default]
    #[serde(alias = "Full", alias = "FULL")]
    Full,
    #[serde(alias = "Half", alias = "HALF")]
    Half,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
        }
    }
}

/// A leave request as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LeaveRequest {
    #[serde(rename = "LeaveRequestID", alias = "id", alias = "ID")]
    pub id: LeaveRequestId,
    #[serde(rename = "EmployeeID")]
    pub employee_id: i64,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(rename = "LeaveTypeID")]
    pub leave_type_id: i64,
    #[serde(default)]
    pub leave_type_name: Option<String>,
    #[serde(rename = "CoverUpEMPID", default)]
    pub cover_up_employee_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub day_type: DayType,
    pub status: LeaveStatus,
    #[serde(default)]
    pub approval_reason: Option<String>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Number of leave days covered, counting half days as 0.5.
    pub fn day_count(&self) -> f64 {
        let days = (self.end_date - self.start_date).num_days() + 1;
        match self.day_type {
            DayType::Full => days as f64,
            DayType::Half => days as f64 * 0.5,
        }
    }

    /// Leave type name, or the id when the server omitted it.
    pub fn leave_type_label(&self) -> String {
        self.leave_type_name
            .clone()
            .unwrap_or_else(|| format!("Type #{}", self.leave_type_id))
    }
}

/// Body of the approve/reject calls.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Configured leave type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LeaveType {
    #[serde(rename = "LeaveTypeID", alias = "id")]
    pub id: i64,
    #[serde(alias = "LeaveTypeName")]
    pub name: String,
    pub number_of_leaves: u32,
    #[serde(default)]
    pub employee_type_scope: String,
    #[serde(rename = "RoleID", default)]
    pub role_id: Option<i64>,
}

/// DTO for creating or updating a leave type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LeaveTypeInput {
    pub name: String,
    pub number_of_leaves: u32,
    pub employee_type_scope: String,
    #[serde(rename = "RoleID", skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
}

/// Leave balance summary for the logged-in actor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LeaveStats {
    pub total_allowed: f64,
    pub used: f64,
    pub remaining: f64,
    pub pending: u32,
}
