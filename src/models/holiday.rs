//! Holiday calendar entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Company holiday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Holiday {
    #[serde(rename = "HolidayID", alias = "id")]
    pub id: i64,
    #[serde(alias = "HolidayName")]
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

/// DTO for creating or updating a holiday.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HolidayInput {
    pub name: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
