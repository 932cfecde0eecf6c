//! Leave application form state and its local validation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use super::attachment::Attachment;
use crate::api::HrBackend;
use crate::error::{AppError, Result};
use crate::models::{DayType, LeaveRequest};

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LeaveField {
    LeaveType,
    StartDate,
    EndDate,
    Reason,
    Document,
}

/// Per-field messages, shown inline under each input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    fields: BTreeMap<LeaveField, String>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: LeaveField, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: LeaveField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn into_error(self) -> AppError {
        AppError::Validation(self.to_string())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.fields.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

/// What the user has typed into the leave form so far.
#[derive(Debug, Clone, Default)]
pub struct LeaveDraft {
    pub leave_type_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: String,
    pub description: String,
    pub cover_up_employee_id: Option<i64>,
    pub day_type: DayType,
    pub document: Option<PathBuf>,
}

/// A fully validated request, ready for the multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
    pub leave_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub description: Option<String>,
    pub cover_up_employee_id: Option<i64>,
    pub day_type: DayType,
    pub attachment: Option<Attachment>,
}

impl NewLeaveRequest {
    /// Text parts of the multipart form, in the server's field names.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("LeaveTypeID", self.leave_type_id.to_string()),
            ("StartDate", self.start_date.format("%Y-%m-%d").to_string()),
            ("EndDate", self.end_date.format("%Y-%m-%d").to_string()),
            ("Reason", self.reason.clone()),
            ("DayType", self.day_type.as_str().to_string()),
        ];
        if let Some(description) = &self.description {
            fields.push(("Description", description.clone()));
        }
        if let Some(cover) = self.cover_up_employee_id {
            fields.push(("CoverUpEMPID", cover.to_string()));
        }
        fields
    }
}

impl LeaveDraft {
    /// Check every rule, collecting one message per offending field.
    ///
    /// Reads the picked document from disk when one is set.
    pub fn validate(&self, today: NaiveDate) -> std::result::Result<NewLeaveRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.leave_type_id.is_none() {
            errors.insert(LeaveField::LeaveType, "Leave type is required");
        }

        match self.start_date {
            None => errors.insert(LeaveField::StartDate, "Start date is required"),
            Some(start) if start < today => errors.insert(LeaveField::StartDate, "Start date cannot be in the past"),
            Some(_) => {}
        }

        match (self.start_date, self.end_date) {
            (_, None) => errors.insert(LeaveField::EndDate, "End date is required"),
            (Some(start), Some(end)) if end < start => {
                errors.insert(LeaveField::EndDate, "End date must be on or after the start date")
            }
            _ => {}
        }

        let reason = self.reason.trim();
        if reason.is_empty() {
            errors.insert(LeaveField::Reason, "Reason is required");
        }

        let attachment = match &self.document {
            Some(path) => match Attachment::from_path(path) {
                Ok(attachment) => Some(attachment),
                Err(e) => {
                    errors.insert(LeaveField::Document, e.to_string());
                    None
                }
            },
            None => None,
        };

        match (self.leave_type_id, self.start_date, self.end_date) {
            (Some(leave_type_id), Some(start_date), Some(end_date)) if errors.is_empty() => Ok(NewLeaveRequest {
                leave_type_id,
                start_date,
                end_date,
                reason: reason.to_string(),
                description: Some(self.description.trim())
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
                cover_up_employee_id: self.cover_up_employee_id,
                day_type: self.day_type,
                attachment,
            }),
            _ => Err(errors),
        }
    }
}

/// Validate locally, then create the request on the server.
///
/// Nothing is sent when validation fails.
pub async fn submit(backend: &dyn HrBackend, draft: &LeaveDraft, today: NaiveDate) -> Result<LeaveRequest> {
    let request = draft.validate(today).map_err(ValidationErrors::into_error)?;
    let created = backend.submit_leave_request(&request).await?;
    info!(
        "Submitted leave request {} ({} to {})",
        created.id, created.start_date, created.end_date
    );
    Ok(created)
}
