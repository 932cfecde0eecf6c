//! HTTP implementation of [`HrBackend`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::backend::{HrBackend, LeaveScope};
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::leave::NewLeaveRequest;
use crate::models::{
    AttendanceRecord, CreateEmployee, DecisionPayload, DropdownKind, DropdownOption, Employee, Holiday,
    HolidayInput, LeaveRequest, LeaveRequestId, LeaveStats, LeaveType, LeaveTypeInput, LoginRequest,
    LoginResponse, Notification, OverviewStats, UpdateEmployee,
};
use crate::session::SessionService;

/// Either `{ "data": T }` or a bare `T`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(value) => value,
        }
    }
}

/// Error bodies carry the explanation under one of these keys.
#[derive(serde::Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// REST client for the HR server.
///
/// Attaches the session's bearer token to every call. A 401 on any call
/// except login and logout clears the session before the error is returned.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionService>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionService>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and map failures, clearing the session on 401.
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| AppError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        debug!("Request to {} failed with {status}", response.url().path());
        if status.as_u16() == 401 {
            self.session.handle_unauthorized();
            return Err(AppError::Unauthorized);
        }
        Err(error_from_response(response).await)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode_body(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(self.request(method, path).json(body)).await?;
        decode_body(response).await
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<()> {
        self.send(self.request(method, path)).await?;
        Ok(())
    }
}

async fn error_from_response(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body: ErrorBody = response.json().await.unwrap_or_default();
    AppError::from_status(status, body.message.or(body.error))
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(|e| AppError::Network(e.to_string()))?;
    let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
    Ok(envelope.into_inner())
}

#[async_trait]
impl HrBackend for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        // Bypasses `send`: a bad password must not touch the stored session.
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(AppError::Rejected {
                status: 401,
                message: "Invalid email or password".to_string(),
            });
        }
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }
        decode_body(response).await
    }

    async fn logout(&self) -> Result<()> {
        let response = self
            .request(Method::POST, "/auth/logout")
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        if !response.status().is_success() {
            warn!("Logout returned {}", response.status());
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        self.get("/employees").await
    }

    async fn get_employee(&self, id: i64) -> Result<Employee> {
        self.get(&format!("/employees/{id}")).await
    }

    async fn create_employee(&self, data: &CreateEmployee) -> Result<Employee> {
        self.send_json(Method::POST, "/employees", data).await
    }

    async fn update_employee(&self, id: i64, data: &UpdateEmployee) -> Result<Employee> {
        self.send_json(Method::PUT, &format!("/employees/{id}"), data).await
    }

    async fn delete_employee(&self, id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/employees/{id}")).await
    }

    async fn dropdown(&self, kind: DropdownKind) -> Result<Vec<DropdownOption>> {
        self.get(&format!("/dropdown/{}", kind.path())).await
    }

    async fn list_leave_types(&self) -> Result<Vec<LeaveType>> {
        self.get("/leave-types").await
    }

    async fn create_leave_type(&self, data: &LeaveTypeInput) -> Result<LeaveType> {
        self.send_json(Method::POST, "/leave-types", data).await
    }

    async fn update_leave_type(&self, id: i64, data: &LeaveTypeInput) -> Result<LeaveType> {
        self.send_json(Method::PUT, &format!("/leave-types/{id}"), data).await
    }

    async fn delete_leave_type(&self, id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/leave-types/{id}")).await
    }

    async fn list_holidays(&self) -> Result<Vec<Holiday>> {
        self.get("/holidays").await
    }

    async fn create_holiday(&self, data: &HolidayInput) -> Result<Holiday> {
        self.send_json(Method::POST, "/holidays", data).await
    }

    async fn update_holiday(&self, id: i64, data: &HolidayInput) -> Result<Holiday> {
        self.send_json(Method::PUT, &format!("/holidays/{id}"), data).await
    }

    async fn delete_holiday(&self, id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/holidays/{id}")).await
    }

    async fn list_leave_requests(&self, scope: LeaveScope) -> Result<Vec<LeaveRequest>> {
        self.get(&scope.path()).await
    }

    async fn leave_stats(&self) -> Result<LeaveStats> {
        self.get("/leave-requests/stats").await
    }

    async fn submit_leave_request(&self, request: &NewLeaveRequest) -> Result<LeaveRequest> {
        let mut form = Form::new();
        for (name, value) in request.form_fields() {
            form = form.text(name, value);
        }
        if let Some(attachment) = &request.attachment {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(attachment.mime_type)
                .map_err(|e| AppError::validation(format!("Unsupported document type: {e}")))?;
            form = form.part("document", part);
        }

        let response = self
            .send(self.request(Method::POST, "/leave-requests").multipart(form))
            .await?;
        decode_body(response).await
    }

    async fn approve_leave_request(&self, id: LeaveRequestId, payload: &DecisionPayload) -> Result<LeaveRequest> {
        self.send_json(Method::PATCH, &format!("/leave-requests/{id}/approve"), payload)
            .await
    }

    async fn reject_leave_request(&self, id: LeaveRequestId, payload: &DecisionPayload) -> Result<LeaveRequest> {
        self.send_json(Method::PATCH, &format!("/leave-requests/{id}/reject"), payload)
            .await
    }

    async fn overview_stats(&self) -> Result<OverviewStats> {
        self.get("/dashboard/overview").await
    }

    async fn today_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        self.get("/attendance/today").await
    }

    async fn attendance_history(&self) -> Result<Vec<AttendanceRecord>> {
        self.get("/attendance/history").await
    }

    async fn check_in(&self) -> Result<AttendanceRecord> {
        self.send_json(Method::POST, "/attendance/check-in", &serde_json::json!({}))
            .await
    }

    async fn check_out(&self) -> Result<AttendanceRecord> {
        self.send_json(Method::POST, "/attendance/check-out", &serde_json::json!({}))
            .await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.get("/notifications").await
    }

    async fn mark_notification_read(&self, id: i64) -> Result<()> {
        self.send_empty(Method::PATCH, &format!("/notifications/{id}/read")).await
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.send_empty(Method::PATCH, "/notifications/read-all").await
    }
}
