//! Main application UI.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout, RichText};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::api::{HrBackend, LeaveScope};
use crate::config::AppConfig;
use crate::dashboard::{EmployeeDashboard, ManagerDashboard, Overview};
use crate::error::{AppError, Result};
use crate::leave::{ApprovalDesk, Decision, LeaveBook, PreparedDecision};
use crate::models::notification::unread_count;
use crate::models::{
    AttendanceRecord, CreateEmployee, DropdownKind, DropdownOption, Employee, Holiday, HolidayInput, LeaveRequest,
    LeaveStatus, LeaveType, LeaveTypeInput, Notification, Role, UpdateEmployee,
};
use crate::router::{Route, Router, Surface};
use crate::scope::TaskScope;
use crate::session::{SessionEvent, SessionService};

use super::components::colors;
use super::forms::{DecisionDialog, DecisionKind, EmployeeForm, HolidayForm, LeaveForm, LeaveTypeForm, LoginForm};
use super::{
    approval_panel, attendance_panel, dashboard, employee_panel, holiday_panel, leave_panel, leave_requests_panel,
    leave_type_panel, login_panel, notification_panel, staff_panel,
};

/// Messages from async tasks to UI.
///
/// Variants carrying a `generation` belong to the current view and are
/// dropped when the view has changed since they were spawned.
pub enum UiMessage {
    // Session
    LoginFinished(Result<()>),

    // View data
    OverviewLoaded { generation: u64, overview: Overview },
    EmployeeDashboardLoaded { generation: u64, dashboard: EmployeeDashboard },
    ManagerDashboardLoaded { generation: u64, dashboard: ManagerDashboard },
    EmployeesLoaded { generation: u64, employees: Vec<Employee> },
    LeaveTypesLoaded { generation: u64, leave_types: Vec<LeaveType> },
    HolidaysLoaded { generation: u64, holidays: Vec<Holiday> },
    RequestsLoaded { generation: u64, scope: LeaveScope, requests: Vec<LeaveRequest> },
    AttendanceLoaded { generation: u64, records: Vec<AttendanceRecord> },
    LoadError { generation: u64, error: AppError },

    // Session-wide data
    ReferenceLoaded(DropdownKind, Vec<DropdownOption>),
    ReferenceFailed(DropdownKind),
    ColleaguesLoaded(Vec<DropdownOption>),
    NotificationsLoaded(Vec<Notification>),

    // Mutations
    EmployeeSaved(Employee),
    LeaveTypeSaved(LeaveType),
    HolidaySaved(Holiday),
    Deleted(DeleteTarget),
    LeaveSubmitted(LeaveRequest),
    LeaveSubmitFailed(AppError),
    DecisionFinished { prepared: PreparedDecision, result: Result<LeaveRequest> },
    AttendanceMarked { checked_in: bool, record: AttendanceRecord },
    NotificationsChanged,
    OperationFailed(AppError),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Target for delete confirmation dialog.
#[derive(Clone, Debug)]
pub enum DeleteTarget {
    Employee(i64, String),
    LeaveType(i64, String),
    Holiday(i64, String),
}

/// Main application state.
pub struct App {
    // Runtime and backend
    pub rt: tokio::runtime::Runtime,
    pub backend: Arc<dyn HrBackend>,
    pub session: Arc<SessionService>,
    session_events: broadcast::Receiver<SessionEvent>,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub router: Router,
    scope: TaskScope,

    // Cached data
    pub overview: Option<Overview>,
    pub employee_dashboard: Option<EmployeeDashboard>,
    pub manager_dashboard: Option<ManagerDashboard>,
    pub employees: Vec<Employee>,
    pub colleagues: Vec<DropdownOption>,
    pub reference: HashMap<DropdownKind, Vec<DropdownOption>>,
    pub leave_types: Vec<LeaveType>,
    pub holidays: Vec<Holiday>,
    pub all_requests: LeaveBook,
    pub my_requests: LeaveBook,
    pub approvals: ApprovalDesk,
    pub attendance_history: Vec<AttendanceRecord>,
    pub notifications: Vec<Notification>,

    // Loading states
    pub is_loading: bool,
    pub attendance_busy: bool,

    // Forms
    pub login_form: LoginForm,
    pub employee_form: EmployeeForm,
    pub leave_type_form: LeaveTypeForm,
    pub holiday_form: HolidayForm,
    pub leave_form: LeaveForm,
    pub decision_dialog: Option<DecisionDialog>,

    // Search/filter state
    pub employee_search: String,
    pub employee_dept_filter: Option<i64>,
    pub employee_status_filter: Option<bool>,
    pub request_status_filter: Option<LeaveStatus>,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,

    // Dialogs
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(
        config: AppConfig,
        rt: tokio::runtime::Runtime,
        session: Arc<SessionService>,
        backend: Arc<dyn HrBackend>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let session_events = session.subscribe();

        let mut app = Self {
            rt,
            backend,
            session,
            session_events,
            tx,
            rx,
            router: Router::new(),
            scope: TaskScope::new(),
            overview: None,
            employee_dashboard: None,
            manager_dashboard: None,
            employees: Vec::new(),
            colleagues: Vec::new(),
            reference: HashMap::new(),
            leave_types: Vec::new(),
            holidays: Vec::new(),
            all_requests: LeaveBook::default(),
            my_requests: LeaveBook::default(),
            approvals: ApprovalDesk::default(),
            attendance_history: Vec::new(),
            notifications: Vec::new(),
            is_loading: false,
            attendance_busy: false,
            login_form: LoginForm::default(),
            employee_form: EmployeeForm::default(),
            leave_type_form: LeaveTypeForm::default(),
            holiday_form: HolidayForm::default(),
            leave_form: LeaveForm::default(),
            decision_dialog: None,
            employee_search: String::new(),
            employee_dept_filter: None,
            employee_status_filter: None,
            request_status_filter: None,
            log_messages: Vec::new(),
            config,
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
        };

        // A session restored from disk lands on its home surface.
        if let Some(role) = app.role() {
            info!("Restored session for role {role}");
            app.navigate(role.home());
            app.load_notifications();
        }

        app
    }

    pub fn role(&self) -> Option<Role> {
        self.session.current_role()
    }

    pub fn today(&self) -> chrono::NaiveDate {
        Local::now().date_naive()
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Show `error` in the error dialog and the activity log.
    fn report(&mut self, error: &AppError) {
        let message = error.user_message();
        self.log_error(message.clone());
        // A 401 already sent the actor to the login screen.
        if !matches!(error, AppError::Unauthorized) {
            self.error_message = Some(message);
        }
    }

    // ---- navigation ------------------------------------------------------

    /// Go to `route` through its guard and load what the landed view needs.
    pub fn navigate(&mut self, route: Route) {
        let before = self.router.current();
        let landed = self.router.navigate(route, self.role());
        if landed != before {
            self.enter(landed);
        } else if landed == route {
            // Same view asked again: treat as refresh.
            self.enter(landed);
        }
    }

    pub fn go_home(&mut self) {
        match self.role() {
            Some(role) => self.navigate(role.home()),
            None => self.navigate(Route::Login),
        }
    }

    /// Return to the previous view, or home when there is none left.
    pub fn go_back(&mut self) {
        let before = self.router.current();
        let landed = self.router.back(self.role());
        if landed != before {
            self.enter(landed);
        } else {
            self.go_home();
        }
    }

    /// Tear down the previous view's requests and start the new view's.
    fn enter(&mut self, route: Route) {
        self.scope.cancel();
        self.is_loading = false;
        debug!("Entering {route}");

        match route {
            Route::Login => {}
            Route::Dashboard => self.load_overview(),
            Route::Employees => {
                self.load_employees();
                self.load_reference_data();
            }
            Route::LeaveTypes => {
                self.load_leave_types();
                self.load_reference_data();
            }
            Route::Holidays => self.load_holidays(),
            Route::LeaveRequests => self.load_requests(LeaveScope::All),
            Route::EmployeeHome => self.load_employee_dashboard(),
            Route::ManagerHome => self.load_manager_dashboard(),
            Route::EmployeeLeave | Route::ManagerLeave => {
                self.load_leave_types();
                self.load_requests(LeaveScope::Mine);
                self.load_colleagues();
            }
            Route::EmployeeAttendance => self.load_attendance_history(),
            Route::ManagerApprovals => self.load_requests(LeaveScope::Team),
            Route::Notifications => self.load_notifications(),
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        let mut reload = false;
        match event {
            SessionEvent::LoggedIn(Some(role)) => {
                self.log_success(format!("Signed in as {role}"));
                self.load_notifications();
            }
            SessionEvent::LoggedIn(None) => {
                // Unknown roles have no surface to land on.
                self.log_error("Signed in with an unrecognised role");
                self.login_form.error = Some("Your account has no recognised role. Please contact HR.".to_string());
                self.logout();
            }
            SessionEvent::LoggedOut => {
                self.log_info("Signed out");
                self.clear_session_data();
            }
            SessionEvent::Expired => {
                self.log_warning("Session expired");
                self.clear_session_data();
                self.login_form.error = Some(AppError::Unauthorized.user_message());
            }
            SessionEvent::ExternalChange => {
                // Possibly a different actor now; nothing cached can be trusted.
                self.log_info("Session changed in another window");
                self.clear_session_data();
                if self.session.is_authenticated() {
                    self.load_notifications();
                    reload = true;
                }
            }
        }

        let role = self.role();
        match self.router.revalidate(role) {
            Some(route) => self.enter(route),
            None if reload => self.enter(self.router.current()),
            None => {}
        }
    }

    fn clear_session_data(&mut self) {
        self.scope.cancel();
        self.overview = None;
        self.employee_dashboard = None;
        self.manager_dashboard = None;
        self.employees.clear();
        self.colleagues.clear();
        self.reference.clear();
        self.leave_types.clear();
        self.holidays.clear();
        self.all_requests = LeaveBook::default();
        self.my_requests = LeaveBook::default();
        self.approvals = ApprovalDesk::default();
        self.attendance_history.clear();
        self.notifications.clear();
        self.employee_form.reset();
        self.leave_type_form.reset();
        self.holiday_form.reset();
        self.leave_form.reset();
        self.decision_dialog = None;
        self.delete_target = None;
        self.show_delete_confirm = false;
    }

    // ---- background work -------------------------------------------------

    /// Run a fetch owned by the current view.
    fn spawn_view<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(Arc<dyn HrBackend>, u64) -> Fut,
        Fut: Future<Output = UiMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        let future = task(self.backend.clone(), self.scope.generation());
        self.is_loading = true;
        self.scope.spawn(self.rt.handle(), async move {
            let _ = tx.send(future.await);
        });
    }

    /// Run a mutation that must finish even if the view changes.
    fn spawn_action<F, Fut>(&self, task: F)
    where
        F: FnOnce(Arc<dyn HrBackend>) -> Fut,
        Fut: Future<Output = UiMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        let future = task(self.backend.clone());
        self.rt.spawn(async move {
            let _ = tx.send(future.await);
        });
    }

    pub fn login(&mut self) {
        if self.login_form.submitting {
            return;
        }
        self.login_form.error = None;
        self.login_form.submitting = true;

        let session = self.session.clone();
        let backend = self.backend.clone();
        let email = self.login_form.email.clone();
        let password = std::mem::take(&mut self.login_form.password);
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let result = session.login(backend.as_ref(), &email, &password).await.map(|_| ());
            let _ = tx.send(UiMessage::LoginFinished(result));
        });
    }

    pub fn logout(&mut self) {
        let session = self.session.clone();
        let backend = self.backend.clone();
        self.rt.spawn(async move {
            session.logout(backend.as_ref()).await;
        });
    }

    pub fn load_overview(&mut self) {
        let recent = self.config.ui.recent_requests;
        self.spawn_view(move |backend, generation| async move {
            let overview = Overview::load(backend.as_ref(), recent).await;
            UiMessage::OverviewLoaded { generation, overview }
        });
    }

    pub fn load_employee_dashboard(&mut self) {
        let recent = self.config.ui.recent_requests;
        self.spawn_view(move |backend, generation| async move {
            let dashboard = EmployeeDashboard::load(backend.as_ref(), recent).await;
            UiMessage::EmployeeDashboardLoaded { generation, dashboard }
        });
    }

    pub fn load_manager_dashboard(&mut self) {
        let recent = self.config.ui.recent_requests;
        self.spawn_view(move |backend, generation| async move {
            let dashboard = ManagerDashboard::load(backend.as_ref(), recent).await;
            UiMessage::ManagerDashboardLoaded { generation, dashboard }
        });
    }

    pub fn load_employees(&mut self) {
        self.spawn_view(|backend, generation| async move {
            match backend.list_employees().await {
                Ok(employees) => UiMessage::EmployeesLoaded { generation, employees },
                Err(error) => UiMessage::LoadError { generation, error },
            }
        });
    }

    pub fn load_leave_types(&mut self) {
        self.spawn_view(|backend, generation| async move {
            match backend.list_leave_types().await {
                Ok(leave_types) => UiMessage::LeaveTypesLoaded { generation, leave_types },
                Err(error) => UiMessage::LoadError { generation, error },
            }
        });
    }

    pub fn load_holidays(&mut self) {
        self.spawn_view(|backend, generation| async move {
            match backend.list_holidays().await {
                Ok(holidays) => UiMessage::HolidaysLoaded { generation, holidays },
                Err(error) => UiMessage::LoadError { generation, error },
            }
        });
    }

    pub fn load_requests(&mut self, scope: LeaveScope) {
        self.spawn_view(move |backend, generation| async move {
            match backend.list_leave_requests(scope).await {
                Ok(requests) => UiMessage::RequestsLoaded {
                    generation,
                    scope,
                    requests,
                },
                Err(error) => UiMessage::LoadError { generation, error },
            }
        });
    }

    pub fn load_attendance_history(&mut self) {
        self.spawn_view(|backend, generation| async move {
            match backend.attendance_history().await {
                Ok(records) => UiMessage::AttendanceLoaded { generation, records },
                Err(error) => UiMessage::LoadError { generation, error },
            }
        });
    }

    /// Dropdown options, fetched once per session.
    pub fn load_reference_data(&mut self) {
        for kind in DropdownKind::ALL {
            if self.reference.contains_key(&kind) {
                continue;
            }
            // Placeholder so the fetch is not repeated while in flight.
            self.reference.insert(kind, Vec::new());
            self.spawn_action(move |backend| async move {
                match backend.dropdown(kind).await {
                    Ok(options) => UiMessage::ReferenceLoaded(kind, options),
                    Err(e) => {
                        warn!("Failed to load {} options: {e}", kind.path());
                        UiMessage::ReferenceFailed(kind)
                    }
                }
            });
        }
    }

    /// Cover-up candidates for the leave form. Not every role may list the
    /// directory, so a failure just leaves the dropdown empty.
    pub fn load_colleagues(&mut self) {
        if !self.colleagues.is_empty() {
            return;
        }
        let me = self.session.current().map(|s| s.actor_id());
        self.spawn_action(move |backend| async move {
            match backend.list_employees().await {
                Ok(employees) => UiMessage::ColleaguesLoaded(
                    employees
                        .into_iter()
                        .filter(|e| e.is_active && Some(e.id) != me)
                        .map(|e| DropdownOption {
                            name: e.full_name(),
                            id: e.id,
                        })
                        .collect(),
                ),
                Err(e) => {
                    debug!("Colleague list unavailable, using reporting managers: {e}");
                    let managers = backend
                        .dropdown(DropdownKind::ReportingManagers)
                        .await
                        .unwrap_or_default();
                    UiMessage::ColleaguesLoaded(managers.into_iter().filter(|o| Some(o.id) != me).collect())
                }
            }
        });
    }

    pub fn options(&self, kind: DropdownKind) -> &[DropdownOption] {
        self.reference.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn load_notifications(&mut self) {
        self.spawn_action(|backend| async move {
            match backend.list_notifications().await {
                Ok(items) => UiMessage::NotificationsLoaded(items),
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    pub fn mark_notification_read(&mut self, id: i64) {
        self.spawn_action(move |backend| async move {
            match backend.mark_notification_read(id).await {
                Ok(()) => UiMessage::NotificationsChanged,
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    pub fn mark_all_notifications_read(&mut self) {
        self.spawn_action(|backend| async move {
            match backend.mark_all_notifications_read().await {
                Ok(()) => UiMessage::NotificationsChanged,
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    pub fn create_employee(&mut self, data: CreateEmployee) {
        self.spawn_action(move |backend| async move {
            match backend.create_employee(&data).await {
                Ok(emp) => UiMessage::EmployeeSaved(emp),
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    pub fn update_employee(&mut self, id: i64, data: UpdateEmployee) {
        self.spawn_action(move |backend| async move {
            match backend.update_employee(id, &data).await {
                Ok(emp) => UiMessage::EmployeeSaved(emp),
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    pub fn save_leave_type(&mut self, id: Option<i64>, data: LeaveTypeInput) {
        self.spawn_action(move |backend| async move {
            let result = match id {
                Some(id) => backend.update_leave_type(id, &data).await,
                None => backend.create_leave_type(&data).await,
            };
            match result {
                Ok(leave_type) => UiMessage::LeaveTypeSaved(leave_type),
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    pub fn save_holiday(&mut self, id: Option<i64>, data: HolidayInput) {
        self.spawn_action(move |backend| async move {
            let result = match id {
                Some(id) => backend.update_holiday(id, &data).await,
                None => backend.create_holiday(&data).await,
            };
            match result {
                Ok(holiday) => UiMessage::HolidaySaved(holiday),
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    fn delete(&mut self, target: DeleteTarget) {
        self.spawn_action(move |backend| async move {
            let result = match &target {
                DeleteTarget::Employee(id, _) => backend.delete_employee(*id).await,
                DeleteTarget::LeaveType(id, _) => backend.delete_leave_type(*id).await,
                DeleteTarget::Holiday(id, _) => backend.delete_holiday(*id).await,
            };
            match result {
                Ok(()) => UiMessage::Deleted(target),
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    /// Validate the leave form inline, then submit.
    pub fn submit_leave(&mut self) {
        if self.leave_form.submitting {
            return;
        }
        self.leave_form.sync_dates();
        self.leave_form.server_error = None;

        let today = self.today();
        if let Err(errors) = self.leave_form.draft.validate(today) {
            self.leave_form.errors = errors;
            return;
        }
        self.leave_form.errors = Default::default();
        self.leave_form.submitting = true;

        let draft = self.leave_form.draft.clone();
        self.spawn_action(move |backend| async move {
            match crate::leave::submit(backend.as_ref(), &draft, today).await {
                Ok(created) => UiMessage::LeaveSubmitted(created),
                Err(e) => UiMessage::LeaveSubmitFailed(e),
            }
        });
    }

    /// Open the approve / reject dialog for a team request.
    pub fn open_decision(&mut self, request: &LeaveRequest, kind: DecisionKind) {
        self.decision_dialog = Some(DecisionDialog {
            id: request.id,
            employee: request
                .employee_name
                .clone()
                .unwrap_or_else(|| format!("Employee #{}", request.employee_id)),
            kind,
            reason: String::new(),
            error: None,
        });
    }

    /// Check the decision locally and send it if it passes.
    pub fn confirm_decision(&mut self) {
        let Some(dialog) = self.decision_dialog.as_mut() else {
            return;
        };
        let decision = match dialog.kind {
            DecisionKind::Approve => Decision::Approve {
                reason: Some(dialog.reason.clone()),
            },
            DecisionKind::Reject => Decision::Reject {
                reason: dialog.reason.clone(),
            },
        };

        let prepared = match self.approvals.prepare(dialog.id, decision) {
            Ok(prepared) => prepared,
            Err(e) => {
                dialog.error = Some(e.user_message());
                return;
            }
        };
        self.decision_dialog = None;

        self.spawn_action(move |backend| async move {
            let result = prepared.execute(backend.as_ref()).await;
            UiMessage::DecisionFinished { prepared, result }
        });
    }

    pub fn mark_attendance(&mut self, check_in: bool) {
        if self.attendance_busy {
            return;
        }
        self.attendance_busy = true;
        self.spawn_action(move |backend| async move {
            let result = if check_in {
                backend.check_in().await
            } else {
                backend.check_out().await
            };
            match result {
                Ok(record) => UiMessage::AttendanceMarked {
                    checked_in: check_in,
                    record,
                },
                Err(e) => UiMessage::OperationFailed(e),
            }
        });
    }

    /// Export the employee directory to Excel.
    pub fn export_employees(&mut self) {
        let filename = crate::export::generate_export_filename("employees");
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };
        let departments = self.options(DropdownKind::Departments).to_vec();
        let result = crate::export::export_employees_to_excel(&self.employees, &departments, &path);
        self.finish_export(result, &path);
    }

    /// Export the leave requests currently listed to Excel.
    pub fn export_leave_requests(&mut self) {
        let filename = crate::export::generate_export_filename("leave_requests");
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };
        let result = crate::export::export_leave_requests_to_excel(self.all_requests.all(), &path);
        self.finish_export(result, &path);
    }

    fn finish_export(&mut self, result: Result<()>, path: &std::path::Path) {
        match result {
            Ok(()) => {
                self.success_message = Some(format!("Exported to: {}", path.display()));
                self.log_success(format!("Exported {}", path.display()));
            }
            Err(e) => {
                self.error_message = Some(e.user_message());
                self.log_error(e.user_message());
            }
        }
    }

    // ---- message pump ----------------------------------------------------

    fn poll_session_events(&mut self) {
        loop {
            match self.session_events.try_recv() {
                Ok(event) => self.on_session_event(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {skipped} session events, re-checking session");
                    self.on_session_event(SessionEvent::ExternalChange);
                }
                Err(_) => break,
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        let stale = !self.scope.is_current(generation);
        if stale {
            debug!("Dropping result from a previous view");
        }
        stale
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::LoginFinished(result) => {
                    self.login_form.submitting = false;
                    if let Err(e) = result {
                        self.login_form.error = Some(e.user_message());
                    }
                }
                UiMessage::OverviewLoaded { generation, overview } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    if overview.is_partial() {
                        self.log_warning(format!("Overview incomplete: {}", overview.failed.join(", ")));
                    }
                    self.overview = Some(overview);
                    self.is_loading = false;
                }
                UiMessage::EmployeeDashboardLoaded { generation, dashboard } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    self.employee_dashboard = Some(dashboard);
                    self.is_loading = false;
                }
                UiMessage::ManagerDashboardLoaded { generation, dashboard } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    self.manager_dashboard = Some(dashboard);
                    self.is_loading = false;
                }
                UiMessage::EmployeesLoaded { generation, employees } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    self.employees = employees;
                    self.is_loading = false;
                }
                UiMessage::LeaveTypesLoaded { generation, leave_types } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    self.leave_types = leave_types;
                    self.is_loading = false;
                }
                UiMessage::HolidaysLoaded { generation, mut holidays } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    holidays.sort_by_key(|h| h.date);
                    self.holidays = holidays;
                    self.is_loading = false;
                }
                UiMessage::RequestsLoaded {
                    generation,
                    scope,
                    requests,
                } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    match scope {
                        LeaveScope::Mine => self.my_requests.replace_all(requests),
                        LeaveScope::Team => self.approvals.replace_all(requests),
                        _ => self.all_requests.replace_all(requests),
                    }
                    self.is_loading = false;
                }
                UiMessage::AttendanceLoaded { generation, records } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    self.attendance_history = records;
                    self.is_loading = false;
                }
                UiMessage::LoadError { generation, error } => {
                    if self.is_stale(generation) {
                        continue;
                    }
                    self.is_loading = false;
                    self.report(&error);
                }
                UiMessage::ReferenceLoaded(kind, options) => {
                    if self.session.is_authenticated() {
                        self.reference.insert(kind, options);
                    }
                }
                UiMessage::ReferenceFailed(kind) => {
                    // Try again next time a form needs it.
                    self.reference.remove(&kind);
                }
                UiMessage::ColleaguesLoaded(options) => {
                    if self.session.is_authenticated() {
                        self.colleagues = options;
                    }
                }
                UiMessage::NotificationsLoaded(items) => {
                    if self.session.is_authenticated() {
                        self.notifications = items;
                    }
                }
                UiMessage::EmployeeSaved(emp) => {
                    self.success_message = Some(format!("Employee '{}' saved", emp.full_name()));
                    self.log_success(format!("Saved employee {}", emp.employee_code));
                    self.employee_form.reset();
                    self.load_employees();
                }
                UiMessage::LeaveTypeSaved(leave_type) => {
                    self.success_message = Some(format!("Leave type '{}' saved", leave_type.name));
                    self.leave_type_form.reset();
                    self.load_leave_types();
                }
                UiMessage::HolidaySaved(holiday) => {
                    self.success_message = Some(format!("Holiday '{}' saved", holiday.name));
                    self.holiday_form.reset();
                    self.load_holidays();
                }
                UiMessage::Deleted(target) => {
                    let (what, name) = match &target {
                        DeleteTarget::Employee(_, name) => ("Employee", name),
                        DeleteTarget::LeaveType(_, name) => ("Leave type", name),
                        DeleteTarget::Holiday(_, name) => ("Holiday", name),
                    };
                    self.success_message = Some(format!("{what} '{name}' deleted"));
                    self.log_success(format!("{what} deleted: {name}"));
                    match target {
                        DeleteTarget::Employee(..) => self.load_employees(),
                        DeleteTarget::LeaveType(..) => self.load_leave_types(),
                        DeleteTarget::Holiday(..) => self.load_holidays(),
                    }
                }
                UiMessage::LeaveSubmitted(created) => {
                    self.leave_form.reset();
                    self.success_message = Some("Leave request submitted".to_string());
                    self.log_success(format!(
                        "Leave request submitted for {} to {}",
                        created.start_date, created.end_date
                    ));
                    self.my_requests.upsert(created);
                }
                UiMessage::LeaveSubmitFailed(e) => {
                    self.leave_form.submitting = false;
                    self.log_error(e.user_message());
                    if !matches!(e, AppError::Unauthorized) {
                        self.leave_form.server_error = Some(e.user_message());
                    }
                }
                UiMessage::DecisionFinished { prepared, result } => {
                    match self.approvals.finish(&prepared, result) {
                        Ok(updated) => {
                            let verb = updated.status.label().to_lowercase();
                            self.success_message = Some(format!("Leave request {verb}"));
                            self.log_success(format!("Leave request #{} {verb}", updated.id));
                            if let Some(dash) = self.manager_dashboard.as_mut() {
                                dash.team_pending.retain(|r| r.id != updated.id);
                            }
                        }
                        Err(e) => self.report(&e),
                    }
                }
                UiMessage::AttendanceMarked { checked_in, record } => {
                    self.attendance_busy = false;
                    let time = if checked_in { record.check_in } else { record.check_out };
                    let when = time
                        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
                        .unwrap_or_default();
                    let what = if checked_in { "Checked in" } else { "Checked out" };
                    self.success_message = Some(format!("{what} {when}").trim().to_string());
                    self.log_success(format!("{what} {when}"));
                    match self.router.current() {
                        Route::ManagerHome => self.load_manager_dashboard(),
                        Route::EmployeeHome => self.load_employee_dashboard(),
                        Route::EmployeeAttendance => self.load_attendance_history(),
                        _ => {}
                    }
                }
                UiMessage::NotificationsChanged => self.load_notifications(),
                UiMessage::OperationFailed(e) => {
                    self.attendance_busy = false;
                    self.report(&e);
                }
            }
        }
    }

    // ---- chrome ----------------------------------------------------------

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        let Some(role) = self.role() else {
            return;
        };
        let name = self
            .session
            .current()
            .map(|s| s.employee.display_name())
            .unwrap_or_default();
        let unread = unread_count(&self.notifications);

        let mut target = None;
        let mut logout = false;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                let items: &[Route] = match role.surface() {
                    Surface::Admin => &[
                        Route::Dashboard,
                        Route::Employees,
                        Route::LeaveTypes,
                        Route::Holidays,
                        Route::LeaveRequests,
                    ],
                    Surface::ReportingManager => &[Route::ManagerHome, Route::ManagerApprovals, Route::ManagerLeave],
                    Surface::Employee => &[Route::EmployeeHome, Route::EmployeeLeave, Route::EmployeeAttendance],
                };
                for item in items {
                    if ui
                        .selectable_label(self.router.current() == *item, item.title())
                        .clicked()
                    {
                        target = Some(*item);
                    }
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.menu_button(format!("{name} ({role})"), |ui| {
                        if ui.button("Log out").clicked() {
                            logout = true;
                            ui.close();
                        }
                    });
                    let label = if unread > 0 {
                        format!("{} Notifications ({unread})", egui_phosphor::regular::BELL)
                    } else {
                        format!("{} Notifications", egui_phosphor::regular::BELL)
                    };
                    if ui
                        .selectable_label(self.router.current() == Route::Notifications, label)
                        .clicked()
                    {
                        target = Some(Route::Notifications);
                    }
                });
            });
        });

        if logout {
            self.logout();
        } else if let Some(route) = target {
            self.navigate(route);
        }
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = if self.session.is_authenticated() {
                        (colors::SUCCESS, "Signed in")
                    } else {
                        (colors::NEUTRAL, "Signed out")
                    };
                    ui.colored_label(color, text);
                    ui.separator();
                    ui.label(RichText::new(&self.config.api.base_url).weak());

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.is_loading || self.login_form.submitting {
                            ui.spinner();
                            ui.label("Loading...");
                        }
                    });
                });
            });
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        if self.show_delete_confirm
            && let Some(ref target) = self.delete_target.clone()
        {
            let (title, message) = match target {
                DeleteTarget::Employee(_, name) => ("Delete Employee", format!("Delete employee '{name}'?")),
                DeleteTarget::LeaveType(_, name) => ("Delete Leave Type", format!("Delete leave type '{name}'?")),
                DeleteTarget::Holiday(_, name) => ("Delete Holiday", format!("Delete holiday '{name}'?")),
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Delete").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        if let Some(target) = self.delete_target.take() {
            self.log_info(format!("Deleting {target:?}"));
            self.delete(target);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_session_events();
        self.poll_async_results();

        // Results arrive from other threads; keep polling while any are due.
        if self.is_loading
            || self.scope.in_flight() > 0
            || self.login_form.submitting
            || self.leave_form.submitting
            || self.attendance_busy
            || self.approvals.book().all().iter().any(|r| self.approvals.is_in_flight(r.id))
        {
            ctx.request_repaint();
        } else {
            // Pick up session changes made by other windows.
            ctx.request_repaint_after(std::time::Duration::from_secs(1));
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_dialogs(ctx);

        let mut go_back = false;
        let mut next = None;

        egui::CentralPanel::default().show(ctx, |ui| match self.router.current() {
            Route::Login => login_panel::show(self, ui),
            Route::Dashboard => next = dashboard::show(self, ui),
            Route::Employees => go_back = staff_panel::show(self, ui),
            Route::LeaveTypes => go_back = leave_type_panel::show(self, ui),
            Route::Holidays => go_back = holiday_panel::show(self, ui),
            Route::LeaveRequests => go_back = leave_requests_panel::show(self, ui),
            Route::EmployeeHome | Route::ManagerHome => next = employee_panel::show(self, ui),
            Route::EmployeeLeave | Route::ManagerLeave => go_back = leave_panel::show(self, ui),
            Route::EmployeeAttendance => go_back = attendance_panel::show(self, ui),
            Route::ManagerApprovals => go_back = approval_panel::show(self, ui),
            Route::Notifications => go_back = notification_panel::show(self, ui),
        });

        if go_back {
            self.go_back();
        } else if let Some(route) = next {
            self.navigate(route);
        }
    }
}
