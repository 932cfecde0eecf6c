//! GUI panels and application state.

pub mod app;
pub mod approval_panel;
pub mod attendance_panel;
pub mod components;
pub mod dashboard;
pub mod employee_panel;
pub mod forms;
pub mod holiday_panel;
pub mod leave_panel;
pub mod leave_requests_panel;
pub mod leave_type_panel;
pub mod login_panel;
pub mod notification_panel;
pub mod setup_wizard;
pub mod staff_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
