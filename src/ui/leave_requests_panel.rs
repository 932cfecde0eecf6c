//! Admin view of every leave request, with a status filter and export.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_XLS, INFO};

use super::app::App;
use super::components::{back_button, panel_header, status_badge, styled_button_with_icon};
use crate::api::LeaveScope;
use crate::models::{LeaveRequest, LeaveStatus};

const FILTERS: [(Option<LeaveStatus>, &str); 4] = [
    (None, "All"),
    (Some(LeaveStatus::Pending), "Pending"),
    (Some(LeaveStatus::Approved), "Approved"),
    (Some(LeaveStatus::Rejected), "Rejected"),
];

/// Show the leave requests panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Leave Requests");

    ui.horizontal(|ui| {
        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_requests(LeaveScope::All);
        }
        ui.add_space(10.0);
        if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
            app.export_leave_requests();
        }

        ui.add_space(20.0);
        ui.label("Status:");
        for (filter, label) in FILTERS {
            if ui.selectable_label(app.request_status_filter == filter, label).clicked() {
                app.request_status_filter = filter;
            }
        }
    });

    ui.add_space(15.0);

    let rows: Vec<&LeaveRequest> = match app.request_status_filter {
        Some(status) => app.all_requests.by_status(status).collect(),
        None => app.all_requests.all().iter().collect(),
    };

    ui.label(format!(
        "Showing {} of {} requests ({} pending)",
        rows.len(),
        app.all_requests.len(),
        app.all_requests.pending_count()
    ));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("all_requests_scroll").show(ui, |ui| {
        request_grid(ui, "all_requests_grid", &rows, true);
    });

    go_back
}

/// Read-only table of leave requests.
pub fn request_grid(ui: &mut Ui, id: &str, rows: &[&LeaveRequest], show_employee: bool) {
    let columns = if show_employee { 7 } else { 6 };
    egui::Grid::new(id)
        .num_columns(columns)
        .striped(true)
        .min_col_width(60.0)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            if show_employee {
                ui.strong("Employee");
            }
            ui.strong("Type");
            ui.strong("From");
            ui.strong("To");
            ui.strong("Days");
            ui.strong("Reason");
            ui.strong("Status");
            ui.end_row();

            for request in rows {
                if show_employee {
                    ui.label(request.employee_name.as_deref().unwrap_or("-"));
                }
                ui.label(request.leave_type_label());
                ui.label(request.start_date.to_string());
                ui.label(request.end_date.to_string());
                ui.label(format!("{}", request.day_count()));
                ui.label(&request.reason);
                ui.horizontal(|ui| {
                    status_badge(ui, request.status);
                    if let Some(note) = &request.approval_reason {
                        ui.label(RichText::new(INFO).weak()).on_hover_text(note);
                    }
                });
                ui.end_row();
            }
        });

    if rows.is_empty() {
        ui.add_space(20.0);
        ui.label("No leave requests");
    }
}
