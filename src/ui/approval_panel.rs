//! Reporting manager approvals: team leave requests with approve / reject.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHECK, X};

use super::app::App;
use super::components::{
    back_button, colors, panel_header, primary_button_with_icon, status_badge, styled_button, styled_button_with_icon,
};
use super::forms::DecisionKind;
use crate::api::LeaveScope;
use crate::models::{LeaveRequest, LeaveStatus};

/// Show the approvals panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Team Approvals");

    ui.horizontal(|ui| {
        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_requests(LeaveScope::Team);
        }
        ui.add_space(20.0);
        ui.label(format!(
            "{} pending of {}",
            app.approvals.book().pending_count(),
            app.approvals.book().len()
        ));
    });

    ui.add_space(15.0);

    // Pending first, then most recent decisions.
    let mut rows: Vec<LeaveRequest> = app.approvals.book().by_status(LeaveStatus::Pending).cloned().collect();
    rows.extend(
        app.approvals
            .book()
            .all()
            .iter()
            .filter(|r| r.status != LeaveStatus::Pending)
            .cloned(),
    );

    let mut open = None;

    ScrollArea::vertical().id_salt("approvals_scroll").show(ui, |ui| {
        egui::Grid::new("approvals_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Employee");
                ui.strong("Type");
                ui.strong("Dates");
                ui.strong("Days");
                ui.strong("Reason");
                ui.strong("Status");
                ui.strong("Actions");
                ui.end_row();

                for request in &rows {
                    ui.label(request.employee_name.as_deref().unwrap_or("-"));
                    ui.label(request.leave_type_label());
                    ui.label(format!("{} to {}", request.start_date, request.end_date));
                    ui.label(format!("{}", request.day_count()));
                    ui.label(&request.reason).on_hover_text(request.description.as_deref().unwrap_or(""));
                    status_badge(ui, request.status);

                    ui.horizontal(|ui| {
                        if app.approvals.is_in_flight(request.id) {
                            ui.spinner();
                        } else if request.status == LeaveStatus::Pending {
                            if ui.button(RichText::new(format!("{CHECK} Approve")).color(colors::SUCCESS)).clicked() {
                                open = Some((request.clone(), DecisionKind::Approve));
                            }
                            if ui.button(RichText::new(format!("{X} Reject")).color(colors::ERROR)).clicked() {
                                open = Some((request.clone(), DecisionKind::Reject));
                            }
                        } else if let Some(note) = &request.approval_reason {
                            ui.label(RichText::new(note).weak());
                        }
                    });
                    ui.end_row();
                }
            });

        if rows.is_empty() {
            ui.add_space(20.0);
            ui.label("No requests from your team");
        }
    });

    if let Some((request, kind)) = open {
        app.open_decision(&request, kind);
    }

    if app.decision_dialog.is_some() {
        show_decision_dialog(app, ui.ctx());
    }

    go_back
}

fn show_decision_dialog(app: &mut App, ctx: &egui::Context) {
    let Some(dialog) = app.decision_dialog.as_mut() else {
        return;
    };
    let (title, hint) = match dialog.kind {
        DecisionKind::Approve => ("Approve Leave", "Comment (optional)"),
        DecisionKind::Reject => ("Reject Leave", "Reason (required)"),
    };

    let mut confirm = false;
    let mut cancel = false;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Request #{} from {}", dialog.id, dialog.employee));
            ui.add_space(10.0);
            ui.add(
                egui::TextEdit::multiline(&mut dialog.reason)
                    .desired_rows(3)
                    .desired_width(340.0)
                    .hint_text(hint),
            );
            if let Some(error) = &dialog.error {
                ui.colored_label(colors::ERROR, error);
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    cancel = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = match dialog.kind {
                        DecisionKind::Approve => "Approve",
                        DecisionKind::Reject => "Reject",
                    };
                    if primary_button_with_icon(ui, "", label).clicked() {
                        confirm = true;
                    }
                });
            });
        });

    if cancel {
        app.decision_dialog = None;
    } else if confirm {
        app.confirm_decision();
    }
}
