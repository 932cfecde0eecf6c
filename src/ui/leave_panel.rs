//! Leave application form and the actor's own request history.

use eframe::egui::{self, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PAPERCLIP, PAPER_PLANE_TILT, X};

use super::app::App;
use super::components::{
    action_button, back_button, colors, field_error, option_combo, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};
use super::leave_requests_panel::request_grid;
use crate::api::LeaveScope;
use crate::leave::{ALLOWED_EXTENSIONS, LeaveField};
use crate::models::{DayType, LeaveRequest};

/// Show the leave panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Leave");

    ScrollArea::vertical().id_salt("leave_page_scroll").show(ui, |ui| {
        egui::Frame::new()
            .fill(ui.style().visuals.extreme_bg_color)
            .inner_margin(Margin::same(15))
            .corner_radius(CornerRadius::same(8))
            .show(ui, |ui| {
                ui.label(RichText::new("Apply for Leave").strong());
                ui.add_space(10.0);
                show_form(app, ui);
            });

        ui.add_space(20.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("My Requests").strong());
            if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
                app.load_requests(LeaveScope::Mine);
            }
        });
        ui.add_space(10.0);

        let rows: Vec<&LeaveRequest> = app.my_requests.all().iter().collect();
        request_grid(ui, "my_requests_grid", &rows, false);
    });

    go_back
}

fn show_form(app: &mut App, ui: &mut Ui) {
    let leave_types = app.leave_types.clone();
    let colleagues = app.colleagues.clone();
    let form = &mut app.leave_form;
    let errors = form.errors.clone();

    egui::Grid::new("leave_form_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            ui.label("Leave Type:");
            ui.vertical(|ui| {
                let selected = form
                    .draft
                    .leave_type_id
                    .and_then(|id| leave_types.iter().find(|t| t.id == id))
                    .map(|t| t.name.as_str())
                    .unwrap_or("Select...");
                egui::ComboBox::from_id_salt("leave_form_type")
                    .width(250.0)
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for leave_type in &leave_types {
                            let label = format!("{} ({} days)", leave_type.name, leave_type.number_of_leaves);
                            ui.selectable_value(&mut form.draft.leave_type_id, Some(leave_type.id), label);
                        }
                    });
                field_error(ui, errors.get(LeaveField::LeaveType));
            });
            ui.end_row();

            ui.label("From:");
            ui.vertical(|ui| {
                if ui
                    .add(DatePickerButton::new(&mut form.start).id_salt("leave_form_start"))
                    .changed()
                    && form.end < form.start
                {
                    form.end = form.start;
                }
                field_error(ui, errors.get(LeaveField::StartDate));
            });
            ui.end_row();

            ui.label("To:");
            ui.vertical(|ui| {
                ui.add(DatePickerButton::new(&mut form.end).id_salt("leave_form_end"));
                field_error(ui, errors.get(LeaveField::EndDate));
            });
            ui.end_row();

            ui.label("Duration:");
            ui.horizontal(|ui| {
                ui.radio_value(&mut form.draft.day_type, DayType::Full, "Full day");
                ui.radio_value(&mut form.draft.day_type, DayType::Half, "Half day");
            });
            ui.end_row();

            ui.label("Reason:");
            ui.vertical(|ui| {
                ui.add(egui::TextEdit::singleline(&mut form.draft.reason).desired_width(300.0));
                field_error(ui, errors.get(LeaveField::Reason));
            });
            ui.end_row();

            ui.label("Description:");
            ui.add(
                egui::TextEdit::multiline(&mut form.draft.description)
                    .desired_rows(3)
                    .desired_width(300.0)
                    .hint_text("Optional"),
            );
            ui.end_row();

            ui.label("Cover-up:");
            option_combo(
                ui,
                "leave_form_cover",
                &mut form.draft.cover_up_employee_id,
                &colleagues,
                "None",
            );
            ui.end_row();

            ui.label("Document:");
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    match &form.draft.document {
                        Some(path) => {
                            let name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_default();
                            ui.label(name);
                            if action_button(ui, X, "Remove").clicked() {
                                form.draft.document = None;
                            }
                        }
                        None => {
                            if styled_button_with_icon(ui, PAPERCLIP, "Attach...").clicked()
                                && let Some(path) = rfd::FileDialog::new()
                                    .add_filter("Documents", &ALLOWED_EXTENSIONS)
                                    .pick_file()
                            {
                                form.draft.document = Some(path);
                            }
                        }
                    }
                });
                ui.weak("PDF, Word or image, up to 2 MB");
                field_error(ui, errors.get(LeaveField::Document));
            });
            ui.end_row();
        });

    if let Some(error) = &form.server_error {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, error);
    }

    ui.add_space(15.0);

    let submitting = form.submitting;
    ui.horizontal(|ui| {
        if submitting {
            ui.spinner();
            ui.label("Submitting...");
        } else {
            if primary_button_with_icon(ui, PAPER_PLANE_TILT, "Submit Request").clicked() {
                app.submit_leave();
            }
            ui.add_space(10.0);
            if styled_button(ui, "Clear").clicked() {
                app.leave_form.reset();
            }
        }
    });
}
