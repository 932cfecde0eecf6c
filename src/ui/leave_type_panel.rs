//! Leave type management panel.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, back_button, danger_action_button, option_combo, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};
use super::forms::LeaveTypeForm;
use crate::models::DropdownKind;
use crate::models::reference::option_name;

const SCOPES: [&str; 3] = ["All", "Permanent", "Probation"];

/// Show the leave types panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Leave Types");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Leave Type").clicked() {
            app.leave_type_form = LeaveTypeForm::create();
        }
        ui.add_space(10.0);
        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_leave_types();
        }
    });

    ui.add_space(15.0);

    let roles = app.options(DropdownKind::Roles).to_vec();
    let leave_types = app.leave_types.clone();

    ScrollArea::vertical().id_salt("leave_types_scroll").show(ui, |ui| {
        egui::Grid::new("leave_types_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(80.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Name");
                ui.strong("Days / Year");
                ui.strong("Employee Type");
                ui.strong("Role");
                ui.strong("Actions");
                ui.end_row();

                for leave_type in &leave_types {
                    ui.label(&leave_type.name);
                    ui.label(leave_type.number_of_leaves.to_string());
                    ui.label(&leave_type.employee_type_scope);
                    ui.label(if leave_type.role_id.is_none() {
                        "Any"
                    } else {
                        option_name(&roles, leave_type.role_id)
                    });

                    ui.horizontal(|ui| {
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            app.leave_type_form = LeaveTypeForm::edit(leave_type);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            app.delete_target = Some(DeleteTarget::LeaveType(leave_type.id, leave_type.name.clone()));
                            app.show_delete_confirm = true;
                        }
                    });
                    ui.end_row();
                }
            });

        if leave_types.is_empty() {
            ui.add_space(20.0);
            ui.label("No leave types defined");
        }
    });

    if app.leave_type_form.is_open {
        show_form_dialog(app, ui.ctx(), &roles);
    }

    go_back
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context, roles: &[crate::models::DropdownOption]) {
    let title = if app.leave_type_form.is_editing {
        "Edit Leave Type"
    } else {
        "Add Leave Type"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let form = &mut app.leave_type_form;

            egui::Grid::new("leave_type_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(220.0));
                    ui.end_row();

                    ui.label("Days per year:");
                    ui.add(egui::TextEdit::singleline(&mut form.number_of_leaves).desired_width(80.0));
                    ui.end_row();

                    ui.label("Employee type:");
                    egui::ComboBox::from_id_salt("leave_type_scope")
                        .selected_text(form.employee_type_scope.as_str())
                        .show_ui(ui, |ui| {
                            for scope in SCOPES {
                                ui.selectable_value(&mut form.employee_type_scope, scope.to_string(), scope);
                            }
                        });
                    ui.end_row();

                    ui.label("Role:");
                    option_combo(ui, "leave_type_role", &mut form.role_id, roles, "Any");
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.leave_type_form.reset();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save").clicked() {
                        match app.leave_type_form.to_input() {
                            Ok(data) => {
                                let id = app.leave_type_form.id;
                                app.save_leave_type(id, data);
                            }
                            Err(message) => app.error_message = Some(message),
                        }
                    }
                });
            });
        });
}
