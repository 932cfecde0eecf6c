//! Employee directory panel with CRUD, search, filters and Excel export.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_XLS, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, back_button, colors, danger_action_button, option_combo, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};
use super::forms::EmployeeForm;
use crate::models::reference::option_name;
use crate::models::{DropdownKind, Employee};

/// Show the staff panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Employees");

    // Toolbar row 1: Action buttons
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Employee").clicked() {
            app.employee_form = EmployeeForm::create();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_employees();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
            app.export_employees();
        }
    });

    ui.add_space(10.0);

    // Toolbar row 2: Search and filter
    let departments = app.options(DropdownKind::Departments).to_vec();
    ui.horizontal(|ui| {
        ui.label("Search:");
        ui.add(
            egui::TextEdit::singleline(&mut app.employee_search)
                .desired_width(200.0)
                .hint_text("Code, name or email..."),
        );

        ui.add_space(20.0);

        ui.label("Department:");
        option_combo(ui, "emp_dept_filter", &mut app.employee_dept_filter, &departments, "All");

        ui.add_space(20.0);

        ui.label("Status:");
        if ui.selectable_label(app.employee_status_filter.is_none(), "All").clicked() {
            app.employee_status_filter = None;
        }
        if ui
            .selectable_label(app.employee_status_filter == Some(true), "Active")
            .clicked()
        {
            app.employee_status_filter = Some(true);
        }
        if ui
            .selectable_label(app.employee_status_filter == Some(false), "Inactive")
            .clicked()
        {
            app.employee_status_filter = Some(false);
        }

        if !app.employee_search.is_empty() || app.employee_dept_filter.is_some() || app.employee_status_filter.is_some()
        {
            ui.add_space(10.0);
            if styled_button(ui, "Clear").clicked() {
                app.employee_search.clear();
                app.employee_dept_filter = None;
                app.employee_status_filter = None;
            }
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.employee_form.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn matches_filters(app: &App, emp: &Employee) -> bool {
    let needle = app.employee_search.trim().to_lowercase();
    let search_match = needle.is_empty()
        || emp.employee_code.to_lowercase().contains(&needle)
        || emp.full_name().to_lowercase().contains(&needle)
        || emp.email.to_lowercase().contains(&needle);

    let dept_match = app.employee_dept_filter.is_none() || emp.department_id == app.employee_dept_filter;
    let status_match = app.employee_status_filter.is_none() || app.employee_status_filter == Some(emp.is_active);

    search_match && dept_match && status_match
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let filtered: Vec<Employee> = app
        .employees
        .iter()
        .filter(|e| matches_filters(app, e))
        .cloned()
        .collect();

    ui.label(format!("Showing {} of {} employees", filtered.len(), app.employees.len()));

    ui.add_space(10.0);

    let departments = app.options(DropdownKind::Departments).to_vec();
    let designations = app.options(DropdownKind::Designations).to_vec();

    ScrollArea::vertical().id_salt("staff_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("employees_grid")
            .num_columns(8)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Code");
                ui.strong("Name");
                ui.strong("Email");
                ui.strong("Department");
                ui.strong("Designation");
                ui.strong("Joined");
                ui.strong("Active");
                ui.strong("Actions");
                ui.end_row();

                for emp in &filtered {
                    ui.label(&emp.employee_code);
                    ui.label(emp.full_name());
                    ui.label(&emp.email);
                    ui.label(option_name(&departments, emp.department_id));
                    ui.label(option_name(&designations, emp.designation_id));
                    ui.label(emp.joining_date.map(|d| d.to_string()).unwrap_or("-".to_string()));
                    ui.label(if emp.is_active { "Yes" } else { "No" });

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            app.employee_form = EmployeeForm::edit(emp);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            app.delete_target = Some(DeleteTarget::Employee(emp.id, emp.full_name()));
                            app.show_delete_confirm = true;
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.employee_form.is_editing {
        "Edit Employee"
    } else {
        "Add Employee"
    };

    let departments = app.options(DropdownKind::Departments).to_vec();
    let designations = app.options(DropdownKind::Designations).to_vec();
    let employee_types = app.options(DropdownKind::EmployeeTypes).to_vec();
    let roles = app.options(DropdownKind::Roles).to_vec();
    let managers = app.options(DropdownKind::ReportingManagers).to_vec();

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(480.0)
        .max_height(560.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);
            let form = &mut app.employee_form;

            ScrollArea::vertical().max_height(440.0).show(ui, |ui| {
                egui::Grid::new("emp_form_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Employee Code:");
                        ui.add(egui::TextEdit::singleline(&mut form.employee_code).desired_width(200.0));
                        ui.end_row();

                        ui.label("First Name:");
                        ui.add(egui::TextEdit::singleline(&mut form.first_name).desired_width(250.0));
                        ui.end_row();

                        ui.label("Last Name:");
                        ui.add(egui::TextEdit::singleline(&mut form.last_name).desired_width(250.0));
                        ui.end_row();

                        ui.label("Email:");
                        ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(250.0));
                        ui.end_row();

                        ui.label("Phone:");
                        ui.add(
                            egui::TextEdit::singleline(&mut form.phone)
                                .desired_width(180.0)
                                .hint_text("Optional"),
                        );
                        ui.end_row();

                        if !form.is_editing {
                            ui.label("Password:");
                            ui.add(
                                egui::TextEdit::singleline(&mut form.password)
                                    .password(true)
                                    .desired_width(180.0),
                            );
                            ui.end_row();
                        }

                        ui.label("Department:");
                        option_combo(ui, "emp_form_dept", &mut form.department_id, &departments, "None");
                        ui.end_row();

                        ui.label("Designation:");
                        option_combo(ui, "emp_form_desig", &mut form.designation_id, &designations, "None");
                        ui.end_row();

                        ui.label("Employee Type:");
                        option_combo(ui, "emp_form_type", &mut form.employee_type_id, &employee_types, "None");
                        ui.end_row();

                        ui.label("Role:");
                        option_combo(ui, "emp_form_role", &mut form.role_id, &roles, "None");
                        ui.end_row();

                        ui.label("Reporting Manager:");
                        option_combo(ui, "emp_form_manager", &mut form.reporting_manager_id, &managers, "None");
                        ui.end_row();

                        ui.label("Joining Date:");
                        ui.vertical(|ui| {
                            let is_valid = form.joining_date_input.is_empty() || form.joining_date.is_some();
                            let text_color = if is_valid {
                                ui.visuals().text_color()
                            } else {
                                colors::ERROR
                            };

                            let response = ui.add(
                                egui::TextEdit::singleline(&mut form.joining_date_input)
                                    .desired_width(120.0)
                                    .hint_text("YYYY-MM-DD")
                                    .text_color(text_color),
                            );
                            if response.changed() {
                                form.set_joining_date_input();
                            }

                            if !is_valid {
                                ui.colored_label(colors::ERROR, "Invalid date format");
                            } else {
                                ui.weak("Format: YYYY-MM-DD");
                            }
                        });
                        ui.end_row();

                        if form.is_editing {
                            ui.label("Active:");
                            ui.checkbox(&mut form.is_active, "");
                            ui.end_row();
                        }
                    });
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.employee_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save").clicked() {
                        save_employee(app);
                    }
                });
            });
        });
}

fn save_employee(app: &mut App) {
    if app.employee_form.is_editing {
        match app.employee_form.to_update() {
            Ok((id, data)) => app.update_employee(id, data),
            Err(message) => app.error_message = Some(message),
        }
    } else {
        match app.employee_form.to_create() {
            Ok(data) => app.create_employee(data),
            Err(message) => app.error_message = Some(message),
        }
    }
}
