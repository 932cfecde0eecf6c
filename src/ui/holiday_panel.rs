//! Company holiday calendar management.

use chrono::Local;
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, back_button, colors, danger_action_button, panel_header, parse_flexible_date,
    primary_button_with_icon, styled_button, styled_button_with_icon,
};
use super::forms::HolidayForm;

/// Show the holidays panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Holidays");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Holiday").clicked() {
            app.holiday_form = HolidayForm::create();
        }
        ui.add_space(10.0);
        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_holidays();
        }
    });

    ui.add_space(15.0);

    let today = Local::now().date_naive();
    let holidays = app.holidays.clone();

    ScrollArea::vertical().id_salt("holidays_scroll").show(ui, |ui| {
        egui::Grid::new("holidays_grid")
            .num_columns(4)
            .striped(true)
            .min_col_width(80.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Name");
                ui.strong("Description");
                ui.strong("Actions");
                ui.end_row();

                for holiday in &holidays {
                    let date = holiday.date.format("%a %Y-%m-%d").to_string();
                    if holiday.date < today {
                        ui.label(RichText::new(date).weak());
                    } else {
                        ui.label(date);
                    }
                    ui.label(&holiday.name);
                    ui.label(holiday.description.as_deref().unwrap_or("-"));

                    ui.horizontal(|ui| {
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            app.holiday_form = HolidayForm::edit(holiday);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            app.delete_target = Some(DeleteTarget::Holiday(holiday.id, holiday.name.clone()));
                            app.show_delete_confirm = true;
                        }
                    });
                    ui.end_row();
                }
            });

        if holidays.is_empty() {
            ui.add_space(20.0);
            ui.label("No holidays scheduled");
        }
    });

    if app.holiday_form.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.holiday_form.is_editing {
        "Edit Holiday"
    } else {
        "Add Holiday"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let form = &mut app.holiday_form;

            egui::Grid::new("holiday_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(220.0));
                    ui.end_row();

                    ui.label("Date:");
                    ui.vertical(|ui| {
                        let is_valid = form.date_input.is_empty() || form.date.is_some();
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut form.date_input)
                                .desired_width(120.0)
                                .hint_text("YYYY-MM-DD"),
                        );
                        if response.changed() {
                            form.date = parse_flexible_date(&form.date_input);
                        }
                        if !is_valid {
                            ui.colored_label(colors::ERROR, "Invalid date format");
                        }
                    });
                    ui.end_row();

                    ui.label("Description:");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.description)
                            .desired_rows(2)
                            .desired_width(220.0),
                    );
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.holiday_form.reset();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, "", "Save").clicked() {
                        match app.holiday_form.to_input() {
                            Ok(data) => {
                                let id = app.holiday_form.id;
                                app.save_holiday(id, data);
                            }
                            Err(message) => app.error_message = Some(message),
                        }
                    }
                });
            });
        });
}
