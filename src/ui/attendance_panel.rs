//! Own attendance history.

use chrono::Local;
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::ARROWS_CLOCKWISE;

use super::app::App;
use super::components::{back_button, panel_header, styled_button_with_icon};

pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "My Attendance");

    if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
        app.load_attendance_history();
    }
    ui.add_space(10.0);

    let total_hours: f64 = app.attendance_history.iter().filter_map(|r| r.work_hours()).sum();
    ui.label(format!(
        "{} day(s), {total_hours:.1} hours recorded",
        app.attendance_history.len()
    ));
    ui.add_space(10.0);

    let time = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or("-".to_string())
    };

    ScrollArea::vertical().id_salt("attendance_scroll").show(ui, |ui| {
        egui::Grid::new("attendance_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(80.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Check In");
                ui.strong("Check Out");
                ui.strong("Hours");
                ui.strong("Status");
                ui.end_row();

                for record in &app.attendance_history {
                    ui.label(record.date.format("%a %Y-%m-%d").to_string());
                    ui.label(time(record.check_in));
                    ui.label(time(record.check_out));
                    ui.label(record.work_hours().map_or("-".to_string(), |h| format!("{h:.1}")));
                    ui.label(&record.status);
                    ui.end_row();
                }
            });

        if app.attendance_history.is_empty() {
            ui.add_space(20.0);
            ui.label(RichText::new("No attendance recorded").weak());
        }
    });

    go_back
}
