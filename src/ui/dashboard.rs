//! Admin/HR dashboard with overview stats, navigation cards, today's activity and the activity log.

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{CALENDAR_BLANK, CLIPBOARD_TEXT, TAG, USERS};

use super::app::{App, LogLevel};
use super::components::{dashboard_card, partial_notice, status_badge};
use crate::router::Route;

/// Show the dashboard panel.
///
/// Returns `Some(route)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Route> {
    let mut next = None;

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        ui.label(RichText::new("HR Management").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Staff, Leave and Attendance").size(14.0).weak());

        ui.add_space(30.0);

        if let Some(overview) = &app.overview {
            partial_notice(ui, &overview.failed);
        }

        // Stat cards row
        let stats = app.overview.as_ref().map(|o| o.stats.clone()).unwrap_or_default();
        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 850.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            stat_card(ui, "Total Employees", &stats.total_employees.to_string(), "On the payroll");
            stat_card(ui, "Present Today", &stats.present_today.to_string(), "Checked in");
            stat_card(ui, "On Leave", &stats.on_leave_today.to_string(), "Away today");
            stat_card(ui, "Pending", &stats.pending_requests.to_string(), "Leave requests");
            stat_card(ui, "Holidays", &stats.upcoming_holidays.to_string(), "Coming up");
        });

        ui.add_space(30.0);

        // Navigation cards row
        let available = ui.available_width();
        let num_cards = 4.0;
        let spacing = 30.0;
        let total_spacing = spacing * (num_cards - 1.0);
        let card_width = ((available - total_spacing) / num_cards).clamp(150.0, 250.0);
        let card_size = egui::vec2(card_width, card_width * 0.75);
        let total_width = card_width * num_cards + total_spacing;
        let start_offset = ((available - total_width) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.add_space(start_offset);

            if dashboard_card(ui, "Employees", "Staff directory", USERS, card_size).clicked() {
                next = Some(Route::Employees);
            }
            ui.add_space(spacing);
            if dashboard_card(ui, "Leave Types", "Allowances per type", TAG, card_size).clicked() {
                next = Some(Route::LeaveTypes);
            }
            ui.add_space(spacing);
            if dashboard_card(ui, "Holidays", "Company calendar", CALENDAR_BLANK, card_size).clicked() {
                next = Some(Route::Holidays);
            }
            ui.add_space(spacing);
            if dashboard_card(ui, "Leave Requests", "All requests & export", CLIPBOARD_TEXT, card_size).clicked() {
                next = Some(Route::LeaveRequests);
            }
        });

        ui.add_space(30.0);
    });

    // Two-column layout: Today | Recent Activity
    let available_width = ui.available_width();
    let column_width = (available_width - 40.0) / 2.0;

    ui.horizontal(|ui| {
        ui.add_space(10.0);

        ui.vertical(|ui| {
            ui.set_width(column_width);
            section(ui, column_width, "Today", |ui| show_today(app, ui));
        });

        ui.add_space(20.0);

        ui.vertical(|ui| {
            ui.set_width(column_width);
            section(ui, column_width, "Recent Activity", |ui| show_activity(app, ui));
        });
    });

    next
}

fn section(ui: &mut Ui, width: f32, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(width - 30.0);
            ui.label(RichText::new(title).strong());
            ui.add_space(10.0);
            add_contents(ui);
        });
}

fn show_today(app: &App, ui: &mut Ui) {
    let Some(overview) = &app.overview else {
        ui.label(RichText::new("Loading...").weak());
        return;
    };

    ScrollArea::vertical().id_salt("today_scroll").max_height(220.0).show(ui, |ui| {
        ui.label(RichText::new("On leave").small().weak());
        if overview.today_leave.is_empty() {
            ui.label("Nobody is on leave today");
        }
        for request in &overview.today_leave {
            ui.horizontal(|ui| {
                ui.label(request.employee_name.as_deref().unwrap_or("-"));
                ui.label(RichText::new(request.leave_type_label()).weak());
            });
        }

        ui.add_space(8.0);
        ui.label(RichText::new("Latest requests").small().weak());
        if overview.recent_requests.is_empty() {
            ui.label("No leave requests yet");
        }
        for request in &overview.recent_requests {
            ui.horizontal(|ui| {
                ui.label(request.employee_name.as_deref().unwrap_or("-"));
                ui.label(format!("{} to {}", request.start_date, request.end_date));
                status_badge(ui, request.status);
            });
        }

        ui.add_space(8.0);
        ui.label(RichText::new("Checked in").small().weak());
        ui.label(format!("{} record(s) today", overview.today_attendance.len()));
    });
}

fn show_activity(app: &App, ui: &mut Ui) {
    ScrollArea::vertical().id_salt("activity_scroll").max_height(220.0).show(ui, |ui| {
        if app.log_messages.is_empty() {
            ui.label(RichText::new("No recent activity").weak());
            return;
        }
        for entry in app.log_messages.iter().rev().take(10) {
            let color = match entry.level {
                LogLevel::Info => Color32::GRAY,
                LogLevel::Success => Color32::from_rgb(100, 200, 100),
                LogLevel::Warning => Color32::from_rgb(230, 180, 50),
                LogLevel::Error => Color32::from_rgb(230, 100, 100),
            };

            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                        .small()
                        .color(Color32::DARK_GRAY),
                );
                ui.label(RichText::new(&entry.message).color(color));
            });
        }
    });
}

/// Render a stat card with title, value, and subtitle.
pub fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(140.0);

            ui.vertical(|ui| {
                ui.label(RichText::new(title).small());
                ui.label(RichText::new(value).heading().strong());
                ui.label(RichText::new(subtitle).small().weak());
            });
        });
}
