//! Home screen for employees and reporting managers: leave balance, today's
//! attendance with check-in/out, recent requests and (for managers) the team queue.

use chrono::Local;
use eframe::egui::{self, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CALENDAR_PLUS, CHECK_SQUARE, CLOCK, SIGN_IN, SIGN_OUT};

use super::app::App;
use super::components::{
    colors, dashboard_card, partial_notice, primary_button_with_icon, status_badge, styled_button_with_icon,
};
use super::dashboard::stat_card;
use crate::dashboard::EmployeeDashboard;
use crate::router::Route;

/// Show the home panel.
///
/// Returns `Some(route)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Route> {
    let mut next = None;
    let is_manager = app.router.current() == Route::ManagerHome;

    let own = if is_manager {
        app.manager_dashboard.as_ref().map(|d| d.own.clone())
    } else {
        app.employee_dashboard.clone()
    };
    let failed = if is_manager {
        app.manager_dashboard.as_ref().map(|d| d.failed.clone())
    } else {
        app.employee_dashboard.as_ref().map(|d| d.failed.clone())
    }
    .unwrap_or_default();

    let name = app
        .session
        .current()
        .map(|s| s.employee.display_name())
        .unwrap_or_default();

    ui.horizontal(|ui| {
        ui.heading(RichText::new(format!("Welcome, {name}")).size(24.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
                next = Some(app.router.current());
            }
        });
    });
    ui.label(RichText::new(Local::now().format("%A, %d %B %Y").to_string()).weak());
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);

    partial_notice(ui, &failed);

    let Some(own) = own else {
        ui.spinner();
        return next;
    };

    // Leave balance
    ui.horizontal(|ui| {
        let stats = &own.stats;
        stat_card(ui, "Allowed", &format!("{}", stats.total_allowed), "Days this year");
        stat_card(ui, "Used", &format!("{}", stats.used), "Days taken");
        stat_card(ui, "Remaining", &format!("{}", stats.remaining), "Days left");
        stat_card(ui, "Pending", &stats.pending.to_string(), "Awaiting decision");
    });

    ui.add_space(15.0);

    attendance_card(app, ui, &own);

    ui.add_space(15.0);

    // Navigation cards
    let card_size = egui::vec2(180.0, 135.0);
    ui.horizontal(|ui| {
        let leave_route = if is_manager { Route::ManagerLeave } else { Route::EmployeeLeave };
        if dashboard_card(ui, "Apply for Leave", "New request & history", CALENDAR_PLUS, card_size).clicked() {
            next = Some(leave_route);
        }
        ui.add_space(20.0);
        if is_manager {
            let pending = app.manager_dashboard.as_ref().map_or(0, |d| d.team_pending.len());
            let description = format!("{pending} waiting for you");
            if dashboard_card(ui, "Approvals", &description, CHECK_SQUARE, card_size).clicked() {
                next = Some(Route::ManagerApprovals);
            }
        } else if dashboard_card(ui, "Attendance", "Check-in history", CLOCK, card_size).clicked() {
            next = Some(Route::EmployeeAttendance);
        }
    });

    ui.add_space(15.0);

    ScrollArea::vertical().id_salt("home_scroll").show(ui, |ui| {
        if is_manager && let Some(dash) = &app.manager_dashboard {
            ui.label(RichText::new("Team requests awaiting decision").strong());
            ui.add_space(5.0);
            if dash.team_pending.is_empty() {
                ui.label(RichText::new("Nothing to review").weak());
            }
            for request in &dash.team_pending {
                ui.horizontal(|ui| {
                    ui.label(request.employee_name.as_deref().unwrap_or("-"));
                    ui.label(request.leave_type_label());
                    ui.label(format!("{} to {}", request.start_date, request.end_date));
                });
            }
            ui.add_space(15.0);
        }

        ui.label(RichText::new("My recent requests").strong());
        ui.add_space(5.0);
        if own.recent_requests.is_empty() {
            ui.label(RichText::new("No leave requests yet").weak());
        }
        for request in &own.recent_requests {
            ui.horizontal(|ui| {
                ui.label(request.leave_type_label());
                ui.label(format!("{} to {}", request.start_date, request.end_date));
                status_badge(ui, request.status);
            });
        }
    });

    next
}

fn attendance_card(app: &mut App, ui: &mut Ui, dash: &EmployeeDashboard) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.label(RichText::new("Today's Attendance").strong());
            ui.add_space(8.0);

            let fmt = |t: Option<chrono::DateTime<chrono::Utc>>| {
                t.map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
                    .unwrap_or("--:--".to_string())
            };

            let record = dash.today.first();
            ui.horizontal(|ui| {
                ui.label("Check in:");
                ui.label(RichText::new(fmt(record.and_then(|r| r.check_in))).strong());
                ui.add_space(20.0);
                ui.label("Check out:");
                ui.label(RichText::new(fmt(record.and_then(|r| r.check_out))).strong());
                if let Some(hours) = record.and_then(|r| r.work_hours()) {
                    ui.add_space(20.0);
                    ui.label(format!("{hours:.1} h"));
                }
            });

            ui.add_space(8.0);

            if app.attendance_busy {
                ui.spinner();
            } else if dash.open_attendance().is_some() {
                if primary_button_with_icon(ui, SIGN_OUT, "Check Out").clicked() {
                    app.mark_attendance(false);
                }
            } else if record.is_some_and(|r| r.check_out.is_some()) {
                ui.colored_label(colors::SUCCESS, "Done for today");
            } else if primary_button_with_icon(ui, SIGN_IN, "Check In").clicked() {
                app.mark_attendance(true);
            }
        });
}
