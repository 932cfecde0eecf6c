//! Notification inbox.

use chrono::Local;
use eframe::egui::{self, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHECKS, ENVELOPE_OPEN};

use super::app::App;
use super::components::{action_button, back_button, colors, panel_header, styled_button_with_icon};
use crate::models::notification::unread_count;

pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Notifications");

    let unread = unread_count(&app.notifications);
    ui.horizontal(|ui| {
        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_notifications();
        }
        ui.add_space(10.0);
        ui.add_enabled_ui(unread > 0, |ui| {
            if styled_button_with_icon(ui, CHECKS, "Mark all as read").clicked() {
                app.mark_all_notifications_read();
            }
        });
        ui.add_space(20.0);
        ui.label(format!("{unread} unread"));
    });

    ui.add_space(15.0);

    let mut mark = None;

    ScrollArea::vertical().id_salt("notifications_scroll").show(ui, |ui| {
        if app.notifications.is_empty() {
            ui.label(RichText::new("No notifications").weak());
        }
        for item in &app.notifications {
            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(10))
                .outer_margin(Margin::symmetric(0, 4))
                .corner_radius(CornerRadius::same(6))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.horizontal(|ui| {
                        let title = RichText::new(&item.title).strong();
                        if item.is_read {
                            ui.label(title.weak());
                        } else {
                            ui.label(title.color(colors::PRIMARY));
                        }
                        ui.label(
                            RichText::new(item.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                                .small()
                                .weak(),
                        );
                        if !item.is_read {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if action_button(ui, ENVELOPE_OPEN, "Mark as read").clicked() {
                                    mark = Some(item.id);
                                }
                            });
                        }
                    });
                    ui.label(&item.message);
                });
        }
    });

    if let Some(id) = mark {
        app.mark_notification_read(id);
    }

    go_back
}
