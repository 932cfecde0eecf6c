//! Shared UI components.

use eframe::egui::{self, Button, Color32, Response, RichText, Sense, StrokeKind, Ui};

use crate::models::{DropdownOption, LeaveStatus};
use crate::models::reference::option_name;

/// Render a clickable dashboard card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn dashboard_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);

        // 200 px wide is the reference size
        let scale = size.x / 200.0;

        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        let icon_pos = egui::pos2(rect.center().x, rect.top() + size.y * 0.23);
        ui.painter().text(
            icon_pos,
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(36.0 * scale),
            visuals.text_color(),
        );

        let title_pos = egui::pos2(rect.center().x, rect.center().y + size.y * 0.07);
        ui.painter().text(
            title_pos,
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(18.0 * scale),
            visuals.text_color(),
        );

        let desc_pos = egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17);
        ui.painter().text(
            desc_pos,
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(12.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(68, 114, 196);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

pub fn styled_button(ui: &mut Ui, text: &str) -> Response {
    ui.add(Button::new(RichText::new(text).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    styled_button(ui, &format!("{icon} {text}"))
}

pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    let label = if icon.is_empty() {
        text.to_string()
    } else {
        format!("{icon} {text}")
    };
    ui.add(
        Button::new(RichText::new(label).size(14.0).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(80.0, 28.0)),
    )
}

/// Small icon button for table rows.
pub fn action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(Button::new(icon).small()).on_hover_text(tooltip)
}

pub fn danger_action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(Button::new(RichText::new(icon).color(colors::ERROR)).small())
        .on_hover_text(tooltip)
}

/// Colored status label for a leave request.
pub fn status_badge(ui: &mut Ui, status: LeaveStatus) -> Response {
    let color = match status {
        LeaveStatus::Pending => colors::WARNING,
        LeaveStatus::Approved => colors::SUCCESS,
        LeaveStatus::Rejected => colors::ERROR,
    };
    ui.colored_label(color, status.label())
}

/// Combo box over server-provided options, with a "none" entry.
pub fn option_combo(
    ui: &mut Ui,
    id_salt: &str,
    selected: &mut Option<i64>,
    options: &[DropdownOption],
    none_label: &str,
) {
    let current = if selected.is_none() {
        none_label
    } else {
        option_name(options, *selected)
    };
    egui::ComboBox::from_id_salt(id_salt)
        .width(250.0)
        .selected_text(current)
        .show_ui(ui, |ui| {
            if ui.selectable_label(selected.is_none(), none_label).clicked() {
                *selected = None;
            }
            for option in options {
                if ui.selectable_label(*selected == Some(option.id), &option.name).clicked() {
                    *selected = Some(option.id);
                }
            }
        });
}

/// Inline validation message under a form field.
pub fn field_error(ui: &mut Ui, message: Option<&str>) {
    if let Some(message) = message {
        ui.colored_label(colors::ERROR, RichText::new(message).small());
    }
}

/// Notice shown when some dashboard queries failed.
pub fn partial_notice(ui: &mut Ui, failed: &[&'static str]) {
    if failed.is_empty() {
        return;
    }
    ui.colored_label(
        colors::WARNING,
        format!("Some data could not be loaded: {}", failed.join(", ")),
    );
    ui.add_space(8.0);
}

/// Parse date input flexibly, accepting multiple formats.
pub fn parse_flexible_date(input: &str) -> Option<chrono::NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for fmt in &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(input, fmt) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible_date() {
        let expected = chrono::NaiveDate::from_ymd_opt(2025, 3, 10);
        assert_eq!(parse_flexible_date("2025-03-10"), expected);
        assert_eq!(parse_flexible_date(" 2025/03/10 "), expected);
        assert_eq!(parse_flexible_date("2025.03.10"), expected);
        assert_eq!(parse_flexible_date("10-03-2025"), None);
        assert_eq!(parse_flexible_date(""), None);
    }
}
