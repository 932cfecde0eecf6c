//! Sign-in screen.

use eframe::egui::{self, CornerRadius, Margin, RichText, Ui};
use egui_phosphor::regular::SIGN_IN;

use super::app::App;
use super::components::{colors, primary_button_with_icon};

pub fn show(app: &mut App, ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(RichText::new("HR Management").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Sign in to continue").size(14.0).weak());
        ui.add_space(30.0);

        egui::Frame::new()
            .fill(ui.style().visuals.extreme_bg_color)
            .inner_margin(Margin::same(20))
            .corner_radius(CornerRadius::same(8))
            .show(ui, |ui| {
                ui.set_max_width(360.0);

                egui::Grid::new("login_grid")
                    .num_columns(2)
                    .spacing([15.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Email:");
                        ui.add(
                            egui::TextEdit::singleline(&mut app.login_form.email)
                                .desired_width(220.0)
                                .hint_text("you@company.com"),
                        );
                        ui.end_row();

                        ui.label("Password:");
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut app.login_form.password)
                                .password(true)
                                .desired_width(220.0),
                        );
                        ui.end_row();

                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            app.login();
                        }
                    });

                if let Some(error) = &app.login_form.error {
                    ui.add_space(10.0);
                    ui.colored_label(colors::ERROR, error);
                }

                ui.add_space(15.0);
                ui.horizontal(|ui| {
                    if app.login_form.submitting {
                        ui.spinner();
                        ui.label("Signing in...");
                    } else if primary_button_with_icon(ui, SIGN_IN, "Sign In").clicked() {
                        app.login();
                    }
                });
            });
    });
}
