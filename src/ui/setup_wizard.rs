//! First-run setup wizard for the server connection.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use eframe::egui::{self, Color32, RichText};

use crate::config::AppConfig;

/// Connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success,
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-2).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// Server reachability test state.
    pub server_test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    timeout_input: String,
    recent_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Start from an existing (possibly invalid) configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            current_step: 0,
            timeout_input: config.api.timeout_secs.map(|t| t.to_string()).unwrap_or_default(),
            recent_input: config.ui.recent_requests.to_string(),
            config,
            server_test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true,
            1 => self.config.validate().is_ok(),
            2 => true,
            _ => false,
        }
    }

    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "Server Connection",
            2 => "Confirmation",
            _ => "Setup",
        }
    }

    const TOTAL_STEPS: usize = 3;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub rt: tokio::runtime::Runtime,
    config_path: PathBuf,
    server_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
}

impl SetupApp {
    pub fn new(
        wizard: SetupWizard,
        initial_error: Option<String>,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            wizard,
            initial_error,
            rt,
            config_path,
            server_test_rx: None,
        }
    }

    /// Check the server answers at all.
    fn start_server_test(&mut self) {
        let url = self.wizard.config.api.base_url.trim().to_string();
        let (tx, rx) = mpsc::channel();
        self.server_test_rx = Some(rx);
        self.wizard.server_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = test_server_connection(&url).await;
            let _ = tx.send(result);
        });
    }

    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.server_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.server_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.server_test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_test_results();

        if matches!(self.wizard.server_test_state, ConnectionTestState::Testing) {
            ctx.request_repaint();
        }

        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(Color32::from_rgb(255, 100, 100), &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                ui.horizontal(|ui| {
                    ui.heading(RichText::new("HR Management Setup").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Step {} of {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                let needs_test = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        false
                    }
                    1 => show_server_step(ui, &mut self.wizard),
                    2 => {
                        show_confirmation_step(ui, &self.wizard, &self.config_path);
                        false
                    }
                    _ => false,
                };

                if needs_test {
                    self.start_server_test();
                }

                ui.add_space(30.0);
                ui.separator();

                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Back").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Get Started >"
                            } else {
                                "Next >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else if ui.button("Save & Exit").clicked() {
                            self.wizard.completed = true;
                        }
                    });
                });
            });
        });

        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Config written to {}", self.config_path.display());
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    self.initial_error = Some(format!("Failed to save config: {e}"));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Welcome to HR Management!");
    ui.add_space(10.0);
    ui.label("This wizard will connect the application to your HR server.");
    ui.add_space(20.0);
    ui.label("You will need:");
    ui.add_space(5.0);
    ui.label("  - The HR server API address");
    ui.label("  - Your login email and password (asked after setup)");
}

fn show_server_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    egui::Grid::new("server_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Server URL:");
            if ui.text_edit_singleline(&mut wizard.config.api.base_url).changed() {
                wizard.server_test_state = ConnectionTestState::NotTested;
            }
            ui.end_row();

            ui.label("Timeout (seconds):");
            if ui
                .add(egui::TextEdit::singleline(&mut wizard.timeout_input).hint_text("None"))
                .changed()
            {
                wizard.config.api.timeout_secs = wizard.timeout_input.trim().parse().ok();
            }
            ui.end_row();

            ui.label("Recent requests shown:");
            if ui.text_edit_singleline(&mut wizard.recent_input).changed()
                && let Ok(n) = wizard.recent_input.trim().parse()
            {
                wizard.config.ui.recent_requests = n;
            }
            ui.end_row();
        });

    if let Err(e) = wizard.config.validate() {
        ui.add_space(10.0);
        ui.colored_label(Color32::from_rgb(255, 100, 100), e.to_string());
    }

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.server_test_state, ConnectionTestState::Testing);
        if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.server_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success => {
                ui.colored_label(Color32::from_rgb(100, 200, 100), "Server reachable!");
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(Color32::from_rgb(255, 200, 100), format!("Not reachable: {e}"));
            }
        }
    });

    needs_test
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard, path: &std::path::Path) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Server");
        ui.label(format!("  {}", wizard.config.api.base_url));
        match wizard.config.api.timeout_secs {
            Some(t) => ui.label(format!("  Timeout: {t} s")),
            None => ui.label("  Timeout: none"),
        };
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Storage");
        ui.label(format!("  Config: {}", path.display()));
        ui.label(format!("  Session: {}", wizard.config.session_dir().display()));
    });

    ui.add_space(20.0);
    ui.label("Click 'Save & Exit' to save and close the wizard.");
    ui.label("You will need to restart the application after setup.");
}

/// Any HTTP answer means the server is reachable; the API itself is
/// exercised on login.
async fn test_server_connection(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL is empty".to_string());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| e.to_string())?;

    client.get(url).send().await.map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_step_requires_valid_url() {
        let mut wizard = SetupWizard::new();
        wizard.current_step = 1;
        assert!(wizard.can_proceed());

        wizard.config.api.base_url = "hr.example.com".to_string();
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn test_with_config_prefills_inputs() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = Some(15);
        let wizard = SetupWizard::with_config(config);
        assert_eq!(wizard.timeout_input, "15");
        assert_eq!(wizard.recent_input, "5");
    }
}
