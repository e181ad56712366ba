//! First-run setup wizard for configuration.

use std::path::PathBuf;
use std::sync::mpsc;

use eframe::egui::{self, RichText};

use super::components::colors;
use crate::api::Api;
use crate::config::{ApiConfig, AppConfig};

/// Connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success(usize),
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    pub api_test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Timeout input as string; empty means no timeout.
    timeout_input: String,
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
            config,
            api_test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true,
            1 => self.validate_api_step().is_ok(),
            2 => self.config.validate().is_ok(),
            3 => true,
            _ => false,
        }
    }

    /// Validate API step inputs.
    fn validate_api_step(&self) -> Result<(), String> {
        let url = self.config.api.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err("API URL must start with http:// or https://".to_string());
        }
        if !self.timeout_input.trim().is_empty() && self.config.api.timeout_secs.is_none() {
            return Err("Timeout must be a whole number of seconds".to_string());
        }
        if self.config.api.timeout_secs == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }
        Ok(())
    }

    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "API Connection",
            2 => "Preferences",
            3 => "Confirmation",
            _ => "Setup",
        }
    }

    const TOTAL_STEPS: usize = 4;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub rt: tokio::runtime::Runtime,
    /// Where the finished configuration is written.
    config_path: PathBuf,
    api_test_rx: Option<mpsc::Receiver<Result<usize, String>>>,
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
            api_test_rx: None,
        }
    }

    /// Test API connection asynchronously.
    fn start_api_test(&mut self) {
        let config = self.wizard.config.api.clone();
        let (tx, rx) = mpsc::channel();
        self.api_test_rx = Some(rx);
        self.wizard.api_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = test_api_connection(&config).await;
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.api_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.api_test_state = match result {
                Ok(count) => ConnectionTestState::Success(count),
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.api_test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_test_results();

        if matches!(self.wizard.api_test_state, ConnectionTestState::Testing) {
            ctx.request_repaint();
        }

        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, &err);
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
                    ui.heading(RichText::new("ProcessFlow Setup").size(24.0).strong());
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

                let needs_api_test = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        false
                    }
                    1 => show_api_step(ui, &mut self.wizard),
                    2 => {
                        show_preferences_step(ui, &mut self.wizard);
                        false
                    }
                    3 => {
                        show_confirmation_step(ui, &self.wizard, &self.config_path);
                        false
                    }
                    _ => false,
                };

                if needs_api_test {
                    self.start_api_test();
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
                        } else if ui.button("Save & Continue").clicked() {
                            self.wizard.completed = true;
                        }
                    });
                });
            });
        });

        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Config saved to {:?}", self.config_path);
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
    ui.label("Welcome to ProcessFlow!");
    ui.add_space(10.0);
    ui.label("This wizard will help you connect the console to its API server.");
    ui.add_space(20.0);
    ui.label("You will need:");
    ui.add_space(5.0);
    ui.label("  - The base URL of the ProcessFlow API (for example https://localhost:7115/api)");
}

fn show_api_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    egui::Grid::new("api_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("API URL:");
            if ui.text_edit_singleline(&mut wizard.config.api.base_url).changed() {
                wizard.api_test_state = ConnectionTestState::NotTested;
            }
            ui.end_row();

            ui.label("Certificates:");
            ui.checkbox(
                &mut wizard.config.api.accept_invalid_certs,
                "Accept self-signed certificates",
            );
            ui.end_row();

            ui.label("Timeout (seconds):");
            if ui
                .add(egui::TextEdit::singleline(&mut wizard.timeout_input).hint_text("No timeout"))
                .changed()
            {
                wizard.config.api.timeout_secs = wizard.timeout_input.trim().parse().ok();
            }
            ui.end_row();
        });

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.api_test_state, ConnectionTestState::Testing);
        let valid = wizard.validate_api_step().is_ok();
        if ui
            .add_enabled(!testing && valid, egui::Button::new("Test Connection"))
            .clicked()
        {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.api_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success(count) => {
                ui.colored_label(
                    colors::SUCCESS,
                    format!("Connection successful! {count} departments found."),
                );
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(colors::WARNING, format!("Failed: {e} (you can still continue)"));
            }
        }
    });

    if let Err(e) = wizard.validate_api_step() {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, e);
    }

    needs_test
}

fn show_preferences_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) {
    egui::Grid::new("prefs_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Start page:");
            egui::ComboBox::from_id_salt("start_route")
                .selected_text(wizard.config.ui.start_route.clone())
                .show_ui(ui, |ui| {
                    for path in ["/", "/departments", "/processes", "/subprocesses"] {
                        ui.selectable_value(&mut wizard.config.ui.start_route, path.to_string(), path);
                    }
                });
            ui.end_row();

            ui.label("Parallel requests:");
            ui.add(egui::DragValue::new(&mut wizard.config.fetch.hydration_concurrency).range(1..=32));
            ui.end_row();

            ui.label("Notification seconds:");
            ui.add(egui::DragValue::new(&mut wizard.config.ui.toast_seconds).range(1..=60));
            ui.end_row();

            ui.label("Log level:");
            egui::ComboBox::from_id_salt("log_level")
                .selected_text(wizard.config.logging.level.clone())
                .show_ui(ui, |ui| {
                    for level in ["error", "warn", "info", "debug", "trace"] {
                        ui.selectable_value(&mut wizard.config.logging.level, level.to_string(), level);
                    }
                });
            ui.end_row();

            ui.label("Log file:");
            ui.checkbox(&mut wizard.config.logging.file, "Write daily log files");
            ui.end_row();
        });

    if let Err(e) = wizard.config.validate() {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, e.to_string());
    }
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard, path: &std::path::Path) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("API");
        ui.label(format!("  {}", wizard.config.api.base_url));
        if wizard.config.api.accept_invalid_certs {
            ui.label("  Self-signed certificates accepted");
        }
        if let Some(timeout) = wizard.config.api.timeout_secs {
            ui.label(format!("  Timeout: {timeout} seconds"));
        }
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Preferences");
        ui.label(format!("  Start page: {}", wizard.config.ui.start_route));
        ui.label(format!("  Parallel requests: {}", wizard.config.fetch.hydration_concurrency));
        ui.label(format!(
            "  Logging: {}{}",
            wizard.config.logging.level,
            if wizard.config.logging.file { " (with log files)" } else { "" }
        ));
    });

    ui.add_space(20.0);
    ui.label(format!("Configuration will be saved to {}", path.display()));
}

/// Fetch the department list once to prove the API answers.
async fn test_api_connection(config: &ApiConfig) -> Result<usize, String> {
    let api = Api::new(config).map_err(|e| e.to_string())?;
    api.departments
        .list()
        .await
        .map(|departments| departments.len())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_step_requires_http_url() {
        let mut wizard = SetupWizard::new();
        wizard.current_step = 1;
        assert!(wizard.can_proceed());

        wizard.config.api.base_url = "localhost:7115/api".to_string();
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn test_api_step_rejects_bad_timeout() {
        let mut wizard = SetupWizard::new();
        wizard.current_step = 1;

        wizard.timeout_input = "soon".to_string();
        wizard.config.api.timeout_secs = None;
        assert!(!wizard.can_proceed());

        wizard.timeout_input = "0".to_string();
        wizard.config.api.timeout_secs = Some(0);
        assert!(!wizard.can_proceed());

        wizard.timeout_input = "30".to_string();
        wizard.config.api.timeout_secs = Some(30);
        assert!(wizard.can_proceed());
    }

    #[test]
    fn test_wizard_keeps_existing_config() {
        let mut config = AppConfig::default();
        config.api.base_url = "http://api.internal/api".to_string();
        config.api.timeout_secs = Some(15);
        let wizard = SetupWizard::with_config(config);
        assert_eq!(wizard.timeout_input, "15");
        assert_eq!(wizard.config.api.base_url, "http://api.internal/api");
    }
}
