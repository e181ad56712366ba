//! Home panel with navigation cards and the activity log.

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{BUILDINGS, LIST_CHECKS, SQUARES_FOUR};

use super::app::App;
use super::components::nav_card;
use crate::route::Route;

/// Show the home panel.
///
/// Returns `Some(route)` if navigation is requested.
pub fn show(app: &App, ui: &mut Ui) -> Option<Route> {
    let mut next = None;

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        ui.label(RichText::new("ProcessFlow").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(
            RichText::new("Departments, processes and subprocesses")
                .size(14.0)
                .weak(),
        );

        ui.add_space(30.0);

        let available = ui.available_width();
        let num_cards = 3.0;
        let spacing = 30.0;
        let total_spacing = spacing * (num_cards - 1.0);
        let card_width = ((available - total_spacing) / num_cards).clamp(150.0, 250.0);
        let card_size = egui::vec2(card_width, card_width * 0.75);
        let start_offset = ((available - card_width * num_cards - total_spacing) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.add_space(start_offset);

            if nav_card(ui, "Departments", "Organizational units", BUILDINGS, card_size).clicked() {
                next = Some(Route::Departments);
            }

            ui.add_space(spacing);

            if nav_card(ui, "Processes", "Workflows per department", SQUARES_FOUR, card_size).clicked() {
                next = Some(Route::Processes { department_id: None });
            }

            ui.add_space(spacing);

            if nav_card(ui, "Subprocesses", "Ordered process steps", LIST_CHECKS, card_size).clicked() {
                next = Some(Route::SubProcesses);
            }
        });

        ui.add_space(30.0);
    });

    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::symmetric(10, 0))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Recent Activity").strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(&app.config.api.base_url).small().weak());
                });
            });
            ui.add_space(10.0);

            ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                if app.log_messages.is_empty() {
                    ui.label(RichText::new("No recent activity").weak());
                } else {
                    for entry in app.log_messages.iter().rev().take(20) {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                    .small()
                                    .color(Color32::DARK_GRAY),
                            );
                            ui.label(RichText::new(&entry.message).color(entry.level.color()));
                        });
                    }
                }
            });
        });

    next
}
