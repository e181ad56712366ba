//! Shared UI components.

use eframe::egui::{self, Color32, CornerRadius, Margin, Response, RichText, Sense, StrokeKind, Ui};

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const ACCENT: Color32 = Color32::from_rgb(100, 150, 230);
    pub const PRIMARY: Color32 = Color32::from_rgb(45, 110, 200);
}

/// Render a clickable navigation card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn nav_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);

        // 200 is the reference width
        let scale = size.x / 200.0;

        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        ui.painter().text(
            egui::pos2(rect.center().x, rect.top() + size.y * 0.23),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(36.0 * scale),
            visuals.text_color(),
        );
        ui.painter().text(
            egui::pos2(rect.center().x, rect.center().y + size.y * 0.07),
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(18.0 * scale),
            visuals.text_color(),
        );
        ui.painter().text(
            egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17),
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(12.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Filled button for the main action of a panel or dialog.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    let label = if icon.is_empty() {
        text.to_string()
    } else {
        format!("{icon} {text}")
    };
    ui.add(
        egui::Button::new(RichText::new(label).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(90.0, 28.0)),
    )
}

pub fn styled_button(ui: &mut Ui, text: &str) -> Response {
    ui.add(egui::Button::new(text).min_size(egui::vec2(80.0, 28.0)))
}

pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    styled_button(ui, &format!("{icon} {text}"))
}

/// Small icon button with a hover tooltip.
pub fn action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(icon).frame(false))
        .on_hover_text(tooltip)
}

pub fn danger_action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).color(colors::ERROR)).frame(false))
        .on_hover_text(tooltip)
}

/// Rounded pill with short text.
pub fn badge(ui: &mut Ui, text: &str, color: Color32) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.25))
        .inner_margin(Margin::symmetric(6, 2))
        .corner_radius(CornerRadius::same(10))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(color));
        });
}

/// Container used for cards and sections.
pub fn card_frame(ui: &Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back to Home").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Centered notice for empty lists.
pub fn empty_state(ui: &mut Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(RichText::new(message).size(16.0).weak());
    });
}
