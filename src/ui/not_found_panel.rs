//! Shown for unknown routes.

use eframe::egui::{RichText, Ui};

use crate::route::Route;

pub fn show(ui: &mut Ui, path: &str) -> Option<Route> {
    let mut next = None;
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(RichText::new("404").size(48.0).strong());
        ui.add_space(10.0);
        ui.label(RichText::new(format!("Page not found: {path}")).size(16.0).weak());
        ui.add_space(20.0);
        if ui.button("Return to Home").clicked() {
            next = Some(Route::Home);
        }
    });
    next
}
