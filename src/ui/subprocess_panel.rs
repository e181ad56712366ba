//! Subprocess panel grouped by process, with one-step reordering.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROW_DOWN, ARROW_RIGHT, ARROW_UP, ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, Page};
use super::components::{
    action_button, back_button, badge, card_frame, colors, danger_action_button, empty_state, panel_header,
    primary_button_with_icon, styled_button_with_icon,
};
use crate::listing::{OrderMove, moved_order};
use crate::models::SubProcess;
use crate::route::Route;

enum RowAction {
    Move(SubProcess, OrderMove),
    Edit(SubProcess),
    Delete(SubProcess),
    ViewProcess,
}

/// Show the subprocess panel.
///
/// Returns a route when navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Route> {
    let mut next = None;

    if back_button(ui) {
        next = Some(Route::Home);
    }

    panel_header(ui, "Subprocesses");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "New Subprocess").clicked() {
            app.subprocesses.open_new();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.reload(Page::SubProcesses);
        }

        if app.subprocesses.is_loading() {
            ui.spinner();
        }
    });

    ui.add_space(15.0);

    let groups = app.subprocesses.groups();
    if groups.is_empty() {
        if !app.subprocesses.is_loading() {
            empty_state(ui, "No subprocesses yet. Create the first one.");
        }
        return next;
    }

    let reordering = app.subprocesses.reordering;
    let mut action = None;
    ScrollArea::vertical().id_salt("subprocess_scroll").show(ui, |ui| {
        for group in &groups {
            card_frame(ui).show(ui, |ui| {
                ui.set_width(ui.available_width());

                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(group.process_name(&app.subprocesses.processes))
                            .size(18.0)
                            .strong(),
                    );
                    badge(ui, &group.items.len().to_string(), colors::NEUTRAL);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if action_button(ui, ARROW_RIGHT, "View process").clicked() {
                            action = Some(RowAction::ViewProcess);
                        }
                    });
                });

                ui.add_space(6.0);

                egui::Grid::new(("subprocess_group", group.process_id))
                    .num_columns(4)
                    .striped(true)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        for sub in &group.items {
                            badge(ui, &sub.effective_order().to_string(), colors::ACCENT);

                            ui.vertical(|ui| {
                                ui.label(&sub.name);
                                if let Some(desc) = sub.description.as_deref().filter(|d| !d.is_empty()) {
                                    ui.label(RichText::new(desc).small().weak());
                                }
                            });

                            ui.horizontal(|ui| {
                                let busy = reordering.is_some();
                                let can_move_up = !busy && moved_order(sub.order, OrderMove::Up).is_some();
                                if ui
                                    .add_enabled(can_move_up, egui::Button::new(ARROW_UP).frame(false))
                                    .on_hover_text("Move up")
                                    .clicked()
                                {
                                    action = Some(RowAction::Move(sub.clone(), OrderMove::Up));
                                }
                                if ui
                                    .add_enabled(!busy, egui::Button::new(ARROW_DOWN).frame(false))
                                    .on_hover_text("Move down")
                                    .clicked()
                                {
                                    action = Some(RowAction::Move(sub.clone(), OrderMove::Down));
                                }
                                if reordering == Some(sub.id) {
                                    ui.spinner();
                                }
                            });

                            ui.horizontal(|ui| {
                                if action_button(ui, PENCIL, "Edit").clicked() {
                                    action = Some(RowAction::Edit(sub.clone()));
                                }
                                ui.add_space(4.0);
                                if danger_action_button(ui, TRASH, "Delete").clicked() {
                                    action = Some(RowAction::Delete(sub.clone()));
                                }
                            });

                            ui.end_row();
                        }
                    });
            });
        }
    });

    match action {
        Some(RowAction::Move(sub, direction)) => app.move_subprocess(&sub, direction),
        Some(RowAction::Edit(sub)) => app.subprocesses.open_edit(&sub),
        Some(RowAction::Delete(sub)) => app.subprocesses.confirm_delete(&sub),
        Some(RowAction::ViewProcess) => next = Some(Route::Processes { department_id: None }),
        None => {}
    }

    next
}
