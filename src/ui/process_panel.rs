//! Process panel: department filter and process cards with their subprocesses.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, Page};
use super::components::{
    action_button, back_button, badge, card_frame, colors, danger_action_button, empty_state, panel_header,
    primary_button_with_icon, styled_button_with_icon,
};
use crate::models::Process;
use crate::pages::processes::ProcessesPage;
use crate::route::Route;

enum CardAction {
    Edit(Process),
    Delete(Process),
    AddSubProcess(i64),
}

/// Show the process panel.
///
/// Returns a route when navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Route> {
    let mut next = None;

    if back_button(ui) {
        next = Some(Route::Home);
    }

    panel_header(ui, "Processes");

    let mut filter_change = None;
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "New Process").clicked() {
            app.processes.open_new_process();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.reload(Page::Processes);
        }

        ui.add_space(20.0);

        ui.label("Department:");
        let page = &app.processes;
        egui::ComboBox::from_id_salt("process_department_filter")
            .width(200.0)
            .selected_text(page.filter_label())
            .show_ui(ui, |ui| {
                if ui.selectable_label(page.filter.is_none(), "All departments").clicked() {
                    filter_change = Some(None);
                }
                for dept in &page.departments {
                    if ui
                        .selectable_label(page.filter == Some(dept.id), &dept.name)
                        .clicked()
                    {
                        filter_change = Some(Some(dept.id));
                    }
                }
            });

        if page.is_loading() {
            ui.spinner();
        }
    });

    if let Some(filter) = filter_change {
        app.set_process_filter(filter);
    }

    ui.add_space(15.0);

    if app.processes.processes.is_empty() {
        if !app.processes.is_loading() {
            let message = if app.processes.filter.is_some() {
                "No processes in this department."
            } else {
                "No processes yet. Create the first one."
            };
            empty_state(ui, message);
        }
        return next;
    }

    if !app.processes.failures.is_empty() {
        ui.colored_label(
            colors::WARNING,
            format!(
                "Subprocesses could not be loaded for {} process(es).",
                app.processes.failures.len()
            ),
        );
        ui.add_space(8.0);
    }

    let mut action = None;
    ScrollArea::vertical().id_salt("process_scroll").show(ui, |ui| {
        for process in &app.processes.processes {
            if let Some(a) = process_card(ui, &app.processes, process) {
                action = Some(a);
            }
        }
    });

    match action {
        Some(CardAction::Edit(process)) => app.processes.open_edit_process(&process),
        Some(CardAction::Delete(process)) => app.processes.confirm_delete(&process),
        Some(CardAction::AddSubProcess(id)) => app.processes.open_new_subprocess(id),
        None => {}
    }

    next
}

fn process_card(ui: &mut Ui, page: &ProcessesPage, process: &Process) -> Option<CardAction> {
    let mut action = None;

    card_frame(ui).show(ui, |ui| {
        ui.set_width(ui.available_width());

        ui.horizontal(|ui| {
            ui.label(RichText::new(&process.name).size(18.0).strong());

            let department = process.department_name().or_else(|| {
                page.departments
                    .iter()
                    .find(|d| d.id == process.department_id)
                    .map(|d| d.name.as_str())
            });
            if let Some(department) = department {
                badge(ui, department, colors::ACCENT);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if danger_action_button(ui, TRASH, "Delete").clicked() {
                    action = Some(CardAction::Delete(process.clone()));
                }
                if action_button(ui, PENCIL, "Edit").clicked() {
                    action = Some(CardAction::Edit(process.clone()));
                }
            });
        });

        if let Some(desc) = process.description.as_deref().filter(|d| !d.is_empty()) {
            ui.label(RichText::new(desc).weak());
        }

        ui.add_space(8.0);

        let failed = page.failures.iter().any(|f| f.process_id == process.id);
        let subprocesses = process.subprocesses();
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Subprocesses ({})", subprocesses.len())).strong());
            if action_button(ui, PLUS, "Add subprocess").clicked() {
                action = Some(CardAction::AddSubProcess(process.id));
            }
        });
        if failed {
            ui.colored_label(colors::WARNING, "Could not load subprocesses");
        } else if subprocesses.is_empty() {
            ui.label(RichText::new("No subprocesses").weak());
        } else {
            for (index, sub) in subprocesses.iter().enumerate() {
                ui.horizontal(|ui| {
                    let position = sub.order.filter(|o| *o != 0).map(i64::from).unwrap_or(index as i64 + 1);
                    badge(ui, &position.to_string(), colors::NEUTRAL);
                    ui.label(&sub.name);
                });
            }
        }

        if !process.tools.is_empty() {
            ui.add_space(8.0);
            ui.label(RichText::new("Tools").strong());
            ui.horizontal_wrapped(|ui| {
                for tool in &process.tools {
                    badge(ui, tool, colors::ACCENT);
                }
            });
        }

        if !process.responsibles.is_empty() {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Responsibles:").strong());
                ui.label(process.responsibles.join(", "));
            });
        }

        if !process.documentation.is_empty() {
            ui.add_space(8.0);
            ui.label(RichText::new("Documentation").strong());
            for doc in &process.documentation {
                ui.label(format!("- {doc}"));
            }
        }
    });

    action
}
