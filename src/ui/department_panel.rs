//! Department management panel.

use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular::{ARROW_RIGHT, ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, Page};
use super::components::{
    action_button, back_button, danger_action_button, empty_state, panel_header, primary_button_with_icon,
    styled_button_with_icon,
};
use crate::models::Department;
use crate::route::Route;

enum RowAction {
    Edit(Department),
    Delete(Department),
    ViewProcesses(i64),
}

/// Show the department panel.
///
/// Returns a route when navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Route> {
    let mut next = None;

    if back_button(ui) {
        next = Some(Route::Home);
    }

    panel_header(ui, "Departments");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "New Department").clicked() {
            app.departments.open_new();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.reload(Page::Departments);
        }

        if app.departments.is_loading() {
            ui.spinner();
        }
    });

    ui.add_space(15.0);

    if app.departments.departments.is_empty() {
        if !app.departments.is_loading() {
            empty_state(ui, "No departments yet. Create the first one.");
        }
        return next;
    }

    ui.label(format!("{} departments", app.departments.departments.len()));
    ui.add_space(10.0);

    let mut action = None;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::initial(200.0).at_least(120.0))
        .column(Column::remainder().at_least(200.0))
        .column(Column::auto().at_least(110.0))
        .header(24.0, |mut header| {
            header.col(|ui| {
                ui.strong("ID");
            });
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Description");
            });
            header.col(|ui| {
                ui.strong("Actions");
            });
        })
        .body(|mut body| {
            for dept in &app.departments.departments {
                body.row(28.0, |mut row| {
                    row.col(|ui| {
                        ui.label(dept.id.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&dept.name);
                    });
                    row.col(|ui| {
                        match dept.description.as_deref().filter(|d| !d.is_empty()) {
                            Some(desc) => ui.label(desc),
                            None => ui.label(RichText::new("-").weak()),
                        };
                    });
                    row.col(|ui| {
                        ui.horizontal(|ui| {
                            if action_button(ui, ARROW_RIGHT, "View processes").clicked() {
                                action = Some(RowAction::ViewProcesses(dept.id));
                            }
                            ui.add_space(4.0);
                            if action_button(ui, PENCIL, "Edit").clicked() {
                                action = Some(RowAction::Edit(dept.clone()));
                            }
                            ui.add_space(4.0);
                            if danger_action_button(ui, TRASH, "Delete").clicked() {
                                action = Some(RowAction::Delete(dept.clone()));
                            }
                        });
                    });
                });
            }
        });

    match action {
        Some(RowAction::Edit(dept)) => app.departments.open_edit(&dept),
        Some(RowAction::Delete(dept)) => app.departments.confirm_delete(&dept),
        Some(RowAction::ViewProcesses(id)) => {
            next = Some(Route::Processes {
                department_id: Some(id),
            })
        }
        None => {}
    }

    next
}
