//! Entity form dialogs and delete confirmations.

use eframe::egui::{self, Align, Align2, Layout, RichText, Ui};
use egui_phosphor::regular::{PLUS, TRASH, X};

use super::app::{App, DialogKind, Page};
use super::components::{action_button, colors, primary_button_with_icon, styled_button};
use crate::forms::{DepartmentDraft, Draft, FormDialog, ListField, ProcessDraft, SubProcessDraft};
use crate::models::{Department, Process};
use crate::pages::DeleteConfirm;

/// What the user asked a dialog to do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    None,
    Confirm,
    Cancel,
}

/// Render the dialogs that belong to the current page.
pub fn show(app: &mut App, ctx: &egui::Context) {
    let Some(page) = app.current_page() else {
        return;
    };

    match page {
        Page::Departments => {
            if app.departments.dialog.is_open {
                let action = form_window(
                    ctx,
                    "department_dialog",
                    "Department",
                    &mut app.departments.dialog,
                    department_form,
                );
                apply_form_action(app, DialogKind::Department, action);
            }
        }
        Page::Processes => {
            if app.processes.process_dialog.is_open {
                let departments = &app.processes.departments;
                let action = form_window(
                    ctx,
                    "process_dialog",
                    "Process",
                    &mut app.processes.process_dialog,
                    |ui, draft| process_form(ui, draft, departments),
                );
                apply_form_action(app, DialogKind::Process, action);
            }
            if app.processes.subprocess_dialog.is_open {
                let processes = &app.processes.processes;
                let action = form_window(
                    ctx,
                    "process_subprocess_dialog",
                    "Subprocess",
                    &mut app.processes.subprocess_dialog,
                    |ui, draft| subprocess_form(ui, draft, processes),
                );
                apply_form_action(app, DialogKind::ProcessSubProcess, action);
            }
        }
        Page::SubProcesses => {
            if app.subprocesses.dialog.is_open {
                let processes = &app.subprocesses.processes;
                let action = form_window(
                    ctx,
                    "subprocess_dialog",
                    "Subprocess",
                    &mut app.subprocesses.dialog,
                    |ui, draft| subprocess_form(ui, draft, processes),
                );
                apply_form_action(app, DialogKind::SubProcess, action);
            }
        }
    }

    let warning = match page {
        Page::Departments => Some("The server may also remove its processes and subprocesses."),
        Page::Processes => Some("The server may also remove its subprocesses."),
        Page::SubProcesses => None,
    };
    let entity = match page {
        Page::Departments => "Department",
        Page::Processes => "Process",
        Page::SubProcesses => "Subprocess",
    };
    match delete_window(ctx, entity, warning, app.delete_confirm(page)) {
        DialogAction::Confirm => app.confirm_delete(page),
        DialogAction::Cancel => app.delete_confirm(page).close(),
        DialogAction::None => {}
    }
}

fn apply_form_action(app: &mut App, kind: DialogKind, action: DialogAction) {
    match action {
        DialogAction::Confirm => app.submit_dialog(kind),
        DialogAction::Cancel => app.close_dialog(kind),
        DialogAction::None => {}
    }
}

/// Window around a draft with the shared Cancel / Save footer.
fn form_window<D: Draft>(
    ctx: &egui::Context,
    id: &str,
    entity: &str,
    dialog: &mut FormDialog<D>,
    body: impl FnOnce(&mut Ui, &mut D),
) -> DialogAction {
    let title = if dialog.is_editing() {
        format!("Edit {entity}")
    } else {
        format!("New {entity}")
    };

    let mut action = DialogAction::None;
    egui::Window::new(title)
        .id(egui::Id::new(id))
        .collapsible(false)
        .resizable(false)
        .default_width(460.0)
        .max_height(560.0)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::ScrollArea::vertical().max_height(440.0).show(ui, |ui| {
                ui.add_enabled_ui(!dialog.submitting, |ui| body(ui, &mut dialog.draft));
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!dialog.submitting, egui::Button::new("Cancel").min_size(egui::vec2(80.0, 28.0)))
                    .clicked()
                {
                    action = DialogAction::Cancel;
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let label = if dialog.submitting {
                        "Saving..."
                    } else if dialog.is_editing() {
                        "Update"
                    } else {
                        "Create"
                    };
                    ui.add_enabled_ui(dialog.can_submit(), |ui| {
                        if primary_button_with_icon(ui, "", label).clicked() {
                            action = DialogAction::Confirm;
                        }
                    });
                    if dialog.submitting {
                        ui.spinner();
                    }
                });
            });
        });

    action
}

fn required_label(ui: &mut Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;
        ui.label(text);
        ui.colored_label(colors::ERROR, "*");
    });
}

fn department_form(ui: &mut Ui, draft: &mut DepartmentDraft) {
    egui::Grid::new("department_form_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            required_label(ui, "Name:");
            ui.add(egui::TextEdit::singleline(&mut draft.name).desired_width(260.0));
            ui.end_row();

            ui.label("Description:");
            ui.add(
                egui::TextEdit::multiline(&mut draft.description)
                    .desired_width(260.0)
                    .desired_rows(3),
            );
            ui.end_row();
        });
}

fn process_form(ui: &mut Ui, draft: &mut ProcessDraft, departments: &[Department]) {
    egui::Grid::new("process_form_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            required_label(ui, "Name:");
            ui.add(egui::TextEdit::singleline(&mut draft.name).desired_width(260.0));
            ui.end_row();

            ui.label("Description:");
            ui.add(
                egui::TextEdit::multiline(&mut draft.description)
                    .desired_width(260.0)
                    .desired_rows(3),
            );
            ui.end_row();

            required_label(ui, "Department:");
            if departments.is_empty() {
                ui.label(RichText::new("Create a department first").weak());
            } else {
                egui::ComboBox::from_id_salt("process_form_department")
                    .width(260.0)
                    .selected_text(
                        departments
                            .iter()
                            .find(|d| d.id == draft.department_id)
                            .map(|d| d.name.as_str())
                            .unwrap_or("Select a department"),
                    )
                    .show_ui(ui, |ui| {
                        for dept in departments {
                            ui.selectable_value(&mut draft.department_id, dept.id, &dept.name);
                        }
                    });
            }
            ui.end_row();
        });

    ui.add_space(12.0);
    list_field(ui, "process_tools", "Tools", "Add a tool", &mut draft.tools);
    list_field(ui, "process_responsibles", "Responsibles", "Add a responsible", &mut draft.responsibles);
    list_field(ui, "process_documentation", "Documentation", "Add a document or link", &mut draft.documentation);
}

/// Text input with an add button above the current entries.
fn list_field(ui: &mut Ui, id: &str, label: &str, hint: &str, field: &mut ListField) {
    ui.label(RichText::new(label).strong());
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut field.input)
                .id_salt(id)
                .hint_text(hint)
                .desired_width(300.0),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui
            .add_enabled(!field.input.trim().is_empty(), egui::Button::new(PLUS))
            .on_hover_text("Add")
            .clicked();
        if (entered || clicked) && field.add() && entered {
            response.request_focus();
        }
    });

    let mut remove = None;
    for (index, item) in field.items.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("- {item}"));
            if action_button(ui, X, "Remove").clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        field.remove(index);
    }
    ui.add_space(8.0);
}

fn subprocess_form(ui: &mut Ui, draft: &mut SubProcessDraft, processes: &[Process]) {
    egui::Grid::new("subprocess_form_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            required_label(ui, "Name:");
            ui.add(egui::TextEdit::singleline(&mut draft.name).desired_width(260.0));
            ui.end_row();

            ui.label("Description:");
            ui.add(
                egui::TextEdit::multiline(&mut draft.description)
                    .desired_width(260.0)
                    .desired_rows(3),
            );
            ui.end_row();

            required_label(ui, "Process:");
            let selected = processes
                .iter()
                .find(|p| p.id == draft.process_id)
                .map(|p| p.name.as_str())
                .unwrap_or("Select a process");
            if draft.process_locked {
                ui.label(RichText::new(selected).strong());
            } else if processes.is_empty() {
                ui.label(RichText::new("Create a process first").weak());
            } else {
                egui::ComboBox::from_id_salt("subprocess_form_process")
                    .width(260.0)
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for process in processes {
                            ui.selectable_value(&mut draft.process_id, process.id, &process.name);
                        }
                    });
            }
            ui.end_row();

            ui.label("Order:");
            ui.add(egui::DragValue::new(&mut draft.order).range(0..=9999));
            ui.end_row();
        });
}

/// Confirmation window for the page's pending delete.
fn delete_window(ctx: &egui::Context, entity: &str, warning: Option<&str>, confirm: &DeleteConfirm) -> DialogAction {
    let Some(target) = &confirm.target else {
        return DialogAction::None;
    };

    let mut action = DialogAction::None;
    egui::Window::new(format!("Delete {entity}"))
        .id(egui::Id::new("delete_confirm"))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Delete {} '{}'?", entity.to_lowercase(), target.name));
            if let Some(warning) = warning {
                ui.add_space(5.0);
                ui.colored_label(colors::WARNING, warning);
            }
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.add_enabled_ui(!confirm.deleting, |ui| {
                    if styled_button(ui, "Cancel").clicked() {
                        action = DialogAction::Cancel;
                    }
                    if ui
                        .add(
                            egui::Button::new(RichText::new(format!("{TRASH} Delete")).color(egui::Color32::WHITE))
                                .fill(colors::ERROR)
                                .min_size(egui::vec2(80.0, 28.0)),
                        )
                        .clicked()
                    {
                        action = DialogAction::Confirm;
                    }
                });
                if confirm.deleting {
                    ui.spinner();
                }
            });
        });

    action
}
