//! Main application UI.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Align2, Layout, RichText};
use egui_phosphor::regular::ARROWS_CLOCKWISE;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::api::Api;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::listing::{OrderMove, moved_order};
use crate::models::{Department, SubProcess};
use crate::pages::departments::DepartmentsPage;
use crate::pages::processes::{ProcessListing, ProcessesPage};
use crate::pages::subprocesses::{SubProcessData, SubProcessesPage};
use crate::pages::{self, DeleteConfirm, LoadTicket};
use crate::route::Route;

use super::components::colors;
use super::{department_panel, dialogs, home_panel, not_found_panel, process_panel, subprocess_panel};

/// Page that owns a load or a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Departments,
    Processes,
    SubProcesses,
}

impl Page {
    fn of(route: &Route) -> Option<Page> {
        match route {
            Route::Departments => Some(Page::Departments),
            Route::Processes { .. } => Some(Page::Processes),
            Route::SubProcesses => Some(Page::SubProcesses),
            Route::Home | Route::NotFound(_) => None,
        }
    }

    fn entity(&self) -> &'static str {
        match self {
            Page::Departments => "Department",
            Page::Processes => "Process",
            Page::SubProcesses => "Subprocess",
        }
    }
}

/// Dialog a save result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Department,
    Process,
    /// Subprocess dialog opened from a process card.
    ProcessSubProcess,
    SubProcess,
}

impl DialogKind {
    fn entity(&self) -> &'static str {
        match self {
            DialogKind::Department => "Department",
            DialogKind::Process => "Process",
            DialogKind::ProcessSubProcess | DialogKind::SubProcess => "Subprocess",
        }
    }

    fn page(&self) -> Page {
        match self {
            DialogKind::Department => Page::Departments,
            DialogKind::Process | DialogKind::ProcessSubProcess => Page::Processes,
            DialogKind::SubProcess => Page::SubProcesses,
        }
    }
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Loads
    DepartmentsLoaded(LoadTicket, Vec<Department>),
    ProcessesLoaded(LoadTicket, ProcessListing),
    SubProcessesLoaded(LoadTicket, SubProcessData),
    LoadFailed(Page, LoadTicket, AppError),

    // Mutations
    Saved(DialogKind, String),
    SaveFailed(DialogKind, AppError),
    Deleted(Page, String),
    DeleteFailed(Page, AppError),
    Reordered { id: i64, moved: bool },
    ReorderFailed(AppError),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> egui::Color32 {
        match self {
            LogLevel::Info => egui::Color32::GRAY,
            LogLevel::Success => colors::SUCCESS,
            LogLevel::Warning => colors::WARNING,
            LogLevel::Error => colors::ERROR,
        }
    }
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Transient notification.
#[derive(Clone)]
pub struct Toast {
    pub message: String,
    pub level: LogLevel,
    pub expires_at: Instant,
}

const MAX_LOG_ENTRIES: usize = 100;

/// Main application state.
pub struct App {
    pub rt: tokio::runtime::Runtime,
    pub api: Api,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    pub route: Route,

    // Pages
    pub departments: DepartmentsPage,
    pub processes: ProcessesPage,
    pub subprocesses: SubProcessesPage,

    pub toasts: Vec<Toast>,
    pub log_messages: Vec<LogEntry>,

    pub config: AppConfig,
}

impl App {
    pub fn new(api: Api, config: AppConfig, rt: tokio::runtime::Runtime, start: Route) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            rt,
            api,
            tx,
            rx,
            route: Route::Home,
            departments: DepartmentsPage::default(),
            processes: ProcessesPage::default(),
            subprocesses: SubProcessesPage::default(),
            toasts: Vec::new(),
            log_messages: Vec::new(),
            config,
        };

        app.log_info(format!("Using API at {}", app.config.api.base_url));
        app.open(start);
        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        if self.log_messages.len() > MAX_LOG_ENTRIES {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Show a toast and record it in the activity log.
    pub fn toast(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        let ttl = Duration::from_secs(self.config.ui.toast_seconds);
        self.toasts.push(Toast {
            message: message.clone(),
            level,
            expires_at: Instant::now() + ttl,
        });
        self.log(level, message);
    }

    /// Report a failed request: the server's message plus a contextual one.
    /// Cancelled work is dropped silently.
    fn report_error(&mut self, context: &str, err: &AppError) {
        if err.is_cancelled() {
            return;
        }
        error!("{context}: {err}");
        self.toast(LogLevel::Error, err.user_message());
        self.toast(LogLevel::Error, context);
    }

    /// Run `fut` on the runtime and post its message back to the UI.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = UiMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let _ = tx.send(fut.await);
        });
    }

    /// Switch to `route` unless it is already shown.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        self.open(route);
    }

    /// Show `route` and load its data.
    fn open(&mut self, route: Route) {
        info!("Navigating to {route}");
        let next_page = Page::of(&route);
        for page in [Page::Departments, Page::Processes, Page::SubProcesses] {
            if Some(page) != next_page {
                self.cancel_load(page);
            }
        }

        if let Route::Processes { department_id } = route {
            self.processes.set_filter(department_id);
        }
        self.route = route;
        if let Some(page) = next_page {
            self.reload(page);
        }
    }

    fn cancel_load(&mut self, page: Page) {
        match page {
            Page::Departments => self.departments.load.cancel_running(),
            Page::Processes => self.processes.load.cancel_running(),
            Page::SubProcesses => self.subprocesses.load.cancel_running(),
        }
    }

    /// Re-fetch `page`'s data.
    pub fn reload(&mut self, page: Page) {
        match page {
            Page::Departments => self.load_departments(),
            Page::Processes => self.load_processes(),
            Page::SubProcesses => self.load_subprocesses(),
        }
    }

    /// Reload whatever the current route shows.
    pub fn refresh(&mut self) {
        if let Some(page) = Page::of(&self.route) {
            self.reload(page);
        }
    }

    pub fn current_page(&self) -> Option<Page> {
        Page::of(&self.route)
    }

    pub fn is_loading(&self) -> bool {
        self.departments.is_loading() || self.processes.is_loading() || self.subprocesses.is_loading()
    }

    /// Whether a save, delete or reorder is waiting for the server.
    fn has_pending_mutation(&self) -> bool {
        self.departments.dialog.submitting
            || self.processes.process_dialog.submitting
            || self.processes.subprocess_dialog.submitting
            || self.subprocesses.dialog.submitting
            || self.departments.delete.deleting
            || self.processes.delete.deleting
            || self.subprocesses.delete.deleting
            || self.subprocesses.reordering.is_some()
    }

    pub fn load_departments(&mut self) {
        let (ticket, token) = self.departments.begin_load();
        let api = self.api.clone();

        self.spawn(async move {
            match pages::departments::fetch(&api, &token).await {
                Ok(list) => UiMessage::DepartmentsLoaded(ticket, list),
                Err(e) => UiMessage::LoadFailed(Page::Departments, ticket, e),
            }
        });
    }

    pub fn load_processes(&mut self) {
        let (ticket, token) = self.processes.begin_load();
        let api = self.api.clone();
        let filter = self.processes.filter;
        let concurrency = self.config.fetch.hydration_concurrency;

        self.spawn(async move {
            match pages::processes::load_listing(&api, filter, concurrency, &token).await {
                Ok(listing) => UiMessage::ProcessesLoaded(ticket, listing),
                Err(e) => UiMessage::LoadFailed(Page::Processes, ticket, e),
            }
        });
    }

    pub fn load_subprocesses(&mut self) {
        let (ticket, token) = self.subprocesses.begin_load();
        let api = self.api.clone();

        self.spawn(async move {
            match pages::subprocesses::load_data(&api, &token).await {
                Ok(data) => UiMessage::SubProcessesLoaded(ticket, data),
                Err(e) => UiMessage::LoadFailed(Page::SubProcesses, ticket, e),
            }
        });
    }

    /// Change the department filter, mirror it in the route and re-fetch.
    pub fn set_process_filter(&mut self, filter: Option<i64>) {
        if self.processes.set_filter(filter) {
            self.route = self.processes.route();
            info!("Process filter changed to {}", self.route);
            self.load_processes();
        }
    }

    pub fn submit_dialog(&mut self, kind: DialogKind) {
        let api = self.api.clone();
        match kind {
            DialogKind::Department => {
                let submission = match self.departments.dialog.begin_submit() {
                    Ok(submission) => submission,
                    Err(e) => {
                        warn!("Form not submitted: {e}");
                        return;
                    }
                };
                self.spawn(async move {
                    match pages::departments::save(&api, submission).await {
                        Ok(dept) => UiMessage::Saved(kind, dept.name),
                        Err(e) => UiMessage::SaveFailed(kind, e),
                    }
                });
            }
            DialogKind::Process => {
                let submission = match self.processes.process_dialog.begin_submit() {
                    Ok(submission) => submission,
                    Err(e) => {
                        warn!("Form not submitted: {e}");
                        return;
                    }
                };
                self.spawn(async move {
                    match pages::processes::save(&api, submission).await {
                        Ok(process) => UiMessage::Saved(kind, process.name),
                        Err(e) => UiMessage::SaveFailed(kind, e),
                    }
                });
            }
            DialogKind::ProcessSubProcess | DialogKind::SubProcess => {
                let dialog = if kind == DialogKind::SubProcess {
                    &mut self.subprocesses.dialog
                } else {
                    &mut self.processes.subprocess_dialog
                };
                let submission = match dialog.begin_submit() {
                    Ok(submission) => submission,
                    Err(e) => {
                        warn!("Form not submitted: {e}");
                        return;
                    }
                };
                self.spawn(async move {
                    match pages::subprocesses::save(&api, submission).await {
                        Ok(sub) => UiMessage::Saved(kind, sub.name),
                        Err(e) => UiMessage::SaveFailed(kind, e),
                    }
                });
            }
        }
    }

    fn finish_dialog(&mut self, kind: DialogKind, outcome: Result<(), String>) -> bool {
        match kind {
            DialogKind::Department => self.departments.dialog.finish_submit(outcome),
            DialogKind::Process => self.processes.process_dialog.finish_submit(outcome),
            DialogKind::ProcessSubProcess => self.processes.subprocess_dialog.finish_submit(outcome),
            DialogKind::SubProcess => self.subprocesses.dialog.finish_submit(outcome),
        }
    }

    pub fn close_dialog(&mut self, kind: DialogKind) {
        match kind {
            DialogKind::Department => self.departments.dialog.close(),
            DialogKind::Process => self.processes.process_dialog.close(),
            DialogKind::ProcessSubProcess => self.processes.subprocess_dialog.close(),
            DialogKind::SubProcess => self.subprocesses.dialog.close(),
        }
    }

    pub fn delete_confirm(&mut self, page: Page) -> &mut DeleteConfirm {
        match page {
            Page::Departments => &mut self.departments.delete,
            Page::Processes => &mut self.processes.delete,
            Page::SubProcesses => &mut self.subprocesses.delete,
        }
    }

    /// Execute the confirmed delete operation.
    pub fn confirm_delete(&mut self, page: Page) {
        let confirm = self.delete_confirm(page);
        let name = confirm.target.as_ref().map(|t| t.name.clone()).unwrap_or_default();
        let Some(id) = confirm.begin() else {
            return;
        };
        self.log_info(format!("Deleting {}: {name}", page.entity().to_lowercase()));

        let api = self.api.clone();
        self.spawn(async move {
            let result = match page {
                Page::Departments => pages::departments::delete(&api, id).await,
                Page::Processes => pages::processes::delete(&api, id).await,
                Page::SubProcesses => pages::subprocesses::delete(&api, id).await,
            };
            match result {
                Ok(()) => UiMessage::Deleted(page, name),
                Err(e) => UiMessage::DeleteFailed(page, e),
            }
        });
    }

    /// Move a subprocess one step; nothing is sent when it is already at 0.
    pub fn move_subprocess(&mut self, sub: &SubProcess, direction: OrderMove) {
        if self.subprocesses.reordering.is_some() || moved_order(sub.order, direction).is_none() {
            return;
        }
        self.subprocesses.reordering = Some(sub.id);

        let api = self.api.clone();
        let sub = sub.clone();
        self.spawn(async move {
            match pages::subprocesses::reorder(&api, &sub, direction).await {
                Ok(moved) => UiMessage::Reordered { id: sub.id, moved },
                Err(e) => UiMessage::ReorderFailed(e),
            }
        });
    }

    /// Clear the activity log.
    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::DepartmentsLoaded(ticket, list) => {
                    if self.departments.apply_departments(ticket, list) {
                        self.log_info(format!("Loaded {} departments", self.departments.departments.len()));
                    }
                }
                UiMessage::ProcessesLoaded(ticket, listing) => {
                    let failed = listing.failures.len();
                    if self.processes.apply_listing(ticket, listing) && failed > 0 {
                        self.log(
                            LogLevel::Warning,
                            format!("Subprocesses unavailable for {failed} process(es)"),
                        );
                    }
                }
                UiMessage::SubProcessesLoaded(ticket, data) => {
                    self.subprocesses.apply_data(ticket, data);
                }
                UiMessage::LoadFailed(page, ticket, e) => {
                    let current = match page {
                        Page::Departments => self.departments.load.is_current(ticket),
                        Page::Processes => self.processes.load.is_current(ticket),
                        Page::SubProcesses => self.subprocesses.load.is_current(ticket),
                    };
                    match page {
                        Page::Departments => self.departments.fail_load(ticket),
                        Page::Processes => self.processes.fail_load(ticket),
                        Page::SubProcesses => self.subprocesses.fail_load(ticket),
                    }
                    if current {
                        let context = match page {
                            Page::Departments => "Failed to load departments",
                            Page::Processes => "Failed to load processes",
                            Page::SubProcesses => "Failed to load subprocesses",
                        };
                        self.report_error(context, &e);
                    }
                }
                UiMessage::Saved(kind, name) => {
                    self.finish_dialog(kind, Ok(()));
                    self.toast(LogLevel::Success, format!("{} '{name}' saved", kind.entity()));
                    if self.current_page() == Some(kind.page()) {
                        self.reload(kind.page());
                    }
                }
                UiMessage::SaveFailed(kind, e) => {
                    self.finish_dialog(kind, Err(e.user_message()));
                    self.report_error(&format!("Failed to save {}", kind.entity().to_lowercase()), &e);
                }
                UiMessage::Deleted(page, name) => {
                    self.delete_confirm(page).finish(true);
                    self.toast(LogLevel::Success, format!("{} '{name}' deleted", page.entity()));
                    if self.current_page() == Some(page) {
                        self.reload(page);
                    }
                }
                UiMessage::DeleteFailed(page, e) => {
                    self.delete_confirm(page).finish(false);
                    self.report_error(&format!("Failed to delete {}", page.entity().to_lowercase()), &e);
                }
                UiMessage::Reordered { id, moved } => {
                    self.subprocesses.reordering = None;
                    if moved {
                        self.log_success(format!("Subprocess {id} reordered"));
                        self.load_subprocesses();
                    }
                }
                UiMessage::ReorderFailed(e) => {
                    self.subprocesses.reordering = None;
                    self.report_error("Failed to change order", &e);
                }
            }
        }
    }

    /// Render menu and navigation bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("View", |ui| {
                    if ui.button("Refresh").clicked() {
                        self.refresh();
                        ui.close();
                    }
                    if ui.button("Clear Activity Log").clicked() {
                        self.clear_log();
                        ui.close();
                    }
                });

                ui.separator();

                let mut next = None;
                for route in [
                    Route::Home,
                    Route::Departments,
                    Route::Processes { department_id: None },
                    Route::SubProcesses,
                ] {
                    if ui
                        .selectable_label(self.route.same_view(&route), route.title())
                        .clicked()
                    {
                        next = Some(route);
                    }
                }
                if let Some(route) = next {
                    self.navigate(route);
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let enabled = self.current_page().is_some() && !self.is_loading();
                    if ui
                        .add_enabled(enabled, egui::Button::new(ARROWS_CLOCKWISE).frame(false))
                        .on_hover_text("Refresh")
                        .clicked()
                    {
                        self.refresh();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    if self.is_loading() {
                        ui.spinner();
                        ui.colored_label(colors::WARNING, "Loading...");
                    } else {
                        ui.colored_label(colors::NEUTRAL, "Ready");
                    }
                    ui.separator();
                    ui.label(self.route.to_path());

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("API: {}", self.config.api.base_url));
                    });
                });
            });
    }

    /// Render active toasts in the bottom-right corner.
    fn show_toasts(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires_at > now);
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, [-12.0, -40.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.label(RichText::new(&toast.message).color(toast.level.color()));
                    });
                    ui.add_space(4.0);
                }
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        // Keep polling while work is in flight or toasts are visible
        if self.is_loading() || self.has_pending_mutation() {
            ctx.request_repaint();
        } else if !self.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_toasts(ctx);
        dialogs::show(self, ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let route = self.route.clone();
            let next = match &route {
                Route::Home => home_panel::show(self, ui),
                Route::Departments => department_panel::show(self, ui),
                Route::Processes { .. } => process_panel::show(self, ui),
                Route::SubProcesses => subprocess_panel::show(self, ui),
                Route::NotFound(path) => not_found_panel::show(ui, path),
            };
            if let Some(route) = next {
                self.navigate(route);
            }
        });
    }
}
