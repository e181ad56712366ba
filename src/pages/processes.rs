//! Processes page and the hydrated process listing.

use futures::{StreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{DeleteConfirm, LoadState, LoadTicket, cancellable};
use crate::api::{Backend, ProcessService};
use crate::error::Result;
use crate::forms::{FormDialog, ProcessDraft, SubProcessDraft, Submission};
use crate::listing::sort_by_order;
use crate::models::{CreateProcess, Department, Process, UpdateProcess};
use crate::route::Route;

/// A process whose subprocesses could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrationFailure {
    pub process_id: i64,
    pub message: String,
}

/// Everything the processes page shows, fetched in one go.
#[derive(Debug, Clone, Default)]
pub struct ProcessListing {
    pub departments: Vec<Department>,
    pub processes: Vec<Process>,
    pub failures: Vec<HydrationFailure>,
}

/// Load departments, the (optionally filtered) processes, and each process's
/// subprocesses sorted by order.
///
/// At most `concurrency` subprocess requests run at once and processes keep
/// the server's order. A failed subprocess fetch only affects its own
/// process, which keeps whatever `subProcesses` the server embedded.
pub async fn load_listing<B>(
    api: &B,
    department_filter: Option<i64>,
    concurrency: usize,
    cancel: &CancellationToken,
) -> Result<ProcessListing>
where
    B: Backend + ?Sized,
{
    cancellable(cancel, async {
        let departments = api.list_departments().await?;
        let processes = match department_filter {
            Some(id) => api.list_processes_by_department(id).await?,
            None => api.list_processes().await?,
        };

        let fetched: Vec<_> = stream::iter(processes)
            .map(|process| async move {
                let children = api.list_subprocesses_by_process(process.id).await;
                (process, children)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut listing = ProcessListing {
            departments,
            processes: Vec::with_capacity(fetched.len()),
            failures: Vec::new(),
        };
        for (mut process, children) in fetched {
            match children {
                Ok(mut subs) => {
                    sort_by_order(&mut subs);
                    process.sub_processes = Some(subs);
                }
                Err(e) => {
                    warn!("Error loading subprocesses for process {}: {e}", process.id);
                    listing.failures.push(HydrationFailure {
                        process_id: process.id,
                        message: e.to_string(),
                    });
                }
            }
            listing.processes.push(process);
        }

        info!(
            "Loaded {} processes ({} without subprocesses)",
            listing.processes.len(),
            listing.failures.len()
        );
        Ok(listing)
    })
    .await
}

#[derive(Debug, Default)]
pub struct ProcessesPage {
    pub departments: Vec<Department>,
    pub processes: Vec<Process>,
    pub failures: Vec<HydrationFailure>,
    /// Department the list is restricted to.
    pub filter: Option<i64>,
    pub load: LoadState,
    pub process_dialog: FormDialog<ProcessDraft>,
    pub subprocess_dialog: FormDialog<SubProcessDraft>,
    pub delete: DeleteConfirm,
}

impl ProcessesPage {
    pub fn is_loading(&self) -> bool {
        self.load.loading
    }

    /// Change the department filter. Returns `true` when a reload is needed.
    pub fn set_filter(&mut self, filter: Option<i64>) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        true
    }

    /// Route reflecting the current filter.
    pub fn route(&self) -> Route {
        Route::Processes {
            department_id: self.filter,
        }
    }

    pub fn filter_label(&self) -> String {
        match self.filter {
            None => "All departments".to_string(),
            Some(id) => self
                .departments
                .iter()
                .find(|d| d.id == id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| format!("Department #{id}")),
        }
    }

    pub fn begin_load(&mut self) -> (LoadTicket, CancellationToken) {
        self.load.begin()
    }

    /// Replace departments and processes if `ticket` is still current.
    pub fn apply_listing(&mut self, ticket: LoadTicket, listing: ProcessListing) -> bool {
        if !self.load.finish(ticket) {
            return false;
        }
        self.departments = listing.departments;
        self.processes = listing.processes;
        self.failures = listing.failures;
        true
    }

    pub fn fail_load(&mut self, ticket: LoadTicket) {
        self.load.finish(ticket);
    }

    pub fn open_new_process(&mut self) {
        self.process_dialog.open_new(ProcessDraft::new_for(&self.departments));
    }

    pub fn open_edit_process(&mut self, process: &Process) {
        self.process_dialog
            .open_edit(process.id, ProcessDraft::from(process));
    }

    /// Open the subprocess dialog locked to `process_id`.
    pub fn open_new_subprocess(&mut self, process_id: i64) {
        self.subprocess_dialog
            .open_new(SubProcessDraft::new_for(&self.processes, Some(process_id)));
    }

    pub fn confirm_delete(&mut self, process: &Process) {
        self.delete.open(process.id, &process.name);
    }
}

pub async fn save<B>(api: &B, submission: Submission<CreateProcess, UpdateProcess>) -> Result<Process>
where
    B: ProcessService + ?Sized,
{
    let process = match submission {
        Submission::Create(data) => api.create_process(&data).await?,
        Submission::Update { id, data } => api.update_process(id, &data).await?,
    };
    info!("Saved process {} ({})", process.id, process.name);
    Ok(process)
}

pub async fn delete<B>(api: &B, id: i64) -> Result<()>
where
    B: ProcessService + ?Sized,
{
    api.delete_process(id).await?;
    info!("Deleted process {id}");
    Ok(())
}
