//! SubProcesses page: grouped listing and one-step reordering.

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{DeleteConfirm, LoadState, LoadTicket, cancellable};
use crate::api::{ProcessService, SubProcessService};
use crate::error::Result;
use crate::forms::{FormDialog, SubProcessDraft, Submission};
use crate::listing::{OrderMove, ProcessGroup, group_by_process, moved_order, sort_for_grouping};
use crate::models::{CreateSubProcess, Process, SubProcess, UpdateSubProcess};

/// Processes and subprocesses for the page.
#[derive(Debug, Clone, Default)]
pub struct SubProcessData {
    pub processes: Vec<Process>,
    pub subprocesses: Vec<SubProcess>,
}

pub async fn load_data<B>(api: &B, cancel: &CancellationToken) -> Result<SubProcessData>
where
    B: ProcessService + SubProcessService + ?Sized,
{
    cancellable(cancel, async {
        let (processes, subprocesses) = tokio::try_join!(api.list_processes(), api.list_subprocesses())?;
        info!("Loaded {} subprocesses across {} processes", subprocesses.len(), processes.len());
        Ok(SubProcessData {
            processes,
            subprocesses,
        })
    })
    .await
}

/// Move `subprocess` one step. Returns `false`, without a request, when the
/// order would drop below 0.
pub async fn reorder<B>(api: &B, subprocess: &SubProcess, direction: OrderMove) -> Result<bool>
where
    B: SubProcessService + ?Sized,
{
    let Some(order) = moved_order(subprocess.order, direction) else {
        return Ok(false);
    };
    api.update_subprocess(subprocess.id, &UpdateSubProcess::order_only(order))
        .await?;
    info!("Moved subprocess {} to order {order}", subprocess.id);
    Ok(true)
}

pub async fn save<B>(api: &B, submission: Submission<CreateSubProcess, UpdateSubProcess>) -> Result<SubProcess>
where
    B: SubProcessService + ?Sized,
{
    let sub = match submission {
        Submission::Create(data) => api.create_subprocess(&data).await?,
        Submission::Update { id, data } => api.update_subprocess(id, &data).await?,
    };
    info!("Saved subprocess {} ({})", sub.id, sub.name);
    Ok(sub)
}

pub async fn delete<B>(api: &B, id: i64) -> Result<()>
where
    B: SubProcessService + ?Sized,
{
    api.delete_subprocess(id).await?;
    info!("Deleted subprocess {id}");
    Ok(())
}

#[derive(Debug, Default)]
pub struct SubProcessesPage {
    pub processes: Vec<Process>,
    /// Sorted by `(process_id, order)`.
    pub subprocesses: Vec<SubProcess>,
    pub load: LoadState,
    pub dialog: FormDialog<SubProcessDraft>,
    pub delete: DeleteConfirm,
    /// Subprocess whose order change is in flight.
    pub reordering: Option<i64>,
}

impl SubProcessesPage {
    pub fn is_loading(&self) -> bool {
        self.load.loading
    }

    pub fn begin_load(&mut self) -> (LoadTicket, CancellationToken) {
        self.load.begin()
    }

    pub fn apply_data(&mut self, ticket: LoadTicket, data: SubProcessData) -> bool {
        if !self.load.finish(ticket) {
            return false;
        }
        let mut subprocesses = data.subprocesses;
        sort_for_grouping(&mut subprocesses);
        self.processes = data.processes;
        self.subprocesses = subprocesses;
        true
    }

    pub fn fail_load(&mut self, ticket: LoadTicket) {
        self.load.finish(ticket);
    }

    pub fn groups(&self) -> Vec<ProcessGroup> {
        group_by_process(&self.subprocesses)
    }

    pub fn open_new(&mut self) {
        self.dialog.open_new(SubProcessDraft::new_for(&self.processes, None));
    }

    pub fn open_edit(&mut self, sub: &SubProcess) {
        self.dialog.open_edit(sub.id, SubProcessDraft::from(sub));
    }

    pub fn confirm_delete(&mut self, sub: &SubProcess) {
        self.delete.open(sub.id, &sub.name);
    }
}
