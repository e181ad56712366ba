//! REST API access: transport, resource clients, and the service traits the
//! page workflows are written against.

pub mod department;
pub mod process;
pub mod subprocess;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use department::DepartmentClient;
pub use process::ProcessClient;
pub use subprocess::SubProcessClient;
pub use transport::ApiClient;

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::error::Result;
use crate::models::{
    CreateDepartment, CreateProcess, CreateSubProcess, Department, Process, SubProcess, UpdateDepartment,
    UpdateProcess, UpdateSubProcess,
};

/// Department operations.
#[async_trait]
pub trait DepartmentService: Send + Sync {
    async fn list_departments(&self) -> Result<Vec<Department>>;
    async fn get_department(&self, id: i64) -> Result<Department>;
    async fn create_department(&self, data: &CreateDepartment) -> Result<Department>;
    async fn update_department(&self, id: i64, data: &UpdateDepartment) -> Result<Department>;
    async fn delete_department(&self, id: i64) -> Result<()>;
}

/// Process operations.
#[async_trait]
pub trait ProcessService: Send + Sync {
    async fn list_processes(&self) -> Result<Vec<Process>>;
    async fn get_process(&self, id: i64) -> Result<Process>;
    async fn list_processes_by_department(&self, department_id: i64) -> Result<Vec<Process>>;
    async fn create_process(&self, data: &CreateProcess) -> Result<Process>;
    async fn update_process(&self, id: i64, data: &UpdateProcess) -> Result<Process>;
    async fn delete_process(&self, id: i64) -> Result<()>;
}

/// SubProcess operations.
#[async_trait]
pub trait SubProcessService: Send + Sync {
    async fn list_subprocesses(&self) -> Result<Vec<SubProcess>>;
    async fn get_subprocess(&self, id: i64) -> Result<SubProcess>;
    async fn list_subprocesses_by_process(&self, process_id: i64) -> Result<Vec<SubProcess>>;
    async fn create_subprocess(&self, data: &CreateSubProcess) -> Result<SubProcess>;
    async fn update_subprocess(&self, id: i64, data: &UpdateSubProcess) -> Result<SubProcess>;
    async fn delete_subprocess(&self, id: i64) -> Result<()>;
}

/// Everything the console needs from the backend.
pub trait Backend: DepartmentService + ProcessService + SubProcessService {}

impl<T> Backend for T where T: DepartmentService + ProcessService + SubProcessService {}

/// The three resource clients over one shared transport.
#[derive(Clone, Debug)]
pub struct Api {
    pub departments: DepartmentClient,
    pub processes: ProcessClient,
    pub subprocesses: SubProcessClient,
}

impl Api {
    /// Build the transport from configuration and wrap it.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self::from_client(ApiClient::new(config)?))
    }

    /// Share one transport between all resource clients.
    pub fn from_client(client: ApiClient) -> Self {
        Self {
            departments: DepartmentClient::new(client.clone()),
            processes: ProcessClient::new(client.clone()),
            subprocesses: SubProcessClient::new(client),
        }
    }
}

#[async_trait]
impl DepartmentService for Api {
    async fn list_departments(&self) -> Result<Vec<Department>> {
        self.departments.list().await
    }

    async fn get_department(&self, id: i64) -> Result<Department> {
        self.departments.get(id).await
    }

    async fn create_department(&self, data: &CreateDepartment) -> Result<Department> {
        self.departments.create(data).await
    }

    async fn update_department(&self, id: i64, data: &UpdateDepartment) -> Result<Department> {
        self.departments.update(id, data).await
    }

    async fn delete_department(&self, id: i64) -> Result<()> {
        self.departments.delete(id).await
    }
}

#[async_trait]
impl ProcessService for Api {
    async fn list_processes(&self) -> Result<Vec<Process>> {
        self.processes.list().await
    }

    async fn get_process(&self, id: i64) -> Result<Process> {
        self.processes.get(id).await
    }

    async fn list_processes_by_department(&self, department_id: i64) -> Result<Vec<Process>> {
        self.processes.list_by_department(department_id).await
    }

    async fn create_process(&self, data: &CreateProcess) -> Result<Process> {
        self.processes.create(data).await
    }

    async fn update_process(&self, id: i64, data: &UpdateProcess) -> Result<Process> {
        self.processes.update(id, data).await
    }

    async fn delete_process(&self, id: i64) -> Result<()> {
        self.processes.delete(id).await
    }
}

#[async_trait]
impl SubProcessService for Api {
    async fn list_subprocesses(&self) -> Result<Vec<SubProcess>> {
        self.subprocesses.list().await
    }

    async fn get_subprocess(&self, id: i64) -> Result<SubProcess> {
        self.subprocesses.get(id).await
    }

    async fn list_subprocesses_by_process(&self, process_id: i64) -> Result<Vec<SubProcess>> {
        self.subprocesses.list_by_process(process_id).await
    }

    async fn create_subprocess(&self, data: &CreateSubProcess) -> Result<SubProcess> {
        self.subprocesses.create(data).await
    }

    async fn update_subprocess(&self, id: i64, data: &UpdateSubProcess) -> Result<SubProcess> {
        self.subprocesses.update(id, data).await
    }

    async fn delete_subprocess(&self, id: i64) -> Result<()> {
        self.subprocesses.delete(id).await
    }
}
