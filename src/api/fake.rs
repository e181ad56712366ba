//! In-memory backend for workflow tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{DepartmentService, ProcessService, SubProcessService};
use crate::error::{AppError, Result};
use crate::models::{
    CreateDepartment, CreateProcess, CreateSubProcess, Department, Process, SubProcess, UpdateDepartment,
    UpdateProcess, UpdateSubProcess,
};

#[derive(Default)]
struct State {
    next_id: i64,
    departments: Vec<Department>,
    processes: Vec<Process>,
    subprocesses: Vec<SubProcess>,
    failing_children: HashSet<i64>,
    fail_department_list: bool,
    calls: Vec<String>,
}

/// Backend that keeps entities in memory and records every call.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

fn not_found() -> AppError {
    AppError::Api {
        status: 404,
        message: "Error: 404 Not Found".to_string(),
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(state: &mut State) -> i64 {
        state.next_id += 1;
        state.next_id
    }

    pub fn add_department(&self, name: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state);
        state.departments.push(Department {
            id,
            name: name.to_string(),
            ..Default::default()
        });
        id
    }

    pub fn add_process(&self, department_id: i64, name: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state);
        state.processes.push(Process {
            id,
            name: name.to_string(),
            department_id,
            ..Default::default()
        });
        id
    }

    pub fn add_subprocess(&self, process_id: i64, name: &str, order: Option<i32>) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state);
        state.subprocesses.push(SubProcess {
            id,
            name: name.to_string(),
            process_id,
            order,
            ..Default::default()
        });
        id
    }

    /// Make `list_subprocesses_by_process(process_id)` fail with a 500.
    pub fn fail_children_of(&self, process_id: i64) {
        self.state.lock().unwrap().failing_children.insert(process_id);
    }

    /// Make `list_departments` fail with a 500.
    pub fn fail_department_list(&self) {
        self.state.lock().unwrap().fail_department_list = true;
    }

    /// Rename a process on the "server" side.
    pub fn rename_process(&self, id: i64, name: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(p) = state.processes.iter_mut().find(|p| p.id == id) {
            p.name = name.to_string();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn subprocess(&self, id: i64) -> Option<SubProcess> {
        self.state.lock().unwrap().subprocesses.iter().find(|s| s.id == id).cloned()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl DepartmentService for FakeBackend {
    async fn list_departments(&self) -> Result<Vec<Department>> {
        self.record("GET /departments".to_string());
        let state = self.state.lock().unwrap();
        if state.fail_department_list {
            return Err(AppError::Api {
                status: 500,
                message: "Error: 500 Internal Server Error".to_string(),
            });
        }
        Ok(state.departments.clone())
    }

    async fn get_department(&self, id: i64) -> Result<Department> {
        self.record(format!("GET /departments/{id}"));
        let state = self.state.lock().unwrap();
        state.departments.iter().find(|d| d.id == id).cloned().ok_or_else(not_found)
    }

    async fn create_department(&self, data: &CreateDepartment) -> Result<Department> {
        self.record("POST /departments".to_string());
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state);
        let dept = Department {
            id,
            name: data.name.clone(),
            description: data.description.clone(),
            ..Default::default()
        };
        state.departments.push(dept.clone());
        Ok(dept)
    }

    async fn update_department(&self, id: i64, data: &UpdateDepartment) -> Result<Department> {
        self.record(format!("PUT /departments/{id}"));
        let mut state = self.state.lock().unwrap();
        let dept = state.departments.iter_mut().find(|d| d.id == id).ok_or_else(not_found)?;
        if let Some(name) = &data.name {
            dept.name = name.clone();
        }
        if data.description.is_some() {
            dept.description = data.description.clone();
        }
        Ok(dept.clone())
    }

    async fn delete_department(&self, id: i64) -> Result<()> {
        self.record(format!("DELETE /departments/{id}"));
        self.state.lock().unwrap().departments.retain(|d| d.id != id);
        Ok(())
    }
}

#[async_trait]
impl ProcessService for FakeBackend {
    async fn list_processes(&self) -> Result<Vec<Process>> {
        self.record("GET /processes".to_string());
        Ok(self.state.lock().unwrap().processes.clone())
    }

    async fn get_process(&self, id: i64) -> Result<Process> {
        self.record(format!("GET /processes/{id}"));
        let state = self.state.lock().unwrap();
        state.processes.iter().find(|p| p.id == id).cloned().ok_or_else(not_found)
    }

    async fn list_processes_by_department(&self, department_id: i64) -> Result<Vec<Process>> {
        self.record(format!("GET /processes/department/{department_id}"));
        let state = self.state.lock().unwrap();
        Ok(state
            .processes
            .iter()
            .filter(|p| p.department_id == department_id)
            .cloned()
            .collect())
    }

    async fn create_process(&self, data: &CreateProcess) -> Result<Process> {
        self.record("POST /processes".to_string());
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state);
        let process = Process {
            id,
            name: data.name.clone(),
            description: data.description.clone(),
            department_id: data.department_id,
            tools: data.tools.clone().unwrap_or_default(),
            responsibles: data.responsibles.clone().unwrap_or_default(),
            documentation: data.documentation.clone().unwrap_or_default(),
            ..Default::default()
        };
        state.processes.push(process.clone());
        Ok(process)
    }

    async fn update_process(&self, id: i64, data: &UpdateProcess) -> Result<Process> {
        self.record(format!("PUT /processes/{id}"));
        let mut state = self.state.lock().unwrap();
        let process = state.processes.iter_mut().find(|p| p.id == id).ok_or_else(not_found)?;
        if let Some(name) = &data.name {
            process.name = name.clone();
        }
        if let Some(department_id) = data.department_id {
            process.department_id = department_id;
        }
        if let Some(tools) = &data.tools {
            process.tools = tools.clone();
        }
        Ok(process.clone())
    }

    async fn delete_process(&self, id: i64) -> Result<()> {
        self.record(format!("DELETE /processes/{id}"));
        self.state.lock().unwrap().processes.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl SubProcessService for FakeBackend {
    async fn list_subprocesses(&self) -> Result<Vec<SubProcess>> {
        self.record("GET /subprocesses".to_string());
        Ok(self.state.lock().unwrap().subprocesses.clone())
    }

    async fn get_subprocess(&self, id: i64) -> Result<SubProcess> {
        self.record(format!("GET /subprocesses/{id}"));
        let state = self.state.lock().unwrap();
        state.subprocesses.iter().find(|s| s.id == id).cloned().ok_or_else(not_found)
    }

    async fn list_subprocesses_by_process(&self, process_id: i64) -> Result<Vec<SubProcess>> {
        self.record(format!("GET /subprocesses/process/{process_id}"));
        let state = self.state.lock().unwrap();
        if state.failing_children.contains(&process_id) {
            return Err(AppError::Api {
                status: 500,
                message: "Error: 500 Internal Server Error".to_string(),
            });
        }
        Ok(state
            .subprocesses
            .iter()
            .filter(|s| s.process_id == process_id)
            .cloned()
            .collect())
    }

    async fn create_subprocess(&self, data: &CreateSubProcess) -> Result<SubProcess> {
        self.record("POST /subprocesses".to_string());
        let mut state = self.state.lock().unwrap();
        let id = Self::next_id(&mut state);
        let sub = SubProcess {
            id,
            name: data.name.clone(),
            description: data.description.clone(),
            process_id: data.process_id,
            order: data.order,
            ..Default::default()
        };
        state.subprocesses.push(sub.clone());
        Ok(sub)
    }

    async fn update_subprocess(&self, id: i64, data: &UpdateSubProcess) -> Result<SubProcess> {
        self.record(format!("PUT /subprocesses/{id}"));
        let mut state = self.state.lock().unwrap();
        let sub = state.subprocesses.iter_mut().find(|s| s.id == id).ok_or_else(not_found)?;
        if let Some(name) = &data.name {
            sub.name = name.clone();
        }
        if let Some(process_id) = data.process_id {
            sub.process_id = process_id;
        }
        if let Some(order) = data.order {
            sub.order = Some(order);
        }
        Ok(sub.clone())
    }

    async fn delete_subprocess(&self, id: i64) -> Result<()> {
        self.record(format!("DELETE /subprocesses/{id}"));
        self.state.lock().unwrap().subprocesses.retain(|s| s.id != id);
        Ok(())
    }
}
