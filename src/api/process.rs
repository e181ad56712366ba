//! Process resource client.

use super::ApiClient;
use crate::error::Result;
use crate::models::{CreateProcess, Process, UpdateProcess};

const BASE_PATH: &str = "/processes";

/// Typed access to `/processes`.
#[derive(Clone, Debug)]
pub struct ProcessClient {
    api: ApiClient,
}

impl ProcessClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Process>> {
        self.api.get(BASE_PATH).await
    }

    pub async fn get(&self, id: i64) -> Result<Process> {
        self.api.get(&format!("{BASE_PATH}/{id}")).await
    }

    /// Processes owned by one department (`/processes/department/{id}`).
    pub async fn list_by_department(&self, department_id: i64) -> Result<Vec<Process>> {
        self.api.get(&format!("{BASE_PATH}/department/{department_id}")).await
    }

    pub async fn create(&self, data: &CreateProcess) -> Result<Process> {
        self.api.post(BASE_PATH, data).await
    }

    pub async fn update(&self, id: i64, data: &UpdateProcess) -> Result<Process> {
        self.api.put(&format!("{BASE_PATH}/{id}"), data).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("{BASE_PATH}/{id}")).await
    }
}
