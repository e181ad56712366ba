//! SubProcess resource client.

use super::ApiClient;
use crate::error::Result;
use crate::models::{CreateSubProcess, SubProcess, UpdateSubProcess};

const BASE_PATH: &str = "/subprocesses";

/// Typed access to `/subprocesses`.
#[derive(Clone, Debug)]
pub struct SubProcessClient {
    api: ApiClient,
}

impl SubProcessClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<SubProcess>> {
        self.api.get(BASE_PATH).await
    }

    pub async fn get(&self, id: i64) -> Result<SubProcess> {
        self.api.get(&format!("{BASE_PATH}/{id}")).await
    }

    /// Subprocesses of one process (`/subprocesses/process/{id}`), server order.
    pub async fn list_by_process(&self, process_id: i64) -> Result<Vec<SubProcess>> {
        self.api.get(&format!("{BASE_PATH}/process/{process_id}")).await
    }

    pub async fn create(&self, data: &CreateSubProcess) -> Result<SubProcess> {
        self.api.post(BASE_PATH, data).await
    }

    pub async fn update(&self, id: i64, data: &UpdateSubProcess) -> Result<SubProcess> {
        self.api.put(&format!("{BASE_PATH}/{id}"), data).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("{BASE_PATH}/{id}")).await
    }
}
