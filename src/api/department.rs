//! Department resource client.

use super::ApiClient;
use crate::error::Result;
use crate::models::{CreateDepartment, Department, UpdateDepartment};

const BASE_PATH: &str = "/departments";

/// Typed access to `/departments`.
#[derive(Clone, Debug)]
pub struct DepartmentClient {
    api: ApiClient,
}

impl DepartmentClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List all departments.
    pub async fn list(&self) -> Result<Vec<Department>> {
        self.api.get(BASE_PATH).await
    }

    /// Get department by ID.
    pub async fn get(&self, id: i64) -> Result<Department> {
        self.api.get(&format!("{BASE_PATH}/{id}")).await
    }

    /// Create a new department.
    pub async fn create(&self, data: &CreateDepartment) -> Result<Department> {
        self.api.post(BASE_PATH, data).await
    }

    /// Update an existing department.
    pub async fn update(&self, id: i64, data: &UpdateDepartment) -> Result<Department> {
        self.api.put(&format!("{BASE_PATH}/{id}"), data).await
    }

    /// Delete a department. Dependents are handled by the server.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("{BASE_PATH}/{id}")).await
    }
}
