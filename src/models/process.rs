//! Process entity and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Department, SubProcess, null_as_default};

/// Process as returned by the API.
///
/// `tools`, `responsibles` and `documentation` keep insertion order; a missing
/// or `null` list decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub department_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tools: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responsibles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documentation: Vec<String>,
    /// Hydrated child list; `None` until fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_processes: Option<Vec<SubProcess>>,
    #[serde(default, with = "super::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "super::timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Process {
    /// Name of the owning department, if the API embedded it.
    pub fn department_name(&self) -> Option<&str> {
        self.department.as_ref().map(|d| d.name.as_str())
    }

    /// Hydrated subprocesses, or an empty slice.
    pub fn subprocesses(&self) -> &[SubProcess] {
        self.sub_processes.as_deref().unwrap_or_default()
    }
}

/// DTO for creating a process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcess {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub department_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Vec<String>>,
}

/// DTO for updating a process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProcess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Vec<String>>,
}
