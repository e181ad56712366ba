//! Department entity and DTOs for create and update operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Department as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "super::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "super::timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// DTO for creating a department.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartment {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// DTO for updating a department.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_department() {
        let dept: Department = serde_json::from_str(r#"{"id":1,"name":"Finance"}"#).unwrap();
        assert_eq!(dept.id, 1);
        assert_eq!(dept.name, "Finance");
        assert!(dept.description.is_none());
        assert!(dept.created_at.is_none());
    }

    #[test]
    fn test_decode_with_timestamps() {
        let dept: Department = serde_json::from_str(
            r#"{"id":2,"name":"HR","description":null,"createdAt":"2024-01-02T03:04:05","updatedAt":"not a date"}"#,
        )
        .unwrap();
        assert!(dept.created_at.is_some());
        assert!(dept.updated_at.is_none());
    }

    #[test]
    fn test_update_omits_unset_fields() {
        let update = UpdateDepartment {
            name: Some("Finance Ops".to_string()),
            description: None,
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"name":"Finance Ops"}"#);
    }
}
