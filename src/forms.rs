//! Dialog drafts for creating and editing entities.
//!
//! A [`FormDialog`] owns one draft and the submit lifecycle: submission is
//! refused while a required field is empty or a previous submission is still
//! in flight, and the dialog only closes once the handler reports success.

use std::future::Future;

use tracing::{error, warn};

use crate::error::{AppError, Result};
use crate::models::{
    CreateDepartment, CreateProcess, CreateSubProcess, Department, Process, SubProcess, UpdateDepartment,
    UpdateProcess, UpdateSubProcess,
};

/// Editable copy of an entity's fields.
pub trait Draft: Default {
    type Create;
    type Update;

    /// Label of the first required field that is still empty.
    fn missing_field(&self) -> Option<&'static str>;

    fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    fn to_create(&self) -> Self::Create;

    fn to_update(&self) -> Self::Update;
}

/// What a dialog submits.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<C, U> {
    Create(C),
    Update { id: i64, data: U },
}

/// Dialog state around a draft.
#[derive(Debug, Default, Clone)]
pub struct FormDialog<D> {
    pub is_open: bool,
    /// Entity being edited; `None` when creating.
    pub editing: Option<i64>,
    pub submitting: bool,
    pub draft: D,
}

impl<D: Draft> FormDialog<D> {
    /// Open for a new entity with a freshly built draft.
    pub fn open_new(&mut self, draft: D) {
        *self = Self {
            is_open: true,
            editing: None,
            submitting: false,
            draft,
        };
    }

    /// Open for editing entity `id`, seeded with `draft`.
    pub fn open_edit(&mut self, id: i64, draft: D) {
        *self = Self {
            is_open: true,
            editing: Some(id),
            submitting: false,
            draft,
        };
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Close without submitting.
    pub fn close(&mut self) {
        self.is_open = false;
        self.submitting = false;
    }

    pub fn can_submit(&self) -> bool {
        self.is_open && !self.submitting && self.draft.is_complete()
    }

    /// Take the payload and mark the submission in flight.
    ///
    /// Fails with [`AppError::Validation`], with no state change, when the
    /// dialog is closed, already submitting or missing a required field.
    pub fn begin_submit(&mut self) -> Result<Submission<D::Create, D::Update>> {
        if !self.is_open {
            return Err(AppError::validation("dialog is not open"));
        }
        if self.submitting {
            return Err(AppError::validation("a save is already in progress"));
        }
        if let Some(field) = self.draft.missing_field() {
            return Err(AppError::validation(format!("{field} is required")));
        }
        self.submitting = true;
        Ok(match self.editing {
            Some(id) => Submission::Update {
                id,
                data: self.draft.to_update(),
            },
            None => Submission::Create(self.draft.to_create()),
        })
    }

    /// Record the handler's outcome. Returns `true` when the dialog closed.
    ///
    /// On failure the dialog stays open with the draft untouched.
    pub fn finish_submit(&mut self, outcome: std::result::Result<(), String>) -> bool {
        self.submitting = false;
        match outcome {
            Ok(()) => {
                self.is_open = false;
                true
            }
            Err(e) => {
                error!("Error submitting form: {e}");
                false
            }
        }
    }

    /// Run a complete submission through `handler`.
    ///
    /// The handler is never called when [`Self::begin_submit`] refuses.
    pub async fn submit<F, Fut, T>(&mut self, handler: F) -> bool
    where
        F: FnOnce(Submission<D::Create, D::Update>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let submission = match self.begin_submit() {
            Ok(submission) => submission,
            Err(e) => {
                warn!("Form not submitted: {e}");
                return false;
            }
        };
        let outcome = handler(submission).await.map(|_| ()).map_err(|e| e.to_string());
        self.finish_submit(outcome)
    }
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Ordered list of strings edited one entry at a time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListField {
    pub items: Vec<String>,
    /// Text typed but not yet added.
    pub input: String,
}

impl ListField {
    pub fn from_items(items: &[String]) -> Self {
        Self {
            items: items.to_vec(),
            input: String::new(),
        }
    }

    /// Append the trimmed input. Blank input is rejected and kept as typed.
    pub fn add(&mut self) -> bool {
        let value = self.input.trim();
        if value.is_empty() {
            return false;
        }
        self.items.push(value.to_string());
        self.input.clear();
        true
    }

    /// Remove the entry at `index`; out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }
}

/// Department dialog draft.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DepartmentDraft {
    pub name: String,
    pub description: String,
}

impl From<&Department> for DepartmentDraft {
    fn from(dept: &Department) -> Self {
        Self {
            name: dept.name.clone(),
            description: dept.description.clone().unwrap_or_default(),
        }
    }
}

impl Draft for DepartmentDraft {
    type Create = CreateDepartment;
    type Update = UpdateDepartment;

    fn missing_field(&self) -> Option<&'static str> {
        self.name.trim().is_empty().then_some("Name")
    }

    fn to_create(&self) -> CreateDepartment {
        CreateDepartment {
            name: self.name.trim().to_string(),
            description: optional_text(&self.description),
        }
    }

    fn to_update(&self) -> UpdateDepartment {
        UpdateDepartment {
            name: Some(self.name.trim().to_string()),
            description: Some(self.description.trim().to_string()),
        }
    }
}

/// Process dialog draft.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessDraft {
    pub name: String,
    pub description: String,
    /// 0 means no department selected.
    pub department_id: i64,
    pub tools: ListField,
    pub responsibles: ListField,
    pub documentation: ListField,
}

impl ProcessDraft {
    /// Empty draft defaulting to the first available department.
    pub fn new_for(departments: &[Department]) -> Self {
        Self {
            department_id: departments.first().map(|d| d.id).unwrap_or(0),
            ..Default::default()
        }
    }
}

impl From<&Process> for ProcessDraft {
    fn from(process: &Process) -> Self {
        Self {
            name: process.name.clone(),
            description: process.description.clone().unwrap_or_default(),
            department_id: process.department_id,
            tools: ListField::from_items(&process.tools),
            responsibles: ListField::from_items(&process.responsibles),
            documentation: ListField::from_items(&process.documentation),
        }
    }
}

impl Draft for ProcessDraft {
    type Create = CreateProcess;
    type Update = UpdateProcess;

    fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("Name")
        } else if self.department_id <= 0 {
            Some("Department")
        } else {
            None
        }
    }

    fn to_create(&self) -> CreateProcess {
        CreateProcess {
            name: self.name.trim().to_string(),
            description: optional_text(&self.description),
            department_id: self.department_id,
            tools: Some(self.tools.items.clone()),
            responsibles: Some(self.responsibles.items.clone()),
            documentation: Some(self.documentation.items.clone()),
        }
    }

    fn to_update(&self) -> UpdateProcess {
        UpdateProcess {
            name: Some(self.name.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            department_id: Some(self.department_id),
            tools: Some(self.tools.items.clone()),
            responsibles: Some(self.responsibles.items.clone()),
            documentation: Some(self.documentation.items.clone()),
        }
    }
}

/// SubProcess dialog draft.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubProcessDraft {
    pub name: String,
    pub description: String,
    /// 0 means no process selected.
    pub process_id: i64,
    pub order: i32,
    /// Process chosen by the caller and not editable.
    pub process_locked: bool,
}

impl SubProcessDraft {
    /// Empty draft for `preselected`, else the first available process.
    pub fn new_for(processes: &[Process], preselected: Option<i64>) -> Self {
        Self {
            process_id: preselected.or_else(|| processes.first().map(|p| p.id)).unwrap_or(0),
            process_locked: preselected.is_some(),
            ..Default::default()
        }
    }
}

impl From<&SubProcess> for SubProcessDraft {
    fn from(sub: &SubProcess) -> Self {
        Self {
            name: sub.name.clone(),
            description: sub.description.clone().unwrap_or_default(),
            process_id: sub.process_id,
            order: sub.effective_order(),
            process_locked: false,
        }
    }
}

impl Draft for SubProcessDraft {
    type Create = CreateSubProcess;
    type Update = UpdateSubProcess;

    fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("Name")
        } else if self.process_id <= 0 {
            Some("Process")
        } else {
            None
        }
    }

    fn to_create(&self) -> CreateSubProcess {
        CreateSubProcess {
            name: self.name.trim().to_string(),
            description: optional_text(&self.description),
            process_id: self.process_id,
            order: Some(self.order),
        }
    }

    fn to_update(&self) -> UpdateSubProcess {
        UpdateSubProcess {
            name: Some(self.name.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            process_id: Some(self.process_id),
            order: Some(self.order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::cell::Cell;

    fn departments() -> Vec<Department> {
        vec![
            Department {
                id: 4,
                name: "Finance".to_string(),
                ..Default::default()
            },
            Department {
                id: 9,
                name: "HR".to_string(),
                ..Default::default()
            },
        ]
    }

    #[tokio::test]
    async fn test_empty_name_never_calls_handler() {
        let calls = Cell::new(0);
        let mut dialog = FormDialog::<DepartmentDraft>::default();
        dialog.open_new(DepartmentDraft::default());
        dialog.draft.name = "   ".to_string();

        let closed = dialog
            .submit(|_| {
                calls.set(calls.get() + 1);
                async { Ok(()) }
            })
            .await;

        assert!(!closed);
        assert_eq!(calls.get(), 0);
        assert!(dialog.is_open);
        assert!(!dialog.submitting);
    }

    #[tokio::test]
    async fn test_missing_parent_never_calls_handler() {
        let calls = Cell::new(0);
        let mut dialog = FormDialog::<ProcessDraft>::default();
        dialog.open_new(ProcessDraft::new_for(&[]));
        dialog.draft.name = "Payroll".to_string();
        assert_eq!(dialog.draft.department_id, 0);

        dialog
            .submit(|_| {
                calls.set(calls.get() + 1);
                async { Ok(()) }
            })
            .await;
        assert_eq!(calls.get(), 0);

        let mut dialog = FormDialog::<SubProcessDraft>::default();
        dialog.open_new(SubProcessDraft::new_for(&[], None));
        dialog.draft.name = "Collect".to_string();
        dialog
            .submit(|_| {
                calls.set(calls.get() + 1);
                async { Ok(()) }
            })
            .await;
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_success_closes_dialog() {
        let mut dialog = FormDialog::<DepartmentDraft>::default();
        dialog.open_new(DepartmentDraft::default());
        dialog.draft.name = " Finance ".to_string();

        let mut seen = None;
        let closed = dialog
            .submit(|submission| {
                seen = Some(submission);
                async { Ok(()) }
            })
            .await;

        assert!(closed);
        assert!(!dialog.is_open);
        assert_eq!(
            seen,
            Some(Submission::Create(CreateDepartment {
                name: "Finance".to_string(),
                description: None,
            }))
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_dialog_and_draft() {
        let mut dialog = FormDialog::<DepartmentDraft>::default();
        dialog.open_new(DepartmentDraft::default());
        dialog.draft.name = "Finance".to_string();
        dialog.draft.description = "Money".to_string();

        let closed = dialog
            .submit(|_| async {
                Err::<(), _>(AppError::Api {
                    status: 500,
                    message: "boom".to_string(),
                })
            })
            .await;

        assert!(!closed);
        assert!(dialog.is_open);
        assert!(!dialog.submitting);
        assert_eq!(dialog.draft.name, "Finance");
        assert_eq!(dialog.draft.description, "Money");
    }

    #[test]
    fn test_in_flight_blocks_second_submit() {
        let mut dialog = FormDialog::<DepartmentDraft>::default();
        dialog.open_new(DepartmentDraft {
            name: "Finance".to_string(),
            description: String::new(),
        });

        assert!(dialog.begin_submit().is_ok());
        assert!(dialog.submitting);
        assert!(!dialog.can_submit());
        assert!(matches!(dialog.begin_submit(), Err(AppError::Validation(_))));

        assert!(!dialog.finish_submit(Err("timeout".to_string())));
        assert!(dialog.can_submit());
    }

    #[test]
    fn test_edit_produces_update_for_id() {
        let dept = Department {
            id: 12,
            name: "Finance".to_string(),
            description: None,
            ..Default::default()
        };
        let mut dialog = FormDialog::<DepartmentDraft>::default();
        dialog.open_edit(dept.id, DepartmentDraft::from(&dept));
        assert!(dialog.is_editing());
        assert_eq!(dialog.draft.description, "");

        dialog.draft.name = "Finance Ops".to_string();
        match dialog.begin_submit() {
            Ok(Submission::Update { id, data }) => {
                assert_eq!(id, 12);
                assert_eq!(data.name.as_deref(), Some("Finance Ops"));
                assert_eq!(data.description.as_deref(), Some(""));
            }
            other => panic!("unexpected submission: {other:?}"),
        }
    }

    #[test]
    fn test_open_new_resets_previous_edit() {
        let process = Process {
            id: 3,
            name: "Payroll".to_string(),
            department_id: 9,
            tools: vec!["Excel".to_string()],
            ..Default::default()
        };
        let mut dialog = FormDialog::<ProcessDraft>::default();
        dialog.open_edit(process.id, ProcessDraft::from(&process));
        assert_eq!(dialog.draft.tools.items, vec!["Excel"]);

        dialog.open_new(ProcessDraft::new_for(&departments()));
        assert!(!dialog.is_editing());
        assert_eq!(dialog.draft.name, "");
        assert_eq!(dialog.draft.department_id, 4);
        assert!(dialog.draft.tools.items.is_empty());
    }

    #[test]
    fn test_list_field_add_and_remove() {
        let mut field = ListField::default();

        field.input = "  Excel  ".to_string();
        assert!(field.add());
        assert_eq!(field.items, vec!["Excel"]);
        assert!(field.input.is_empty());

        field.input = "   ".to_string();
        assert!(!field.add());
        assert_eq!(field.items.len(), 1);

        field.input = "SAP".to_string();
        field.add();
        field.input = "Jira".to_string();
        field.add();
        field.remove(1);
        assert_eq!(field.items, vec!["Excel", "Jira"]);

        field.remove(10);
        assert_eq!(field.items.len(), 2);
    }

    #[test]
    fn test_list_fields_are_independent() {
        let mut draft = ProcessDraft::new_for(&departments());
        draft.tools.input = "Excel".to_string();
        draft.responsibles.input = "Ana".to_string();
        draft.tools.add();

        assert_eq!(draft.tools.items, vec!["Excel"]);
        assert!(draft.responsibles.items.is_empty());
        assert_eq!(draft.responsibles.input, "Ana");
        assert!(draft.documentation.items.is_empty());
    }

    #[test]
    fn test_process_create_payload() {
        let mut draft = ProcessDraft::new_for(&departments());
        draft.name = "Payroll".to_string();
        draft.documentation.input = "wiki/payroll".to_string();
        draft.documentation.add();

        let data = draft.to_create();
        assert_eq!(data.department_id, 4);
        assert_eq!(data.description, None);
        assert_eq!(data.documentation, Some(vec!["wiki/payroll".to_string()]));
        assert_eq!(data.tools, Some(vec![]));
    }

    #[test]
    fn test_subprocess_draft_preselection() {
        let processes = vec![
            Process {
                id: 5,
                name: "A".to_string(),
                ..Default::default()
            },
            Process {
                id: 6,
                name: "B".to_string(),
                ..Default::default()
            },
        ];

        let draft = SubProcessDraft::new_for(&processes, None);
        assert_eq!(draft.process_id, 5);
        assert!(!draft.process_locked);
        assert_eq!(draft.order, 0);

        let draft = SubProcessDraft::new_for(&processes, Some(6));
        assert_eq!(draft.process_id, 6);
        assert!(draft.process_locked);
    }

    #[test]
    fn test_subprocess_draft_from_entity_defaults_order() {
        let sub = SubProcess {
            id: 1,
            name: "Review".to_string(),
            process_id: 2,
            order: None,
            ..Default::default()
        };
        let draft = SubProcessDraft::from(&sub);
        assert_eq!(draft.order, 0);
        assert_eq!(draft.to_update().order, Some(0));
    }

    #[test]
    fn test_refused_submission_names_missing_field() {
        let mut dialog = FormDialog::<ProcessDraft>::default();
        assert!(matches!(dialog.begin_submit(), Err(AppError::Validation(_))));

        dialog.open_new(ProcessDraft {
            name: "Payroll".to_string(),
            ..Default::default()
        });
        match dialog.begin_submit() {
            Err(AppError::Validation(message)) => assert_eq!(message, "Department is required"),
            other => panic!("unexpected submission: {other:?}"),
        }
        assert!(!dialog.submitting);

        let mut dialog = FormDialog::<SubProcessDraft>::default();
        dialog.open_new(SubProcessDraft::default());
        match dialog.begin_submit() {
            Err(AppError::Validation(message)) => assert_eq!(message, "Name is required"),
            other => panic!("unexpected submission: {other:?}"),
        }
        dialog.draft.name = "Review".to_string();
        match dialog.begin_submit() {
            Err(AppError::Validation(message)) => assert_eq!(message, "Process is required"),
            other => panic!("unexpected submission: {other:?}"),
        }
    }
}
