//! Departments page.

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{DeleteConfirm, LoadState, LoadTicket, cancellable};
use crate::api::DepartmentService;
use crate::error::Result;
use crate::forms::{DepartmentDraft, FormDialog, Submission};
use crate::models::{CreateDepartment, Department, UpdateDepartment};

#[derive(Debug, Default)]
pub struct DepartmentsPage {
    pub departments: Vec<Department>,
    pub load: LoadState,
    pub dialog: FormDialog<DepartmentDraft>,
    pub delete: DeleteConfirm,
}

impl DepartmentsPage {
    pub fn is_loading(&self) -> bool {
        self.load.loading
    }

    pub fn begin_load(&mut self) -> (LoadTicket, CancellationToken) {
        self.load.begin()
    }

    /// Replace the list if `ticket` is still current.
    pub fn apply_departments(&mut self, ticket: LoadTicket, departments: Vec<Department>) -> bool {
        if !self.load.finish(ticket) {
            return false;
        }
        self.departments = departments;
        true
    }

    /// Leave loading state, keeping whatever was shown before.
    pub fn fail_load(&mut self, ticket: LoadTicket) {
        self.load.finish(ticket);
    }

    pub fn open_new(&mut self) {
        self.dialog.open_new(DepartmentDraft::default());
    }

    pub fn open_edit(&mut self, dept: &Department) {
        self.dialog.open_edit(dept.id, DepartmentDraft::from(dept));
    }

    pub fn confirm_delete(&mut self, dept: &Department) {
        self.delete.open(dept.id, &dept.name);
    }
}

pub async fn fetch<B>(api: &B, cancel: &CancellationToken) -> Result<Vec<Department>>
where
    B: DepartmentService + ?Sized,
{
    cancellable(cancel, api.list_departments()).await
}

pub async fn save<B>(api: &B, submission: Submission<CreateDepartment, UpdateDepartment>) -> Result<Department>
where
    B: DepartmentService + ?Sized,
{
    let dept = match submission {
        Submission::Create(data) => api.create_department(&data).await?,
        Submission::Update { id, data } => api.update_department(id, &data).await?,
    };
    info!("Saved department {} ({})", dept.id, dept.name);
    Ok(dept)
}

pub async fn delete<B>(api: &B, id: i64) -> Result<()>
where
    B: DepartmentService + ?Sized,
{
    api.delete_department(id).await?;
    info!("Deleted department {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::error::AppError;
    use crate::forms::Draft;

    async fn reload(page: &mut DepartmentsPage, api: &FakeBackend) {
        let (ticket, token) = page.begin_load();
        let departments = fetch(api, &token).await.unwrap();
        assert!(page.apply_departments(ticket, departments));
    }

    #[tokio::test]
    async fn test_department_crud_through_dialog() {
        let api = FakeBackend::new();
        let mut page = DepartmentsPage::default();

        page.open_new();
        page.dialog.draft.name = "Finance".to_string();
        assert!(page.dialog.submit(|s| save(&api, s)).await);
        reload(&mut page, &api).await;
        assert_eq!(page.departments.len(), 1);
        assert_eq!(page.departments[0].name, "Finance");

        let dept = page.departments[0].clone();
        page.open_edit(&dept);
        page.dialog.draft.name = "Finance Ops".to_string();
        assert!(page.dialog.submit(|s| save(&api, s)).await);
        assert_eq!(api.get_department(dept.id).await.unwrap().name, "Finance Ops");

        page.confirm_delete(&dept);
        let id = page.delete.begin().unwrap();
        delete(&api, id).await.unwrap();
        page.delete.finish(true);
        reload(&mut page, &api).await;
        assert!(page.departments.iter().all(|d| d.id != dept.id));
        assert_eq!(api.call_count("DELETE /departments"), 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_list() {
        let api = FakeBackend::new();
        api.add_department("Finance");
        let mut page = DepartmentsPage::default();
        reload(&mut page, &api).await;

        api.fail_department_list();
        let (ticket, token) = page.begin_load();
        assert!(page.is_loading());
        let err = fetch(&api, &token).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        page.fail_load(ticket);

        assert!(!page.is_loading());
        assert_eq!(page.departments.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped() {
        let api = FakeBackend::new();
        api.add_department("Finance");
        let mut page = DepartmentsPage::default();

        let (old, old_token) = page.begin_load();
        let (new, _) = page.begin_load();
        assert!(old_token.is_cancelled());

        assert!(!page.apply_departments(old, vec![Department::default()]));
        assert!(page.departments.is_empty());
        assert!(page.is_loading());

        let fresh = api.list_departments().await.unwrap();
        assert!(page.apply_departments(new, fresh));
        assert_eq!(page.departments[0].name, "Finance");
    }

    #[test]
    fn test_blank_name_blocks_save() {
        let mut page = DepartmentsPage::default();
        page.open_new();
        page.dialog.draft.name = "  ".to_string();
        assert!(!page.dialog.draft.is_complete());
        match page.dialog.begin_submit() {
            Err(AppError::Validation(message)) => assert_eq!(message, "Name is required"),
            other => panic!("unexpected submission: {other:?}"),
        }
        assert!(!page.dialog.submitting);
    }
}
