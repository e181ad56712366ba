//! Per-page view-models and the request workflows that feed them.
//!
//! Page state lives on the UI thread. Workflows are plain async functions
//! generic over the service traits; the UI runs them on the runtime and hands
//! the results back with the ticket they were started under.

pub mod departments;
pub mod processes;
pub mod subprocesses;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};

/// Identifies one load of a page. Results carrying an older ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadTicket(u64);

/// Loading flag plus the bookkeeping needed to drop superseded loads.
#[derive(Debug, Default)]
pub struct LoadState {
    pub loading: bool,
    current: u64,
    cancel: Option<CancellationToken>,
}

impl LoadState {
    /// Start a load, cancelling whichever one was running.
    pub fn begin(&mut self) -> (LoadTicket, CancellationToken) {
        self.cancel_running();
        self.current += 1;
        self.loading = true;
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        (LoadTicket(self.current), token)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.current
    }

    /// End the load identified by `ticket`. Returns `false` for stale tickets,
    /// which leave the state alone.
    pub fn finish(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loading = false;
        self.cancel = None;
        true
    }

    /// Cancel the running load, if any, and leave loading state.
    pub fn cancel_running(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.loading = false;
    }
}

/// Run `fut` unless `token` fires first.
pub async fn cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::Cancelled),
        result = fut => result,
    }
}

/// Entity awaiting delete confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteTarget {
    pub id: i64,
    pub name: String,
}

/// Delete confirmation dialog state.
#[derive(Debug, Default, Clone)]
pub struct DeleteConfirm {
    pub target: Option<DeleteTarget>,
    pub deleting: bool,
}

impl DeleteConfirm {
    pub fn open(&mut self, id: i64, name: &str) {
        self.target = Some(DeleteTarget {
            id,
            name: name.to_string(),
        });
        self.deleting = false;
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    /// Mark the delete in flight and return the target id.
    pub fn begin(&mut self) -> Option<i64> {
        if self.deleting {
            return None;
        }
        let id = self.target.as_ref()?.id;
        self.deleting = true;
        Some(id)
    }

    /// Success closes the dialog; failure keeps it open for another try.
    pub fn finish(&mut self, success: bool) {
        self.deleting = false;
        if success {
            self.target = None;
        }
    }

    pub fn close(&mut self) {
        if !self.deleting {
            self.target = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_load_supersedes_previous() {
        let mut state = LoadState::default();
        let (first, first_token) = state.begin();
        let (second, second_token) = state.begin();

        assert!(first_token.is_cancelled());
        assert!(!second_token.is_cancelled());
        assert!(!state.is_current(first));

        assert!(!state.finish(first));
        assert!(state.loading);

        assert!(state.finish(second));
        assert!(!state.loading);
    }

    #[test]
    fn test_cancel_running_clears_loading() {
        let mut state = LoadState::default();
        let (_, token) = state.begin();
        state.cancel_running();
        assert!(token.is_cancelled());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_cancelled_future_is_not_polled() {
        let token = CancellationToken::new();
        token.cancel();
        let mut polled = false;
        let result = cancellable(&token, async {
            polled = true;
            Ok(1)
        })
        .await;
        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(!polled);
    }

    #[tokio::test]
    async fn test_uncancelled_future_completes() {
        let token = CancellationToken::new();
        assert_eq!(cancellable(&token, async { Ok(7) }).await.unwrap(), 7);
    }

    #[test]
    fn test_delete_confirm_lifecycle() {
        let mut confirm = DeleteConfirm::default();
        assert_eq!(confirm.begin(), None);

        confirm.open(3, "Finance");
        assert!(confirm.is_open());
        assert_eq!(confirm.begin(), Some(3));
        assert_eq!(confirm.begin(), None);

        confirm.close();
        assert!(confirm.is_open());

        confirm.finish(false);
        assert!(confirm.is_open());
        assert!(!confirm.deleting);

        confirm.begin();
        confirm.finish(true);
        assert!(!confirm.is_open());
    }
}
