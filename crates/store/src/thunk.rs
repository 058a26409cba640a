//! Async actions: dispatch, call the backend, settle.

use api_client::ApiError;
use core_types::SliceKind;
use std::future::Future;

use crate::{Action, RequestIssuer, SliceAction};

/// Run one backend request against a slice.
///
/// Dispatches `Pending` with a fresh ticket, awaits `request`, then
/// dispatches `Settled` with the data or the error message. The slice
/// drops the settlement if a newer request was dispatched meanwhile.
/// Returns whether the request succeeded.
pub async fn run_thunk<T, Fut, D, W>(
    issuer: &RequestIssuer,
    slice: SliceKind,
    dispatch: D,
    wrap: W,
    request: Fut,
) -> bool
where
    Fut: Future<Output = Result<T, ApiError>>,
    D: Fn(Action),
    W: Fn(SliceAction<T>) -> Action,
{
    let ticket = issuer.issue(slice);
    dispatch(wrap(SliceAction::Pending(ticket)));

    let outcome = request.await.map_err(|e| {
        log::warn!("{} request failed: {}", slice.name(), e);
        e.to_string()
    });
    let succeeded = outcome.is_ok();

    dispatch(wrap(SliceAction::Settled(ticket, outcome)));
    succeeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppStore;
    use core_types::{Project, Task, TaskStatus};
    use futures::channel::oneshot;
    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn project(id: u64) -> Project {
        Project {
            id,
            name: format!("Project {}", id),
            client_name: "Acme".to_string(),
            starts_on: None,
            ends_on: None,
            active: true,
        }
    }

    fn task(id: u64) -> Task {
        Task {
            id,
            project_id: 1,
            worker_id: Some(4),
            title: "Morning shift".to_string(),
            status: TaskStatus::InProgress,
            started_at: Some("2025-07-01 07:00:00".to_string()),
            ended_at: None,
        }
    }

    #[test]
    fn test_thunk_success_fills_slice() {
        let issuer = RequestIssuer::new();
        let store = RefCell::new(AppStore::new());
        let seen_loading = RefCell::new(false);

        let ok = block_on(run_thunk(
            &issuer,
            SliceKind::Projects,
            |action| {
                store.borrow_mut().apply(action);
                if store.borrow().projects().loading {
                    *seen_loading.borrow_mut() = true;
                }
            },
            Action::Projects,
            async { Ok(vec![project(1), project(2)]) },
        ));

        assert!(ok);
        assert!(*seen_loading.borrow());
        let store = store.borrow();
        assert!(!store.projects().loading);
        assert_eq!(store.projects().data.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_thunk_failure_stores_message() {
        let issuer = RequestIssuer::new();
        let store = RefCell::new(AppStore::new());

        let ok = block_on(run_thunk(
            &issuer,
            SliceKind::Projects,
            |action| {
                store.borrow_mut().apply(action);
            },
            Action::Projects,
            async { Err::<Vec<Project>, _>(ApiError::Network("offline".to_string())) },
        ));

        assert!(!ok);
        let store = store.borrow();
        assert!(!store.projects().loading);
        assert_eq!(store.error(SliceKind::Projects), Some("Network error: offline"));
    }

    #[test]
    fn test_superseded_thunk_does_not_overwrite() {
        let issuer = RequestIssuer::new();
        let store = Rc::new(RefCell::new(AppStore::new()));
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();

        let (first_tx, first_rx) = oneshot::channel::<Result<Vec<Task>, ApiError>>();
        let (second_tx, second_rx) = oneshot::channel::<Result<Vec<Task>, ApiError>>();

        for rx in [first_rx, second_rx] {
            let issuer = issuer.clone();
            let store = Rc::clone(&store);
            spawner
                .spawn_local(async move {
                    run_thunk(
                        &issuer,
                        SliceKind::Tasks,
                        |action| {
                            store.borrow_mut().apply(action);
                        },
                        Action::Tasks,
                        async move {
                            rx.await
                                .unwrap_or_else(|_| Err(ApiError::Network("dropped".into())))
                        },
                    )
                    .await;
                })
                .unwrap();
            pool.run_until_stalled();
        }

        assert!(store.borrow().tasks().loading);

        second_tx.send(Ok(vec![task(2)])).unwrap();
        pool.run_until_stalled();
        assert!(!store.borrow().tasks().loading);

        first_tx.send(Ok(vec![task(1)])).unwrap();
        pool.run_until_stalled();

        let store = store.borrow();
        let tasks = store.tasks().data.as_ref().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 2);
    }
}
