//! Async actions dispatched by components.

use std::future::Future;

use api_client::{ApiClient, GlooTransport};
use core_types::{Credentials, SliceKind, TaskStatus};
use store::{Action, SliceAction, run_thunk};
use wasm_bindgen_futures::spawn_local;

use crate::context::AppContext;

type Client = ApiClient<GlooTransport>;

fn spawn_thunk<T, F, Fut>(
    ctx: &AppContext,
    slice: SliceKind,
    wrap: fn(SliceAction<T>) -> Action,
    call: F,
) where
    T: 'static,
    F: FnOnce(Client) -> Fut + 'static,
    Fut: Future<Output = api_client::Result<T>> + 'static,
{
    let client = ctx.client();
    let dispatcher = ctx.store.dispatcher();
    let issuer = ctx.issuer.clone();

    spawn_local(async move {
        run_thunk(
            &issuer,
            slice,
            move |action| dispatcher.dispatch(action),
            wrap,
            call(client),
        )
        .await;
    });
}

pub fn login(ctx: &AppContext, credentials: Credentials) {
    spawn_thunk(ctx, SliceKind::Auth, Action::Auth, move |client| async move {
        client.login(&credentials).await
    });
}

pub fn logout(ctx: &AppContext) {
    ctx.store.dispatch(Action::Logout);
}

pub fn load_invoices(ctx: &AppContext) {
    spawn_thunk(ctx, SliceKind::Invoices, Action::Invoices, |client| async move {
        client.list_invoices().await
    });
}

pub fn load_workers(ctx: &AppContext) {
    spawn_thunk(ctx, SliceKind::Workers, Action::Workers, |client| async move {
        client.list_workers().await
    });
}

pub fn load_projects(ctx: &AppContext) {
    spawn_thunk(ctx, SliceKind::Projects, Action::Projects, |client| async move {
        client.list_projects().await
    });
}

pub fn load_specializations(ctx: &AppContext) {
    spawn_thunk(
        ctx,
        SliceKind::Specializations,
        Action::Specializations,
        |client| async move { client.list_specializations().await },
    );
}

pub fn load_tasks(ctx: &AppContext) {
    spawn_thunk(ctx, SliceKind::Tasks, Action::Tasks, |client| async move {
        client.list_tasks().await
    });
}

/// Change a task's status, then reload the task list under the same request.
pub fn set_task_status(ctx: &AppContext, id: u64, status: TaskStatus) {
    spawn_thunk(ctx, SliceKind::Tasks, Action::Tasks, move |client| async move {
        client.update_task_status(id, status).await?;
        client.list_tasks().await
    });
}

/// Fetch every resource shown on the dashboard.
pub fn load_dashboard(ctx: &AppContext) {
    load_invoices(ctx);
    load_workers(ctx);
    load_projects(ctx);
    load_specializations(ctx);
    load_tasks(ctx);
}
