//! Tasks page component.

use core_types::{SliceKind, TaskStatus};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::{Loading, TaskRow};
use crate::context::use_app_context;
use crate::thunks;

/// Tasks page component.
#[function_component(TasksPage)]
pub fn tasks_page() -> Html {
    let ctx = use_app_context();
    let search = use_state(String::new);
    let live_only = use_state(|| false);

    {
        let ctx = ctx.clone();
        use_effect_with(ctx.store.token(), move |token| {
            if token.is_some() {
                thunks::load_tasks(&ctx);
            }
        });
    }

    let on_search_input = {
        let search = search.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
        })
    };

    let on_live_toggle = {
        let live_only = live_only.clone();
        Callback::from(move |_: Event| live_only.set(!*live_only))
    };

    let on_advance = {
        let ctx = ctx.clone();
        Callback::from(move |(id, status): (u64, TaskStatus)| {
            thunks::set_task_status(&ctx, id, status);
        })
    };

    let tasks = ctx.store.tasks();
    let loading = ctx.store.is_loading(SliceKind::Tasks);

    let needle = search.to_lowercase();
    let rows = tasks
        .data
        .iter()
        .flatten()
        .filter(|task| !*live_only || task.is_live())
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .map(|task| {
            html! { <TaskRow key={task.id} task={task.clone()} on_advance={on_advance.clone()} /> }
        })
        .collect::<Html>();

    html! {
        <div>
            <h1>{"Tasks"}</h1>

            <div class="filters">
                <input
                    type="text"
                    placeholder="Search tasks..."
                    value={(*search).clone()}
                    oninput={on_search_input}
                />
                <label>
                    <input type="checkbox" checked={*live_only} onchange={on_live_toggle} />
                    {"Live shifts only"}
                </label>
            </div>

            if let Some(error) = &tasks.error {
                <p class="form-error">{ error }</p>
            }

            if loading && tasks.data.is_none() {
                <Loading label="Loading tasks" />
            } else {
                <div class="card">
                    <table>
                        <thead>
                            <tr>
                                <th>{"Task"}</th>
                                <th>{"Status"}</th>
                                <th>{"Started"}</th>
                                <th>{"Ended"}</th>
                                <th>{"Duration"}</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>{ rows }</tbody>
                    </table>
                </div>
            }
        </div>
    }
}
