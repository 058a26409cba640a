//! Task table row.

use core_types::{Task, TaskStatus};
use yew::prelude::*;

use crate::components::{ShiftDuration, Timestamp};

/// Properties for TaskRow component.
#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
    pub task: Task,
    /// Called with the task id and its next status
    pub on_advance: Callback<(u64, TaskStatus)>,
}

/// Status a task moves to from the row's action button.
fn next_status(status: TaskStatus) -> Option<TaskStatus> {
    match status {
        TaskStatus::Scheduled => Some(TaskStatus::InProgress),
        TaskStatus::InProgress => Some(TaskStatus::Completed),
        TaskStatus::Completed | TaskStatus::Cancelled => None,
    }
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Scheduled => "Scheduled",
        TaskStatus::InProgress => "In progress",
        TaskStatus::Completed => "Completed",
        TaskStatus::Cancelled => "Cancelled",
    }
}

#[function_component(TaskRow)]
pub fn task_row(props: &TaskRowProps) -> Html {
    let task = &props.task;
    let status_class = classes!("task-status", format!("{:?}", task.status).to_lowercase());

    let action = next_status(task.status).map(|next| {
        let id = task.id;
        let onclick = props.on_advance.reform(move |_: MouseEvent| (id, next));
        html! { <button {onclick}>{ status_label(next) }</button> }
    });

    html! {
        <tr class="task-row">
            <td>{ &task.title }</td>
            <td><span class={status_class}>{ status_label(task.status) }</span></td>
            <td><Timestamp value={task.started_at.clone().map(AttrValue::from)} /></td>
            <td><Timestamp value={task.ended_at.clone().map(AttrValue::from)} /></td>
            <td>
                if let Some(start) = &task.started_at {
                    <ShiftDuration
                        start={AttrValue::from(start.clone())}
                        end={task.ended_at.clone().map(AttrValue::from)}
                    />
                } else {
                    { timefmt::EMPTY }
                }
            </td>
            <td>{ action.unwrap_or_default() }</td>
        </tr>
    }
}
