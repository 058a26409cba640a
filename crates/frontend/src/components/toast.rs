//! Foreground push notification toast.

use notify::PushMessage;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub message: PushMessage,
    pub on_dismiss: Callback<()>,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let title = props.message.title.clone().unwrap_or_else(|| "Notification".to_string());
    let body = props.message.body.clone().unwrap_or_default();
    let onclick = props.on_dismiss.reform(|_: MouseEvent| ());

    html! {
        <div class="toast" role="status">
            <strong class="toast-title">{ title }</strong>
            if !body.is_empty() {
                <p class="toast-body">{ body }</p>
            }
            <button class="toast-close" {onclick}>{"×"}</button>
        </div>
    }
}
