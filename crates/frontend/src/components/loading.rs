//! Inline spinner for a section whose slice is loading.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    #[prop_or_default]
    pub label: Option<AttrValue>,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="loading">
            <div class="spinner"></div>
            if let Some(label) = &props.label {
                <span class="loading-label">{ label.clone() }</span>
            }
        </div>
    }
}
