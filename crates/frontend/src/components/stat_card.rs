//! Statistics card component.

use yew::prelude::*;

/// Properties for StatCard component.
#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub value: AttrValue,
    pub label: AttrValue,
    /// Shown instead of the value while the backing slice loads
    #[prop_or_default]
    pub pending: bool,
}

/// Statistics card component.
#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    let value = if props.pending {
        AttrValue::from("…")
    } else {
        props.value.clone()
    };

    html! {
        <div class="card stat-card">
            <div class="stat-value">{ value }</div>
            <div class="stat-label">{ props.label.clone() }</div>
        </div>
    }
}
