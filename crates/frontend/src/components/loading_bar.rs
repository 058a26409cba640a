//! Global loading bar.
//!
//! Observes the store's loading snapshot on every render and runs a tick
//! interval while the bar is visible.

use gloo_timers::callback::Interval;
use store::LoadingAggregator;
use yew::prelude::*;

use crate::context::use_app_context;

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[function_component(LoadingBar)]
pub fn loading_bar() -> Html {
    let ctx = use_app_context();
    let aggregator = use_mut_ref(|| LoadingAggregator::new(ctx.config.loading.clone()));
    let force_update = use_force_update();

    aggregator
        .borrow_mut()
        .observe(&ctx.store.loading_snapshot(), now_ms());

    let visible = aggregator.borrow().is_visible();
    {
        let aggregator = aggregator.clone();
        let tick_ms = ctx.config.loading.tick_ms;
        use_effect_with(visible, move |visible| {
            let interval = visible.then(|| {
                Interval::new(tick_ms, move || {
                    aggregator
                        .borrow_mut()
                        .tick(&mut rand::thread_rng(), now_ms());
                    force_update.force_update();
                })
            });
            move || drop(interval)
        });
    }

    let state = aggregator.borrow();
    if !state.is_visible() {
        return html! {};
    }

    let width = format!("width: {:.0}%", state.progress());
    html! {
        <div class="loading-bar" role="progressbar" aria-valuenow={format!("{:.0}", state.progress())}>
            <div class="loading-bar-fill" style={width}></div>
            <div class="loading-bar-message">{ state.message().to_string() }</div>
        </div>
    }
}
