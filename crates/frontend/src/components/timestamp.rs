//! Timestamp rendering in London local time.

use gloo_timers::callback::Interval;
use yew::prelude::*;

/// How often a live duration re-renders.
const LIVE_REFRESH_MS: u32 = 60_000;

#[derive(Properties, PartialEq)]
pub struct TimestampProps {
    /// Raw backend timestamp
    pub value: Option<AttrValue>,
    /// strftime pattern, defaults to `timefmt::DEFAULT_DISPLAY_FORMAT`
    #[prop_or_default]
    pub format: Option<AttrValue>,
}

#[function_component(Timestamp)]
pub fn timestamp(props: &TimestampProps) -> Html {
    let text = timefmt::to_local_display(props.value.as_deref(), props.format.as_deref());
    html! { <time class="timestamp">{ text }</time> }
}

#[derive(Properties, PartialEq)]
pub struct ShiftDurationProps {
    pub start: AttrValue,
    #[prop_or_default]
    pub end: Option<AttrValue>,
}

/// Worked time between two timestamps, ticking while the shift is open.
#[function_component(ShiftDuration)]
pub fn shift_duration(props: &ShiftDurationProps) -> Html {
    let force_update = use_force_update();
    let live = props.end.is_none();

    use_effect_with(live, move |live| {
        let interval = live.then(|| Interval::new(LIVE_REFRESH_MS, move || force_update.force_update()));
        move || drop(interval)
    });

    let text = timefmt::duration_between(&props.start, props.end.as_deref());
    let class = classes!("duration", live.then_some("live"));
    html! { <span {class}>{ text }</span> }
}
