//! Login page.

use core_types::{Credentials, SliceKind};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::Route;
use crate::context::use_app_context;
use crate::thunks;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let ctx = use_app_context();
    let email = use_state(String::new);
    let password = use_state(String::new);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let onsubmit = {
        let ctx = ctx.clone();
        let email = email.clone();
        let password = password.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let credentials = Credentials {
                email: email.trim().to_string(),
                password: (*password).clone(),
            };
            thunks::login(&ctx, credentials);
        })
    };

    if ctx.store.token().is_some() {
        return html! { <Redirect<Route> to={Route::Dashboard} /> };
    }

    let busy = ctx.store.is_loading(SliceKind::Auth);
    let error = ctx.store.error(SliceKind::Auth).map(str::to_string);

    html! {
        <div class="card login-card">
            <h1>{"Sign in"}</h1>
            <form {onsubmit}>
                <label>
                    {"Email"}
                    <input type="email" value={(*email).clone()} oninput={on_email} required=true />
                </label>
                <label>
                    {"Password"}
                    <input type="password" value={(*password).clone()} oninput={on_password} required=true />
                </label>
                if let Some(error) = error {
                    <p class="form-error">{ error }</p>
                }
                <button type="submit" disabled={busy}>
                    { if busy { "Signing in…" } else { "Sign in" } }
                </button>
            </form>
        </div>
    }
}
