//! Main application component with routing.

use notify::{BrowserMessaging, PushMessage, acquire_delivery_token, listen_foreground_messages};
use store::RequestIssuer;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::{LoadingBar, Toast};
use crate::config::AppConfig;
use crate::context::{AppContext, StoreModel, use_app_context};
use crate::pages::{DashboardPage, LoginPage, TasksPage};
use crate::thunks;

/// Application routes.
#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/tasks")]
    Tasks,
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Route switch function. Every route but the 404 needs a session.
fn switch(route: Route) -> Html {
    match route {
        Route::Login => html! { <LoginPage /> },
        Route::Dashboard => html! { <RequireSession><DashboardPage /></RequireSession> },
        Route::Tasks => html! { <RequireSession><TasksPage /></RequireSession> },
        Route::NotFound => html! {
            <div class="card">
                <h1>{"404 - Page Not Found"}</h1>
                <p>{"The page you're looking for doesn't exist."}</p>
            </div>
        },
    }
}

/// Main application component.
#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| AppConfig::from_build_env());
    let store = use_reducer(StoreModel::default);
    let issuer = use_memo((), |_| RequestIssuer::new());
    let push = use_state(|| None::<PushMessage>);

    {
        let config = config.clone();
        let push = push.clone();
        use_effect_with((), move |_| {
            let messaging = config.messaging.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let token = acquire_delivery_token(&BrowserMessaging, &messaging).await;
                log::info!("push delivery token: {}", token);
            });

            let subscription = listen_foreground_messages(&BrowserMessaging, &config.messaging, move |message| {
                log::debug!("foreground push message: {:?}", message.title);
                push.set(Some(message));
            });
            move || drop(subscription)
        });
    }

    let context = AppContext {
        store,
        issuer: (*issuer).clone(),
        config,
    };

    let on_dismiss = {
        let push = push.clone();
        Callback::from(move |_: ()| push.set(None))
    };

    html! {
        <ContextProvider<AppContext> {context}>
            <BrowserRouter>
                <LoadingBar />
                <div class="app-container">
                    <Sidebar />
                    <main class="main-content">
                        <Switch<Route> render={switch} />
                    </main>
                </div>
                if let Some(message) = (*push).clone() {
                    <Toast {message} {on_dismiss} />
                }
            </BrowserRouter>
        </ContextProvider<AppContext>>
    }
}

#[derive(Properties, PartialEq)]
struct RequireSessionProps {
    children: Html,
}

/// Renders its children when signed in, otherwise redirects to login.
#[function_component(RequireSession)]
fn require_session(props: &RequireSessionProps) -> Html {
    let ctx = use_app_context();
    if ctx.store.token().is_none() {
        return html! { <Redirect<Route> to={Route::Login} /> };
    }
    props.children.clone()
}

/// Sidebar navigation component.
#[function_component(Sidebar)]
fn sidebar() -> Html {
    let ctx = use_app_context();
    let user = ctx.store.auth().data.as_ref().map(|session| session.user.name.clone());

    let on_logout = {
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| thunks::logout(&ctx))
    };

    html! {
        <aside class="sidebar">
            <Link<Route> to={Route::Dashboard} classes="nav-brand">
                {"StaffDesk"}
            </Link<Route>>
            <nav>
                <ul class="nav-links">
                    <li>
                        <Link<Route> to={Route::Dashboard}>
                            {"Dashboard"}
                        </Link<Route>>
                    </li>
                    <li>
                        <Link<Route> to={Route::Tasks}>
                            {"Tasks"}
                        </Link<Route>>
                    </li>
                </ul>
            </nav>
            if let Some(name) = user {
                <div class="nav-user">
                    <span>{ name }</span>
                    <button onclick={on_logout}>{"Sign out"}</button>
                </div>
            }
        </aside>
    }
}
