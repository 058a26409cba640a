//! Application context shared with every component.

use std::ops::Deref;
use std::rc::Rc;

use api_client::{ApiClient, GlooTransport};
use store::{Action, AppStore, RequestIssuer};
use yew::prelude::*;

use crate::config::AppConfig;

/// Store wrapper driven by `use_reducer`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreModel(AppStore);

impl Deref for StoreModel {
    type Target = AppStore;

    fn deref(&self) -> &AppStore {
        &self.0
    }
}

impl Reducible for StoreModel {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
        let mut next = (*self).clone();
        if next.0.apply(action) {
            Rc::new(next)
        } else {
            self
        }
    }
}

/// Store, request issuer and configuration, owned by `App`.
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub store: UseReducerHandle<StoreModel>,
    pub issuer: RequestIssuer,
    pub config: Rc<AppConfig>,
}

impl AppContext {
    /// API client carrying the current session token.
    pub fn client(&self) -> ApiClient<GlooTransport> {
        ApiClient::new(GlooTransport::new(self.config.api_base.clone())).with_token(self.store.token())
    }
}

/// Access the application context.
#[hook]
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext must be provided by App")
}
