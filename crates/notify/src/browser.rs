//! Browser platform: service worker, Notification API and the Firebase
//! compat SDK loaded by `index.html`.

use async_trait::async_trait;
use js_sys::{Array, Function, JSON, Object, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Notification, ServiceWorkerRegistration};

use crate::{
    BootstrapError, ForegroundSubscription, MessagingConfig, MessagingPlatform, Permission,
    PushMessage, Result,
};

#[wasm_bindgen]
extern "C" {
    type Messaging;

    #[wasm_bindgen(catch, js_namespace = firebase, js_name = initializeApp)]
    fn initialize_app(options: &JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = firebase, js_name = messaging)]
    fn messaging() -> std::result::Result<Messaging, JsValue>;

    #[wasm_bindgen(method, catch, js_name = getToken)]
    fn get_token(this: &Messaging, options: &JsValue) -> std::result::Result<Promise, JsValue>;

    /// Returns the unsubscribe function.
    #[wasm_bindgen(method, catch, js_name = onMessage)]
    fn on_message(this: &Messaging, callback: &Function) -> std::result::Result<Function, JsValue>;
}

/// Messaging through the real browser APIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserMessaging;

impl BrowserMessaging {
    pub fn new() -> Self {
        Self
    }

    /// The SDK messaging instance, initializing the app on first use.
    fn messaging(&self, config: &MessagingConfig) -> Result<Messaging> {
        if !sdk_initialized() {
            let options = JSON::parse(&config.sdk_options_json()?).map_err(sdk_error)?;
            initialize_app(&options).map_err(sdk_error)?;
        }
        messaging().map_err(sdk_error)
    }
}

#[async_trait(?Send)]
impl MessagingPlatform for BrowserMessaging {
    type Registration = ServiceWorkerRegistration;

    fn is_browser(&self) -> bool {
        if !cfg!(target_arch = "wasm32") {
            return false;
        }
        let Some(window) = web_sys::window() else {
            return false;
        };
        let has = |target: &JsValue, key: &str| {
            Reflect::has(target, &JsValue::from_str(key)).unwrap_or(false)
        };
        has(window.navigator().as_ref(), "serviceWorker") && has(window.as_ref(), "Notification")
    }

    async fn register_worker(&self, script_url: &str) -> Result<ServiceWorkerRegistration> {
        let window = web_sys::window().ok_or(BootstrapError::NotInBrowser)?;
        let promise = window.navigator().service_worker().register(script_url);
        let registration = JsFuture::from(promise)
            .await
            .map_err(|e| BootstrapError::WorkerRegistration(describe(&e)))?;

        log::debug!("messaging service worker registered: {}", script_url);
        Ok(registration.unchecked_into())
    }

    async fn request_permission(&self) -> Result<Permission> {
        let promise = Notification::request_permission().map_err(sdk_error)?;
        let state = JsFuture::from(promise).await.map_err(sdk_error)?;

        Ok(Permission::from_browser(
            state.as_string().as_deref().unwrap_or("default"),
        ))
    }

    async fn fetch_token(
        &self,
        config: &MessagingConfig,
        registration: &ServiceWorkerRegistration,
    ) -> Result<Option<String>> {
        let messaging = self.messaging(config)?;

        let options = Object::new();
        let vapid_key = config.vapid_key.as_deref().unwrap_or_default();
        Reflect::set(&options, &"vapidKey".into(), &JsValue::from_str(vapid_key))
            .map_err(sdk_error)?;
        Reflect::set(&options, &"serviceWorkerRegistration".into(), registration.as_ref())
            .map_err(sdk_error)?;

        let promise = messaging.get_token(&options).map_err(sdk_error)?;
        let token = JsFuture::from(promise).await.map_err(sdk_error)?;

        Ok(token.as_string().filter(|t| !t.is_empty()))
    }

    fn subscribe(
        &self,
        config: &MessagingConfig,
        on_message: Box<dyn Fn(PushMessage)>,
    ) -> Result<ForegroundSubscription> {
        let messaging = self.messaging(config)?;

        let callback = Closure::<dyn Fn(JsValue)>::new(move |payload: JsValue| {
            let decoded = JSON::stringify(&payload)
                .map(String::from)
                .map_err(sdk_error)
                .and_then(|json| PushMessage::from_payload_json(&json));
            match decoded {
                Ok(message) => on_message(message),
                Err(e) => log::warn!("dropping undecodable push message: {}", e),
            }
        });

        let unsubscribe = messaging
            .on_message(callback.as_ref().unchecked_ref())
            .map_err(sdk_error)?;

        Ok(ForegroundSubscription::new(move || {
            if let Err(e) = unsubscribe.call0(&JsValue::NULL) {
                log::warn!("failed to unsubscribe from push messages: {}", describe(&e));
            }
            drop(callback);
        }))
    }
}

fn sdk_initialized() -> bool {
    Reflect::get(&js_sys::global(), &"firebase".into())
        .ok()
        .filter(|firebase| !firebase.is_undefined())
        .and_then(|firebase| Reflect::get(&firebase, &"apps".into()).ok())
        .map(|apps| Array::from(&apps).length() > 0)
        .unwrap_or(false)
}

fn sdk_error(e: JsValue) -> BootstrapError {
    BootstrapError::Messaging(describe(&e))
}

fn describe(e: &JsValue) -> String {
    e.as_string()
        .or_else(|| {
            e.dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{:?}", e))
}
