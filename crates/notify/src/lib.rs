//! Push-notification bootstrap.
//!
//! Registers the messaging service worker, asks for notification
//! permission and exchanges the registration for a delivery token. Every
//! failure is reported as a [`BootstrapError`]; the UI-facing wrapper logs
//! it and falls back to [`NO_TOKEN`].

mod browser;

pub use browser::BrowserMessaging;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Returned when no delivery token could be obtained.
pub const NO_TOKEN: &str = "no-token";

/// Service worker served next to the app.
pub const DEFAULT_WORKER_SCRIPT: &str = "/firebase-messaging-sw.js";

/// Errors from the bootstrap sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("not running in a browser")]
    NotInBrowser,

    #[error("messaging configuration is missing `{0}`")]
    MissingConfig(&'static str),

    #[error("service worker registration failed: {0}")]
    WorkerRegistration(String),

    #[error("notification permission {0}")]
    PermissionDenied(Permission),

    #[error("messaging backend returned no token")]
    NoToken,

    #[error("messaging SDK error: {0}")]
    Messaging(String),
}

/// Result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Browser notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user dismissed the prompt
    Default,
}

impl Permission {
    /// Parse the browser's permission string.
    pub fn from_browser(value: &str) -> Self {
        match value {
            "granted" => Permission::Granted,
            "denied" => Permission::Denied,
            _ => Permission::Default,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Permission::Granted => "granted",
            Permission::Denied => "denied",
            Permission::Default => "not granted",
        };
        f.write_str(s)
    }
}

/// Messaging backend settings, injected at build time.
///
/// Serializes to the SDK's app options object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingConfig {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    /// Public key used when exchanging for a token
    #[serde(skip)]
    pub vapid_key: Option<String>,
    #[serde(skip, default = "default_worker_script")]
    pub worker_script: String,
}

fn default_worker_script() -> String {
    DEFAULT_WORKER_SCRIPT.to_string()
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            messaging_sender_id: None,
            app_id: None,
            vapid_key: None,
            worker_script: default_worker_script(),
        }
    }
}

impl MessagingConfig {
    /// First required setting that is absent or blank.
    pub fn missing_field(&self) -> Option<&'static str> {
        let fields = [
            ("api_key", &self.api_key),
            ("project_id", &self.project_id),
            ("messaging_sender_id", &self.messaging_sender_id),
            ("app_id", &self.app_id),
            ("vapid_key", &self.vapid_key),
        ];
        fields
            .into_iter()
            .find(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| name)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// Worker script URL carrying the app options as query parameters, so the
    /// worker can initialize the SDK for background messages.
    pub fn worker_url(&self) -> String {
        let params = [
            ("apiKey", &self.api_key),
            ("projectId", &self.project_id),
            ("messagingSenderId", &self.messaging_sender_id),
            ("appId", &self.app_id),
        ];
        let query = params
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .map(|v| format!("{}={}", key, urlencoding::encode(v)))
            })
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            self.worker_script.clone()
        } else {
            format!("{}?{}", self.worker_script, query)
        }
    }

    /// App options object as JSON.
    pub fn sdk_options_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| BootstrapError::Messaging(e.to_string()))
    }
}

/// Opaque token addressing this browser registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryToken(String);

impl DeliveryToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A message received while the page has focus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushMessage {
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: HashMap<String, String>,
}

#[derive(Deserialize)]
struct Payload {
    #[serde(default)]
    notification: Option<PayloadNotification>,
    #[serde(default)]
    data: HashMap<String, String>,
}

#[derive(Deserialize)]
struct PayloadNotification {
    title: Option<String>,
    body: Option<String>,
}

impl PushMessage {
    /// Decode the SDK's message payload.
    pub fn from_payload_json(json: &str) -> Result<Self> {
        let payload: Payload =
            serde_json::from_str(json).map_err(|e| BootstrapError::Messaging(e.to_string()))?;
        let (title, body) = payload
            .notification
            .map(|n| (n.title, n.body))
            .unwrap_or_default();

        Ok(Self {
            title,
            body,
            data: payload.data,
        })
    }
}

/// Active foreground listener. Unsubscribes when dropped.
pub struct ForegroundSubscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl ForegroundSubscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl fmt::Debug for ForegroundSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForegroundSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

impl Drop for ForegroundSubscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// The browser and SDK operations the bootstrap needs.
#[async_trait(?Send)]
pub trait MessagingPlatform {
    /// Handle to a registered service worker.
    type Registration;

    /// Whether browser APIs (window, service workers) are available.
    fn is_browser(&self) -> bool;

    async fn register_worker(&self, script_url: &str) -> Result<Self::Registration>;

    async fn request_permission(&self) -> Result<Permission>;

    /// Exchange the registration for a token; `None` if the backend has none.
    async fn fetch_token(
        &self,
        config: &MessagingConfig,
        registration: &Self::Registration,
    ) -> Result<Option<String>>;

    fn subscribe(
        &self,
        config: &MessagingConfig,
        on_message: Box<dyn Fn(PushMessage)>,
    ) -> Result<ForegroundSubscription>;
}

/// Platform for non-browser builds: messaging is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPlatform;

#[async_trait(?Send)]
impl MessagingPlatform for HeadlessPlatform {
    type Registration = ();

    fn is_browser(&self) -> bool {
        false
    }

    async fn register_worker(&self, _script_url: &str) -> Result<()> {
        Err(BootstrapError::NotInBrowser)
    }

    async fn request_permission(&self) -> Result<Permission> {
        Err(BootstrapError::NotInBrowser)
    }

    async fn fetch_token(&self, _config: &MessagingConfig, _registration: &()) -> Result<Option<String>> {
        Err(BootstrapError::NotInBrowser)
    }

    fn subscribe(
        &self,
        _config: &MessagingConfig,
        _on_message: Box<dyn Fn(PushMessage)>,
    ) -> Result<ForegroundSubscription> {
        Err(BootstrapError::NotInBrowser)
    }
}

/// Register, ask permission, and exchange for a delivery token.
pub async fn try_acquire_delivery_token<P: MessagingPlatform>(
    platform: &P,
    config: &MessagingConfig,
) -> Result<DeliveryToken> {
    if !platform.is_browser() {
        return Err(BootstrapError::NotInBrowser);
    }
    if let Some(field) = config.missing_field() {
        return Err(BootstrapError::MissingConfig(field));
    }

    let registration = platform.register_worker(&config.worker_url()).await?;

    match platform.request_permission().await? {
        Permission::Granted => {}
        other => return Err(BootstrapError::PermissionDenied(other)),
    }

    match platform.fetch_token(config, &registration).await? {
        Some(token) if !token.is_empty() => Ok(DeliveryToken(token)),
        _ => Err(BootstrapError::NoToken),
    }
}

/// Best-effort token acquisition: the token, or [`NO_TOKEN`].
pub async fn acquire_delivery_token<P: MessagingPlatform>(
    platform: &P,
    config: &MessagingConfig,
) -> String {
    match try_acquire_delivery_token(platform, config).await {
        Ok(token) => {
            log::info!("push delivery token acquired");
            log::debug!("delivery token: {}", token.as_str());
            token.into_string()
        }
        Err(BootstrapError::NotInBrowser) => {
            log::debug!("skipping push bootstrap outside the browser");
            NO_TOKEN.to_string()
        }
        Err(
            e @ (BootstrapError::MissingConfig(_)
            | BootstrapError::PermissionDenied(_)
            | BootstrapError::NoToken),
        ) => {
            log::warn!("push notifications disabled: {}", e);
            NO_TOKEN.to_string()
        }
        Err(e) => {
            log::error!("push bootstrap failed: {}", e);
            NO_TOKEN.to_string()
        }
    }
}

/// Deliver foreground messages to `on_message` until the returned
/// subscription is dropped. `None` when messaging is unavailable.
pub fn listen_foreground_messages<P: MessagingPlatform>(
    platform: &P,
    config: &MessagingConfig,
    on_message: impl Fn(PushMessage) + 'static,
) -> Option<ForegroundSubscription> {
    if !platform.is_browser() || !config.is_complete() {
        return None;
    }

    match platform.subscribe(config, Box::new(on_message)) {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            log::warn!("foreground messages unavailable: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn complete_config() -> MessagingConfig {
        MessagingConfig {
            api_key: Some("key".to_string()),
            project_id: Some("staffdesk".to_string()),
            messaging_sender_id: Some("1234".to_string()),
            app_id: Some("1:1234:web:abc".to_string()),
            vapid_key: Some("BPublicKey".to_string()),
            ..MessagingConfig::default()
        }
    }

    /// Scripted browser.
    struct FakeBrowser {
        register: Result<u32>,
        permission: Permission,
        token: Result<Option<String>>,
        registered_script: RefCell<Option<String>>,
        handler: RefCell<Option<Box<dyn Fn(PushMessage)>>>,
        unsubscribed: Rc<Cell<bool>>,
    }

    impl FakeBrowser {
        fn granting(token: Option<&str>) -> Self {
            Self {
                register: Ok(1),
                permission: Permission::Granted,
                token: Ok(token.map(str::to_string)),
                registered_script: RefCell::new(None),
                handler: RefCell::new(None),
                unsubscribed: Rc::new(Cell::new(false)),
            }
        }

        fn deliver(&self, message: PushMessage) {
            if let Some(handler) = self.handler.borrow().as_ref() {
                handler(message);
            }
        }
    }

    #[async_trait(?Send)]
    impl MessagingPlatform for FakeBrowser {
        type Registration = u32;

        fn is_browser(&self) -> bool {
            true
        }

        async fn register_worker(&self, script_url: &str) -> Result<u32> {
            *self.registered_script.borrow_mut() = Some(script_url.to_string());
            self.register.clone()
        }

        async fn request_permission(&self) -> Result<Permission> {
            Ok(self.permission)
        }

        async fn fetch_token(
            &self,
            _config: &MessagingConfig,
            registration: &u32,
        ) -> Result<Option<String>> {
            assert_eq!(*registration, 1);
            self.token.clone()
        }

        fn subscribe(
            &self,
            _config: &MessagingConfig,
            on_message: Box<dyn Fn(PushMessage)>,
        ) -> Result<ForegroundSubscription> {
            *self.handler.borrow_mut() = Some(on_message);
            let flag = Rc::clone(&self.unsubscribed);
            Ok(ForegroundSubscription::new(move || flag.set(true)))
        }
    }

    #[test]
    fn test_headless_returns_no_token() {
        let token = block_on(acquire_delivery_token(&HeadlessPlatform, &complete_config()));
        assert_eq!(token, "no-token");

        let err = block_on(try_acquire_delivery_token(
            &HeadlessPlatform,
            &complete_config(),
        ))
        .unwrap_err();
        assert_eq!(err, BootstrapError::NotInBrowser);
    }

    #[test]
    fn test_granted_permission_yields_token() {
        let browser = FakeBrowser::granting(Some("fcm-token-1"));

        let token = block_on(acquire_delivery_token(&browser, &complete_config()));

        assert_eq!(token, "fcm-token-1");
        let script = browser.registered_script.borrow().clone().unwrap();
        assert!(script.starts_with(DEFAULT_WORKER_SCRIPT));
        assert!(script.contains("projectId=staffdesk"));
    }

    #[test]
    fn test_denied_permission() {
        let mut browser = FakeBrowser::granting(Some("unused"));
        browser.permission = Permission::Denied;

        let err = block_on(try_acquire_delivery_token(&browser, &complete_config())).unwrap_err();
        assert_eq!(err, BootstrapError::PermissionDenied(Permission::Denied));
        assert_eq!(err.to_string(), "notification permission denied");

        let token = block_on(acquire_delivery_token(&browser, &complete_config()));
        assert_eq!(token, NO_TOKEN);
    }

    #[test]
    fn test_empty_or_missing_token() {
        for token in [None, Some("")] {
            let browser = FakeBrowser::granting(token);
            let err =
                block_on(try_acquire_delivery_token(&browser, &complete_config())).unwrap_err();
            assert_eq!(err, BootstrapError::NoToken);
        }
    }

    #[test]
    fn test_sdk_failures_degrade() {
        let mut browser = FakeBrowser::granting(None);
        browser.token = Err(BootstrapError::Messaging("messaging/token-subscribe-failed".into()));
        assert_eq!(
            block_on(acquire_delivery_token(&browser, &complete_config())),
            NO_TOKEN
        );

        let mut browser = FakeBrowser::granting(Some("x"));
        browser.register = Err(BootstrapError::WorkerRegistration("404".into()));
        assert_eq!(
            block_on(try_acquire_delivery_token(&browser, &complete_config())),
            Err(BootstrapError::WorkerRegistration("404".into()))
        );
    }

    #[test]
    fn test_missing_config_short_circuits() {
        let browser = FakeBrowser::granting(Some("x"));
        let config = MessagingConfig {
            vapid_key: Some("  ".to_string()),
            ..complete_config()
        };

        let err = block_on(try_acquire_delivery_token(&browser, &config)).unwrap_err();

        assert_eq!(err, BootstrapError::MissingConfig("vapid_key"));
        assert!(browser.registered_script.borrow().is_none());
    }

    #[test]
    fn test_missing_field_order() {
        assert_eq!(MessagingConfig::default().missing_field(), Some("api_key"));
        assert!(complete_config().is_complete());
    }

    #[test]
    fn test_sdk_options_json_uses_camel_case() {
        let json = complete_config().sdk_options_json().unwrap();

        assert!(json.contains(r#""apiKey":"key""#));
        assert!(json.contains(r#""messagingSenderId":"1234""#));
        assert!(!json.contains("vapid"));
        assert!(!json.contains("worker"));
    }

    #[test]
    fn test_worker_url_encodes_options() {
        let url = complete_config().worker_url();

        assert_eq!(
            url,
            "/firebase-messaging-sw.js?apiKey=key&projectId=staffdesk&messagingSenderId=1234&appId=1%3A1234%3Aweb%3Aabc"
        );
        assert_eq!(MessagingConfig::default().worker_url(), DEFAULT_WORKER_SCRIPT);
    }

    #[test]
    fn test_foreground_listener_delivers_and_unsubscribes() {
        let browser = FakeBrowser::granting(Some("x"));
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);

        let subscription =
            listen_foreground_messages(&browser, &complete_config(), move |message| {
                sink.borrow_mut().push(message)
            })
            .unwrap();

        browser.deliver(PushMessage {
            title: Some("Shift swap".to_string()),
            ..PushMessage::default()
        });
        assert_eq!(received.borrow().len(), 1);

        drop(subscription);
        assert!(browser.unsubscribed.get());
    }

    #[test]
    fn test_foreground_listener_noop_when_unavailable() {
        let subscription =
            listen_foreground_messages(&HeadlessPlatform, &complete_config(), |_| {});
        assert!(subscription.is_none());

        let browser = FakeBrowser::granting(Some("x"));
        let subscription =
            listen_foreground_messages(&browser, &MessagingConfig::default(), |_| {});
        assert!(subscription.is_none());
    }

    #[test]
    fn test_push_message_from_payload() {
        let json = r#"{"notification":{"title":"Invoice paid","body":"INV-0042"},"data":{"invoice_id":"42"},"from":"1234"}"#;

        let message = PushMessage::from_payload_json(json).unwrap();

        assert_eq!(message.title.as_deref(), Some("Invoice paid"));
        assert_eq!(message.body.as_deref(), Some("INV-0042"));
        assert_eq!(message.data.get("invoice_id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_push_message_data_only() {
        let message = PushMessage::from_payload_json(r#"{"data":{"kind":"ping"}}"#).unwrap();
        assert!(message.title.is_none());
        assert_eq!(message.data.len(), 1);
    }

    #[test]
    fn test_permission_parsing() {
        assert_eq!(Permission::from_browser("granted"), Permission::Granted);
        assert_eq!(Permission::from_browser("denied"), Permission::Denied);
        assert_eq!(Permission::from_browser("default"), Permission::Default);
    }
}
