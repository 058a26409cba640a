//! REST client for the StaffDesk backend.
//!
//! This crate provides:
//! - Transport: the seam between typed endpoints and the HTTP stack
//! - ApiClient: typed calls for auth, invoices, workers, projects,
//!   specializations and tasks

mod gloo_transport;

pub use gloo_transport::GlooTransport;

use async_trait::async_trait;
use core_types::{
    ApiErrorBody, AuthSession, Credentials, Invoice, Project, Specialization, Task, TaskStatus,
    TaskStatusUpdate, UserProfile, Worker,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from API calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an error from a non-success response.
    fn from_response(response: &ApiResponse) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(&response.body)
            .map(|body| body.message)
            .unwrap_or_else(|_| {
                let text = response.body.trim();
                if text.is_empty() {
                    format!("HTTP {}", response.status)
                } else {
                    text.to_string()
                }
            });

        ApiError::Status {
            status: response.status,
            message,
        }
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

/// A request relative to the backend base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/`
    pub path: String,
    /// JSON body
    pub body: Option<String>,
    pub bearer: Option<String>,
}

/// Raw response: status code and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the backend.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Typed client over a [`Transport`].
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
    token: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    /// Create an unauthenticated client.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// POST /auth/login
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        self.send_json(Method::Post, "/auth/login", Some(credentials))
            .await
    }

    /// GET /auth/me
    pub async fn current_user(&self) -> Result<UserProfile> {
        self.get("/auth/me").await
    }

    /// GET /invoices
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        self.get("/invoices").await
    }

    /// GET /workers
    pub async fn list_workers(&self) -> Result<Vec<Worker>> {
        self.get("/workers").await
    }

    /// GET /projects
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get("/projects").await
    }

    /// GET /specializations
    pub async fn list_specializations(&self) -> Result<Vec<Specialization>> {
        self.get("/specializations").await
    }

    /// GET /tasks
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.get("/tasks").await
    }

    /// PATCH /tasks/:id
    pub async fn update_task_status(&self, id: u64, status: TaskStatus) -> Result<Task> {
        let path = format!("/tasks/{}", id);
        self.send_json(Method::Patch, &path, Some(&TaskStatusUpdate { status }))
            .await
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.send_json::<(), R>(Method::Get, path, None).await
    }

    async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer: self.token.clone(),
        };

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let error = ApiError::from_response(&response);
            log::warn!("{:?} {} failed: {}", method, path, error);
            return Err(error);
        }

        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
