//! Core types for the StaffDesk admin dashboard.
//!
//! This crate defines the records exchanged with the backend and the
//! per-resource slice state shared by the store, the frontend and the CLI.

use serde::{Deserialize, Serialize};

/// The backend resources the dashboard keeps a slice for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceKind {
    /// Login and current-user session
    Auth,
    Invoices,
    Workers,
    Projects,
    Specializations,
    /// Shift tasks
    Tasks,
}

impl SliceKind {
    /// Every slice, in the order the loading message lists them.
    pub const ALL: [SliceKind; 6] = [
        SliceKind::Auth,
        SliceKind::Invoices,
        SliceKind::Workers,
        SliceKind::Projects,
        SliceKind::Specializations,
        SliceKind::Tasks,
    ];

    /// Human label shown while this slice is loading.
    pub fn label(self) -> &'static str {
        match self {
            SliceKind::Auth => "Authenticating",
            SliceKind::Invoices => "Loading invoices",
            SliceKind::Workers => "Loading workers",
            SliceKind::Projects => "Loading projects",
            SliceKind::Specializations => "Loading specializations",
            SliceKind::Tasks => "Loading tasks",
        }
    }

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            SliceKind::Auth => "auth",
            SliceKind::Invoices => "invoices",
            SliceKind::Workers => "workers",
            SliceKind::Projects => "projects",
            SliceKind::Specializations => "specializations",
            SliceKind::Tasks => "tasks",
        }
    }

    /// Parse a slice name, accepting singular forms.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auth" | "login" => Some(SliceKind::Auth),
            "invoices" | "invoice" => Some(SliceKind::Invoices),
            "workers" | "worker" => Some(SliceKind::Workers),
            "projects" | "project" => Some(SliceKind::Projects),
            "specializations" | "specialization" => Some(SliceKind::Specializations),
            "tasks" | "task" => Some(SliceKind::Tasks),
            _ => None,
        }
    }
}

/// State of one async-backed slice.
///
/// `error` is only ever set once a request has settled, so an error
/// implies `loading == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncSliceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for AsyncSliceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> AsyncSliceState<T> {
    /// Create an empty, idle slice.
    pub fn new() -> Self {
        Self::default()
    }

    /// A request was dispatched. Previous data stays visible.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// The request resolved with data.
    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
    }

    /// The request failed; previous data is kept.
    pub fn fail(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    /// Drop data and error.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user: UserProfile,
}

/// Login form payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

/// An invoice issued to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: u64,
    pub number: String,
    pub client_name: String,
    /// Amount in minor units (pence)
    pub amount_pence: i64,
    pub status: InvoiceStatus,
    /// Raw backend timestamp
    pub issued_at: String,
    #[serde(default)]
    pub due_at: Option<String>,
}

impl Invoice {
    /// Amount formatted in pounds, e.g. `£1250.50`.
    pub fn amount_display(&self) -> String {
        let sign = if self.amount_pence < 0 { "-" } else { "" };
        let abs = self.amount_pence.unsigned_abs();
        format!("{sign}£{}.{:02}", abs / 100, abs % 100)
    }
}

/// A member of the workforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub specialization_id: Option<u64>,
    pub active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub client_name: String,
    #[serde(default)]
    pub starts_on: Option<String>,
    #[serde(default)]
    pub ends_on: Option<String>,
    pub active: bool,
}

/// A trade or skill a worker can be booked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialization {
    pub id: u64,
    pub name: String,
    pub hourly_rate_pence: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// A shift task booked against a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub project_id: u64,
    #[serde(default)]
    pub worker_id: Option<u64>,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
}

impl Task {
    /// Whether the shift has started and not yet ended.
    pub fn is_live(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }
}

/// Request body for changing a task's status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

/// Error body returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}
