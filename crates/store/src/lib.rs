//! Client-side application state for the StaffDesk dashboard.
//!
//! This crate provides:
//! - AppStore: one async slice per backend resource, updated only by actions
//! - RequestIssuer: monotonic request tickets so stale responses are dropped
//! - run_thunk: the dispatch → fetch → settle sequence
//! - LoadingAggregator: the combined progress indicator state machine

mod aggregator;
mod thunk;

pub use aggregator::{AggregatorConfig, LoadingAggregator, Phase};
pub use thunk::run_thunk;

use core_types::{
    AsyncSliceState, AuthSession, Invoice, Project, SliceKind, Specialization, Task, Worker,
};
use std::cell::Cell;
use std::rc::Rc;

/// Message shown when the aggregator is active but no label is available.
pub const FALLBACK_MESSAGE: &str = "loading...";

/// Identifies one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub slice: SliceKind,
    pub seq: u64,
}

/// Hands out strictly increasing request tickets.
///
/// Owned by the composition root and cloned into every thunk; clones share
/// the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestIssuer {
    last: Rc<Cell<u64>>,
}

impl RequestIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket for `slice`.
    pub fn issue(&self, slice: SliceKind) -> RequestTicket {
        let seq = self.last.get() + 1;
        self.last.set(seq);
        RequestTicket { slice, seq }
    }
}

impl PartialEq for RequestIssuer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.last, &other.last)
    }
}

/// Update for a single slice.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceAction<T> {
    /// A request was dispatched.
    Pending(RequestTicket),
    /// A request finished, with data or an error message.
    Settled(RequestTicket, Result<T, String>),
}

/// Everything that can change the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(SliceAction<AuthSession>),
    Invoices(SliceAction<Vec<Invoice>>),
    Workers(SliceAction<Vec<Worker>>),
    Projects(SliceAction<Vec<Project>>),
    Specializations(SliceAction<Vec<Specialization>>),
    Tasks(SliceAction<Vec<Task>>),
    /// Forget the session and every resource loaded under it.
    Logout,
}

/// A slice plus the bookkeeping needed to reject stale settlements.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    kind: SliceKind,
    state: AsyncSliceState<T>,
    latest: u64,
    in_flight: bool,
}

impl<T> Slice<T> {
    fn new(kind: SliceKind) -> Self {
        Self {
            kind,
            state: AsyncSliceState::new(),
            latest: 0,
            in_flight: false,
        }
    }

    pub fn state(&self) -> &AsyncSliceState<T> {
        &self.state
    }

    /// Apply an action; returns false when it was stale or misrouted.
    fn apply(&mut self, action: SliceAction<T>) -> bool {
        match action {
            SliceAction::Pending(ticket) => {
                if ticket.slice != self.kind || ticket.seq <= self.latest {
                    log::debug!("ignoring out-of-order dispatch {:?}", ticket);
                    return false;
                }
                self.latest = ticket.seq;
                self.in_flight = true;
                self.state.begin();
                true
            }
            SliceAction::Settled(ticket, outcome) => {
                if !self.in_flight || ticket.slice != self.kind || ticket.seq != self.latest {
                    log::debug!("dropping superseded response {:?}", ticket);
                    return false;
                }
                self.in_flight = false;
                match outcome {
                    Ok(data) => self.state.succeed(data),
                    Err(error) => self.state.fail(error),
                }
                true
            }
        }
    }

    /// Clear state; any request still in flight will be dropped on arrival.
    fn reset(&mut self) {
        self.state.reset();
        self.in_flight = false;
    }
}

/// The application state container.
#[derive(Debug, Clone, PartialEq)]
pub struct AppStore {
    auth: Slice<AuthSession>,
    invoices: Slice<Vec<Invoice>>,
    workers: Slice<Vec<Worker>>,
    projects: Slice<Vec<Project>>,
    specializations: Slice<Vec<Specialization>>,
    tasks: Slice<Vec<Task>>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self {
            auth: Slice::new(SliceKind::Auth),
            invoices: Slice::new(SliceKind::Invoices),
            workers: Slice::new(SliceKind::Workers),
            projects: Slice::new(SliceKind::Projects),
            specializations: Slice::new(SliceKind::Specializations),
            tasks: Slice::new(SliceKind::Tasks),
        }
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action. Returns whether it changed anything.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Auth(a) => self.auth.apply(a),
            Action::Invoices(a) => self.invoices.apply(a),
            Action::Workers(a) => self.workers.apply(a),
            Action::Projects(a) => self.projects.apply(a),
            Action::Specializations(a) => self.specializations.apply(a),
            Action::Tasks(a) => self.tasks.apply(a),
            Action::Logout => {
                self.auth.reset();
                self.invoices.reset();
                self.workers.reset();
                self.projects.reset();
                self.specializations.reset();
                self.tasks.reset();
                true
            }
        }
    }

    pub fn auth(&self) -> &AsyncSliceState<AuthSession> {
        self.auth.state()
    }

    pub fn invoices(&self) -> &AsyncSliceState<Vec<Invoice>> {
        self.invoices.state()
    }

    pub fn workers(&self) -> &AsyncSliceState<Vec<Worker>> {
        self.workers.state()
    }

    pub fn projects(&self) -> &AsyncSliceState<Vec<Project>> {
        self.projects.state()
    }

    pub fn specializations(&self) -> &AsyncSliceState<Vec<Specialization>> {
        self.specializations.state()
    }

    pub fn tasks(&self) -> &AsyncSliceState<Vec<Task>> {
        self.tasks.state()
    }

    /// Bearer token of the current session, if signed in.
    pub fn token(&self) -> Option<String> {
        self.auth().data.as_ref().map(|session| session.token.clone())
    }

    pub fn is_loading(&self, kind: SliceKind) -> bool {
        match kind {
            SliceKind::Auth => self.auth().loading,
            SliceKind::Invoices => self.invoices().loading,
            SliceKind::Workers => self.workers().loading,
            SliceKind::Projects => self.projects().loading,
            SliceKind::Specializations => self.specializations().loading,
            SliceKind::Tasks => self.tasks().loading,
        }
    }

    pub fn error(&self, kind: SliceKind) -> Option<&str> {
        match kind {
            SliceKind::Auth => self.auth().error.as_deref(),
            SliceKind::Invoices => self.invoices().error.as_deref(),
            SliceKind::Workers => self.workers().error.as_deref(),
            SliceKind::Projects => self.projects().error.as_deref(),
            SliceKind::Specializations => self.specializations().error.as_deref(),
            SliceKind::Tasks => self.tasks().error.as_deref(),
        }
    }

    /// Loading flags of every slice.
    pub fn loading_snapshot(&self) -> LoadingSnapshot {
        LoadingSnapshot::from_flags(SliceKind::ALL.map(|kind| (kind, self.is_loading(kind))))
    }
}

/// Read-only view of which slices are loading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadingSnapshot {
    flags: Vec<(SliceKind, bool)>,
}

impl LoadingSnapshot {
    pub fn from_flags(flags: impl IntoIterator<Item = (SliceKind, bool)>) -> Self {
        Self {
            flags: flags.into_iter().collect(),
        }
    }

    pub fn is_loading(&self, kind: SliceKind) -> bool {
        self.flags.iter().any(|&(k, loading)| k == kind && loading)
    }

    pub fn any_loading(&self) -> bool {
        self.flags.iter().any(|&(_, loading)| loading)
    }

    /// Labels of the slices currently loading.
    pub fn labels(&self) -> Vec<&'static str> {
        self.flags
            .iter()
            .filter(|(_, loading)| *loading)
            .map(|(kind, _)| kind.label())
            .collect()
    }

    /// Comma-joined lowercase labels, e.g. `authenticating, loading tasks`.
    pub fn message(&self) -> String {
        let labels = self.labels();
        if labels.is_empty() {
            return FALLBACK_MESSAGE.to_string();
        }
        labels.join(", ").to_lowercase()
    }
}
