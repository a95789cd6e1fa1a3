//! Epidemic early-warning core: sentinel report intake, Confidence-Based
//! Scoring, and alert triage.
//!
//! Healthcare institutions submit sentinel case reports; each accepted report
//! is scored by the [`cbs`] engine and, score permitting, materialized as an
//! alert routed to a public health officer's zone inbox for a role-gated,
//! ownership-checked triage workflow.
//!
//! # Architecture
//!
//! - [`types`] — domain records (reports, alerts, principals, projections).
//! - [`store`] — persistence contracts ([`ReportStore`], [`AlertStore`]) and
//!   the in-memory [`MemoryStore`].
//! - [`intake`] — submission orchestration: validate, persist, score,
//!   create the alert. Scoring is best-effort; its failure never blocks
//!   report capture.
//! - [`triage`] — the alert state machine: claim, status update,
//!   administrative override, escalation acknowledgement.
//! - [`query`] — read-only zone inbox and organization feed projections.
//!
//! Identity resolution, notification delivery, and any HTTP surface live
//! outside this crate; callers hand in an already-resolved [`Principal`].
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use sentinel::{IntakeService, MemoryStore, QueryService, TriageService};
//!
//! let store = Arc::new(MemoryStore::new());
//! let intake = IntakeService::new(store.clone(), store.clone());
//! let triage = TriageService::new(store.clone());
//! let queries = QueryService::new(store.clone(), store);
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod intake;
pub mod query;
pub mod store;
pub mod triage;
pub mod types;

pub use error::{SentinelError, SentinelResult, StoreError, ValidationError};
pub use intake::{IntakeConfig, IntakeService};
pub use query::QueryService;
pub use store::{AlertStore, MemoryStore, ReportStore};
pub use triage::{OVERRIDE_REASON, TriageService};
pub use types::{
    Alert, AlertStatus, AlertView, EscalationAck, OriginLocation, Principal, ReportInput,
    ReviewedStatus, Role, SentinelReport, StatusUpdate,
};
