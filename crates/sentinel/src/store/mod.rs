//! Persistence contracts for reports and alerts.
//!
//! The services only ever see these traits; [`MemoryStore`] backs tests and
//! single-process deployments. Report storage is
//! append-only from this core's perspective; alerts are mutated exclusively
//! through the triage predicates below.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{Alert, AlertStatus, AlertView, SentinelReport};

/// Durable record of submitted sentinel reports, plus the recency counter
/// used as the velocity signal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist a report. Returns the stored record.
    async fn insert_report(&self, report: SentinelReport) -> Result<SentinelReport, StoreError>;

    /// Recency counter: how many reports `organization_id` has submitted at
    /// or after `since`. Best-effort; not linearizable with concurrent
    /// submissions.
    async fn count_reports_since(
        &self,
        organization_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<u32, StoreError>;

    /// All reports for an organization, newest first.
    async fn reports_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<SentinelReport>, StoreError>;
}

/// Durable record of alerts, one per scored report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Persist a freshly scored alert.
    async fn insert_alert(&self, alert: Alert) -> Result<Alert, StoreError>;

    /// Atomic conditional claim: `pending_investigation -> investigating`,
    /// recording the investigator and timestamp. Fails with
    /// [`StoreError::ClaimConflict`] if the alert already left the pending
    /// state, so exactly one of any set of racing claims wins.
    async fn claim_pending(
        &self,
        alert_id: Uuid,
        investigator_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Alert, StoreError>;

    /// Ownership-predicated status update: applied only where the alert id
    /// matches and `investigated_by` equals `investigator_id`. A miss is the
    /// single opaque [`StoreError::NoMatch`], whatever the cause. The prior
    /// status is deliberately not part of the predicate.
    async fn update_status_by_investigator(
        &self,
        alert_id: Uuid,
        investigator_id: Uuid,
        status: AlertStatus,
    ) -> Result<Alert, StoreError>;

    /// Administrative override: force `invalidated` from any state, by id
    /// only, recording the acting administrator and a reason. Bypasses the
    /// investigator-ownership check entirely.
    async fn override_invalidate(
        &self,
        alert_id: Uuid,
        actor_id: Uuid,
        reason: &str,
    ) -> Result<Alert, StoreError>;

    /// All alerts for a zone ordered by CBS descending (insertion order on
    /// ties), each with a denormalized view of its originating report.
    async fn alerts_for_zone(&self, zone_id: Uuid) -> Result<Vec<AlertView>, StoreError>;
}
