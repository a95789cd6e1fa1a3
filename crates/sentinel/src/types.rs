//! Domain records for sentinel reports and triage alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Informational tag stamped on every stored report. Nothing reads or
/// transitions it after intake; it is carried for compatibility with
/// downstream consumers of the report record.
pub const REPORT_STATUS_PENDING_AI: &str = "Pending AI";

/// Role claims resolved by the (external) session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Healthcare institution submitting sentinel reports.
    #[serde(rename = "institution")]
    Institution,
    /// Public health officer reviewing the alert inbox for a zone.
    #[serde(rename = "pho")]
    Reviewer,
    /// Emergency operations center administrator.
    #[serde(rename = "eoc")]
    Admin,
}

/// Authenticated caller identity, resolved upstream of this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User id
    pub id: Uuid,
    /// Organization the caller acts for (doubles as the PHO zone id)
    pub organization_id: Uuid,
    /// Resolved role claim
    pub role: Role,
}

/// Where the reported cases originated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Raw report submission, prior to validation.
///
/// Counts are wide signed integers so out-of-range values survive
/// deserialization and are rejected by validation rather than by serde.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportInput {
    pub patient_count: i64,
    pub origin_location: OriginLocation,
    pub symptom_matrix: Vec<String>,
    pub severity: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A stored sentinel report. Immutable after creation; no update or delete
/// path exists in this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentinelReport {
    pub id: Uuid,
    pub submitted_by: Uuid,
    pub organization_id: Uuid,
    pub patient_count: u32,
    pub origin_location: OriginLocation,
    pub symptom_matrix: Vec<String>,
    pub severity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Dead field: fixed at [`REPORT_STATUS_PENDING_AI`], never transitioned.
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Triage lifecycle states of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Initial state, set at creation by intake.
    PendingInvestigation,
    /// Claimed by a reviewer.
    Investigating,
    /// Reviewer assessment: likely a genuine outbreak signal.
    Probable,
    /// Reviewer assessment: confirmed outbreak signal.
    Confirmed,
    /// Dismissed, either by the owning reviewer or by administrative override.
    Invalidated,
}

/// The subset of [`AlertStatus`] a reviewer may request on a claimed alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewedStatus {
    Probable,
    Confirmed,
    Invalidated,
}

impl ReviewedStatus {
    /// Parse a requested status value. Anything outside the three permitted
    /// values is a validation failure.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "probable" => Ok(Self::Probable),
            "confirmed" => Ok(Self::Confirmed),
            "invalidated" => Ok(Self::Invalidated),
            _ => Err(ValidationError::field("status")),
        }
    }
}

impl From<ReviewedStatus> for AlertStatus {
    fn from(status: ReviewedStatus) -> Self {
        match status {
            ReviewedStatus::Probable => Self::Probable,
            ReviewedStatus::Confirmed => Self::Confirmed,
            ReviewedStatus::Invalidated => Self::Invalidated,
        }
    }
}

/// Status-update request body.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// An alert materialized from a scored report. Exactly one alert exists per
/// scored report; mutated only through the triage workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    /// Originating report
    pub report_id: Uuid,
    /// Reporting facility. Currently always equal to `zone_id`.
    pub facility_id: Uuid,
    /// Jurisdiction zone the alert is routed to. Currently the reporting
    /// organization's id; facility and zone are not yet distinct concepts.
    pub zone_id: Uuid,
    /// Confidence-Based Score in [0.00, 1.00], two-decimal precision
    pub cbs_score: f64,
    /// `ceil(cbs_score * 10)`, clamped to [1, 10]
    pub severity_index: u8,
    /// Symptom weight the scorer used
    pub symptom_weight: f64,
    /// Set iff the critical-hemorrhagic bypass fired (`symptom_weight == 1.0`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_reason: Option<String>,
    pub status: AlertStatus,
    /// Reviewer who claimed the alert; set by the claim path, not required
    /// by the administrative override path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investigated_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investigated_at: Option<DateTime<Utc>>,
    /// Administrator who forced invalidation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overridden_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inbox projection: an alert plus a denormalized view of its report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub patient_count: u32,
    pub symptom_matrix: Vec<String>,
}

/// Acknowledgement returned by the escalation stub.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationAck {
    pub message: String,
    pub escalation_id: String,
}
