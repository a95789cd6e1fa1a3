//! Report intake orchestration.
//!
//! `submit_report` drives the pipeline: validate, persist the report, read
//! the recency counter, score, persist the alert. Everything after the
//! report write is best-effort: scoring-stage failures are logged and
//! swallowed so report capture is never blocked by scoring infrastructure.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{SentinelResult, StoreError, ValidationError};
use crate::store::{AlertStore, ReportStore};
use crate::types::{
    Alert, AlertStatus, Principal, ReportInput, SentinelReport, REPORT_STATUS_PENDING_AI,
};

/// Intake tuning knobs.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Trailing window for the recency counter.
    pub recency_window: chrono::Duration,
    /// Deadline on the recency query; on expiry the scorer falls back to the
    /// baseline velocity tier rather than blocking the submission.
    pub recency_deadline: Duration,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            recency_window: chrono::Duration::hours(24),
            recency_deadline: Duration::from_secs(2),
        }
    }
}

/// Orchestrates report submission and best-effort alert creation.
pub struct IntakeService<R, A> {
    reports: Arc<R>,
    alerts: Arc<A>,
    config: IntakeConfig,
}

impl<R: ReportStore, A: AlertStore> IntakeService<R, A> {
    /// Create an intake service with default configuration.
    pub fn new(reports: Arc<R>, alerts: Arc<A>) -> Self {
        Self::with_config(reports, alerts, IntakeConfig::default())
    }

    /// Create an intake service with explicit configuration.
    pub fn with_config(reports: Arc<R>, alerts: Arc<A>, config: IntakeConfig) -> Self {
        Self {
            reports,
            alerts,
            config,
        }
    }

    /// Accept a report submission.
    ///
    /// Fails with a [`ValidationError`] before any write if the input is
    /// malformed, and with a store error if the report write itself fails.
    /// Scoring-stage failures never propagate: the stored report is returned
    /// as a success and the missing alert is only visible in the logs.
    pub async fn submit_report(
        &self,
        principal: &Principal,
        input: ReportInput,
    ) -> SentinelResult<SentinelReport> {
        let report = validate(principal, input)?;
        let stored = self.reports.insert_report(report).await?;

        if let Err(err) = self.score_and_create_alert(&stored).await {
            warn!(
                report_id = %stored.id,
                organization_id = %stored.organization_id,
                error = %err,
                "scoring pipeline failed; report capture unaffected"
            );
        }

        Ok(stored)
    }

    /// Score the stored report and persist its alert.
    async fn score_and_create_alert(&self, report: &SentinelReport) -> Result<(), StoreError> {
        let recent = self.recent_report_count(report.organization_id).await;
        let result = cbs::score(&report.symptom_matrix, report.patient_count, recent);

        debug!(
            report_id = %report.id,
            cbs = result.cbs,
            severity_index = result.severity_index,
            recent_report_count = recent,
            "scored sentinel report"
        );

        // Facility and zone are both the reporting organization today; PHO
        // jurisdiction zones are not yet a distinct concept.
        let alert = Alert {
            id: Uuid::new_v4(),
            report_id: report.id,
            facility_id: report.organization_id,
            zone_id: report.organization_id,
            cbs_score: result.cbs,
            severity_index: result.severity_index,
            symptom_weight: result.symptom_weight,
            bypass_reason: result.bypass_reason,
            status: AlertStatus::PendingInvestigation,
            investigated_by: None,
            investigated_at: None,
            overridden_by: None,
            override_reason: None,
            created_at: Utc::now(),
        };

        self.alerts.insert_alert(alert).await?;
        Ok(())
    }

    /// Recency counter with a deadline. Errors and timeouts both degrade to
    /// zero, which lands the scorer on the baseline velocity tier.
    async fn recent_report_count(&self, organization_id: Uuid) -> u32 {
        let since = Utc::now() - self.config.recency_window;
        let query = self.reports.count_reports_since(organization_id, since);

        match tokio::time::timeout(self.config.recency_deadline, query).await {
            Ok(Ok(count)) => count,
            Ok(Err(err)) => {
                warn!(
                    %organization_id,
                    error = %err,
                    "recency counter failed; using baseline velocity"
                );
                0
            }
            Err(_) => {
                warn!(%organization_id, "recency counter timed out; using baseline velocity");
                0
            }
        }
    }
}

/// Validate raw input and assemble the report record. Collects every
/// offending field rather than stopping at the first.
fn validate(principal: &Principal, input: ReportInput) -> Result<SentinelReport, ValidationError> {
    let mut fields = Vec::new();

    let patient_count = u32::try_from(input.patient_count).ok().filter(|c| *c > 0);
    if patient_count.is_none() {
        fields.push("patient_count".to_string());
    }

    if !input.origin_location.lat.is_finite() {
        fields.push("origin_location.lat".to_string());
    }
    if !input.origin_location.lng.is_finite() {
        fields.push("origin_location.lng".to_string());
    }

    if input.symptom_matrix.is_empty() {
        fields.push("symptom_matrix".to_string());
    }

    let severity = u8::try_from(input.severity)
        .ok()
        .filter(|s| (1..=10).contains(s));
    if severity.is_none() {
        fields.push("severity".to_string());
    }

    if !fields.is_empty() {
        return Err(ValidationError::new(fields));
    }

    Ok(SentinelReport {
        id: Uuid::new_v4(),
        submitted_by: principal.id,
        organization_id: principal.organization_id,
        patient_count: patient_count.unwrap_or(1),
        origin_location: input.origin_location,
        symptom_matrix: input.symptom_matrix,
        severity: severity.unwrap_or(1),
        notes: input.notes,
        status: REPORT_STATUS_PENDING_AI.to_string(),
        created_at: Utc::now(),
    })
}
