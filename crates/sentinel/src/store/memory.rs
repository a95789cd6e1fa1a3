//! In-memory store implementation.
//!
//! Backs tests and single-process deployments. Both collections live behind
//! `tokio::sync::RwLock`; the triage predicates run their check-and-set under
//! a single write-lock acquisition, which is what makes the conditional claim
//! atomic.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AlertStore, ReportStore};
use crate::error::StoreError;
use crate::types::{Alert, AlertStatus, AlertView, SentinelReport};

/// In-memory report and alert storage.
///
/// Insertion order is preserved, which gives the inbox its stable tie
/// ordering. Cloning the store clones handles to the same underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    reports: Arc<RwLock<Vec<SentinelReport>>>,
    alerts: Arc<RwLock<Vec<Alert>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an alert by id, if present. Test and inspection helper; the
    /// services go through the trait predicates.
    pub async fn alert(&self, alert_id: Uuid) -> Option<Alert> {
        let alerts = self.alerts.read().await;
        alerts.iter().find(|a| a.id == alert_id).cloned()
    }

    /// Number of stored alerts.
    pub async fn alert_count(&self) -> usize {
        self.alerts.read().await.len()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn insert_report(&self, report: SentinelReport) -> Result<SentinelReport, StoreError> {
        let mut reports = self.reports.write().await;
        reports.push(report.clone());
        Ok(report)
    }

    async fn count_reports_since(
        &self,
        organization_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<u32, StoreError> {
        let reports = self.reports.read().await;
        let count = reports
            .iter()
            .filter(|r| r.organization_id == organization_id && r.created_at >= since)
            .count();
        u32::try_from(count).map_err(|_| StoreError::Backend("report count overflow".to_string()))
    }

    async fn reports_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<SentinelReport>, StoreError> {
        let reports = self.reports.read().await;
        let mut feed: Vec<SentinelReport> = reports
            .iter()
            .filter(|r| r.organization_id == organization_id)
            .cloned()
            .collect();
        feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(feed)
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn insert_alert(&self, alert: Alert) -> Result<Alert, StoreError> {
        let mut alerts = self.alerts.write().await;
        alerts.push(alert.clone());
        Ok(alert)
    }

    async fn claim_pending(
        &self,
        alert_id: Uuid,
        investigator_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Alert, StoreError> {
        let mut alerts = self.alerts.write().await;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or(StoreError::AlertNotFound(alert_id))?;

        if alert.status != AlertStatus::PendingInvestigation {
            return Err(StoreError::ClaimConflict);
        }

        alert.status = AlertStatus::Investigating;
        alert.investigated_by = Some(investigator_id);
        alert.investigated_at = Some(at);
        Ok(alert.clone())
    }

    async fn update_status_by_investigator(
        &self,
        alert_id: Uuid,
        investigator_id: Uuid,
        status: AlertStatus,
    ) -> Result<Alert, StoreError> {
        let mut alerts = self.alerts.write().await;
        // Missing alert and wrong investigator both fall through to NoMatch.
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id && a.investigated_by == Some(investigator_id))
            .ok_or(StoreError::NoMatch)?;

        alert.status = status;
        Ok(alert.clone())
    }

    async fn override_invalidate(
        &self,
        alert_id: Uuid,
        actor_id: Uuid,
        reason: &str,
    ) -> Result<Alert, StoreError> {
        let mut alerts = self.alerts.write().await;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or(StoreError::AlertNotFound(alert_id))?;

        alert.status = AlertStatus::Invalidated;
        alert.overridden_by = Some(actor_id);
        alert.override_reason = Some(reason.to_string());
        Ok(alert.clone())
    }

    async fn alerts_for_zone(&self, zone_id: Uuid) -> Result<Vec<AlertView>, StoreError> {
        let alerts = self.alerts.read().await;
        let reports = self.reports.read().await;

        let mut views = Vec::new();
        for alert in alerts.iter().filter(|a| a.zone_id == zone_id) {
            let report = reports
                .iter()
                .find(|r| r.id == alert.report_id)
                .ok_or_else(|| {
                    StoreError::Backend(format!(
                        "alert {} references missing report {}",
                        alert.id, alert.report_id
                    ))
                })?;

            views.push(AlertView {
                alert: alert.clone(),
                patient_count: report.patient_count,
                symptom_matrix: report.symptom_matrix.clone(),
            });
        }

        // Stable sort: ties keep insertion order.
        views.sort_by(|a, b| {
            b.alert
                .cbs_score
                .partial_cmp(&a.alert.cbs_score)
                .unwrap_or(Ordering::Equal)
        });
        Ok(views)
    }
}
