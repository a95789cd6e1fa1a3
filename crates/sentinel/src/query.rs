//! Read-only projections over the stores.

use std::sync::Arc;

use crate::error::SentinelResult;
use crate::store::{AlertStore, ReportStore};
use crate::types::{AlertView, Principal, SentinelReport};

/// Zone inbox and organization feed reads. No mutation, no side effects
/// beyond the store read.
pub struct QueryService<R, A> {
    reports: Arc<R>,
    alerts: Arc<A>,
}

impl<R: ReportStore, A: AlertStore> QueryService<R, A> {
    /// Create a query service over the two stores.
    pub fn new(reports: Arc<R>, alerts: Arc<A>) -> Self {
        Self { reports, alerts }
    }

    /// PHO inbox: all alerts for the caller's zone, highest CBS first, each
    /// carrying the originating report's patient count and symptom list.
    pub async fn inbox(&self, principal: &Principal) -> SentinelResult<Vec<AlertView>> {
        let views = self.alerts.alerts_for_zone(principal.organization_id).await?;
        Ok(views)
    }

    /// Organization feed: the caller's reports, newest first.
    pub async fn feed(&self, principal: &Principal) -> SentinelResult<Vec<SentinelReport>> {
        let reports = self
            .reports
            .reports_for_organization(principal.organization_id)
            .await?;
        Ok(reports)
    }
}
