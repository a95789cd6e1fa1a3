//! Alert triage workflow.
//!
//! State machine: `pending_investigation -> investigating -> {probable,
//! confirmed, invalidated}`, with `probable -> confirmed` as the one further
//! normal transition. `confirmed` and `invalidated` are terminal in the
//! normal flow; an administrative override forces `invalidated` from any
//! state. The claim transition is an atomic compare-and-swap so exactly one
//! of any set of racing reviewers wins; status updates are predicated on
//! ownership (alert id + investigator id), nothing else.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{SentinelError, SentinelResult};
use crate::store::AlertStore;
use crate::types::{Alert, EscalationAck, Principal, ReviewedStatus, Role, StatusUpdate};

/// Reason recorded on every administrative override.
pub const OVERRIDE_REASON: &str = "AI False Positive Overridden by EOC";

/// Role-gated, ownership-checked mutations against the alert store.
pub struct TriageService<A> {
    alerts: Arc<A>,
}

impl<A: AlertStore> TriageService<A> {
    /// Create a triage service over an alert store.
    pub fn new(alerts: Arc<A>) -> Self {
        Self { alerts }
    }

    /// Claim a pending alert for investigation.
    ///
    /// Reviewer role required. Sets the investigator and investigation
    /// timestamp; fails if the alert does not exist or is no longer pending.
    pub async fn claim_alert(&self, alert_id: Uuid, principal: &Principal) -> SentinelResult<Alert> {
        require_role(principal, Role::Reviewer, "claim alerts")?;

        let alert = self
            .alerts
            .claim_pending(alert_id, principal.id, Utc::now())
            .await?;

        info!(
            alert_id = %alert.id,
            investigator = %principal.id,
            "alert claimed for investigation"
        );
        Ok(alert)
    }

    /// Advance a claimed alert to a reviewed status.
    ///
    /// Reviewer role required; the requested status must be one of
    /// `probable`, `confirmed`, `invalidated`. The update applies only if the
    /// caller is the alert's investigator; a miss surfaces as the single
    /// opaque "update failed or unauthorized" failure.
    pub async fn update_status(
        &self,
        alert_id: Uuid,
        principal: &Principal,
        update: &StatusUpdate,
    ) -> SentinelResult<Alert> {
        require_role(principal, Role::Reviewer, "update alert status")?;
        let status = ReviewedStatus::parse(&update.status)?;

        let alert = self
            .alerts
            .update_status_by_investigator(alert_id, principal.id, status.into())
            .await?;

        info!(
            alert_id = %alert.id,
            status = %update.status,
            investigator = %principal.id,
            "alert status updated"
        );
        Ok(alert)
    }

    /// Administrative override: force an alert to `invalidated` from any
    /// state, bypassing the investigator-ownership check.
    ///
    /// Admin role required. Single-actor: a dual-authorization co-sign has
    /// been discussed but is not implemented (see DESIGN.md).
    pub async fn override_alert(
        &self,
        alert_id: Uuid,
        principal: &Principal,
    ) -> SentinelResult<Alert> {
        require_role(principal, Role::Admin, "override alerts")?;

        let alert = self
            .alerts
            .override_invalidate(alert_id, principal.id, OVERRIDE_REASON)
            .await?;

        info!(
            alert_id = %alert.id,
            actor = %principal.id,
            "alert invalidated by administrative override"
        );
        Ok(alert)
    }

    /// Escalation acknowledgement stub. No state effect; command-center
    /// fan-out is handled outside this core.
    pub async fn escalate_alert(
        &self,
        alert_id: Uuid,
        principal: &Principal,
    ) -> SentinelResult<EscalationAck> {
        require_role(principal, Role::Reviewer, "escalate alerts")?;

        info!(%alert_id, reviewer = %principal.id, "alert escalation acknowledged");
        Ok(EscalationAck {
            message: "Alert escalated to EOC for rapid response".to_string(),
            escalation_id: format!("esc-{}", Uuid::new_v4()),
        })
    }
}

fn require_role(principal: &Principal, role: Role, action: &'static str) -> SentinelResult<()> {
    if principal.role == role {
        Ok(())
    } else {
        Err(SentinelError::Forbidden {
            role: principal.role,
            action,
        })
    }
}
