//! Authorization audit logging.

use crate::action::Action;
use crate::evaluator::{Reason, Verdict};
use crate::principal::Principal;
use crate::subject::{ResourceKind, Subject};
use quill_common_core::{Timestamp, UserId};
use serde::Serialize;
use tracing::info;

/// Authorization audit event.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionAuditEvent {
    pub timestamp: Timestamp,
    /// `None` for anonymous callers.
    pub actor_id: Option<UserId>,
    pub action: Action,
    pub resource: ResourceKind,
    pub resource_id: Option<String>,
    pub granted: bool,
    pub reason: Reason,
}

impl DecisionAuditEvent {
    pub fn new(actor: Option<&Principal>, action: Action, subject: &Subject, verdict: Verdict) -> Self {
        Self {
            timestamp: Timestamp::now(),
            actor_id: actor.map(|p| p.id),
            action,
            resource: subject.kind(),
            resource_id: subject.resource_id(),
            granted: verdict.is_allowed(),
            reason: verdict.reason,
        }
    }

    pub fn log(&self) {
        let actor = self
            .actor_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "anonymous".to_string());

        if self.granted {
            info!(
                event = "authz_granted",
                actor = %actor,
                action = %self.action,
                resource = %self.resource,
                resource_id = ?self.resource_id,
                reason = %self.reason,
                "Authorization granted"
            );
        } else {
            info!(
                event = "authz_denied",
                actor = %actor,
                action = %self.action,
                resource = %self.resource,
                resource_id = ?self.resource_id,
                reason = %self.reason,
                "Authorization denied"
            );
        }
    }
}

/// Log one authorization decision.
pub fn log_decision(actor: Option<&Principal>, action: Action, subject: &Subject, verdict: Verdict) {
    DecisionAuditEvent::new(actor, action, subject, verdict).log();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::subject::OwnerRef;
    use quill_common_core::{ArticleId, UserStatus};

    #[test]
    fn test_event_captures_decision() {
        let actor = Principal::new(UserId::new(1));
        let subject = Subject::article(
            ArticleId::new(6),
            OwnerRef::new(UserId::new(2), UserStatus::Active),
        );
        let verdict = evaluate(Some(&actor), Action::Edit, &subject);
        let event = DecisionAuditEvent::new(Some(&actor), Action::Edit, &subject, verdict);

        assert_eq!(event.actor_id, Some(UserId::new(1)));
        assert_eq!(event.resource, ResourceKind::Article);
        assert_eq!(event.resource_id.as_deref(), Some("art_6"));
        assert!(!event.granted);
        assert_eq!(event.reason, Reason::NotOwner);
    }

    #[test]
    fn test_event_serializes() {
        let subject = Subject::new_user();
        let verdict = evaluate(None, Action::Create, &subject);
        let event = DecisionAuditEvent::new(None, Action::Create, &subject, verdict);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["action"], "CREATE");
        assert_eq!(json["resource"], "user");
        assert_eq!(json["reason"], "registration");
        assert_eq!(json["granted"], true);
        assert!(json["actor_id"].is_null());
    }
}
