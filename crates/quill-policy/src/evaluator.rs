//! Policy evaluation.
//!
//! Rules run in order and the first match wins.
//!
//! Articles:
//! 1. anonymous caller: deny
//! 2. administrator: allow
//! 3. `VIEW_LIST`: deny (listing is administrative)
//! 4. owner missing or disabled: deny
//! 5. allow iff the caller owns the article
//!
//! Users:
//! 1. anonymous caller: allow `CREATE` (registration), deny the rest
//! 2. administrator: allow
//! 3. `VIEW_LIST`: deny
//! 4. target disabled: deny
//! 5. allow iff the caller is the target

use crate::action::Action;
use crate::audit::log_decision;
use crate::error::{AuthzError, AuthzResult};
use crate::principal::Principal;
use crate::subject::{ArticleSubject, Subject, UserSubject};
use quill_common_config::SecurityConfig;
use quill_common_log::spans::decision_span;
use serde::Serialize;
use std::fmt;

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// No authenticated caller.
    Anonymous,
    /// Anonymous callers may register.
    Registration,
    Administrator,
    /// Collections are visible to administrators only.
    AdminOnlyListing,
    /// The article has no owner to compare against.
    MissingOwner,
    OwnerDisabled,
    TargetDisabled,
    Owner,
    NotOwner,
    SelfAccess,
    OtherUser,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Registration => "registration",
            Self::Administrator => "administrator",
            Self::AdminOnlyListing => "admin_only_listing",
            Self::MissingOwner => "missing_owner",
            Self::OwnerDisabled => "owner_disabled",
            Self::TargetDisabled => "target_disabled",
            Self::Owner => "owner",
            Self::NotOwner => "not_owner",
            Self::SelfAccess => "self_access",
            Self::OtherUser => "other_user",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub decision: Decision,
    pub reason: Reason,
}

impl Verdict {
    fn allow(reason: Reason) -> Self {
        Self {
            decision: Decision::Allow,
            reason,
        }
    }

    fn deny(reason: Reason) -> Self {
        Self {
            decision: Decision::Deny,
            reason,
        }
    }

    fn allow_if(cond: bool, yes: Reason, no: Reason) -> Self {
        if cond {
            Self::allow(yes)
        } else {
            Self::deny(no)
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }
}

/// Evaluate the policy and report which rule decided.
pub fn evaluate(actor: Option<&Principal>, action: Action, subject: &Subject) -> Verdict {
    match subject {
        Subject::Article(article) => evaluate_article(actor, action, article),
        Subject::User(user) => evaluate_user(actor, action, user),
    }
}

/// Evaluate the policy.
pub fn decide(actor: Option<&Principal>, action: Action, subject: &Subject) -> Decision {
    evaluate(actor, action, subject).decision
}

fn evaluate_article(actor: Option<&Principal>, action: Action, article: &ArticleSubject) -> Verdict {
    let Some(actor) = actor else {
        return Verdict::deny(Reason::Anonymous);
    };

    if actor.is_admin() {
        return Verdict::allow(Reason::Administrator);
    }

    if action == Action::ViewList {
        return Verdict::deny(Reason::AdminOnlyListing);
    }

    let Some(owner) = article.owner else {
        return Verdict::deny(Reason::MissingOwner);
    };

    if owner.status.is_disabled() {
        return Verdict::deny(Reason::OwnerDisabled);
    }

    Verdict::allow_if(owner.id == actor.id, Reason::Owner, Reason::NotOwner)
}

fn evaluate_user(actor: Option<&Principal>, action: Action, user: &UserSubject) -> Verdict {
    let Some(actor) = actor else {
        return Verdict::allow_if(action == Action::Create, Reason::Registration, Reason::Anonymous);
    };

    if actor.is_admin() {
        return Verdict::allow(Reason::Administrator);
    }

    if action == Action::ViewList {
        return Verdict::deny(Reason::AdminOnlyListing);
    }

    if user.status.is_disabled() {
        return Verdict::deny(Reason::TargetDisabled);
    }

    Verdict::allow_if(user.id == Some(actor.id), Reason::SelfAccess, Reason::OtherUser)
}

/// Which decisions get an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditMode {
    Off,
    #[default]
    DenialsOnly,
    All,
}

/// Stateless policy front-end with decision auditing.
///
/// Holds only configuration, so one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEvaluator {
    audit: AuditMode,
}

impl PolicyEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        let audit = match (config.audit_decisions, config.log_granted) {
            (false, _) => AuditMode::Off,
            (true, false) => AuditMode::DenialsOnly,
            (true, true) => AuditMode::All,
        };
        Self { audit }
    }

    pub fn with_audit(mut self, audit: AuditMode) -> Self {
        self.audit = audit;
        self
    }

    pub fn audit_mode(&self) -> AuditMode {
        self.audit
    }

    /// Evaluate and audit one decision.
    pub fn check(&self, actor: Option<&Principal>, action: Action, subject: &Subject) -> Verdict {
        let kind = subject.kind().to_string();
        let span = decision_span(action.as_str(), &kind);
        let _guard = span.enter();

        let verdict = evaluate(actor, action, subject);

        let audited = match self.audit {
            AuditMode::Off => false,
            AuditMode::DenialsOnly => !verdict.is_allowed(),
            AuditMode::All => true,
        };
        if audited {
            log_decision(actor, action, subject, verdict);
        }

        verdict
    }

    pub fn is_granted(&self, actor: Option<&Principal>, action: Action, subject: &Subject) -> bool {
        self.check(actor, action, subject).is_allowed()
    }

    /// Check and convert a denial into an error for the calling layer.
    pub fn authorize(
        &self,
        actor: Option<&Principal>,
        action: Action,
        subject: &Subject,
    ) -> AuthzResult<()> {
        let verdict = self.check(actor, action, subject);
        if verdict.is_allowed() {
            return Ok(());
        }

        match actor {
            None => Err(AuthzError::Unauthenticated {
                action,
                resource: subject.kind(),
            }),
            Some(_) => Err(AuthzError::Forbidden {
                action,
                resource: subject.kind(),
                reason: verdict.reason,
            }),
        }
    }
}
