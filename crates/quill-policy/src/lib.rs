//! Ownership-based authorization for Quill.
//!
//! The policy answers one question: may this principal (or an anonymous
//! caller) perform this action on this user or article? See
//! [`evaluator::evaluate`] for the rule order.

pub mod action;
pub mod audit;
pub mod error;
pub mod evaluator;
pub mod owner;
pub mod principal;
pub mod role;
pub mod subject;

pub use action::{Action, ActionParseError};
pub use audit::{log_decision, DecisionAuditEvent};
pub use error::{AuthzError, AuthzResult};
pub use evaluator::{decide, evaluate, AuditMode, Decision, PolicyEvaluator, Reason, Verdict};
pub use owner::{validate_owner, OwnerViolation};
pub use principal::Principal;
pub use role::{Role, RoleParseError, RoleSet};
pub use subject::{ArticleSubject, OwnerRef, ResourceKind, Subject, UserSubject};
