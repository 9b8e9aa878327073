use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::contract::{Contract, ContractStatus};
use crate::domain::user::User;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractAction {
    Edit,
    SendForApproval,
    Resubmit,
    Reapprove,
}

impl ContractAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::SendForApproval => "send_for_approval",
            Self::Resubmit => "resubmit",
            Self::Reapprove => "reapprove",
        }
    }

    /// Status the contract moves to once the action is carried out.
    pub fn target_status(&self) -> Option<ContractStatus> {
        match self {
            Self::Edit => None,
            Self::SendForApproval | Self::Resubmit | Self::Reapprove => {
                Some(ContractStatus::Pending)
            }
        }
    }
}

impl std::str::FromStr for ContractAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "edit" => Ok(Self::Edit),
            "send_for_approval" => Ok(Self::SendForApproval),
            "resubmit" => Ok(Self::Resubmit),
            "reapprove" => Ok(Self::Reapprove),
            other => Err(format!(
                "unsupported action `{other}` (expected edit|send-for-approval|resubmit|reapprove)"
            )),
        }
    }
}

/// Which rule set decides the permitted actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Resubmission is folded into send-for-approval; adds reapprove.
    #[default]
    Canonical,
    /// Deprecated. Separate resubmit action, no admin overrides for sending.
    Legacy,
}

impl std::str::FromStr for GatePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(Self::Canonical),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unsupported gate policy `{other}` (expected canonical|legacy)")),
        }
    }
}

/// Decides which workflow actions an actor may take on a contract.
///
/// Signed and expired contracts expose nothing, for every actor and under
/// both policies.
#[derive(Clone, Debug, Default)]
pub struct ActionGate {
    policy: GatePolicy,
}

impl ActionGate {
    pub fn new(policy: GatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    pub fn permitted_actions(
        &self,
        status: ContractStatus,
        actor: &User,
    ) -> BTreeSet<ContractAction> {
        if status.is_terminal() {
            return BTreeSet::new();
        }

        match self.policy {
            GatePolicy::Canonical => canonical_actions(status, actor),
            GatePolicy::Legacy => legacy_actions(status, actor),
        }
    }

    pub fn is_permitted(
        &self,
        status: ContractStatus,
        actor: &User,
        action: ContractAction,
    ) -> bool {
        self.permitted_actions(status, actor).contains(&action)
    }

    pub fn authorize(
        &self,
        status: ContractStatus,
        actor: &User,
        action: ContractAction,
    ) -> Result<(), DomainError> {
        if self.is_permitted(status, actor, action) {
            return Ok(());
        }

        Err(DomainError::ActionNotPermitted { action, status, role: actor.role })
    }

    pub fn authorize_with_audit<S>(
        &self,
        status: ContractStatus,
        actor: &User,
        action: ContractAction,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<(), DomainError>
    where
        S: AuditSink,
    {
        let result = self.authorize(status, actor, action);
        let (event_type, outcome) = match &result {
            Ok(()) => ("gate.action_authorized", AuditOutcome::Success),
            Err(_) => ("gate.action_denied", AuditOutcome::Rejected),
        };
        sink.emit(
            AuditEvent::new(audit, event_type, AuditCategory::Gate, outcome)
                .with_metadata("action", action.as_str())
                .with_metadata("status", status.as_str())
                .with_metadata("role", actor.role.as_str())
                .with_metadata("policy", format!("{:?}", self.policy)),
        );
        result
    }

    /// Carries out `action` and returns the updated contract.
    ///
    /// The input contract is left untouched. Edit keeps the status; the
    /// submission actions move the contract back into review.
    pub fn apply(
        &self,
        contract: &Contract,
        actor: &User,
        action: ContractAction,
    ) -> Result<Contract, DomainError> {
        self.authorize(contract.status, actor, action)?;

        let mut next = contract.clone();
        if let Some(target) = action.target_status() {
            next.transition_to(target)?;
        }
        Ok(next)
    }

    pub fn apply_with_audit<S>(
        &self,
        contract: &Contract,
        actor: &User,
        action: ContractAction,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<Contract, DomainError>
    where
        S: AuditSink,
    {
        let result = self.apply(contract, actor, action);
        match &result {
            Ok(next) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "contract.action_applied",
                        AuditCategory::Lifecycle,
                        AuditOutcome::Success,
                    )
                    .with_metadata("action", action.as_str())
                    .with_metadata("from", contract.status.as_str())
                    .with_metadata("to", next.status.as_str()),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "contract.action_rejected",
                        AuditCategory::Lifecycle,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("action", action.as_str())
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}

fn canonical_actions(status: ContractStatus, actor: &User) -> BTreeSet<ContractAction> {
    let admin = actor.is_admin();
    let mut actions = BTreeSet::new();

    if status.is_editable() || admin {
        actions.insert(ContractAction::Edit);
    }
    if status.is_editable() && (actor.permissions.can_upload || admin) {
        actions.insert(ContractAction::SendForApproval);
    }
    if status == ContractStatus::Rejected && (actor.permissions.can_approve || admin) {
        actions.insert(ContractAction::Reapprove);
    }

    actions
}

fn legacy_actions(status: ContractStatus, actor: &User) -> BTreeSet<ContractAction> {
    let mut actions = BTreeSet::new();

    if actor.is_admin() || status.is_editable() {
        actions.insert(ContractAction::Edit);
    }
    if status == ContractStatus::Draft && actor.permissions.can_upload {
        actions.insert(ContractAction::SendForApproval);
    }
    if status == ContractStatus::Rejected && actor.permissions.can_upload {
        actions.insert(ContractAction::Resubmit);
    }

    actions
}
