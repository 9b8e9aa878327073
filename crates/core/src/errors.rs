use thiserror::Error;

use crate::approvals::SelectionError;
use crate::domain::{contract::ContractStatus, user::UserRole};
use crate::gate::ContractAction;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid contract transition from {from:?} to {to:?}")]
    InvalidContractTransition { from: ContractStatus, to: ContractStatus },
    #[error("action {action:?} is not permitted for role {role:?} on a {status:?} contract")]
    ActionNotPermitted { action: ContractAction, status: ContractStatus, role: UserRole },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable machine-readable class for operator output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::ActionNotPermitted { .. }) => "action_not_permitted",
            Self::Domain(_) => "domain_validation",
            Self::Selection(_) => "selection_validation",
            Self::Input(_) => "input",
            Self::Configuration(_) => "config_validation",
        }
    }
}
