use std::path::PathBuf;

use pactum_core::config::AppConfig;
use pactum_core::domain::contract::{Contract, ContractStatus};
use pactum_core::domain::user::{User, UserRole};
use pactum_core::gate::{ActionGate, ContractAction, GatePolicy};
use serde::Serialize;

use crate::commands::{read_json, CommandResult};

const COMMAND: &str = "actions";

#[derive(Clone, Debug)]
pub struct ActionsArgs {
    pub contract: PathBuf,
    pub actor: PathBuf,
}

#[derive(Debug, Serialize)]
struct ActionsView {
    contract_id: String,
    status: ContractStatus,
    status_label: &'static str,
    role: UserRole,
    role_label: &'static str,
    policy: GatePolicy,
    actions: Vec<ContractAction>,
}

pub fn run(args: &ActionsArgs, config: &AppConfig) -> CommandResult {
    let contract: Contract = match read_json(&args.contract) {
        Ok(contract) => contract,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };
    let actor: User = match read_json(&args.actor) {
        Ok(actor) => actor,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };

    let gate = gate_for(config);
    let actions = gate.permitted_actions(contract.status, &actor).into_iter().collect::<Vec<_>>();

    tracing::info!(
        event_name = "cli.actions.evaluated",
        contract_id = contract.id.as_str(),
        status = contract.status.as_str(),
        role = actor.role.as_str(),
        permitted = actions.len(),
        "permitted actions evaluated"
    );

    let message = if actions.is_empty() {
        format!("no actions available on a {} contract", contract.status.as_str())
    } else {
        actions.iter().map(ContractAction::as_str).collect::<Vec<_>>().join(", ")
    };
    let view = ActionsView {
        contract_id: contract.id.as_str().to_string(),
        status: contract.status,
        status_label: contract.status.label_vi(),
        role: actor.role,
        role_label: actor.role.label_vi(),
        policy: gate.policy(),
        actions,
    };
    CommandResult::success_with_data(COMMAND, message, &view)
}

pub(crate) fn gate_for(config: &AppConfig) -> ActionGate {
    if config.gate.policy == GatePolicy::Legacy {
        tracing::warn!(
            event_name = "cli.gate.legacy_policy",
            "legacy gate policy is deprecated; switch gate.policy to canonical"
        );
    }
    ActionGate::new(config.gate.policy)
}
