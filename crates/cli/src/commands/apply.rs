use std::path::PathBuf;

use pactum_core::audit::{AuditContext, AuditEvent, InMemoryAuditSink};
use pactum_core::config::AppConfig;
use pactum_core::domain::contract::Contract;
use pactum_core::domain::user::User;
use pactum_core::errors::ApplicationError;
use pactum_core::gate::ContractAction;
use serde::Serialize;
use uuid::Uuid;

use crate::commands::actions::gate_for;
use crate::commands::{read_json, CommandResult, EXIT_RULE_REJECTION};

const COMMAND: &str = "apply";

#[derive(Clone, Debug)]
pub struct ApplyArgs {
    pub contract: PathBuf,
    pub actor: PathBuf,
    pub action: ContractAction,
}

#[derive(Debug, Serialize)]
struct ApplyView {
    contract: Contract,
    audit: Vec<AuditEvent>,
}

pub fn run(args: &ApplyArgs, config: &AppConfig) -> CommandResult {
    let contract: Contract = match read_json(&args.contract) {
        Ok(contract) => contract,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };
    let actor: User = match read_json(&args.actor) {
        Ok(actor) => actor,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };

    let correlation_id = Uuid::new_v4().to_string();
    let context =
        AuditContext::new(Some(contract.id.clone()), correlation_id.clone(), actor.id.as_str());
    let sink = InMemoryAuditSink::default();
    let gate = gate_for(config);

    match gate.apply_with_audit(&contract, &actor, args.action, &sink, &context) {
        Ok(next) => {
            tracing::info!(
                event_name = "cli.apply.completed",
                correlation_id = correlation_id.as_str(),
                contract_id = next.id.as_str(),
                action = args.action.as_str(),
                from = contract.status.as_str(),
                to = next.status.as_str(),
                "contract action applied"
            );
            let message = format!(
                "{} applied; contract is now {}",
                args.action.as_str(),
                next.status.as_str()
            );
            CommandResult::success_with_data(
                COMMAND,
                message,
                &ApplyView { contract: next, audit: sink.events() },
            )
        }
        Err(error) => {
            tracing::warn!(
                event_name = "cli.apply.rejected",
                correlation_id = correlation_id.as_str(),
                contract_id = contract.id.as_str(),
                action = args.action.as_str(),
                error = %error,
                "contract action rejected"
            );
            let error = ApplicationError::from(error);
            CommandResult::failure(
                COMMAND,
                error.error_class(),
                error.to_string(),
                EXIT_RULE_REJECTION,
            )
        }
    }
}
