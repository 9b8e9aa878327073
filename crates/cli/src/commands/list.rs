use std::path::PathBuf;

use pactum_core::domain::contract::{Contract, ContractStatus};
use pactum_core::listing::ContractQuery;
use serde::Serialize;

use crate::commands::{read_json, CommandResult};

const COMMAND: &str = "list";

#[derive(Clone, Debug)]
pub struct ListArgs {
    pub contracts: PathBuf,
    pub search: Option<String>,
    pub status: Option<ContractStatus>,
}

#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    id: &'a str,
    title: &'a str,
    status: ContractStatus,
    status_label: &'static str,
}

pub fn run(args: &ListArgs) -> CommandResult {
    let contracts: Vec<Contract> = match read_json(&args.contracts) {
        Ok(contracts) => contracts,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };

    let query = ContractQuery { search: args.search.clone(), status: args.status };
    let entries = query
        .apply(&contracts)
        .into_iter()
        .map(|contract| ListEntry {
            id: contract.id.as_str(),
            title: &contract.title,
            status: contract.status,
            status_label: contract.status.label_vi(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        event_name = "cli.list.filtered",
        total = contracts.len(),
        matched = entries.len(),
        "contract list filtered"
    );

    let message = format!("{} of {} contract(s) matched", entries.len(), contracts.len());
    CommandResult::success_with_data(COMMAND, message, &entries)
}
