pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use pactum_core::analytics::{GroupBy, Period};
use pactum_core::domain::contract::ContractStatus;
use pactum_core::gate::ContractAction;
use pactum_core::suggestions::Locale;

use crate::commands::{
    actions::ActionsArgs, apply::ApplyArgs, list::ListArgs, selection::SelectionArgs,
    stats::StatsArgs, suggest::SuggestArgs, CommandResult,
};

#[derive(Debug, Parser)]
#[command(
    name = "pactum",
    about = "Pactum contract approval rules CLI",
    long_about = "Evaluate approver suggestions, action gating, approval selections, and contract statistics from JSON documents.",
    after_help = "Examples:\n  pactum suggest --contract contract.json --roster roster.json\n  pactum actions --contract contract.json --actor actor.json\n  pactum config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Suggest default approvers per review track for a contract")]
    Suggest {
        #[arg(long, help = "Path to the contract JSON document")]
        contract: PathBuf,
        #[arg(long, help = "Path to the roster JSON array")]
        roster: PathBuf,
        #[arg(long, help = "Language for reason text (en|vi); defaults to display.locale")]
        locale: Option<Locale>,
    },
    #[command(about = "List the workflow actions an actor may take on a contract")]
    Actions {
        #[arg(long, help = "Path to the contract JSON document")]
        contract: PathBuf,
        #[arg(long, help = "Path to the acting user JSON document")]
        actor: PathBuf,
    },
    #[command(about = "Apply a workflow action and print the updated contract with audit events")]
    Apply {
        #[arg(long, help = "Path to the contract JSON document")]
        contract: PathBuf,
        #[arg(long, help = "Path to the acting user JSON document")]
        actor: PathBuf,
        #[arg(long, help = "edit|send-for-approval|resubmit|reapprove")]
        action: ContractAction,
    },
    #[command(about = "Validate an approver selection against a roster")]
    CheckSelection {
        #[arg(long, help = "Path to the selection JSON document")]
        selection: PathBuf,
        #[arg(long, help = "Path to the roster JSON array")]
        roster: PathBuf,
    },
    #[command(about = "Summarize contract statistics over a time window")]
    Stats {
        #[arg(long, help = "Path to the contracts JSON array")]
        contracts: PathBuf,
        #[arg(long, default_value = "30days", help = "7days|30days|90days|1year|custom")]
        period: Period,
        #[arg(long, help = "Custom window start (RFC 3339)")]
        from: Option<DateTime<Utc>>,
        #[arg(long, help = "Custom window end (RFC 3339)")]
        to: Option<DateTime<Utc>>,
        #[arg(long, default_value = "day", help = "day|month|year")]
        group_by: GroupBy,
        #[arg(long, help = "Reference time for the window (RFC 3339); defaults to now")]
        as_of: Option<DateTime<Utc>>,
    },
    #[command(about = "Search and filter a contract list")]
    List {
        #[arg(long, help = "Path to the contracts JSON array")]
        contracts: PathBuf,
        #[arg(long, help = "Case-insensitive text matched against title and description")]
        search: Option<String>,
        #[arg(long, help = "Only include contracts with this status")]
        status: Option<ContractStatus>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Suggest { .. } => "suggest",
            Self::Actions { .. } => "actions",
            Self::Apply { .. } => "apply",
            Self::CheckSelection { .. } => "check-selection",
            Self::Stats { .. } => "stats",
            Self::List { .. } => "list",
            Self::Config => "config",
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let result = execute(cli.command);

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn execute(command: Command) -> CommandResult {
    let config = match commands::load_config(command.name()) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    logging::init_logging(&config.logging);

    match command {
        Command::Suggest { contract, roster, locale } => {
            commands::suggest::run(&SuggestArgs { contract, roster, locale }, &config)
        }
        Command::Actions { contract, actor } => {
            commands::actions::run(&ActionsArgs { contract, actor }, &config)
        }
        Command::Apply { contract, actor, action } => {
            commands::apply::run(&ApplyArgs { contract, actor, action }, &config)
        }
        Command::CheckSelection { selection, roster } => {
            commands::selection::run(&SelectionArgs { selection, roster })
        }
        Command::Stats { contracts, period, from, to, group_by, as_of } => {
            commands::stats::run(&StatsArgs { contracts, period, from, to, group_by, as_of })
        }
        Command::List { contracts, search, status } => {
            commands::list::run(&ListArgs { contracts, search, status })
        }
        Command::Config => commands::config::run(&config),
    }
}
