use std::path::PathBuf;

use chrono::{DateTime, Utc};
use pactum_core::analytics::{summarize, GroupBy, Period, TimeFilter};
use pactum_core::domain::contract::Contract;

use crate::commands::{read_json, CommandResult};

const COMMAND: &str = "stats";

#[derive(Clone, Debug)]
pub struct StatsArgs {
    pub contracts: PathBuf,
    pub period: Period,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub group_by: GroupBy,
    /// Reference time for the window; defaults to the current time.
    pub as_of: Option<DateTime<Utc>>,
}

pub fn run(args: &StatsArgs) -> CommandResult {
    let contracts: Vec<Contract> = match read_json(&args.contracts) {
        Ok(contracts) => contracts,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };

    let filter = TimeFilter {
        period: args.period,
        start: args.from,
        end: args.to,
        group_by: args.group_by,
    };
    let now = args.as_of.unwrap_or_else(Utc::now);
    let summary = summarize(&contracts, &filter, now);

    tracing::info!(
        event_name = "cli.stats.summarized",
        contracts = contracts.len(),
        in_window = summary.stats.total_contracts,
        buckets = summary.time_series.len(),
        "contract statistics summarized"
    );

    let message = format!(
        "{} contract(s) in window, {}% approved",
        summary.stats.total_contracts, summary.stats.approval_rate
    );
    CommandResult::success_with_data(COMMAND, message, &summary)
}
