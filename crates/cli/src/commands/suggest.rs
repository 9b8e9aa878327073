use std::path::PathBuf;

use pactum_core::approvals::{ApprovalSelection, ApprovalTrack};
use pactum_core::config::AppConfig;
use pactum_core::domain::contract::Contract;
use pactum_core::domain::user::User;
use pactum_core::suggestions::{ApprovalSuggestionEngine, Locale, SuggestionReason};
use serde::Serialize;

use crate::commands::{read_json, CommandResult};

const COMMAND: &str = "suggest";

#[derive(Clone, Debug)]
pub struct SuggestArgs {
    pub contract: PathBuf,
    pub roster: PathBuf,
    pub locale: Option<Locale>,
}

#[derive(Debug, Serialize)]
struct TrackView {
    track: ApprovalTrack,
    approver: String,
    reason: SuggestionReason,
    text: &'static str,
}

#[derive(Debug, Serialize)]
struct SuggestView {
    contract_id: String,
    tracks: Vec<TrackView>,
    advisory: Option<&'static str>,
    selection: ApprovalSelection,
    submittable: bool,
}

pub fn run(args: &SuggestArgs, config: &AppConfig) -> CommandResult {
    let contract: Contract = match read_json(&args.contract) {
        Ok(contract) => contract,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };
    let roster: Vec<User> = match read_json(&args.roster) {
        Ok(roster) => roster,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };

    let locale = args.locale.unwrap_or(config.display.locale);
    let engine = ApprovalSuggestionEngine::new(config.rules.to_thresholds());
    let suggestion = engine.suggest(&contract, &roster);
    let advisory = engine.advisory(&contract);

    let tracks = ApprovalTrack::ALL
        .into_iter()
        .filter_map(|track| suggestion.track(track).map(|entry| (track, entry)))
        .map(|(track, entry)| TrackView {
            track,
            approver: entry.approver.as_str().to_string(),
            reason: entry.reason,
            text: entry.reason.text(locale),
        })
        .collect::<Vec<_>>();

    tracing::info!(
        event_name = "cli.suggest.computed",
        contract_id = contract.id.as_str(),
        roster_size = roster.len(),
        tracks = tracks.len(),
        advisory = advisory.is_some(),
        "approval suggestion computed"
    );

    let selection = ApprovalSelection::from_suggestion(&suggestion);
    let view = SuggestView {
        contract_id: contract.id.as_str().to_string(),
        tracks,
        advisory: advisory.map(|advisory| advisory.text(locale)),
        submittable: selection.is_submittable(),
        selection,
    };

    let message = if suggestion.is_empty() {
        "no approvers suggested".to_string()
    } else {
        format!("{} track(s) suggested", view.tracks.len())
    };
    CommandResult::success_with_data(COMMAND, message, &view)
}
