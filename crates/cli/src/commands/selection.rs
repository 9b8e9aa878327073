use std::path::PathBuf;

use pactum_core::approvals::{eligible_approvers, ApprovalSelection, ApprovalTrack};
use pactum_core::domain::user::User;
use pactum_core::errors::ApplicationError;
use serde::Serialize;

use crate::commands::{read_json, CommandResult, EXIT_RULE_REJECTION};

const COMMAND: &str = "check-selection";

#[derive(Clone, Debug)]
pub struct SelectionArgs {
    pub selection: PathBuf,
    pub roster: PathBuf,
}

#[derive(Debug, Serialize)]
struct EligibleView {
    track: ApprovalTrack,
    required: bool,
    candidates: Vec<String>,
}

pub fn run(args: &SelectionArgs) -> CommandResult {
    let selection: ApprovalSelection = match read_json(&args.selection) {
        Ok(selection) => selection,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };
    let roster: Vec<User> = match read_json(&args.roster) {
        Ok(roster) => roster,
        Err(error) => return CommandResult::input_failure(COMMAND, &error),
    };

    if let Err(error) = selection.validate(&roster) {
        tracing::warn!(
            event_name = "cli.selection.rejected",
            error = %error,
            "approval selection rejected"
        );
        let error = ApplicationError::from(error);
        return CommandResult::failure(
            COMMAND,
            error.error_class(),
            error.to_string(),
            EXIT_RULE_REJECTION,
        );
    }

    let eligible = ApprovalTrack::ALL
        .into_iter()
        .map(|track| EligibleView {
            track,
            required: track.is_required(),
            candidates: eligible_approvers(track, &roster)
                .into_iter()
                .map(|user| user.id.as_str().to_string())
                .collect(),
        })
        .collect::<Vec<_>>();

    tracing::info!(event_name = "cli.selection.accepted", "approval selection accepted");
    CommandResult::success_with_data(COMMAND, "selection is valid", &eligible)
}
