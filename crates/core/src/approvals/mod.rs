use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::user::{find_user, User, UserId, UserRole};
use crate::suggestions::Suggestion;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalTrack {
    Content,
    Finance,
    Legal,
}

impl ApprovalTrack {
    pub const ALL: [ApprovalTrack; 3] = [Self::Content, Self::Finance, Self::Legal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Finance => "finance",
            Self::Legal => "legal",
        }
    }

    /// Only the content track must be staffed before submission.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Content)
    }

    pub fn eligible_roles(&self) -> &'static [UserRole] {
        match self {
            Self::Content => &[UserRole::Manager, UserRole::Director, UserRole::Admin],
            Self::Finance => &[UserRole::Finance, UserRole::Director, UserRole::Admin],
            Self::Legal => &[UserRole::Legal, UserRole::Director, UserRole::Admin],
        }
    }

    pub fn accepts(&self, user: &User) -> bool {
        user.permissions.can_approve && self.eligible_roles().contains(&user.role)
    }
}

/// Roster members a human may pick for `track`, in roster order.
pub fn eligible_approvers(track: ApprovalTrack, roster: &[User]) -> Vec<&User> {
    roster.iter().filter(|user| track.accepts(user)).collect()
}

/// Approvers chosen for a contract.
///
/// Values are never edited in place: every change yields a new selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSelection {
    #[serde(default)]
    pub content: Option<UserId>,
    #[serde(default)]
    pub finance: Option<UserId>,
    #[serde(default)]
    pub legal: Option<UserId>,
}

impl ApprovalSelection {
    pub fn from_suggestion(suggestion: &Suggestion) -> Self {
        Self {
            content: suggestion.approver(ApprovalTrack::Content).cloned(),
            finance: suggestion.approver(ApprovalTrack::Finance).cloned(),
            legal: suggestion.approver(ApprovalTrack::Legal).cloned(),
        }
    }

    pub fn approver(&self, track: ApprovalTrack) -> Option<&UserId> {
        match track {
            ApprovalTrack::Content => self.content.as_ref(),
            ApprovalTrack::Finance => self.finance.as_ref(),
            ApprovalTrack::Legal => self.legal.as_ref(),
        }
    }

    #[must_use]
    pub fn with_approver(&self, track: ApprovalTrack, approver: Option<UserId>) -> Self {
        let mut next = self.clone();
        match track {
            ApprovalTrack::Content => next.content = approver,
            ApprovalTrack::Finance => next.finance = approver,
            ApprovalTrack::Legal => next.legal = approver,
        }
        next
    }

    pub fn is_submittable(&self) -> bool {
        self.content.is_some()
    }

    /// Checks the selection against the roster before it is submitted.
    ///
    /// The mandatory content approver is checked first, then each staffed
    /// track in content, finance, legal order.
    pub fn validate(&self, roster: &[User]) -> Result<(), SelectionError> {
        for track in ApprovalTrack::ALL.into_iter().filter(ApprovalTrack::is_required) {
            if self.approver(track).is_none() {
                return Err(SelectionError::MissingRequiredApprover { track });
            }
        }

        for track in ApprovalTrack::ALL {
            let Some(approver) = self.approver(track) else {
                continue;
            };

            let Some(user) = find_user(roster, approver) else {
                return Err(SelectionError::UnknownApprover { track, approver: approver.clone() });
            };

            if !track.accepts(user) {
                return Err(SelectionError::IneligibleApprover {
                    track,
                    approver: approver.clone(),
                    role: user.role,
                });
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("a {} approver is required", .track.as_str())]
    MissingRequiredApprover { track: ApprovalTrack },
    #[error("{} approver `{}` is not on the roster", .track.as_str(), .approver.as_str())]
    UnknownApprover { track: ApprovalTrack, approver: UserId },
    #[error(
        "{} approver `{}` with role `{}` cannot approve this track",
        .track.as_str(),
        .approver.as_str(),
        .role.as_str()
    )]
    IneligibleApprover { track: ApprovalTrack, approver: UserId, role: UserRole },
}

#[cfg(test)]
mod tests {
    use super::{eligible_approvers, ApprovalSelection, ApprovalTrack, SelectionError};
    use crate::domain::user::{Permissions, User, UserId, UserRole};
    use crate::suggestions::{Suggestion, SuggestionReason, TrackSuggestion};

    fn approver(id: &str, role: UserRole) -> User {
        User {
            id: UserId::from(id),
            name: id.to_string(),
            role,
            permissions: Permissions { can_approve: true, ..Permissions::default() },
        }
    }

    fn roster() -> Vec<User> {
        let mut observer = approver("u-mgr-observer", UserRole::Manager);
        observer.permissions.can_approve = false;
        vec![
            approver("u-employee", UserRole::Employee),
            approver("u-manager", UserRole::Manager),
            observer,
            approver("u-director", UserRole::Director),
            approver("u-finance", UserRole::Finance),
            approver("u-legal", UserRole::Legal),
            approver("u-admin", UserRole::Admin),
        ]
    }

    fn ids(users: Vec<&User>) -> Vec<&str> {
        users.into_iter().map(|user| user.id.as_str()).collect()
    }

    #[test]
    fn eligible_approvers_require_permission_and_role() {
        let roster = roster();

        assert_eq!(
            ids(eligible_approvers(ApprovalTrack::Content, &roster)),
            vec!["u-manager", "u-director", "u-admin"]
        );
        assert_eq!(
            ids(eligible_approvers(ApprovalTrack::Finance, &roster)),
            vec!["u-director", "u-finance", "u-admin"]
        );
        assert_eq!(
            ids(eligible_approvers(ApprovalTrack::Legal, &roster)),
            vec!["u-director", "u-legal", "u-admin"]
        );
    }

    #[test]
    fn selection_is_seeded_from_suggestion() {
        let suggestion = Suggestion {
            content: Some(TrackSuggestion {
                approver: UserId::from("u-manager"),
                reason: SuggestionReason::ManagerForMidValue,
            }),
            finance: None,
            legal: Some(TrackSuggestion {
                approver: UserId::from("u-legal"),
                reason: SuggestionReason::LegalReviewForCommercial,
            }),
        };

        let selection = ApprovalSelection::from_suggestion(&suggestion);
        assert_eq!(selection.content, Some(UserId::from("u-manager")));
        assert_eq!(selection.finance, None);
        assert_eq!(selection.legal, Some(UserId::from("u-legal")));
    }

    #[test]
    fn overriding_a_track_returns_a_new_selection() {
        let original = ApprovalSelection {
            content: Some(UserId::from("u-manager")),
            ..ApprovalSelection::default()
        };

        let updated = original
            .with_approver(ApprovalTrack::Content, Some(UserId::from("u-director")))
            .with_approver(ApprovalTrack::Finance, Some(UserId::from("u-finance")));

        assert_eq!(original.content, Some(UserId::from("u-manager")));
        assert_eq!(original.finance, None);
        assert_eq!(updated.content, Some(UserId::from("u-director")));
        assert_eq!(updated.finance, Some(UserId::from("u-finance")));
    }

    #[test]
    fn missing_content_approver_blocks_submission() {
        let selection = ApprovalSelection {
            finance: Some(UserId::from("u-finance")),
            ..ApprovalSelection::default()
        };

        assert!(!selection.is_submittable());
        assert_eq!(
            selection.validate(&roster()),
            Err(SelectionError::MissingRequiredApprover { track: ApprovalTrack::Content })
        );
    }

    #[test]
    fn unknown_approver_is_rejected() {
        let selection = ApprovalSelection {
            content: Some(UserId::from("u-manager")),
            legal: Some(UserId::from("u-ghost")),
            ..ApprovalSelection::default()
        };

        assert_eq!(
            selection.validate(&roster()),
            Err(SelectionError::UnknownApprover {
                track: ApprovalTrack::Legal,
                approver: UserId::from("u-ghost"),
            })
        );
    }

    #[test]
    fn approver_without_permission_or_role_is_rejected() {
        let without_permission = ApprovalSelection {
            content: Some(UserId::from("u-mgr-observer")),
            ..ApprovalSelection::default()
        };
        assert!(matches!(
            without_permission.validate(&roster()),
            Err(SelectionError::IneligibleApprover { track: ApprovalTrack::Content, .. })
        ));

        let wrong_role = ApprovalSelection {
            content: Some(UserId::from("u-manager")),
            finance: Some(UserId::from("u-legal")),
            ..ApprovalSelection::default()
        };
        let error = wrong_role.validate(&roster()).expect_err("legal cannot staff finance");
        assert_eq!(
            error.to_string(),
            "finance approver `u-legal` with role `legal` cannot approve this track"
        );
    }

    #[test]
    fn fully_staffed_selection_is_valid() {
        let selection = ApprovalSelection {
            content: Some(UserId::from("u-director")),
            finance: Some(UserId::from("u-finance")),
            legal: Some(UserId::from("u-admin")),
        };

        assert_eq!(selection.validate(&roster()), Ok(()));
    }
}
