//! Suggestion engine implementation

use rust_decimal::Decimal;

use super::types::*;
use crate::domain::contract::{Contract, ContractType};
use crate::domain::user::{first_with_role, User, UserRole};

/// Picks default approvers per track.
///
/// Each track is decided independently. "First member with role X" means
/// the first match in roster order; there is no secondary ranking.
#[derive(Clone, Debug, Default)]
pub struct ApprovalSuggestionEngine {
    thresholds: SuggestionThresholds,
}

impl ApprovalSuggestionEngine {
    pub fn new(thresholds: SuggestionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn suggest(&self, contract: &Contract, roster: &[User]) -> Suggestion {
        let value = contract.value_or_zero();

        Suggestion {
            content: self.suggest_content(value, roster),
            finance: self.suggest_finance(value, roster),
            legal: self.suggest_legal(value, contract.effective_type(), roster),
        }
    }

    /// Display-only notice; never changes what `suggest` returns.
    pub fn advisory(&self, contract: &Contract) -> Option<Advisory> {
        (contract.value_or_zero() > self.thresholds.full_review)
            .then_some(Advisory::FullReviewRecommended)
    }

    fn suggest_content(&self, value: Decimal, roster: &[User]) -> Option<TrackSuggestion> {
        // No fallback to a manager when the director branch finds nobody.
        if value > self.thresholds.director {
            return pick(roster, UserRole::Director, SuggestionReason::DirectorForHighValue);
        }

        if value > self.thresholds.manager {
            return pick(roster, UserRole::Manager, SuggestionReason::ManagerForMidValue);
        }

        None
    }

    fn suggest_finance(&self, value: Decimal, roster: &[User]) -> Option<TrackSuggestion> {
        if value > self.thresholds.finance {
            return pick(roster, UserRole::Finance, SuggestionReason::FinanceReviewForHighValue);
        }

        None
    }

    fn suggest_legal(
        &self,
        value: Decimal,
        contract_type: ContractType,
        roster: &[User],
    ) -> Option<TrackSuggestion> {
        let reason = if contract_type == ContractType::Commercial {
            SuggestionReason::LegalReviewForCommercial
        } else if value > self.thresholds.legal {
            SuggestionReason::LegalRiskForHighValue
        } else {
            return None;
        };

        pick(roster, UserRole::Legal, reason)
    }
}

fn pick(roster: &[User], role: UserRole, reason: SuggestionReason) -> Option<TrackSuggestion> {
    first_with_role(roster, role)
        .map(|user| TrackSuggestion { approver: user.id.clone(), reason })
}
