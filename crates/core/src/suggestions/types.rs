//! Types for the suggestion engine

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::approvals::ApprovalTrack;
use crate::domain::user::UserId;

/// Language used for reason and advisory text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Vi,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "vi" => Ok(Self::Vi),
            other => Err(format!("unsupported locale `{other}` (expected en|vi)")),
        }
    }
}

/// Why a track received its suggested approver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionReason {
    /// Content track, value above the director threshold
    DirectorForHighValue,
    /// Content track, value above the manager threshold
    ManagerForMidValue,
    /// Finance track, value above the finance threshold
    FinanceReviewForHighValue,
    /// Legal track, commercial contract
    LegalReviewForCommercial,
    /// Legal track, internal contract above the legal threshold
    LegalRiskForHighValue,
}

impl SuggestionReason {
    pub fn text(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::DirectorForHighValue, Locale::En) => {
                "high-value contract requires director approval"
            }
            (Self::DirectorForHighValue, Locale::Vi) => {
                "Hợp đồng giá trị cao cần phê duyệt từ Giám đốc"
            }
            (Self::ManagerForMidValue, Locale::En) => "mid-value contract suits manager approval",
            (Self::ManagerForMidValue, Locale::Vi) => {
                "Hợp đồng giá trị trung bình phù hợp với Manager"
            }
            (Self::FinanceReviewForHighValue, Locale::En) => {
                "high financial value requires finance department review"
            }
            (Self::FinanceReviewForHighValue, Locale::Vi) => {
                "Hợp đồng có giá trị tài chính cao cần kiểm tra từ bộ phận Tài chính"
            }
            (Self::LegalReviewForCommercial, Locale::En) => {
                "commercial contract requires legal review"
            }
            (Self::LegalReviewForCommercial, Locale::Vi) => {
                "Hợp đồng thương mại cần kiểm tra pháp lý"
            }
            (Self::LegalRiskForHighValue, Locale::En) => {
                "high-value contract requires legal risk assessment"
            }
            (Self::LegalRiskForHighValue, Locale::Vi) => {
                "Hợp đồng giá trị cao cần đánh giá rủi ro pháp lý"
            }
        }
    }
}

impl fmt::Display for SuggestionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text(Locale::En))
    }
}

/// A suggested approver together with its justification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSuggestion {
    pub approver: UserId,
    pub reason: SuggestionReason,
}

/// Default approver assignment for all three tracks.
///
/// A track is `None` when the rules do not call for it or when the roster
/// has nobody with the required role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub content: Option<TrackSuggestion>,
    pub finance: Option<TrackSuggestion>,
    pub legal: Option<TrackSuggestion>,
}

impl Suggestion {
    pub fn track(&self, track: ApprovalTrack) -> Option<&TrackSuggestion> {
        match track {
            ApprovalTrack::Content => self.content.as_ref(),
            ApprovalTrack::Finance => self.finance.as_ref(),
            ApprovalTrack::Legal => self.legal.as_ref(),
        }
    }

    pub fn approver(&self, track: ApprovalTrack) -> Option<&UserId> {
        self.track(track).map(|suggestion| &suggestion.approver)
    }

    pub fn reason(&self, track: ApprovalTrack) -> Option<SuggestionReason> {
        self.track(track).map(|suggestion| suggestion.reason)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.finance.is_none() && self.legal.is_none()
    }

    /// Reason text for every populated track, in content/finance/legal order.
    pub fn reasons(&self, locale: Locale) -> Vec<(ApprovalTrack, &'static str)> {
        ApprovalTrack::ALL
            .into_iter()
            .filter_map(|track| self.reason(track).map(|reason| (track, reason.text(locale))))
            .collect()
    }
}

/// Informational notice shown alongside a suggestion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Staff content, finance and legal review regardless of the suggestion
    FullReviewRecommended,
}

impl Advisory {
    pub fn text(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::FullReviewRecommended, Locale::En) => {
                "high-value contract: approval from all three tracks (content, finance, legal) is recommended"
            }
            (Self::FullReviewRecommended, Locale::Vi) => {
                "Khuyến nghị có đầy đủ phê duyệt từ cả 3 bộ phận: Nội dung, Tài chính và Pháp chế."
            }
        }
    }
}

/// Value thresholds in đồng; every comparison is strictly greater-than.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionThresholds {
    pub director: Decimal,
    pub manager: Decimal,
    pub finance: Decimal,
    pub legal: Decimal,
    pub full_review: Decimal,
}

impl Default for SuggestionThresholds {
    fn default() -> Self {
        Self {
            director: Decimal::from(super::DIRECTOR_THRESHOLD),
            manager: Decimal::from(super::MANAGER_THRESHOLD),
            finance: Decimal::from(super::FINANCE_THRESHOLD),
            legal: Decimal::from(super::LEGAL_THRESHOLD),
            full_review: Decimal::from(super::FULL_REVIEW_THRESHOLD),
        }
    }
}
