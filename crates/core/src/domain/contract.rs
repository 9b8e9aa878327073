use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub String);

impl ContractId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Signed,
    Expired,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Signed => "signed",
            Self::Expired => "expired",
        }
    }

    /// Vietnamese label used on status badges.
    pub fn label_vi(&self) -> &'static str {
        match self {
            Self::Draft => "Nháp",
            Self::Pending => "Chờ duyệt",
            Self::Approved => "Đã duyệt",
            Self::Rejected => "Từ chối",
            Self::Signed => "Đã ký",
            Self::Expired => "Hết hạn",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Signed | Self::Expired)
    }

    /// Draft and rejected contracts are still owned by their author.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    pub fn can_transition_to(&self, next: ContractStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Pending)
                | (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Rejected, Self::Pending)
                | (Self::Approved, Self::Signed)
        ) || (next == Self::Expired && *self != Self::Expired)
    }
}

impl std::str::FromStr for ContractStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "signed" => Ok(Self::Signed),
            "expired" => Ok(Self::Expired),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown contract status `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    #[default]
    Internal,
    Commercial,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: ContractStatus,
    /// Contract value in đồng. Absent values count as zero.
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    /// Rejection reason, populated when the contract is rejected.
    #[serde(default)]
    pub comments: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl Contract {
    pub fn value_or_zero(&self) -> Decimal {
        self.value.unwrap_or(Decimal::ZERO)
    }

    pub fn effective_type(&self) -> ContractType {
        self.contract_type.unwrap_or_default()
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match self.status {
            ContractStatus::Rejected => self.comments.as_deref(),
            _ => None,
        }
    }

    pub fn transition_to(&mut self, next: ContractStatus) -> Result<(), DomainError> {
        if self.status.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidContractTransition { from: self.status, to: next })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::{Contract, ContractId, ContractStatus, ContractType};
    use crate::errors::DomainError;

    fn contract(status: ContractStatus) -> Contract {
        Contract {
            id: ContractId("HD-2024-001".to_string()),
            title: "Hợp đồng dịch vụ".to_string(),
            description: String::new(),
            status,
            value: None,
            contract_type: None,
            comments: None,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn allows_submission_and_review_lifecycle() {
        let mut contract = contract(ContractStatus::Draft);
        contract.transition_to(ContractStatus::Pending).expect("draft -> pending");
        contract.transition_to(ContractStatus::Rejected).expect("pending -> rejected");
        contract.transition_to(ContractStatus::Pending).expect("rejected -> pending");
        contract.transition_to(ContractStatus::Approved).expect("pending -> approved");
        contract.transition_to(ContractStatus::Signed).expect("approved -> signed");

        assert_eq!(contract.status, ContractStatus::Signed);
    }

    #[test]
    fn blocks_skipping_review() {
        let mut contract = contract(ContractStatus::Draft);
        let error =
            contract.transition_to(ContractStatus::Approved).expect_err("draft -> approved");

        assert_eq!(
            error,
            DomainError::InvalidContractTransition {
                from: ContractStatus::Draft,
                to: ContractStatus::Approved,
            }
        );
        assert_eq!(contract.status, ContractStatus::Draft);
    }

    #[test]
    fn any_live_status_can_expire_once() {
        for status in [
            ContractStatus::Draft,
            ContractStatus::Pending,
            ContractStatus::Approved,
            ContractStatus::Rejected,
            ContractStatus::Signed,
        ] {
            assert!(status.can_transition_to(ContractStatus::Expired), "{status:?}");
        }
        assert!(!ContractStatus::Expired.can_transition_to(ContractStatus::Expired));
        assert!(!ContractStatus::Expired.can_transition_to(ContractStatus::Pending));
    }

    #[test]
    fn missing_value_and_type_use_permissive_defaults() {
        let contract = contract(ContractStatus::Draft);

        assert_eq!(contract.value_or_zero(), Decimal::ZERO);
        assert_eq!(contract.effective_type(), ContractType::Internal);
    }

    #[test]
    fn rejection_reason_only_surfaces_for_rejected_contracts() {
        let mut rejected = contract(ContractStatus::Rejected);
        rejected.comments = Some("Thiếu điều khoản bảo mật".to_string());
        let mut draft = rejected.clone();
        draft.status = ContractStatus::Draft;

        assert_eq!(rejected.rejection_reason(), Some("Thiếu điều khoản bảo mật"));
        assert_eq!(draft.rejection_reason(), None);
    }

    #[test]
    fn parses_contract_with_optional_fields_absent() {
        let contract: Contract = serde_json::from_str(
            r#"{"id":"HD-9","status":"pending","uploaded_at":"2024-03-01T08:00:00Z"}"#,
        )
        .expect("sparse contract should parse");

        assert_eq!(contract.status, ContractStatus::Pending);
        assert!(contract.value.is_none());
        assert!(contract.contract_type.is_none());
        assert_eq!(contract.status.label_vi(), "Chờ duyệt");
    }
}
