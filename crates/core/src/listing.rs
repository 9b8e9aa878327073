use serde::{Deserialize, Serialize};

use crate::domain::contract::{Contract, ContractStatus};

/// Search and status filter for the contract list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<ContractStatus>,
}

impl ContractQuery {
    pub fn matches(&self, contract: &Contract) -> bool {
        let status_ok = self.status.map_or(true, |status| contract.status == status);
        status_ok && self.matches_search(contract)
    }

    /// Keeps input order.
    pub fn apply<'a>(&self, contracts: &'a [Contract]) -> Vec<&'a Contract> {
        contracts.iter().filter(|contract| self.matches(contract)).collect()
    }

    fn matches_search(&self, contract: &Contract) -> bool {
        let Some(needle) = self.search.as_deref().map(str::trim).filter(|term| !term.is_empty())
        else {
            return true;
        };
        let needle = needle.to_lowercase();

        contract.title.to_lowercase().contains(&needle)
            || contract.description.to_lowercase().contains(&needle)
    }
}
