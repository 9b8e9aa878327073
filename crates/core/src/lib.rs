pub mod analytics;
pub mod approvals;
pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod gate;
pub mod listing;
pub mod suggestions;

pub use analytics::{summarize, AnalyticsSummary, GroupBy, Period, TimeFilter};
pub use approvals::{eligible_approvers, ApprovalSelection, ApprovalTrack, SelectionError};
pub use domain::contract::{Contract, ContractId, ContractStatus, ContractType};
pub use domain::user::{Permissions, User, UserId, UserRole};
pub use errors::{ApplicationError, DomainError};
pub use gate::{ActionGate, ContractAction, GatePolicy};
pub use listing::ContractQuery;
pub use suggestions::{
    Advisory, ApprovalSuggestionEngine, Locale, Suggestion, SuggestionReason, SuggestionThresholds,
    TrackSuggestion,
};
