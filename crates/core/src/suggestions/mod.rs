//! Approver suggestion engine
//!
//! Computes the default approver for each review track from the contract
//! value and type. Suggestions pre-populate a selection that a human may
//! still override.

mod engine;
mod types;

pub use engine::ApprovalSuggestionEngine;
pub use types::*;

/// Content track escalates to a director above this value (đồng).
pub const DIRECTOR_THRESHOLD: u64 = 10_000_000_000;

/// Content track goes to a manager above this value (đồng).
pub const MANAGER_THRESHOLD: u64 = 1_000_000_000;

/// Finance review is suggested above this value (đồng).
pub const FINANCE_THRESHOLD: u64 = 500_000_000;

/// Legal risk review is suggested above this value (đồng).
pub const LEGAL_THRESHOLD: u64 = 1_000_000_000;

/// All three tracks are recommended above this value (đồng).
pub const FULL_REVIEW_THRESHOLD: u64 = 5_000_000_000;
