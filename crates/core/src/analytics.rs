//! Time-windowed contract statistics for the dashboard.
//!
//! Only the numbers are computed here; charting belongs to the host.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::contract::{Contract, ContractId, ContractStatus};

/// Reason recorded for rejected contracts that carry no comment.
pub const UNSPECIFIED_REJECTION_REASON: &str = "Không có lý do cụ thể";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7days")]
    Last7Days,
    #[default]
    #[serde(rename = "30days")]
    Last30Days,
    #[serde(rename = "90days")]
    Last90Days,
    #[serde(rename = "1year")]
    LastYear,
    #[serde(rename = "custom")]
    Custom,
}

impl Period {
    fn lookback(&self) -> Duration {
        match self {
            Self::Last7Days => Duration::days(7),
            Self::Last30Days | Self::Custom => Duration::days(30),
            Self::Last90Days => Duration::days(90),
            Self::LastYear => Duration::days(365),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "7days" => Ok(Self::Last7Days),
            "30days" => Ok(Self::Last30Days),
            "90days" => Ok(Self::Last90Days),
            "1year" => Ok(Self::LastYear),
            "custom" => Ok(Self::Custom),
            other => Err(format!(
                "unsupported period `{other}` (expected 7days|30days|90days|1year|custom)"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Day,
    Month,
    Year,
}

impl GroupBy {
    fn bucket_key(&self, at: DateTime<Utc>) -> String {
        match self {
            Self::Day => at.format("%Y-%m-%d").to_string(),
            Self::Month => format!("{}-{:02}", at.year(), at.month()),
            Self::Year => at.year().to_string(),
        }
    }
}

impl std::str::FromStr for GroupBy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!("unsupported grouping `{other}` (expected day|month|year)")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFilter {
    pub period: Period,
    /// Only read for `Period::Custom`.
    pub start: Option<DateTime<Utc>>,
    /// Only read for `Period::Custom`.
    pub end: Option<DateTime<Utc>>,
    pub group_by: GroupBy,
}

impl TimeFilter {
    /// Inclusive `[start, end]` window relative to `now`.
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let default_start = now - self.period.lookback();
        match self.period {
            Period::Custom => {
                (self.start.unwrap_or(default_start), self.end.unwrap_or(now))
            }
            _ => (default_start, now),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStats {
    pub total_contracts: usize,
    pub pending_approval: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Whole percent of contracts approved, 0 when the window is empty.
    pub approval_rate: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub uploads: usize,
    pub approvals: usize,
    pub rejections: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionReason {
    pub id: String,
    pub reason: String,
    pub count: usize,
    pub contracts: Vec<ContractId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub stats: ContractStats,
    pub time_series: Vec<TimeSeriesPoint>,
    pub rejection_reasons: Vec<RejectionReason>,
}

pub fn summarize(
    contracts: &[Contract],
    filter: &TimeFilter,
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let (start, end) = filter.window(now);
    let in_window: Vec<&Contract> = contracts
        .iter()
        .filter(|contract| contract.uploaded_at >= start && contract.uploaded_at <= end)
        .collect();

    AnalyticsSummary {
        stats: stats(&in_window),
        time_series: time_series(&in_window, filter.group_by),
        rejection_reasons: rejection_reasons(&in_window),
    }
}

fn stats(contracts: &[&Contract]) -> ContractStats {
    let count = |status: ContractStatus| {
        contracts.iter().filter(|contract| contract.status == status).count()
    };
    let total_contracts = contracts.len();
    let approved = count(ContractStatus::Approved);

    ContractStats {
        total_contracts,
        pending_approval: count(ContractStatus::Pending),
        approved,
        rejected: count(ContractStatus::Rejected),
        approval_rate: percentage(approved, total_contracts),
    }
}

/// Rounds half away from zero, like the dashboard did.
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (total * 2)) as u32
}

fn time_series(contracts: &[&Contract], group_by: GroupBy) -> Vec<TimeSeriesPoint> {
    let mut buckets: BTreeMap<String, TimeSeriesPoint> = BTreeMap::new();

    for contract in contracts {
        let key = group_by.bucket_key(contract.uploaded_at);
        let point = buckets.entry(key.clone()).or_insert_with(|| TimeSeriesPoint {
            date: key,
            uploads: 0,
            approvals: 0,
            rejections: 0,
        });
        point.uploads += 1;
        match contract.status {
            ContractStatus::Approved => point.approvals += 1,
            ContractStatus::Rejected => point.rejections += 1,
            _ => {}
        }
    }

    buckets.into_values().collect()
}

fn rejection_reasons(contracts: &[&Contract]) -> Vec<RejectionReason> {
    let mut reasons: Vec<RejectionReason> = Vec::new();

    let rejected = contracts.iter().filter(|contract| contract.status == ContractStatus::Rejected);
    for contract in rejected {
        let reason = contract
            .rejection_reason()
            .filter(|comment| !comment.is_empty())
            .unwrap_or(UNSPECIFIED_REJECTION_REASON);

        match reasons.iter_mut().find(|entry| entry.reason == reason) {
            Some(entry) => {
                entry.count += 1;
                entry.contracts.push(contract.id.clone());
            }
            None => reasons.push(RejectionReason {
                id: reason_slug(reason),
                reason: reason.to_owned(),
                count: 1,
                contracts: vec![contract.id.clone()],
            }),
        }
    }

    reasons
}

/// Lowercases `reason` and replaces every whitespace run with a single `-`,
/// leading and trailing runs included.
fn reason_slug(reason: &str) -> String {
    let mut slug = String::with_capacity(reason.len());
    let mut in_whitespace = false;
    for ch in reason.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }
    slug
}
