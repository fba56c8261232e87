use std::str::FromStr;

pub const PENDING: &str = "قيد المراجعة";
pub const APPROVED: &str = "معتمد";
pub const APPROVED_ALT: &str = "يعتمد";
pub const REJECTED: &str = "مرفوض";
pub const RESUBMIT: &str = "يعاد التقرير";

/// Review state an administrator puts on a report.
///
/// Records keep the raw sheet text; this enum only classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Resubmit,
}

impl ApprovalStatus {
    pub fn all() -> Vec<ApprovalStatus> {
        vec![
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
            ApprovalStatus::Resubmit,
        ]
    }

    /// The label written back to the sheet.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => PENDING,
            ApprovalStatus::Approved => APPROVED,
            ApprovalStatus::Rejected => REJECTED,
            ApprovalStatus::Resubmit => RESUBMIT,
        }
    }

    pub fn english(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Resubmit => "resubmit",
        }
    }

    /// Classify a raw column value. Empty or unknown text is pending.
    pub fn classify(raw: Option<&str>) -> ApprovalStatus {
        match raw.map(str::trim) {
            Some(APPROVED) | Some(APPROVED_ALT) => ApprovalStatus::Approved,
            Some(REJECTED) => ApprovalStatus::Rejected,
            Some(RESUBMIT) => ApprovalStatus::Resubmit,
            _ => ApprovalStatus::Pending,
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | PENDING => Ok(ApprovalStatus::Pending),
            "approved" | APPROVED | APPROVED_ALT => Ok(ApprovalStatus::Approved),
            "rejected" | REJECTED => Ok(ApprovalStatus::Rejected),
            "resubmit" | RESUBMIT => Ok(ApprovalStatus::Resubmit),
            _ => Err(anyhow::anyhow!("Unknown approval status: {}", s)),
        }
    }
}
