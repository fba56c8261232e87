pub mod aggregate;
pub mod availability;
pub mod filter;

use crate::models::{ApprovalStatus, DayInfo, MaintenanceRecord, MosqueRecord};

pub use aggregate::{DailyTotals, MaintenanceTotals, StatusCounts};
pub use availability::available_days;
pub use filter::search;

/// What the list, filter and availability code needs from a report row.
pub trait Report {
    fn record_id(&self) -> &str;
    fn mosque_code(&self) -> &str;
    fn timestamp(&self) -> &str;
    fn status(&self) -> ApprovalStatus;
    /// Fields the search box matches against.
    fn search_text(&self) -> Vec<&str>;
    /// True if this row occupies `day` for its mosque.
    fn uses_day(&self, day: &DayInfo) -> bool;
}

impl Report for MosqueRecord {
    fn record_id(&self) -> &str {
        &self.record_id
    }

    fn mosque_code(&self) -> &str {
        &self.mosque_code
    }

    fn timestamp(&self) -> &str {
        &self.created_at
    }

    fn status(&self) -> ApprovalStatus {
        MosqueRecord::status(self)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.mosque_name.as_str(), self.label_day.as_str()]
    }

    fn uses_day(&self, day: &DayInfo) -> bool {
        !self.code_day.is_empty() && self.code_day == day.code_day
    }
}

impl Report for MaintenanceRecord {
    fn record_id(&self) -> &str {
        &self.record_id
    }

    fn mosque_code(&self) -> &str {
        &self.mosque_code
    }

    fn timestamp(&self) -> &str {
        MaintenanceRecord::timestamp(self)
    }

    fn status(&self) -> ApprovalStatus {
        MaintenanceRecord::status(self)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.mosque_name.as_str()]
    }

    fn uses_day(&self, day: &DayInfo) -> bool {
        !self.day_label.is_empty() && self.day_label == day.label
    }
}
