use std::collections::BTreeMap;

use crate::models::{ApprovalStatus, MaintenanceRecord, MosqueRecord};
use crate::report::Report;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub resubmit: u64,
}

impl StatusCounts {
    pub fn tally<R: Report>(rows: &[R]) -> Self {
        let mut counts = StatusCounts::default();
        for r in rows {
            counts.add(r.status());
        }
        counts
    }

    fn add(&mut self, status: ApprovalStatus) {
        match status {
            ApprovalStatus::Pending => self.pending += 1,
            ApprovalStatus::Approved => self.approved += 1,
            ApprovalStatus::Rejected => self.rejected += 1,
            ApprovalStatus::Resubmit => self.resubmit += 1,
        }
    }

    pub fn get(&self, status: ApprovalStatus) -> u64 {
        match status {
            ApprovalStatus::Pending => self.pending,
            ApprovalStatus::Approved => self.approved,
            ApprovalStatus::Rejected => self.rejected,
            ApprovalStatus::Resubmit => self.resubmit,
        }
    }
}

/// Dashboard tiles for the daily reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyTotals {
    pub reports: u64,
    pub worshippers: u64,
    pub iftar_meals: u64,
    pub circle_students: u64,
    pub volunteers: u64,
    pub statuses: StatusCounts,
}

impl DailyTotals {
    pub fn from_records(records: &[MosqueRecord]) -> Self {
        let mut totals = DailyTotals::default();
        for r in records {
            totals.absorb(r);
        }
        totals
    }

    fn absorb(&mut self, r: &MosqueRecord) {
        self.reports += 1;
        // Oversized sheet cells saturate at u64::MAX, so the sums must too
        self.worshippers = self.worshippers.saturating_add(r.worshippers());
        self.iftar_meals = self.iftar_meals.saturating_add(r.iftar_total());
        self.circle_students = self.circle_students.saturating_add(r.circle_students());
        self.volunteers = self.volunteers.saturating_add(r.volunteers.value());
        self.statuses.add(r.status());
    }

    /// Totals per mosque name, alphabetical.
    pub fn per_mosque(records: &[MosqueRecord]) -> Vec<(String, DailyTotals)> {
        let mut by_name: BTreeMap<String, DailyTotals> = BTreeMap::new();
        for r in records {
            let name = if r.mosque_name.trim().is_empty() {
                r.mosque_code.clone()
            } else {
                r.mosque_name.clone()
            };
            by_name.entry(name).or_default().absorb(r);
        }
        by_name.into_iter().collect()
    }
}

/// Dashboard tiles for the maintenance reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaintenanceTotals {
    pub reports: u64,
    pub cleaning_jobs: u64,
    pub maintenance_jobs: u64,
    pub water_cartons: u64,
    pub statuses: StatusCounts,
}

impl MaintenanceTotals {
    pub fn from_records(records: &[MaintenanceRecord]) -> Self {
        MaintenanceTotals {
            reports: records.len() as u64,
            cleaning_jobs: saturating_sum(records.iter().map(|r| r.cleaning_jobs.value())),
            maintenance_jobs: saturating_sum(records.iter().map(|r| r.maintenance_jobs.value())),
            water_cartons: saturating_sum(records.iter().map(|r| r.water_cartons_actual.value())),
            statuses: StatusCounts::tally(records),
        }
    }
}

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}
