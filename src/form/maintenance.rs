use chrono::{DateTime, Utc};

use crate::api::{Dataset, Submission};
use crate::form::gate::PasswordGate;
use crate::form::FormError;
use crate::models::FlexNumber;
use crate::models::{
    ApprovalStatus, DayInfo, MaintenanceField, MaintenanceRecord, MosqueInfo, MAINTENANCE_SHEET,
};
use crate::report::availability::{available_days, day_taken};

/// State of the cleaning/maintenance report form.
///
/// Unlike the daily form this always submits the whole record, edits
/// included, which is what the maintenance sheet expects.
#[derive(Debug, Clone)]
pub struct MaintenanceForm {
    pub record: MaintenanceRecord,
    /// Day label the record had when editing started.
    original_day: Option<String>,
    pub gate: PasswordGate,
}

impl MaintenanceForm {
    pub fn create(now: DateTime<Utc>, admin: bool) -> Self {
        let record = MaintenanceRecord {
            record_id: format!("MNT-{}", now.timestamp_millis()),
            created_at: now.to_rfc3339(),
            date: now.to_rfc3339(),
            ..Default::default()
        };
        Self {
            record,
            original_day: None,
            gate: PasswordGate::new(admin),
        }
    }

    pub fn edit(record: MaintenanceRecord, admin: bool) -> Self {
        let mut gate = PasswordGate::new(admin);
        gate.select(&record.mosque_code);
        Self {
            original_day: Some(record.day_label.clone()),
            record,
            gate,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.original_day.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.gate.is_admin()
    }

    pub fn select_mosque(&mut self, mosque: &MosqueInfo) {
        self.record.mosque_code = mosque.mosque_code.clone();
        self.record.mosque_name = mosque.name.clone();
        self.gate.select(&mosque.mosque_code);
    }

    pub fn select_day(&mut self, day: &DayInfo) {
        self.record.day_label = day.label.clone();
    }

    pub fn set_count_text(&mut self, field: MaintenanceField, text: &str) {
        self.record.set_count(field, FlexNumber::parse_lossy(text));
    }

    pub fn set_cleaning_notes(&mut self, text: &str) {
        self.record.cleaning_notes = text.to_string();
    }

    pub fn set_maintenance_notes(&mut self, text: &str) {
        self.record.maintenance_notes = text.to_string();
    }

    pub fn set_status(&mut self, status: ApprovalStatus) -> Result<(), FormError> {
        if !self.is_admin() {
            return Err(FormError::NotAdmin);
        }
        self.record.approval = Some(status.as_str().to_string());
        Ok(())
    }

    pub fn status(&self) -> ApprovalStatus {
        self.record.status()
    }

    pub fn is_unlocked(&self, mosques: &[MosqueInfo]) -> bool {
        self.gate.is_unlocked(mosques)
    }

    fn editing_id(&self) -> Option<&str> {
        self.is_editing().then_some(self.record.record_id.as_str())
    }

    fn claims_day(&self) -> bool {
        self.original_day.as_deref() != Some(self.record.day_label.as_str())
    }

    pub fn day_options(&self, data: &Dataset) -> Vec<DayInfo> {
        if self.record.mosque_code.is_empty() {
            return data.days.clone();
        }
        available_days(
            &data.days,
            &data.maintenance,
            &self.record.mosque_code,
            self.editing_id(),
        )
    }

    pub fn validate(&self, data: &Dataset) -> Result<(), FormError> {
        if self.record.mosque_code.trim().is_empty() {
            return Err(FormError::NoMosque);
        }
        if !self.is_unlocked(&data.mosques) {
            return Err(FormError::Locked);
        }
        if !self.claims_day() {
            return Ok(());
        }
        if self.record.day_label.trim().is_empty() {
            return Err(FormError::NoDay);
        }
        let day = DayInfo {
            code_day: String::new(),
            label: self.record.day_label.clone(),
        };
        if day_taken(&day, &data.maintenance, &self.record.mosque_code, self.editing_id()) {
            return Err(FormError::DayTaken(self.record.day_label.clone()));
        }
        Ok(())
    }

    pub fn submission(&self, data: &Dataset) -> Result<Submission, FormError> {
        self.validate(data)?;
        Ok(Submission::new(MAINTENANCE_SHEET, self.record.to_map()))
    }
}
