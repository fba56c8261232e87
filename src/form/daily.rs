use chrono::{DateTime, Utc};

use crate::api::{Dataset, Submission};
use crate::form::fields::visible_sections;
use crate::form::gate::PasswordGate;
use crate::form::{diff_fields, FormError};
use crate::models::FlexNumber;
use crate::models::reference::day_number;
use crate::models::{
    ApprovalStatus, DailyField, DailySection, DayInfo, MosqueInfo, MosqueRecord, SiteType,
    DAILY_SHEET,
};
use crate::report::availability::{available_days, day_taken};

/// State of the daily field report while it is being filled in.
#[derive(Debug, Clone)]
pub struct DailyForm {
    pub record: MosqueRecord,
    original: Option<MosqueRecord>,
    pub gate: PasswordGate,
    season_year: u32,
}

impl DailyForm {
    /// Blank report with a fresh id and timestamp.
    pub fn create(now: DateTime<Utc>, season_year: u32, admin: bool) -> Self {
        let record = MosqueRecord {
            record_id: new_record_id(now, season_year),
            created_at: now.to_rfc3339(),
            ..Default::default()
        };
        Self {
            record,
            original: None,
            gate: PasswordGate::new(admin),
            season_year,
        }
    }

    pub fn edit(record: MosqueRecord, season_year: u32, admin: bool) -> Self {
        let mut gate = PasswordGate::new(admin);
        gate.select(&record.mosque_code);
        Self {
            original: Some(record.clone()),
            record,
            gate,
            season_year,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.original.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.gate.is_admin()
    }

    pub fn select_mosque(&mut self, mosque: &MosqueInfo) {
        self.record.mosque_code = mosque.mosque_code.clone();
        self.record.mosque_name = mosque.name.clone();
        self.gate.select(&mosque.mosque_code);
    }

    /// Sets code, label and the Hijri date `N/09/<year>` together.
    pub fn select_day(&mut self, day: &DayInfo) {
        self.record.code_day = day.code_day.clone();
        self.record.label_day = day.label.clone();
        self.record.hijri_date = match day.number() {
            Some(n) => format!("{}/09/{}", n, self.season_year),
            None => String::new(),
        };
    }

    pub fn set_count_text(&mut self, field: DailyField, text: &str) {
        self.record.set_count(field, FlexNumber::parse_lossy(text));
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.record.notes = notes.to_string();
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

    pub fn site(&self, mosques: &[MosqueInfo]) -> SiteType {
        mosques
            .iter()
            .find(|m| m.mosque_code == self.record.mosque_code)
            .map(MosqueInfo::site)
            .unwrap_or(SiteType::Mosque)
    }

    pub fn day_number(&self) -> Option<u32> {
        day_number(&self.record.code_day)
    }

    pub fn visible_sections(&self, mosques: &[MosqueInfo]) -> Vec<DailySection> {
        visible_sections(self.site(mosques), self.day_number())
    }

    pub fn visible_fields(&self, mosques: &[MosqueInfo]) -> Vec<DailyField> {
        self.visible_sections(mosques)
            .into_iter()
            .flat_map(|s| s.fields())
            .collect()
    }

    /// Days the selector offers for the chosen mosque.
    pub fn day_options(&self, data: &Dataset) -> Vec<DayInfo> {
        if self.record.mosque_code.is_empty() {
            return data.days.clone();
        }
        available_days(
            &data.days,
            &data.records,
            &self.record.mosque_code,
            self.editing_id(),
        )
    }

    pub fn is_unlocked(&self, mosques: &[MosqueInfo]) -> bool {
        self.gate.is_unlocked(mosques)
    }

    fn editing_id(&self) -> Option<&str> {
        self.original.as_ref().map(|r| r.record_id.as_str())
    }

    /// New reports always claim a day; edits only when they move to another.
    /// Rows already on the sheet may share a day or have none at all.
    fn claims_day(&self) -> bool {
        match &self.original {
            None => true,
            Some(original) => original.code_day != self.record.code_day,
        }
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
        if self.record.code_day.trim().is_empty() {
            return Err(FormError::NoDay);
        }
        let day = DayInfo {
            code_day: self.record.code_day.clone(),
            label: self.record.label_day.clone(),
        };
        if day_taken(&day, &data.records, &self.record.mosque_code, self.editing_id()) {
            return Err(FormError::DayTaken(self.record.label_day.clone()));
        }
        Ok(())
    }

    /// Full record when creating; `record_id` plus changed columns when editing.
    pub fn submission(&self, data: &Dataset) -> Result<Submission, FormError> {
        self.validate(data)?;
        let fields = match &self.original {
            None => self.record.to_map(),
            Some(original) => {
                let diff = diff_fields(&original.to_map(), &self.record.to_map());
                if diff.len() <= 1 {
                    return Err(FormError::NothingChanged);
                }
                diff
            }
        };
        Ok(Submission::new(DAILY_SHEET, fields))
    }
}

/// `MOSQ-<year>-<MM-DD>-<NNN>`, the suffix taken from the millisecond clock.
pub fn new_record_id(now: DateTime<Utc>, season_year: u32) -> String {
    format!(
        "MOSQ-{}-{}-{:03}",
        season_year,
        now.format("%m-%d"),
        now.timestamp_subsec_millis() % 1000
    )
}
