use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::number::{string_or_number, FlexNumber};
use super::status::ApprovalStatus;

pub const MAINTENANCE_SHEET: &str = "Maintenance_Report";

/// One cleaning/maintenance report for a (mosque, day) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub record_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub created_at: String,
    #[serde(rename = "التاريخ", default, deserialize_with = "string_or_number")]
    pub date: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mosque_code: String,
    #[serde(rename = "المسجد", default, deserialize_with = "string_or_number")]
    pub mosque_name: String,
    /// Day label, not code: the sheet stores what the selector shows.
    #[serde(rename = "اليوم", default, deserialize_with = "string_or_number")]
    pub day_label: String,
    #[serde(rename = "أعمال_النظافة_عدد", default)]
    pub cleaning_jobs: FlexNumber,
    #[serde(rename = "أعمال_الصيانة_عدد", default)]
    pub maintenance_jobs: FlexNumber,
    #[serde(rename = "عدد_كراتين_الماء_الواقعي", default)]
    pub water_cartons_actual: FlexNumber,
    #[serde(rename = "أعمال_النظافة_سرد", default, deserialize_with = "string_or_number")]
    pub cleaning_notes: String,
    #[serde(rename = "أعمال_الصيانة_سرد", default, deserialize_with = "string_or_number")]
    pub maintenance_notes: String,
    #[serde(rename = "الاعتماد", default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MaintenanceRecord {
    pub fn status(&self) -> ApprovalStatus {
        ApprovalStatus::classify(self.approval.as_deref())
    }

    /// `created_at` when present, the report date otherwise.
    pub fn timestamp(&self) -> &str {
        if self.created_at.trim().is_empty() {
            &self.date
        } else {
            &self.created_at
        }
    }

    pub fn count(&self, field: MaintenanceField) -> FlexNumber {
        match field {
            MaintenanceField::CleaningJobs => self.cleaning_jobs,
            MaintenanceField::MaintenanceJobs => self.maintenance_jobs,
            MaintenanceField::WaterCartonsActual => self.water_cartons_actual,
        }
    }

    pub fn set_count(&mut self, field: MaintenanceField, value: FlexNumber) {
        match field {
            MaintenanceField::CleaningJobs => self.cleaning_jobs = value,
            MaintenanceField::MaintenanceJobs => self.maintenance_jobs = value,
            MaintenanceField::WaterCartonsActual => self.water_cartons_actual = value,
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaintenanceField {
    CleaningJobs,
    MaintenanceJobs,
    WaterCartonsActual,
}

impl MaintenanceField {
    pub fn all() -> Vec<MaintenanceField> {
        vec![
            MaintenanceField::CleaningJobs,
            MaintenanceField::MaintenanceJobs,
            MaintenanceField::WaterCartonsActual,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            MaintenanceField::CleaningJobs => "أعمال_النظافة_عدد",
            MaintenanceField::MaintenanceJobs => "أعمال_الصيانة_عدد",
            MaintenanceField::WaterCartonsActual => "عدد_كراتين_الماء_الواقعي",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceField::CleaningJobs => "عدد أعمال النظافة",
            MaintenanceField::MaintenanceJobs => "عدد أعمال الصيانة",
            MaintenanceField::WaterCartonsActual => "كراتين الماء (الواقعي)",
        }
    }
}
