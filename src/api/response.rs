use log::warn;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::api::error::ApiError;
use crate::models::reference::ramadan_days;
use crate::models::{DayInfo, MaintenanceRecord, MosqueInfo, MosqueRecord, DAILY_SHEET, MAINTENANCE_SHEET};

pub const MOSQUE_SHEET: &str = "mosque";
pub const DAY_SHEET: &str = "Dayd";

/// Everything one `GET` returns, split by sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<MosqueRecord>,
    pub maintenance: Vec<MaintenanceRecord>,
    pub mosques: Vec<MosqueInfo>,
    pub days: Vec<DayInfo>,
    /// Sheets this client does not model (photos and the like), kept raw.
    pub other_sheets: BTreeMap<String, Value>,
}

impl Dataset {
    pub fn mosque(&self, code: &str) -> Option<&MosqueInfo> {
        self.mosques.iter().find(|m| m.mosque_code == code)
    }

    pub fn day(&self, code: &str) -> Option<&DayInfo> {
        self.days.iter().find(|d| d.code_day == code)
    }

    pub fn day_by_label(&self, label: &str) -> Option<&DayInfo> {
        self.days.iter().find(|d| d.label == label)
    }

    /// The raw response shape, for export.
    pub fn to_sheets_json(&self) -> Value {
        let mut sheets = Map::new();
        sheets.insert(DAILY_SHEET.into(), to_rows(&self.records));
        sheets.insert(MAINTENANCE_SHEET.into(), to_rows(&self.maintenance));
        sheets.insert(MOSQUE_SHEET.into(), to_rows(&self.mosques));
        sheets.insert(DAY_SHEET.into(), to_rows(&self.days));
        for (name, rows) in &self.other_sheets {
            sheets.insert(name.clone(), rows.clone());
        }
        serde_json::json!({ "success": true, "sheets": sheets })
    }
}

fn to_rows<T: serde::Serialize>(rows: &[T]) -> Value {
    serde_json::to_value(rows).unwrap_or(Value::Array(Vec::new()))
}

/// Parse a `GET` body. Accepts the sheet map and the older `data` array.
pub fn parse_dataset(body: &str) -> Result<Dataset, ApiError> {
    let root: Value = serde_json::from_str(body)?;
    let obj = root
        .as_object()
        .ok_or_else(|| ApiError::Decode("response is not a JSON object".into()))?;

    check_success(obj)?;

    let mut dataset = Dataset::default();

    if let Some(sheets) = obj.get("sheets").and_then(Value::as_object) {
        for (name, rows) in sheets {
            match name.as_str() {
                DAILY_SHEET => dataset.records = parse_rows(name, rows),
                MAINTENANCE_SHEET => dataset.maintenance = parse_rows(name, rows),
                MOSQUE_SHEET => dataset.mosques = parse_rows(name, rows),
                DAY_SHEET => dataset.days = parse_rows(name, rows),
                _ => {
                    dataset.other_sheets.insert(name.clone(), rows.clone());
                }
            }
        }
    } else if let Some(rows) = obj.get("data") {
        dataset.records = parse_rows("data", rows);
    } else {
        return Err(ApiError::Decode("response has neither `sheets` nor `data`".into()));
    }

    dataset.mosques.retain(|m| !m.mosque_code.trim().is_empty());
    dataset.days.retain(|d| !d.code_day.trim().is_empty());
    if dataset.days.is_empty() {
        dataset.days = ramadan_days();
    }
    Ok(dataset)
}

/// `success: false` means the script ran but refused; a missing flag is accepted.
pub fn check_success(obj: &Map<String, Value>) -> Result<(), ApiError> {
    if obj.get("success").and_then(Value::as_bool) == Some(false) {
        let msg = obj
            .get("message")
            .or_else(|| obj.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("no reason given");
        return Err(ApiError::Rejected(msg.to_string()));
    }
    Ok(())
}

/// Rows that fail to parse are skipped, not fatal: one bad sheet row
/// should not blank the whole dashboard.
fn parse_rows<T: DeserializeOwned>(sheet: &str, rows: &Value) -> Vec<T> {
    let Some(items) = rows.as_array() else {
        warn!("sheet {} is not an array, ignoring", sheet);
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value::<T>(row.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("sheet {} row {} skipped: {}", sheet, i, e);
                None
            }
        })
        .collect()
}
