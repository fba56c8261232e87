//! In-process sheet used by tests: keeps rows as JSON and applies saves
//! the way the script does (upsert by `record_id`, partial rows merge).

use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::api::client::{SaveReceipt, SheetStore, Submission};
use crate::api::error::ApiError;
use crate::api::response::{parse_dataset, Dataset, DAY_SHEET, MOSQUE_SHEET};
use crate::models::{DayInfo, MosqueInfo};

#[derive(Default)]
pub struct MemoryStore {
    sheets: RefCell<BTreeMap<String, Vec<Map<String, Value>>>>,
    pub fail_next_save: Cell<bool>,
    pub fail_fetch: Cell<bool>,
    pub saves: RefCell<Vec<Submission>>,
}

impl MemoryStore {
    pub fn with_reference(mosques: &[MosqueInfo], days: &[DayInfo]) -> Self {
        let store = MemoryStore::default();
        for m in mosques {
            store.push_row(MOSQUE_SHEET, serde_json::to_value(m).unwrap_or_default());
        }
        for d in days {
            store.push_row(DAY_SHEET, serde_json::to_value(d).unwrap_or_default());
        }
        store
    }

    pub fn push_row(&self, sheet: &str, row: Value) {
        if let Value::Object(map) = row {
            self.sheets
                .borrow_mut()
                .entry(sheet.to_string())
                .or_default()
                .push(map);
        }
    }

    pub fn rows(&self, sheet: &str) -> Vec<Map<String, Value>> {
        self.sheets.borrow().get(sheet).cloned().unwrap_or_default()
    }
}

impl SheetStore for MemoryStore {
    fn fetch_all(&self) -> Result<Dataset, ApiError> {
        if self.fail_fetch.get() {
            return Err(ApiError::Network("offline".into()));
        }
        let sheets: Map<String, Value> = self
            .sheets
            .borrow()
            .iter()
            .map(|(k, rows)| {
                let rows = rows.iter().cloned().map(Value::Object).collect();
                (k.clone(), Value::Array(rows))
            })
            .collect();
        let body = serde_json::json!({ "success": true, "sheets": sheets });
        parse_dataset(&body.to_string())
    }

    fn save(&self, submission: &Submission) -> Result<SaveReceipt, ApiError> {
        if self.fail_next_save.replace(false) {
            return Err(ApiError::Network("connection reset".into()));
        }
        self.saves.borrow_mut().push(submission.clone());

        let mut sheets = self.sheets.borrow_mut();
        let rows = sheets.entry(submission.sheet.clone()).or_default();
        let id = submission.record_id().map(str::to_string);
        let existing = id
            .as_deref()
            .and_then(|id| rows.iter_mut().find(|r| r.get("record_id").and_then(Value::as_str) == Some(id)));
        match existing {
            Some(row) => {
                for (k, v) in &submission.fields {
                    row.insert(k.clone(), v.clone());
                }
            }
            None => rows.push(submission.fields.clone()),
        }
        Ok(SaveReceipt::Assumed)
    }
}
