pub mod daily;
pub mod fields;
pub mod gate;
pub mod maintenance;

use serde_json::{Map, Value};
use thiserror::Error;

pub use daily::DailyForm;
pub use gate::PasswordGate;
pub use maintenance::MaintenanceForm;

/// Why a form refused to submit. Messages are what the supervisor sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("يرجى اختيار المسجد")]
    NoMosque,
    #[error("يرجى إدخال كلمة المرور الصحيحة للمسجد")]
    Locked,
    #[error("يرجى اختيار اليوم")]
    NoDay,
    #[error("تم رفع تقرير {0} لهذا المسجد مسبقاً")]
    DayTaken(String),
    #[error("الاعتماد متاح للمسؤول فقط")]
    NotAdmin,
    #[error("لا توجد تغييرات للحفظ")]
    NothingChanged,
}

/// Keys whose value differs from `before`, plus `record_id` always.
pub fn diff_fields(before: &Map<String, Value>, after: &Map<String, Value>) -> Map<String, Value> {
    let mut diff = Map::new();
    if let Some(id) = after.get("record_id") {
        diff.insert("record_id".into(), id.clone());
    }
    for (k, v) in after {
        if before.get(k) != Some(v) {
            diff.insert(k.clone(), v.clone());
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn diff_keeps_id_and_changed_keys_only() {
        let before = obj(json!({"record_id": "R1", "a": 1, "b": "x"}));
        let after = obj(json!({"record_id": "R1", "a": 2, "b": "x", "c": true}));
        let d = diff_fields(&before, &after);
        assert_eq!(Value::Object(d), json!({"record_id": "R1", "a": 2, "c": true}));
    }

    #[test]
    fn unchanged_record_diffs_to_id() {
        let m = obj(json!({"record_id": "R1", "a": 1}));
        assert_eq!(diff_fields(&m, &m).len(), 1);
    }
}
