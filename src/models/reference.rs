use serde::{Deserialize, Serialize};

use super::number::string_or_number;

pub const RAMADAN_NIGHTS: u32 = 30;
/// First of the last ten nights.
pub const LAST_TEN_START: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteType {
    Mosque,
    Farm,
}

/// One row of the `mosque` sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MosqueInfo {
    #[serde(default, deserialize_with = "string_or_number")]
    pub mosque_code: String,
    #[serde(rename = "المسجد", alias = "name", default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(rename = "نوع_الموقع", alias = "type", default, deserialize_with = "string_or_number")]
    pub site_type: String,
    #[serde(rename = "المشرف", alias = "supervisor", default, deserialize_with = "string_or_number")]
    pub supervisor: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pwd: String,
}

impl MosqueInfo {
    pub fn site(&self) -> SiteType {
        let t = self.site_type.trim().to_lowercase();
        if t.contains("مزرعة") || t.contains("farm") {
            SiteType::Farm
        } else {
            SiteType::Mosque
        }
    }
}

/// One row of the `Dayd` sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInfo {
    #[serde(alias = "code", default, deserialize_with = "string_or_number")]
    pub code_day: String,
    #[serde(alias = "label_day", default, deserialize_with = "string_or_number")]
    pub label: String,
}

impl DayInfo {
    pub fn new(number: u32) -> Self {
        DayInfo {
            code_day: day_code(number),
            label: format!("اليوم {} رمضان", number),
        }
    }

    /// Night number parsed from the `DAY_NN` code.
    pub fn number(&self) -> Option<u32> {
        day_number(&self.code_day)
    }
}

pub fn day_code(number: u32) -> String {
    format!("DAY_{:02}", number)
}

/// Night number from a `DAY_NN` code (or any code ending in digits).
pub fn day_number(code: &str) -> Option<u32> {
    let digits: String = code
        .trim()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse::<u32>().ok().filter(|n| (1..=RAMADAN_NIGHTS).contains(n))
}

/// Built-in list of the thirty nights, used when the sheet has none.
pub fn ramadan_days() -> Vec<DayInfo> {
    (1..=RAMADAN_NIGHTS).map(DayInfo::new).collect()
}

pub fn is_last_ten(day: u32) -> bool {
    (LAST_TEN_START..=RAMADAN_NIGHTS).contains(&day)
}
