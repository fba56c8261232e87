use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::number::{string_or_number, FlexNumber};
use super::status::ApprovalStatus;

pub const DAILY_SHEET: &str = "daily_mosque_report";

/// One daily report for a (mosque, night) pair, keyed as the sheet keys it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MosqueRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub record_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub created_at: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub code_day: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub label_day: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mosque_code: String,
    #[serde(rename = "المسجد", default, deserialize_with = "string_or_number")]
    pub mosque_name: String,
    #[serde(rename = "تاريخ_هجري", default, deserialize_with = "string_or_number")]
    pub hijri_date: String,

    #[serde(rename = "عدد_المصلين_رجال", default)]
    pub worshippers_men: FlexNumber,
    #[serde(rename = "عدد_المصلين_نساء", default)]
    pub worshippers_women: FlexNumber,

    #[serde(rename = "عدد_وجبات_افطار", default)]
    pub iftar_meals: FlexNumber,
    /// Absent on sheets from before the supported-meals column existed.
    #[serde(rename = "عدد_وجبات_افطار_المدعومة", default, skip_serializing_if = "Option::is_none")]
    pub supported_iftar_meals: Option<FlexNumber>,
    #[serde(rename = "عدد_كراتين_ماء", default)]
    pub water_cartons: FlexNumber,
    #[serde(rename = "عدد_مستفيدي_الضيافة", default)]
    pub hospitality_beneficiaries: FlexNumber,

    #[serde(rename = "عدد_طلاب_الحلقات", default)]
    pub circle_boys: FlexNumber,
    #[serde(rename = "عدد_الاوجه_طلاب", default)]
    pub circle_boys_pages: FlexNumber,
    #[serde(rename = "عدد_طالبات_الحلقات", default)]
    pub circle_girls: FlexNumber,
    #[serde(rename = "عدد_الاوجه_طالبات", default)]
    pub circle_girls_pages: FlexNumber,

    #[serde(rename = "عدد_المتطوعين", default)]
    pub volunteers: FlexNumber,
    #[serde(rename = "عدد_المسابقات", default)]
    pub competitions: FlexNumber,
    #[serde(rename = "عدد_اطفال_الحضانة", default)]
    pub nursery_children: FlexNumber,

    #[serde(rename = "عدد_الكلمات_الرجالية", default)]
    pub lectures_men: FlexNumber,
    #[serde(rename = "عدد_الكلمات_النسائية", default)]
    pub lectures_women: FlexNumber,
    #[serde(rename = "عدد_مستفيدي_الكلمات", default)]
    pub lecture_beneficiaries: FlexNumber,

    #[serde(rename = "عدد_المعتكفين_رجال", default)]
    pub itikaf_men: FlexNumber,
    #[serde(rename = "عدد_المعتكفين_نساء", default)]
    pub itikaf_women: FlexNumber,

    #[serde(rename = "ملاحظات", default, deserialize_with = "string_or_number")]
    pub notes: String,
    #[serde(rename = "الاعتماد", default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<String>,

    /// Columns this client does not know about, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MosqueRecord {
    pub fn worshippers(&self) -> u64 {
        self.worshippers_men.value().saturating_add(self.worshippers_women.value())
    }

    /// Supported meals when the column exists, plain meals otherwise.
    pub fn iftar_total(&self) -> u64 {
        match self.supported_iftar_meals {
            Some(n) => n.value(),
            None => self.iftar_meals.value(),
        }
    }

    pub fn circle_students(&self) -> u64 {
        self.circle_boys.value().saturating_add(self.circle_girls.value())
    }

    pub fn status(&self) -> ApprovalStatus {
        ApprovalStatus::classify(self.approval.as_deref())
    }

    pub fn count(&self, field: DailyField) -> FlexNumber {
        match field {
            DailyField::WorshippersMen => self.worshippers_men,
            DailyField::WorshippersWomen => self.worshippers_women,
            DailyField::IftarMeals => self.iftar_meals,
            DailyField::SupportedIftarMeals => self.supported_iftar_meals.unwrap_or_default(),
            DailyField::WaterCartons => self.water_cartons,
            DailyField::HospitalityBeneficiaries => self.hospitality_beneficiaries,
            DailyField::CircleBoys => self.circle_boys,
            DailyField::CircleBoysPages => self.circle_boys_pages,
            DailyField::CircleGirls => self.circle_girls,
            DailyField::CircleGirlsPages => self.circle_girls_pages,
            DailyField::LecturesMen => self.lectures_men,
            DailyField::LecturesWomen => self.lectures_women,
            DailyField::LectureBeneficiaries => self.lecture_beneficiaries,
            DailyField::ItikafMen => self.itikaf_men,
            DailyField::ItikafWomen => self.itikaf_women,
            DailyField::Volunteers => self.volunteers,
            DailyField::Competitions => self.competitions,
            DailyField::NurseryChildren => self.nursery_children,
        }
    }

    pub fn set_count(&mut self, field: DailyField, value: FlexNumber) {
        let slot = match field {
            DailyField::WorshippersMen => &mut self.worshippers_men,
            DailyField::WorshippersWomen => &mut self.worshippers_women,
            DailyField::IftarMeals => &mut self.iftar_meals,
            DailyField::SupportedIftarMeals => {
                self.supported_iftar_meals = Some(value);
                return;
            }
            DailyField::WaterCartons => &mut self.water_cartons,
            DailyField::HospitalityBeneficiaries => &mut self.hospitality_beneficiaries,
            DailyField::CircleBoys => &mut self.circle_boys,
            DailyField::CircleBoysPages => &mut self.circle_boys_pages,
            DailyField::CircleGirls => &mut self.circle_girls,
            DailyField::CircleGirlsPages => &mut self.circle_girls_pages,
            DailyField::LecturesMen => &mut self.lectures_men,
            DailyField::LecturesWomen => &mut self.lectures_women,
            DailyField::LectureBeneficiaries => &mut self.lecture_beneficiaries,
            DailyField::ItikafMen => &mut self.itikaf_men,
            DailyField::ItikafWomen => &mut self.itikaf_women,
            DailyField::Volunteers => &mut self.volunteers,
            DailyField::Competitions => &mut self.competitions,
            DailyField::NurseryChildren => &mut self.nursery_children,
        };
        *slot = value;
    }

    /// The record as a flat JSON object, the shape the endpoint stores.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Sections of the daily report, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailySection {
    Worshippers,
    Hospitality,
    QuranCircles,
    Lectures,
    Itikaf,
    Other,
}

impl DailySection {
    pub fn all() -> Vec<DailySection> {
        vec![
            DailySection::Worshippers,
            DailySection::Hospitality,
            DailySection::QuranCircles,
            DailySection::Lectures,
            DailySection::Itikaf,
            DailySection::Other,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            DailySection::Worshippers => "أعداد المصلين",
            DailySection::Hospitality => "الضيافة والإفطار",
            DailySection::QuranCircles => "حلقات القرآن",
            DailySection::Lectures => "الكلمات والمحاضرات",
            DailySection::Itikaf => "الاعتكاف",
            DailySection::Other => "أخرى",
        }
    }

    pub fn fields(&self) -> Vec<DailyField> {
        DailyField::all()
            .into_iter()
            .filter(|f| f.section() == *self)
            .collect()
    }
}

/// Every count column on the daily report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyField {
    WorshippersMen,
    WorshippersWomen,
    IftarMeals,
    SupportedIftarMeals,
    WaterCartons,
    HospitalityBeneficiaries,
    CircleBoys,
    CircleBoysPages,
    CircleGirls,
    CircleGirlsPages,
    LecturesMen,
    LecturesWomen,
    LectureBeneficiaries,
    ItikafMen,
    ItikafWomen,
    Volunteers,
    Competitions,
    NurseryChildren,
}

impl DailyField {
    pub fn all() -> Vec<DailyField> {
        vec![
            DailyField::WorshippersMen,
            DailyField::WorshippersWomen,
            DailyField::IftarMeals,
            DailyField::SupportedIftarMeals,
            DailyField::WaterCartons,
            DailyField::HospitalityBeneficiaries,
            DailyField::CircleBoys,
            DailyField::CircleBoysPages,
            DailyField::CircleGirls,
            DailyField::CircleGirlsPages,
            DailyField::LecturesMen,
            DailyField::LecturesWomen,
            DailyField::LectureBeneficiaries,
            DailyField::ItikafMen,
            DailyField::ItikafWomen,
            DailyField::Volunteers,
            DailyField::Competitions,
            DailyField::NurseryChildren,
        ]
    }

    pub fn section(&self) -> DailySection {
        match self {
            DailyField::WorshippersMen | DailyField::WorshippersWomen => DailySection::Worshippers,
            DailyField::IftarMeals
            | DailyField::SupportedIftarMeals
            | DailyField::WaterCartons
            | DailyField::HospitalityBeneficiaries => DailySection::Hospitality,
            DailyField::CircleBoys
            | DailyField::CircleBoysPages
            | DailyField::CircleGirls
            | DailyField::CircleGirlsPages => DailySection::QuranCircles,
            DailyField::LecturesMen
            | DailyField::LecturesWomen
            | DailyField::LectureBeneficiaries => DailySection::Lectures,
            DailyField::ItikafMen | DailyField::ItikafWomen => DailySection::Itikaf,
            DailyField::Volunteers | DailyField::Competitions | DailyField::NurseryChildren => {
                DailySection::Other
            }
        }
    }

    /// Sheet column name.
    pub fn key(&self) -> &'static str {
        match self {
            DailyField::WorshippersMen => "عدد_المصلين_رجال",
            DailyField::WorshippersWomen => "عدد_المصلين_نساء",
            DailyField::IftarMeals => "عدد_وجبات_افطار",
            DailyField::SupportedIftarMeals => "عدد_وجبات_افطار_المدعومة",
            DailyField::WaterCartons => "عدد_كراتين_ماء",
            DailyField::HospitalityBeneficiaries => "عدد_مستفيدي_الضيافة",
            DailyField::CircleBoys => "عدد_طلاب_الحلقات",
            DailyField::CircleBoysPages => "عدد_الاوجه_طلاب",
            DailyField::CircleGirls => "عدد_طالبات_الحلقات",
            DailyField::CircleGirlsPages => "عدد_الاوجه_طالبات",
            DailyField::LecturesMen => "عدد_الكلمات_الرجالية",
            DailyField::LecturesWomen => "عدد_الكلمات_النسائية",
            DailyField::LectureBeneficiaries => "عدد_مستفيدي_الكلمات",
            DailyField::ItikafMen => "عدد_المعتكفين_رجال",
            DailyField::ItikafWomen => "عدد_المعتكفين_نساء",
            DailyField::Volunteers => "عدد_المتطوعين",
            DailyField::Competitions => "عدد_المسابقات",
            DailyField::NurseryChildren => "عدد_اطفال_الحضانة",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DailyField::WorshippersMen => "عدد المصلين (رجال)",
            DailyField::WorshippersWomen => "عدد المصلين (نساء)",
            DailyField::IftarMeals => "عدد وجبات الإفطار",
            DailyField::SupportedIftarMeals => "وجبات الإفطار المدعومة",
            DailyField::WaterCartons => "عدد كراتين الماء",
            DailyField::HospitalityBeneficiaries => "عدد مستفيدي الضيافة",
            DailyField::CircleBoys => "عدد طلاب الحلقات",
            DailyField::CircleBoysPages => "عدد الأوجه (طلاب)",
            DailyField::CircleGirls => "عدد طالبات الحلقات",
            DailyField::CircleGirlsPages => "عدد الأوجه (طالبات)",
            DailyField::LecturesMen => "الكلمات الرجالية",
            DailyField::LecturesWomen => "الكلمات النسائية",
            DailyField::LectureBeneficiaries => "إجمالي مستفيدي الكلمات",
            DailyField::ItikafMen => "المعتكفين (رجال)",
            DailyField::ItikafWomen => "المعتكفات (نساء)",
            DailyField::Volunteers => "عدد المتطوعين",
            DailyField::Competitions => "عدد المسابقات",
            DailyField::NurseryChildren => "أطفال الحضانة",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = r#"{
        "record_id": "MOSQ-1447-03-01-007",
        "created_at": "2026-03-01T18:00:00Z",
        "code_day": "DAY_03",
        "label_day": "اليوم 3 رمضان",
        "mosque_code": "MOSQ_AL_RAJHI",
        "المسجد": "جامع الراجحي",
        "تاريخ_هجري": "3/09/1447",
        "عدد_المصلين_رجال": "120",
        "عدد_المصلين_نساء": 45,
        "عدد_وجبات_افطار": "",
        "عدد_طلاب_الحلقات": "١٥",
        "ملاحظات": "لا يوجد",
        "الاعتماد": "يعتمد",
        "صورة": "https://example.org/p.jpg"
    }"#;

    #[test]
    fn parses_mixed_type_row() {
        let r: MosqueRecord = serde_json::from_str(ROW).unwrap();
        assert_eq!(r.mosque_name, "جامع الراجحي");
        assert_eq!(r.worshippers(), 165);
        assert_eq!(r.iftar_meals, FlexNumber(0));
        assert_eq!(r.circle_boys, FlexNumber(15));
        assert_eq!(r.status(), ApprovalStatus::Approved);
        assert_eq!(r.extra.get("صورة").and_then(Value::as_str), Some("https://example.org/p.jpg"));
    }

    #[test]
    fn iftar_total_prefers_supported_column() {
        let mut r = MosqueRecord::default();
        r.iftar_meals = FlexNumber(80);
        assert_eq!(r.iftar_total(), 80);
        r.supported_iftar_meals = Some(FlexNumber(50));
        assert_eq!(r.iftar_total(), 50);
    }

    #[test]
    fn unknown_columns_survive_reserialization() {
        let r: MosqueRecord = serde_json::from_str(ROW).unwrap();
        let map = r.to_map();
        assert_eq!(map.get("صورة"), Some(&Value::from("https://example.org/p.jpg")));
        assert_eq!(map.get("عدد_المصلين_رجال"), Some(&Value::from(120)));
    }

    #[test]
    fn every_field_round_trips_through_set_count() {
        let mut r = MosqueRecord::default();
        for (i, f) in DailyField::all().into_iter().enumerate() {
            r.set_count(f, FlexNumber(i as u64 + 1));
        }
        for (i, f) in DailyField::all().into_iter().enumerate() {
            assert_eq!(r.count(f), FlexNumber(i as u64 + 1), "{}", f.key());
            assert!(r.to_map().contains_key(f.key()));
        }
    }

    #[test]
    fn sections_partition_all_fields() {
        let total: usize = DailySection::all().iter().map(|s| s.fields().len()).sum();
        assert_eq!(total, DailyField::all().len());
    }
}
