use chrono::{DateTime, NaiveDateTime, Utc};
use std::cmp::Ordering;

use crate::report::Report;

/// Case-insensitive substring search, newest first. An empty term keeps
/// everything. Rows with unreadable timestamps sink to the bottom.
pub fn search<'a, R: Report>(rows: &'a [R], term: &str) -> Vec<&'a R> {
    let needle = term.trim().to_lowercase();
    let mut hits: Vec<&R> = rows
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.search_text()
                    .iter()
                    .any(|t| t.to_lowercase().contains(&needle))
        })
        .collect();
    hits.sort_by(|a, b| newest_first(parse_timestamp(a.timestamp()), parse_timestamp(b.timestamp())));
    hits
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// RFC 3339 first (what the forms write), then the sheet's own formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S", "%Y/%m/%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenanceRecord, MosqueRecord};

    fn rec(id: &str, name: &str, day: &str, created: &str) -> MosqueRecord {
        MosqueRecord {
            record_id: id.into(),
            mosque_name: name.into(),
            label_day: day.into(),
            created_at: created.into(),
            ..Default::default()
        }
    }

    fn ids<R: Report>(rows: &[&R]) -> Vec<String> {
        rows.iter().map(|r| r.record_id().to_string()).collect()
    }

    #[test]
    fn matches_mosque_name_or_day_label() {
        let rows = vec![
            rec("A", "جامع الراجحي", "اليوم 1 رمضان", "2026-02-19T18:00:00Z"),
            rec("B", "جامع الخزام", "اليوم 2 رمضان", "2026-02-20T18:00:00Z"),
        ];
        assert_eq!(ids(&search(&rows, "الراجحي")), vec!["A"]);
        assert_eq!(ids(&search(&rows, "اليوم 2")), vec!["B"]);
        assert_eq!(search(&rows, "لا شيء").len(), 0);
    }

    #[test]
    fn search_is_case_insensitive() {
        let rows = vec![rec("A", "Bin Ladin Mosque", "", "")];
        assert_eq!(search(&rows, "  bin LADIN ").len(), 1);
    }

    #[test]
    fn sorted_newest_first_with_unparseable_last() {
        let rows = vec![
            rec("old", "x", "", "2026-02-18T10:00:00Z"),
            rec("bad", "x", "", "yesterday"),
            rec("new", "x", "", "2026-02-21T10:00:00+03:00"),
            rec("sheet", "x", "", "2026-02-20 09:00:00"),
        ];
        assert_eq!(ids(&search(&rows, "")), vec!["new", "sheet", "old", "bad"]);
    }

    #[test]
    fn maintenance_search_ignores_day_label() {
        let rows = vec![MaintenanceRecord {
            record_id: "MNT-1".into(),
            mosque_name: "جامع الخزام".into(),
            day_label: "اليوم 3 رمضان".into(),
            ..Default::default()
        }];
        assert_eq!(search(&rows, "الخزام").len(), 1);
        assert_eq!(search(&rows, "اليوم 3").len(), 0);
    }
}
