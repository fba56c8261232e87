use crate::models::DayInfo;
use crate::report::Report;

/// Days still open for `mosque_code`: every day minus the ones an existing
/// report of that mosque already covers. The report being edited does not
/// count against itself, so its own day stays selectable.
pub fn available_days<R: Report>(
    days: &[DayInfo],
    reports: &[R],
    mosque_code: &str,
    editing_record_id: Option<&str>,
) -> Vec<DayInfo> {
    let taken: Vec<&R> = reports
        .iter()
        .filter(|r| r.mosque_code() == mosque_code)
        .filter(|r| editing_record_id.is_none_or(|id| r.record_id() != id))
        .collect();

    days.iter()
        .filter(|d| !taken.iter().any(|r| r.uses_day(d)))
        .cloned()
        .collect()
}

/// True if `day` is already reported for the mosque by some other record.
pub fn day_taken<R: Report>(
    day: &DayInfo,
    reports: &[R],
    mosque_code: &str,
    editing_record_id: Option<&str>,
) -> bool {
    reports.iter().any(|r| {
        r.mosque_code() == mosque_code
            && editing_record_id.is_none_or(|id| r.record_id() != id)
            && r.uses_day(day)
    })
}
