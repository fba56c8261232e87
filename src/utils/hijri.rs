use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

/// Islamic month names in Arabic (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "محرم",
    "صفر",
    "ربيع الأول",
    "ربيع الآخر",
    "جمادى الأولى",
    "جمادى الآخرة",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذو القعدة",
    "ذو الحجة",
];

const RAMADAN: usize = 9;

fn hijri_month_name(month: usize) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "؟"
    }
}

fn hijri_for(date: NaiveDate) -> Option<HijriDate> {
    HijriDate::from_gr(date.year() as usize, date.month() as usize, date.day() as usize).ok()
}

fn today_adjusted(offset_days: i32) -> NaiveDate {
    chrono::Local::now().date_naive() + Duration::days(offset_days as i64)
}

/// Today's Hijri date as "day month year", shifted for local moon sighting.
pub fn today_hijri_string(offset_days: i32) -> String {
    let hd = hijri_for(today_adjusted(offset_days)).unwrap_or_else(HijriDate::today);
    format!("{} {} {}", hd.day(), hijri_month_name(hd.month()), hd.year())
}

/// Hijri year of the Ramadan in progress, or of the next one once
/// this year's Ramadan is over.
pub fn season_year_for(date: NaiveDate) -> Option<u32> {
    let hd = hijri_for(date)?;
    let year = hd.year() as u32;
    Some(if hd.month() > RAMADAN { year + 1 } else { year })
}

pub fn season_year_for_today(offset_days: i32) -> u32 {
    season_year_for(today_adjusted(offset_days)).unwrap_or_else(|| HijriDate::today().year() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_are_bounded() {
        assert_eq!(hijri_month_name(9), "رمضان");
        assert_eq!(hijri_month_name(0), "؟");
        assert_eq!(hijri_month_name(13), "؟");
    }

    #[test]
    fn season_year_rolls_over_after_ramadan() {
        // Mid-Ramadan 1447 and well after it (Dhu al-Hijjah 1447)
        let during = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let after = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert_eq!(season_year_for(during), Some(1447));
        assert_eq!(season_year_for(after), Some(1448));
    }
}
