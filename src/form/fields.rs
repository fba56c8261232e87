use crate::models::reference::is_last_ten;
use crate::models::{DailySection, SiteType};

/// Whether a daily-report section is shown for this site and night.
///
/// Farm sites have no congregation, circles or lectures. I'tikaf only
/// happens in mosques during the last ten nights. `day = None` means no
/// night has been picked yet.
pub fn section_visible(section: DailySection, site: SiteType, day: Option<u32>) -> bool {
    match section {
        DailySection::Worshippers | DailySection::QuranCircles | DailySection::Lectures => {
            site == SiteType::Mosque
        }
        DailySection::Itikaf => site == SiteType::Mosque && day.is_some_and(is_last_ten),
        DailySection::Hospitality | DailySection::Other => true,
    }
}

pub fn visible_sections(site: SiteType, day: Option<u32>) -> Vec<DailySection> {
    DailySection::all()
        .into_iter()
        .filter(|s| section_visible(*s, site, day))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farm_hides_worshippers_and_education() {
        let sections = visible_sections(SiteType::Farm, Some(5));
        assert!(!sections.contains(&DailySection::Worshippers));
        assert!(!sections.contains(&DailySection::QuranCircles));
        assert!(!sections.contains(&DailySection::Lectures));
        assert!(sections.contains(&DailySection::Hospitality));
        assert!(sections.contains(&DailySection::Other));
    }

    #[test]
    fn itikaf_only_in_last_ten_nights() {
        assert!(!section_visible(DailySection::Itikaf, SiteType::Mosque, Some(20)));
        assert!(section_visible(DailySection::Itikaf, SiteType::Mosque, Some(21)));
        assert!(section_visible(DailySection::Itikaf, SiteType::Mosque, Some(30)));
        assert!(!section_visible(DailySection::Itikaf, SiteType::Mosque, None));
        assert!(!section_visible(DailySection::Itikaf, SiteType::Farm, Some(25)));
    }

    #[test]
    fn mosque_early_night_shows_everything_but_itikaf() {
        let sections = visible_sections(SiteType::Mosque, Some(1));
        assert_eq!(sections.len(), DailySection::all().len() - 1);
    }
}
