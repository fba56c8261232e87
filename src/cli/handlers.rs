use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use log::info;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use crate::api::{Dataset, SaveReceipt, SheetStore};
use crate::config::AppConfig;
use crate::form::gate::password_matches;
use crate::form::{DailyForm, MaintenanceForm};
use crate::models::{
    ApprovalStatus, DailyField, DayInfo, MaintenanceField, MaintenanceRecord, MosqueRecord,
};
use crate::report::{available_days, search, DailyTotals, MaintenanceTotals, StatusCounts};
use crate::utils::format::{pad, short_timestamp};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn status_color(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Approved => GREEN,
        ApprovalStatus::Rejected => RED,
        ApprovalStatus::Resubmit | ApprovalStatus::Pending => AMBER,
    }
}

fn fetch(store: &dyn SheetStore) -> Result<Dataset> {
    store.fetch_all().context("Fetching sheets from the endpoint")
}

// ─── Summary ─────────────────────────────────────────────────────────────────

pub fn handle_summary(store: &dyn SheetStore) -> Result<()> {
    let data = fetch(store)?;
    let daily = DailyTotals::from_records(&data.records);
    let maintenance = MaintenanceTotals::from_records(&data.maintenance);

    println!();
    println_colored!(GOLD, "  Daily reports ({})", daily.reports);
    println!();
    println_colored!(BOLD, "  Worshippers:      {}", daily.worshippers);
    println_colored!(BOLD, "  Iftar meals:      {}", daily.iftar_meals);
    println_colored!(BOLD, "  Circle students:  {}", daily.circle_students);
    println!("  Volunteers:       {}", daily.volunteers);
    print_statuses(&daily.statuses);

    println!();
    println_colored!(GOLD, "  Maintenance reports ({})", maintenance.reports);
    println!();
    println!("  Cleaning jobs:    {}", maintenance.cleaning_jobs);
    println!("  Maintenance jobs: {}", maintenance.maintenance_jobs);
    println!("  Water cartons:    {}", maintenance.water_cartons);
    print_statuses(&maintenance.statuses);

    let per_mosque = DailyTotals::per_mosque(&data.records);
    if !per_mosque.is_empty() {
        println!();
        println_colored!(GOLD, "  By mosque");
        println!();
        for (name, totals) in &per_mosque {
            println!(
                "  {}  {:>3} reports  {:>6} worshippers  {:>6} meals",
                pad(name, 24),
                totals.reports,
                totals.worshippers,
                totals.iftar_meals
            );
        }
    }
    println!();
    Ok(())
}

fn print_statuses(counts: &StatusCounts) {
    println!();
    for status in ApprovalStatus::all() {
        println_colored!(
            status_color(status),
            "  {:<10} {}",
            status.english(),
            counts.get(status)
        );
    }
}

// ─── List ────────────────────────────────────────────────────────────────────

pub fn handle_list(store: &dyn SheetStore, term: Option<&str>, maintenance: bool) -> Result<()> {
    let data = fetch(store)?;
    let term = term.unwrap_or("");
    println!();

    if maintenance {
        let rows = search(&data.maintenance, term);
        println_colored!(GOLD, "  Maintenance reports ({})", rows.len());
        println!();
        for r in rows {
            print_row(&r.record_id, r.timestamp(), &r.mosque_name, &r.day_label, r.status());
        }
    } else {
        let rows = search(&data.records, term);
        println_colored!(GOLD, "  Daily reports ({})", rows.len());
        println!();
        for r in rows {
            print_row(&r.record_id, &r.created_at, &r.mosque_name, &r.label_day, r.status());
        }
    }
    println!();
    Ok(())
}

fn print_row(id: &str, at: &str, mosque: &str, day: &str, status: ApprovalStatus) {
    print!(
        "  {}{}{}{}",
        pad(id, 28),
        pad(&short_timestamp(at), 18),
        pad(mosque, 24),
        pad(day, 18)
    );
    println_colored!(status_color(status), "{}", status.as_str());
}

// ─── Days ────────────────────────────────────────────────────────────────────

pub fn handle_days(store: &dyn SheetStore, mosque_code: &str, maintenance: bool) -> Result<()> {
    let data = fetch(store)?;
    let mosque = data
        .mosque(mosque_code)
        .ok_or_else(|| anyhow!("Unknown mosque code '{}'", mosque_code))?;

    let open = if maintenance {
        available_days(&data.days, &data.maintenance, mosque_code, None)
    } else {
        available_days(&data.days, &data.records, mosque_code, None)
    };

    println!();
    println_colored!(GOLD, "  {} ({})", mosque.name, mosque.mosque_code);
    println_colored!(DIM, "  {} of {} days still open", open.len(), data.days.len());
    println!();
    for day in &open {
        println!("  {}  {}", pad(&day.code_day, 8), day.label);
    }
    println!();
    Ok(())
}

// ─── Submit ──────────────────────────────────────────────────────────────────

pub fn handle_submit(
    store: &dyn SheetStore,
    config: &AppConfig,
    file: &Path,
    maintenance: bool,
    password: Option<&str>,
) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("Reading {:?}", file))?;
    let data = fetch(store)?;
    let password = match password {
        Some(p) => p.to_string(),
        None => prompt("  Mosque password: ")?,
    };

    let submission = if maintenance {
        let incoming: MaintenanceRecord =
            serde_json::from_str(&text).context("Parsing maintenance report JSON")?;
        maintenance_form_from(incoming, &data, &password)?.submission(&data)?
    } else {
        let incoming: MosqueRecord =
            serde_json::from_str(&text).context("Parsing daily report JSON")?;
        daily_form_from(incoming, &data, config.season.year(), &password)?.submission(&data)?
    };

    let receipt = store.save(&submission)?;
    info!("Submitted {:?} to {}", submission.record_id(), submission.sheet);
    print_receipt(&receipt, submission.record_id().unwrap_or("?"));
    Ok(())
}

/// Fills a form from a parsed file: an existing `record_id` edits that
/// record, anything else creates a new one.
fn daily_form_from(
    incoming: MosqueRecord,
    data: &Dataset,
    season_year: u32,
    password: &str,
) -> Result<DailyForm> {
    let existing = data
        .records
        .iter()
        .find(|r| !incoming.record_id.is_empty() && r.record_id == incoming.record_id)
        .cloned();
    let mut form = match existing {
        Some(r) => DailyForm::edit(r, season_year, false),
        None => DailyForm::create(Utc::now(), season_year, false),
    };

    let mosque = data
        .mosque(&incoming.mosque_code)
        .ok_or_else(|| anyhow!("Unknown mosque code '{}'", incoming.mosque_code))?;
    form.select_mosque(mosque);
    form.gate.set_password(password);

    let day = data.day(&incoming.code_day).cloned().unwrap_or(DayInfo {
        code_day: incoming.code_day.clone(),
        label: incoming.label_day.clone(),
    });
    form.select_day(&day);

    for field in DailyField::all() {
        if field == DailyField::SupportedIftarMeals && incoming.supported_iftar_meals.is_none() {
            continue;
        }
        form.record.set_count(field, incoming.count(field));
    }
    form.set_notes(&incoming.notes);
    Ok(form)
}

fn maintenance_form_from(
    incoming: MaintenanceRecord,
    data: &Dataset,
    password: &str,
) -> Result<MaintenanceForm> {
    let existing = data
        .maintenance
        .iter()
        .find(|r| !incoming.record_id.is_empty() && r.record_id == incoming.record_id)
        .cloned();
    let mut form = match existing {
        Some(r) => MaintenanceForm::edit(r, false),
        None => MaintenanceForm::create(Utc::now(), false),
    };

    let mosque = data
        .mosque(&incoming.mosque_code)
        .ok_or_else(|| anyhow!("Unknown mosque code '{}'", incoming.mosque_code))?;
    form.select_mosque(mosque);
    form.gate.set_password(password);

    let day = data.day_by_label(&incoming.day_label).cloned().unwrap_or(DayInfo {
        code_day: String::new(),
        label: incoming.day_label.clone(),
    });
    form.select_day(&day);

    for field in MaintenanceField::all() {
        form.record.set_count(field, incoming.count(field));
    }
    form.set_cleaning_notes(&incoming.cleaning_notes);
    form.set_maintenance_notes(&incoming.maintenance_notes);
    Ok(form)
}

fn print_receipt(receipt: &SaveReceipt, record_id: &str) {
    match receipt {
        SaveReceipt::Confirmed(_) => println_colored!(GREEN, "  ✓ Saved {}", record_id),
        SaveReceipt::Assumed => {
            println_colored!(GREEN, "  ✓ Sent {}", record_id);
            println_colored!(DIM, "  The endpoint does not confirm this request; run `list` to check.");
        }
    }
}

// ─── Review ──────────────────────────────────────────────────────────────────

pub fn handle_review(
    store: &dyn SheetStore,
    config: &AppConfig,
    record_id: &str,
    status: &str,
    maintenance: bool,
    admin_password: Option<&str>,
) -> Result<()> {
    if !config.admin.enabled() {
        bail!("No admin password is configured; set [admin] password in the config file");
    }
    let entered = match admin_password {
        Some(p) => p.to_string(),
        None => prompt("  Admin password: ")?,
    };
    if !password_matches(&config.admin.password, &entered) {
        bail!("Wrong admin password");
    }

    let status = ApprovalStatus::from_str(status)?;
    let data = fetch(store)?;

    let submission = if maintenance {
        let record = data
            .maintenance
            .iter()
            .find(|r| r.record_id == record_id)
            .cloned()
            .ok_or_else(|| anyhow!("No maintenance report with id '{}'", record_id))?;
        let mut form = MaintenanceForm::edit(record, true);
        form.set_status(status)?;
        form.submission(&data)?
    } else {
        let record = data
            .records
            .iter()
            .find(|r| r.record_id == record_id)
            .cloned()
            .ok_or_else(|| anyhow!("No daily report with id '{}'", record_id))?;
        let mut form = DailyForm::edit(record, config.season.year(), true);
        form.set_status(status)?;
        form.submission(&data)?
    };

    store.save(&submission)?;
    info!("Set {} to {}", record_id, status.english());
    println_colored!(status_color(status), "  ✓ {} → {}", record_id, status.as_str());
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(store: &dyn SheetStore) -> Result<()> {
    let data = fetch(store)?;
    println!("{}", serde_json::to_string_pretty(&data.to_sheets_json())?);
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &mut AppConfig, endpoint: Option<&str>) -> Result<()> {
    if let Some(url) = endpoint {
        let url = url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("Endpoint must be an http(s) URL, got '{}'", url);
        }
        config.endpoint.url = url.to_string();
        let path = config.save()?;
        println_colored!(GREEN, "  ✓ Endpoint saved to {}", path.display());
        return Ok(());
    }

    let mut shown = config.clone();
    if shown.admin.enabled() {
        shown.admin.password = "********".into();
    }
    println!();
    println_colored!(DIM, "  {}", AppConfig::config_path()?.display());
    println!();
    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryStore;
    use crate::models::reference::ramadan_days;
    use crate::models::{MosqueInfo, DAILY_SHEET, MAINTENANCE_SHEET};
    use serde_json::{json, Value};
    use std::io::Write as _;

    fn store() -> MemoryStore {
        let mosque = MosqueInfo {
            mosque_code: "M1".into(),
            name: "جامع النور".into(),
            site_type: "مسجد".into(),
            supervisor: String::new(),
            pwd: "1234".into(),
        };
        MemoryStore::with_reference(&[mosque], &ramadan_days())
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.season.year = Some(1446);
        config.admin.password = "admin".into();
        config
    }

    fn json_file(value: Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    #[test]
    fn submit_creates_daily_report() {
        let store = store();
        let file = json_file(json!({
            "mosque_code": "M1",
            "code_day": "DAY_03",
            "عدد_المصلين_رجال": "120",
        }));

        handle_submit(&store, &config(), file.path(), false, Some("1234")).unwrap();

        let rows = store.rows(DAILY_SHEET);
        assert_eq!(rows.len(), 1);
        let saved: MosqueRecord = serde_json::from_value(Value::Object(rows[0].clone())).unwrap();
        assert!(saved.record_id.starts_with("MOSQ-1446-"));
        assert_eq!(saved.label_day, "اليوم 3 رمضان");
        assert_eq!(saved.hijri_date, "3/09/1446");
        assert_eq!(saved.worshippers_men.value(), 120);
        assert!(saved.supported_iftar_meals.is_none());
    }

    #[test]
    fn submit_refuses_wrong_password() {
        let store = store();
        let file = json_file(json!({"mosque_code": "M1", "code_day": "DAY_01"}));

        let err = handle_submit(&store, &config(), file.path(), false, Some("0000")).unwrap_err();
        assert!(err.to_string().contains("كلمة المرور"));
        assert!(store.saves.borrow().is_empty());
    }

    #[test]
    fn submit_refuses_taken_day() {
        let store = store();
        store.push_row(
            DAILY_SHEET,
            json!({"record_id": "R1", "mosque_code": "M1", "code_day": "DAY_01"}),
        );
        let file = json_file(json!({"mosque_code": "M1", "code_day": "DAY_01"}));

        assert!(handle_submit(&store, &config(), file.path(), false, Some("1234")).is_err());
    }

    #[test]
    fn submit_maintenance_sends_full_record() {
        let store = store();
        let file = json_file(json!({
            "mosque_code": "M1",
            "اليوم": "اليوم 2 رمضان",
            "أعمال_النظافة_عدد": 4,
        }));

        handle_submit(&store, &config(), file.path(), true, Some("1234")).unwrap();

        let saved = store.saves.borrow()[0].clone();
        assert_eq!(saved.sheet, MAINTENANCE_SHEET);
        assert!(saved.record_id().unwrap().starts_with("MNT-"));
        assert_eq!(saved.fields.get("أعمال_النظافة_عدد"), Some(&json!(4)));
    }

    #[test]
    fn review_sends_status_diff() {
        let store = store();
        store.push_row(
            DAILY_SHEET,
            json!({"record_id": "R1", "mosque_code": "M1", "code_day": "DAY_01", "الاعتماد": "قيد المراجعة"}),
        );

        handle_review(&store, &config(), "R1", "approved", false, Some("admin")).unwrap();

        let saved = store.saves.borrow()[0].clone();
        assert_eq!(saved.fields.len(), 2);
        assert_eq!(saved.fields.get("الاعتماد"), Some(&json!("معتمد")));
    }

    #[test]
    fn review_handles_duplicate_and_dayless_rows() {
        let store = store();
        store.push_row(DAILY_SHEET, json!({"record_id": "R1", "mosque_code": "M1", "code_day": "DAY_01"}));
        store.push_row(DAILY_SHEET, json!({"record_id": "R2", "mosque_code": "M1", "code_day": "DAY_01"}));
        store.push_row(DAILY_SHEET, json!({"record_id": "R3", "mosque_code": "M1"}));
        store.push_row(MAINTENANCE_SHEET, json!({"record_id": "MNT-9", "mosque_code": "M1"}));

        handle_review(&store, &config(), "R2", "rejected", false, Some("admin")).unwrap();
        handle_review(&store, &config(), "R3", "approved", false, Some("admin")).unwrap();
        handle_review(&store, &config(), "MNT-9", "approved", true, Some("admin")).unwrap();

        let saves = store.saves.borrow();
        assert_eq!(saves.len(), 3);
        assert_eq!(saves[0].record_id(), Some("R2"));
        assert_eq!(saves[0].fields.get("الاعتماد"), Some(&json!("مرفوض")));
        assert_eq!(saves[1].record_id(), Some("R3"));
        assert_eq!(saves[2].sheet, MAINTENANCE_SHEET);
    }

    #[test]
    fn review_needs_admin_password() {
        let store = store();
        store.push_row(DAILY_SHEET, json!({"record_id": "R1", "mosque_code": "M1"}));

        assert!(handle_review(&store, &config(), "R1", "approved", false, Some("guess")).is_err());
        assert!(handle_review(&store, &AppConfig::default(), "R1", "approved", false, Some("")).is_err());
        assert!(store.saves.borrow().is_empty());
    }

    #[test]
    fn review_unknown_record_errors() {
        let store = store();
        let err = handle_review(&store, &config(), "nope", "rejected", false, Some("admin")).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn days_rejects_unknown_mosque() {
        assert!(handle_days(&store(), "X9", false).is_err());
    }
}
