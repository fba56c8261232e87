use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use log::{info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Block,
    Frame,
};

use crate::api::{Dataset, SheetStore, Submission};
use crate::config::AppConfig;
use crate::form::gate::password_matches;
use crate::form::{DailyForm, FormError, MaintenanceForm, PasswordGate};
use crate::models::{
    ApprovalStatus, DailyField, DayInfo, MaintenanceField, MaintenanceRecord, MosqueInfo,
    MosqueRecord,
};
use crate::report::{search, DailyTotals, MaintenanceTotals};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::form::{FieldKind, FormLine};
use crate::tui::widgets::{form, header, overlay, records, statusbar, tiles};
use crate::utils::hijri::today_hijri_string;

const ADDED: &str = "تم إضافة السجل بنجاح";
const UPDATED: &str = "تم تحديث البيانات بنجاح";
const SAVE_FAILED: &str = "حدث خطأ أثناء محاولة الحفظ";
const LOAD_FAILED: &str = "خطأ في تحميل البيانات، يرجى المحاولة لاحقاً";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    List,
    MaintenanceList,
    Form,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    AdminLogin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    expires: Instant,
}

#[derive(Debug, Clone)]
pub enum ActiveForm {
    Daily(DailyForm),
    Maintenance(MaintenanceForm),
}

impl ActiveForm {
    fn gate(&self) -> &PasswordGate {
        match self {
            ActiveForm::Daily(f) => &f.gate,
            ActiveForm::Maintenance(f) => &f.gate,
        }
    }

    fn gate_mut(&mut self) -> &mut PasswordGate {
        match self {
            ActiveForm::Daily(f) => &mut f.gate,
            ActiveForm::Maintenance(f) => &mut f.gate,
        }
    }

    fn mosque_code(&self) -> &str {
        match self {
            ActiveForm::Daily(f) => &f.record.mosque_code,
            ActiveForm::Maintenance(f) => &f.record.mosque_code,
        }
    }

    fn mosque_name(&self) -> &str {
        match self {
            ActiveForm::Daily(f) => &f.record.mosque_name,
            ActiveForm::Maintenance(f) => &f.record.mosque_name,
        }
    }

    fn select_mosque(&mut self, mosque: &MosqueInfo) {
        match self {
            ActiveForm::Daily(f) => f.select_mosque(mosque),
            ActiveForm::Maintenance(f) => f.select_mosque(mosque),
        }
    }

    fn day_label(&self) -> &str {
        match self {
            ActiveForm::Daily(f) => &f.record.label_day,
            ActiveForm::Maintenance(f) => &f.record.day_label,
        }
    }

    /// Daily reports key days by code, maintenance reports by label.
    fn is_current_day(&self, day: &DayInfo) -> bool {
        match self {
            ActiveForm::Daily(f) => !f.record.code_day.is_empty() && f.record.code_day == day.code_day,
            ActiveForm::Maintenance(f) => !f.record.day_label.is_empty() && f.record.day_label == day.label,
        }
    }

    fn select_day(&mut self, day: &DayInfo) {
        match self {
            ActiveForm::Daily(f) => f.select_day(day),
            ActiveForm::Maintenance(f) => f.select_day(day),
        }
    }

    fn day_options(&self, data: &Dataset) -> Vec<DayInfo> {
        match self {
            ActiveForm::Daily(f) => f.day_options(data),
            ActiveForm::Maintenance(f) => f.day_options(data),
        }
    }

    fn is_unlocked(&self, mosques: &[MosqueInfo]) -> bool {
        match self {
            ActiveForm::Daily(f) => f.is_unlocked(mosques),
            ActiveForm::Maintenance(f) => f.is_unlocked(mosques),
        }
    }

    fn is_editing(&self) -> bool {
        match self {
            ActiveForm::Daily(f) => f.is_editing(),
            ActiveForm::Maintenance(f) => f.is_editing(),
        }
    }

    fn status(&self) -> ApprovalStatus {
        match self {
            ActiveForm::Daily(f) => f.status(),
            ActiveForm::Maintenance(f) => f.status(),
        }
    }

    fn set_status(&mut self, status: ApprovalStatus) -> Result<(), FormError> {
        match self {
            ActiveForm::Daily(f) => f.set_status(status),
            ActiveForm::Maintenance(f) => f.set_status(status),
        }
    }

    fn submission(&self, data: &Dataset) -> Result<Submission, FormError> {
        match self {
            ActiveForm::Daily(f) => f.submission(data),
            ActiveForm::Maintenance(f) => f.submission(data),
        }
    }

    fn view(&self) -> View {
        match self {
            ActiveForm::Daily(_) => View::Form,
            ActiveForm::Maintenance(_) => View::Maintenance,
        }
    }

    fn list_view(&self) -> View {
        match self {
            ActiveForm::Daily(_) => View::List,
            ActiveForm::Maintenance(_) => View::MaintenanceList,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormRow {
    Mosque,
    Password,
    Day,
    Count(DailyField),
    MaintenanceCount(MaintenanceField),
    Notes,
    CleaningNotes,
    MaintenanceNotes,
    Status,
}

/// Network work queued by a key press, run after the next frame so the
/// loading overlay is on screen while it blocks.
#[derive(Debug, Clone)]
enum Pending {
    Reload,
    Save {
        submission: Submission,
        editing: bool,
        back_to: View,
    },
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub data: Dataset,
    pub admin: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub search: String,
    pub selected: usize,
    pub form: Option<ActiveForm>,
    pub form_focus: usize,
    pub form_error: Option<String>,
    pub toast: Option<Toast>,
    pending: Option<Pending>,
    pub show_help: bool,
    pub should_quit: bool,

    pub hijri_str: String,
    pub season_year: u32,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let hijri_str = today_hijri_string(config.season.hijri_offset);
        let season_year = config.season.year();

        App {
            view: View::Dashboard,
            config,
            data: Dataset::default(),
            admin: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            search: String::new(),
            selected: 0,
            form: None,
            form_focus: 0,
            form_error: None,
            toast: None,
            pending: Some(Pending::Reload),
            show_help: false,
            should_quit: false,
            hijri_str,
            season_year,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Run whatever network call is queued. Failures become toasts; the
    /// app keeps its current state so nothing typed is lost.
    pub fn process_pending(&mut self, store: &dyn SheetStore) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending {
            Pending::Reload => match store.fetch_all() {
                Ok(data) => {
                    info!(
                        "Loaded {} daily reports, {} maintenance reports, {} mosques",
                        data.records.len(),
                        data.maintenance.len(),
                        data.mosques.len()
                    );
                    self.data = data;
                    self.clamp_selection();
                }
                Err(e) => {
                    warn!("Fetching sheets failed: {}", e);
                    self.notify(LOAD_FAILED, ToastKind::Error);
                }
            },
            Pending::Save {
                submission,
                editing,
                back_to,
            } => match store.save(&submission) {
                Ok(_) => {
                    info!(
                        "Saved {} to {}",
                        submission.record_id().unwrap_or("?"),
                        submission.sheet
                    );
                    self.notify(if editing { UPDATED } else { ADDED }, ToastKind::Success);
                    self.form = None;
                    self.form_error = None;
                    self.view = back_to;
                    self.selected = 0;
                    self.pending = Some(Pending::Reload);
                }
                Err(e) => {
                    warn!("Saving to {} failed: {}", submission.sheet, e);
                    self.notify(SAVE_FAILED, ToastKind::Error);
                }
            },
        }
    }

    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(|t| Instant::now() >= t.expires) {
            self.toast = None;
        }
    }

    fn notify(&mut self, message: &str, kind: ToastKind) {
        self.toast = Some(Toast {
            message: message.to_string(),
            kind,
            expires: Instant::now() + Duration::from_secs(self.config.ui.toast_secs),
        });
    }

    fn daily_rows(&self) -> Vec<&MosqueRecord> {
        search(&self.data.records, &self.search)
    }

    fn maintenance_rows(&self) -> Vec<&MaintenanceRecord> {
        search(&self.data.maintenance, &self.search)
    }

    fn row_count(&self) -> usize {
        match self.view {
            View::List => self.daily_rows().len(),
            View::MaintenanceList => self.maintenance_rows().len(),
            _ => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let n = self.row_count();
        if self.selected >= n {
            self.selected = n.saturating_sub(1);
        }
    }

    // ─── Keys ────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press || self.is_loading() {
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        match self.input_mode {
            InputMode::AdminLogin => self.handle_admin_login(key),
            InputMode::Search => self.handle_search(key),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key),
                View::List | View::MaintenanceList => self.handle_list_key(key),
                View::Form | View::Maintenance => self.handle_form_key(key),
            },
        }
    }

    /// Pasted text goes to whatever field takes typing; elsewhere it is
    /// dropped so it cannot fire shortcuts.
    pub fn handle_paste(&mut self, text: &str) {
        let takes_text = self.input_mode != InputMode::Normal
            || matches!(self.view, View::Form | View::Maintenance);
        if !takes_text {
            return;
        }
        for c in text.chars().filter(|c| !c.is_control()) {
            self.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('d') => self.open_daily(None),
            KeyCode::Char('m') => self.open_maintenance(None),
            KeyCode::Char('l') => self.open_list(View::List),
            KeyCode::Char('w') => self.open_list(View::MaintenanceList),
            KeyCode::Char('g') => self.pending = Some(Pending::Reload),
            KeyCode::Char('a') => self.toggle_admin(),
            _ => {}
        }
    }

    fn toggle_admin(&mut self) {
        if self.admin {
            self.admin = false;
            self.notify("تم الخروج من وضع المسؤول", ToastKind::Success);
        } else if self.config.admin.enabled() {
            self.input_mode = InputMode::AdminLogin;
            self.input_buffer.clear();
        } else {
            self.notify("لم يتم ضبط كلمة مرور المسؤول في الإعدادات", ToastKind::Error);
        }
    }

    fn handle_admin_login(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                if password_matches(&self.config.admin.password, &self.input_buffer) {
                    self.admin = true;
                    info!("Admin mode enabled");
                    self.notify("تم تفعيل وضع المسؤول", ToastKind::Success);
                } else {
                    self.notify("كلمة المرور غير صحيحة", ToastKind::Error);
                }
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn open_list(&mut self, view: View) {
        self.view = view;
        self.search.clear();
        self.selected = 0;
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.view = View::Dashboard;
                self.search.clear();
            }
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('g') => self.pending = Some(Pending::Reload),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('n') => match self.view {
                View::MaintenanceList => self.open_maintenance(None),
                _ => self.open_daily(None),
            },
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.row_count() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => match self.view {
                View::MaintenanceList => {
                    let picked = self.maintenance_rows().get(self.selected).map(|r| (*r).clone());
                    if let Some(record) = picked {
                        self.open_maintenance(Some(record));
                    }
                }
                _ => {
                    let picked = self.daily_rows().get(self.selected).map(|r| (*r).clone());
                    if let Some(record) = picked {
                        self.open_daily(Some(record));
                    }
                }
            },
            _ => {}
        }
    }

    fn handle_search(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(c) => self.search.push(c),
            _ => {}
        }
        self.selected = 0;
    }

    fn open_daily(&mut self, record: Option<MosqueRecord>) {
        let form = match record {
            Some(r) => DailyForm::edit(r, self.season_year, self.admin),
            None => DailyForm::create(Utc::now(), self.season_year, self.admin),
        };
        self.open_form(ActiveForm::Daily(form));
    }

    fn open_maintenance(&mut self, record: Option<MaintenanceRecord>) {
        let form = match record {
            Some(r) => MaintenanceForm::edit(r, self.admin),
            None => MaintenanceForm::create(Utc::now(), self.admin),
        };
        self.open_form(ActiveForm::Maintenance(form));
    }

    fn open_form(&mut self, form: ActiveForm) {
        self.view = form.view();
        self.form = Some(form);
        self.form_focus = 0;
        self.form_error = None;
    }

    /// Rows the form shows right now. Everything past the password stays
    /// hidden until the mosque is unlocked.
    fn form_rows(&self) -> Vec<FormRow> {
        let Some(form) = &self.form else {
            return Vec::new();
        };
        let admin = form.gate().is_admin();

        let mut rows = vec![FormRow::Mosque];
        if !admin {
            rows.push(FormRow::Password);
        }
        if !form.is_unlocked(&self.data.mosques) {
            return rows;
        }

        rows.push(FormRow::Day);
        match form {
            ActiveForm::Daily(f) => {
                rows.extend(f.visible_fields(&self.data.mosques).into_iter().map(FormRow::Count));
                rows.push(FormRow::Notes);
            }
            ActiveForm::Maintenance(_) => {
                rows.extend(MaintenanceField::all().into_iter().map(FormRow::MaintenanceCount));
                rows.push(FormRow::CleaningNotes);
                rows.push(FormRow::MaintenanceNotes);
            }
        }
        if admin {
            rows.push(FormRow::Status);
        }
        rows
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let rows = self.form_rows();
        let row = rows.get(self.form_focus).copied();

        match key.code {
            KeyCode::Esc => {
                let back = self.form.as_ref().map(ActiveForm::list_view).unwrap_or(View::Dashboard);
                self.form = None;
                self.form_error = None;
                self.view = back;
                return;
            }
            KeyCode::Up | KeyCode::BackTab => self.form_focus = self.form_focus.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => {
                if self.form_focus + 1 < rows.len() {
                    self.form_focus += 1;
                }
            }
            KeyCode::Left => self.cycle(row, false),
            KeyCode::Right => self.cycle(row, true),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Backspace => self.edit_row(row, None),
            KeyCode::Char(c) => self.edit_row(row, Some(c)),
            _ => {}
        }

        let len = self.form_rows().len();
        if self.form_focus >= len {
            self.form_focus = len.saturating_sub(1);
        }
    }

    fn cycle(&mut self, row: Option<FormRow>, forward: bool) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        match row {
            Some(FormRow::Mosque) => {
                let mosques = &self.data.mosques;
                let current = mosques.iter().position(|m| m.mosque_code == form.mosque_code());
                if let Some(i) = step(current, mosques.len(), forward) {
                    form.select_mosque(&mosques[i]);
                }
            }
            Some(FormRow::Day) => {
                let days = form.day_options(&self.data);
                let current = days.iter().position(|d| form.is_current_day(d));
                if let Some(i) = step(current, days.len(), forward) {
                    form.select_day(&days[i]);
                }
            }
            Some(FormRow::Status) => {
                let all = ApprovalStatus::all();
                let current = all.iter().position(|s| *s == form.status());
                if let Some(i) = step(current, all.len(), forward) {
                    if let Err(e) = form.set_status(all[i]) {
                        self.form_error = Some(e.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    /// Appends `c` to the focused text or number field, or erases one
    /// character when `c` is `None`.
    fn edit_row(&mut self, row: Option<FormRow>, c: Option<char>) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        match (row, form) {
            (Some(FormRow::Password), form) => match c {
                Some(c) => form.gate_mut().push_char(c),
                None => form.gate_mut().pop_char(),
            },
            (Some(FormRow::Count(field)), ActiveForm::Daily(f)) => {
                let text = edited_count(f.record.count(field).value(), c);
                f.set_count_text(field, &text);
            }
            (Some(FormRow::Notes), ActiveForm::Daily(f)) => {
                let text = edited(&f.record.notes, c);
                f.set_notes(&text);
            }
            (Some(FormRow::MaintenanceCount(field)), ActiveForm::Maintenance(f)) => {
                let text = edited_count(f.record.count(field).value(), c);
                f.set_count_text(field, &text);
            }
            (Some(FormRow::CleaningNotes), ActiveForm::Maintenance(f)) => {
                let text = edited(&f.record.cleaning_notes, c);
                f.set_cleaning_notes(&text);
            }
            (Some(FormRow::MaintenanceNotes), ActiveForm::Maintenance(f)) => {
                let text = edited(&f.record.maintenance_notes, c);
                f.set_maintenance_notes(&text);
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        match form.submission(&self.data) {
            Ok(submission) => {
                self.form_error = None;
                self.pending = Some(Pending::Save {
                    submission,
                    editing: form.is_editing(),
                    back_to: form.list_view(),
                });
            }
            Err(e) => self.form_error = Some(e.to_string()),
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────────

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        header::render(
            frame,
            chunks[0],
            &self.config.ui.title,
            self.season_year,
            &self.hijri_str,
            self.admin,
        );

        match self.view {
            View::Dashboard => self.draw_dashboard(frame, chunks[1]),
            View::List | View::MaintenanceList => self.draw_list(frame, chunks[1]),
            View::Form | View::Maintenance => self.draw_form(frame, chunks[1]),
        }

        statusbar::render(frame, chunks[2], self.hints());

        if self.input_mode == InputMode::AdminLogin {
            overlay::render_admin_login(frame, &self.input_buffer);
        }
        if self.show_help {
            overlay::render_help(frame);
        }
        if let Some(toast) = &self.toast {
            overlay::render_toast(frame, &toast.message, toast.kind == ToastKind::Success);
        }
        if self.is_loading() {
            overlay::render_loading(frame);
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.input_mode == InputMode::Search {
            return &[("[Enter]", "تطبيق"), ("[Esc]", "مسح البحث")];
        }
        match self.view {
            View::Dashboard => &[
                ("[d]", "تقرير يومي"),
                ("[m]", "صيانة"),
                ("[l]", "السجلات"),
                ("[w]", "سجلات الصيانة"),
                ("[a]", "المسؤول"),
                ("[?]", "مساعدة"),
                ("[q]", "خروج"),
            ],
            View::List | View::MaintenanceList => &[
                ("[↑↓]", "تنقل"),
                ("[Enter]", "فتح"),
                ("[n]", "جديد"),
                ("[/]", "بحث"),
                ("[g]", "تحديث"),
                ("[Esc]", "رجوع"),
            ],
            View::Form | View::Maintenance => &[
                ("[↑↓]", "الحقول"),
                ("[◀▶]", "اختيار"),
                ("[Enter]", "حفظ"),
                ("[Esc]", "إلغاء"),
            ],
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Min(8),
            ])
            .split(area);

        let daily = DailyTotals::from_records(&self.data.records);
        let maintenance = MaintenanceTotals::from_records(&self.data.maintenance);
        tiles::render_daily(frame, rows[0], &daily);
        tiles::render_maintenance(frame, rows[1], &maintenance);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        tiles::render_statuses(
            frame,
            bottom[0],
            "حالة التقارير اليومية",
            &daily.statuses,
            daily.reports,
        );
        tiles::render_statuses(
            frame,
            bottom[1],
            "حالة تقارير الصيانة",
            &maintenance.statuses,
            maintenance.reports,
        );
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        records::render_search(frame, chunks[0], &self.search, self.input_mode == InputMode::Search);
        match self.view {
            View::MaintenanceList => records::render_maintenance(
                frame,
                chunks[1],
                &self.maintenance_rows(),
                self.selected,
                self.admin,
            ),
            _ => records::render_daily(frame, chunks[1], &self.daily_rows(), self.selected, self.admin),
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let Some(form) = &self.form else {
            return;
        };
        let mosques = &self.data.mosques;

        let title = match (form, form.is_editing()) {
            (ActiveForm::Daily(_), false) => "رفع تقرير يومي",
            (ActiveForm::Daily(_), true) => "تعديل التقرير اليومي",
            (ActiveForm::Maintenance(_), false) => "تقرير النظافة والصيانة",
            (ActiveForm::Maintenance(_), true) => "تعديل تقرير الصيانة",
        };

        let mut lines = Vec::new();
        let mut section = None;
        for (i, row) in self.form_rows().into_iter().enumerate() {
            let focused = i == self.form_focus;
            let field = |label: &str, value: String, kind: FieldKind| FormLine::Field {
                label: label.to_string(),
                value,
                kind,
                focused,
                style: theme::bold(),
            };

            let line = match row {
                FormRow::Mosque => {
                    let name = form.mosque_name();
                    let value = if name.is_empty() { "اختر المسجد".to_string() } else { name.to_string() };
                    field("المسجد / الموقع", value, FieldKind::Select)
                }
                FormRow::Password => {
                    let gate = form.gate();
                    let dots = "•".repeat(gate.entered().chars().count());
                    let wrong = gate.selected().is_some()
                        && !gate.entered().is_empty()
                        && !form.is_unlocked(mosques);
                    FormLine::Field {
                        label: "كلمة مرور المسجد".to_string(),
                        value: if wrong { format!("{}  (غير صحيحة)", dots) } else { dots },
                        kind: FieldKind::Text,
                        focused,
                        style: if wrong { theme::red() } else { theme::bold() },
                    }
                }
                FormRow::Day => {
                    let label = form.day_label();
                    let value = if label.is_empty() { "اختر اليوم".to_string() } else { label.to_string() };
                    field("اليوم", value, FieldKind::Select)
                }
                FormRow::Count(f) => {
                    if section != Some(f.section()) {
                        section = Some(f.section());
                        lines.push(FormLine::Section(f.section().title().to_string()));
                    }
                    let value = match form {
                        ActiveForm::Daily(d) => d.record.count(f).to_string(),
                        ActiveForm::Maintenance(_) => String::new(),
                    };
                    field(f.label(), value, FieldKind::Number)
                }
                FormRow::MaintenanceCount(f) => {
                    let value = match form {
                        ActiveForm::Maintenance(m) => m.record.count(f).to_string(),
                        ActiveForm::Daily(_) => String::new(),
                    };
                    field(f.label(), value, FieldKind::Number)
                }
                FormRow::Notes => {
                    lines.push(FormLine::Section("ملاحظات".to_string()));
                    let value = match form {
                        ActiveForm::Daily(d) => d.record.notes.clone(),
                        ActiveForm::Maintenance(_) => String::new(),
                    };
                    field("ملاحظات", value, FieldKind::Text)
                }
                FormRow::CleaningNotes | FormRow::MaintenanceNotes => {
                    let (label, value) = match (row, form) {
                        (FormRow::CleaningNotes, ActiveForm::Maintenance(m)) => {
                            ("وصف أعمال النظافة", m.record.cleaning_notes.clone())
                        }
                        (_, ActiveForm::Maintenance(m)) => {
                            ("وصف أعمال الصيانة", m.record.maintenance_notes.clone())
                        }
                        _ => ("", String::new()),
                    };
                    field(label, value, FieldKind::Text)
                }
                FormRow::Status => {
                    lines.push(FormLine::Section("اعتماد المسؤول".to_string()));
                    let status = form.status();
                    FormLine::Field {
                        label: "حالة الاعتماد".to_string(),
                        value: status.as_str().to_string(),
                        kind: FieldKind::Select,
                        focused,
                        style: theme::status(status),
                    }
                }
            };
            lines.push(line);
        }

        form::render(frame, area, title, &lines, self.form_error.as_deref());
    }
}

/// Next index when cycling a selector of `len` items; an unset selector
/// starts at the first item.
fn step(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        None => 0,
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
    })
}

fn edited(current: &str, c: Option<char>) -> String {
    let mut s = current.to_string();
    match c {
        Some(c) => s.push(c),
        None => {
            s.pop();
        }
    }
    s
}

fn edited_count(current: u64, c: Option<char>) -> String {
    let text = if current == 0 { String::new() } else { current.to_string() };
    edited(&text, c)
}

/// Run the TUI event loop.
pub fn run(store: &dyn SheetStore, config: AppConfig) -> Result<()> {
    let mut app = App::new(config);

    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableBracketedPaste)?;
    let events = EventHandler::new(250);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.is_loading() {
            app.process_pending(store);
            continue;
        }

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key);
                if app.should_quit {
                    break;
                }
            }
            Event::Paste(text) => app.handle_paste(&text),
            Event::Resize => {}
            Event::Tick => app.tick(),
        }
    }

    execute!(std::io::stdout(), DisableBracketedPaste)?;
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryStore;
    use crate::models::reference::ramadan_days;
    use crate::models::DAILY_SHEET;

    fn mosques() -> Vec<MosqueInfo> {
        vec![
            MosqueInfo {
                mosque_code: "M1".into(),
                name: "جامع النور".into(),
                site_type: "مسجد".into(),
                supervisor: "أحمد".into(),
                pwd: "1234".into(),
            },
            MosqueInfo {
                mosque_code: "F1".into(),
                name: "مزرعة الخير".into(),
                site_type: "مزرعة".into(),
                supervisor: String::new(),
                pwd: "9999".into(),
            },
        ]
    }

    fn store() -> MemoryStore {
        MemoryStore::with_reference(&mosques(), &ramadan_days())
    }

    fn loaded_app(store: &MemoryStore) -> App {
        let mut config = AppConfig::default();
        config.season.year = Some(1446);
        config.admin.password = "admin".into();
        let mut app = App::new(config);
        app.process_pending(store);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Mosque M1, password, day 1, then focus on the first count field.
    fn fill_daily_header(app: &mut App) {
        press(app, KeyCode::Char('d'));
        press(app, KeyCode::Right);
        press(app, KeyCode::Down);
        type_str(app, "1234");
        press(app, KeyCode::Down);
        press(app, KeyCode::Right);
        press(app, KeyCode::Down);
    }

    #[test]
    fn starts_loading_then_loads_reference_data() {
        let store = store();
        let mut app = App::new(AppConfig::default());
        assert!(app.is_loading());

        app.process_pending(&store);
        assert!(!app.is_loading());
        assert_eq!(app.data.mosques.len(), 2);
        assert_eq!(app.data.days.len(), 30);
    }

    #[test]
    fn failed_load_shows_error_toast() {
        let store = store();
        store.fail_fetch.set(true);
        let app = loaded_app(&store);

        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, LOAD_FAILED);
    }

    #[test]
    fn keys_are_ignored_while_loading() {
        let mut app = App::new(AppConfig::default());
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.view, View::Dashboard);
    }

    #[test]
    fn form_stays_locked_until_password_matches() {
        let store = store();
        let mut app = loaded_app(&store);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form_rows(), vec![FormRow::Mosque, FormRow::Password]);

        press(&mut app, KeyCode::Down);
        type_str(&mut app, "12");
        assert_eq!(app.form_rows().len(), 2);

        type_str(&mut app, "34");
        assert!(app.form_rows().contains(&FormRow::Day));
    }

    #[test]
    fn switching_mosque_relocks_the_form() {
        let store = store();
        let mut app = loaded_app(&store);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "1234");
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Right);

        assert_eq!(app.form_rows().len(), 2);
    }

    #[test]
    fn new_daily_report_saves_and_reloads() {
        let store = store();
        let mut app = loaded_app(&store);

        fill_daily_header(&mut app);
        let Some(FormRow::Count(field)) = app.form_rows().get(app.form_focus).copied() else {
            panic!("expected a count field under focus");
        };
        type_str(&mut app, "٥0");

        press(&mut app, KeyCode::Enter);
        assert!(app.is_loading());
        app.process_pending(&store);

        assert_eq!(app.view, View::List);
        assert!(app.form.is_none());
        assert_eq!(app.toast.as_ref().unwrap().message, ADDED);

        // the save queues a fresh fetch
        assert!(app.is_loading());
        app.process_pending(&store);
        assert_eq!(app.data.records.len(), 1);
        let saved = &app.data.records[0];
        assert_eq!(saved.mosque_code, "M1");
        assert_eq!(saved.code_day, "DAY_01");
        assert_eq!(saved.hijri_date, "1/09/1446");
        assert_eq!(saved.count(field).value(), 50);
        assert_eq!(store.rows(DAILY_SHEET).len(), 1);
    }

    #[test]
    fn failed_save_keeps_the_form() {
        let store = store();
        let mut app = loaded_app(&store);

        fill_daily_header(&mut app);
        type_str(&mut app, "7");
        store.fail_next_save.set(true);
        press(&mut app, KeyCode::Enter);
        app.process_pending(&store);

        assert_eq!(app.view, View::Form);
        assert!(app.form.is_some());
        assert!(!app.is_loading());
        assert_eq!(app.toast.as_ref().unwrap().message, SAVE_FAILED);
        assert!(store.rows(DAILY_SHEET).is_empty());
    }

    #[test]
    fn submitting_without_day_shows_inline_error() {
        let store = store();
        let mut app = loaded_app(&store);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "1234");
        press(&mut app, KeyCode::Enter);

        assert!(!app.is_loading());
        assert_eq!(app.form_error.as_deref(), Some(FormError::NoDay.to_string().as_str()));
    }

    #[test]
    fn used_day_is_skipped_in_selector() {
        let store = store();
        let mut app = loaded_app(&store);

        fill_daily_header(&mut app);
        press(&mut app, KeyCode::Enter);
        app.process_pending(&store);
        app.process_pending(&store);

        press(&mut app, KeyCode::Esc);
        fill_daily_header(&mut app);
        match &app.form {
            Some(ActiveForm::Daily(f)) => assert_eq!(f.record.code_day, "DAY_02"),
            _ => panic!("daily form expected"),
        }
    }

    #[test]
    fn editing_from_list_sends_only_changes() {
        let store = store();
        let mut app = loaded_app(&store);

        fill_daily_header(&mut app);
        type_str(&mut app, "10");
        press(&mut app, KeyCode::Enter);
        app.process_pending(&store);
        app.process_pending(&store);

        assert_eq!(app.view, View::List);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Form);
        assert!(app.form.as_ref().unwrap().is_editing());

        // unchanged edit is refused
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "1234");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.form_error.as_deref(),
            Some(FormError::NothingChanged.to_string().as_str())
        );

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        app.process_pending(&store);
        assert_eq!(app.toast.as_ref().unwrap().message, UPDATED);

        let last = store.saves.borrow().last().cloned().unwrap();
        assert!(last.fields.contains_key("record_id"));
        assert!(!last.fields.contains_key("mosque_code"));
    }

    #[test]
    fn admin_login_checks_config_password() {
        let store = store();
        let mut app = loaded_app(&store);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input_mode, InputMode::AdminLogin);
        type_str(&mut app, "nope");
        press(&mut app, KeyCode::Enter);
        assert!(!app.admin);
        assert_eq!(app.toast.as_ref().unwrap().kind, ToastKind::Error);

        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "admin");
        press(&mut app, KeyCode::Enter);
        assert!(app.admin);
    }

    #[test]
    fn admin_form_skips_password_and_offers_status() {
        let store = store();
        let mut app = loaded_app(&store);
        app.admin = true;

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Right);
        let rows = app.form_rows();
        assert!(!rows.contains(&FormRow::Password));
        assert_eq!(rows.last(), Some(&FormRow::Status));

        app.form_focus = rows.len() - 1;
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.as_ref().unwrap().status(), ApprovalStatus::Approved);
    }

    #[test]
    fn farm_form_hides_worshipper_fields() {
        let store = store();
        let mut app = loaded_app(&store);
        app.admin = true;

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        let rows = app.form_rows();
        assert!(!rows.contains(&FormRow::Count(DailyField::WorshippersMen)));
        assert!(rows.contains(&FormRow::Count(DailyField::IftarMeals)));
    }

    #[test]
    fn maintenance_form_saves_to_its_sheet() {
        let store = store();
        let mut app = loaded_app(&store);

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "1234");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        type_str(&mut app, "3");
        press(&mut app, KeyCode::Enter);
        app.process_pending(&store);

        assert_eq!(app.view, View::MaintenanceList);
        let saved = store.saves.borrow().last().cloned().unwrap();
        assert_eq!(saved.sheet, crate::models::MAINTENANCE_SHEET);
    }

    #[test]
    fn search_filters_list_and_esc_clears() {
        let store = store();
        let mut app = loaded_app(&store);
        fill_daily_header(&mut app);
        press(&mut app, KeyCode::Enter);
        app.process_pending(&store);
        app.process_pending(&store);

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "مزرعة");
        assert_eq!(app.daily_rows().len(), 0);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.daily_rows().len(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Dashboard);
    }

    #[test]
    fn esc_from_form_returns_to_its_list() {
        let store = store();
        let mut app = loaded_app(&store);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.view, View::Maintenance);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::MaintenanceList);
        assert!(app.form.is_none());
    }

    #[test]
    fn paste_fills_focused_field_but_not_dashboard() {
        let store = store();
        let mut app = loaded_app(&store);

        app.handle_paste("q");
        assert!(!app.should_quit);

        fill_daily_header(&mut app);
        app.handle_paste("١٢\n");
        match &app.form {
            Some(ActiveForm::Daily(f)) => {
                assert_eq!(f.record.count(DailyField::WorshippersMen).value(), 12)
            }
            _ => panic!("daily form expected"),
        }
    }

    #[test]
    fn step_wraps_both_ways() {
        assert_eq!(step(None, 3, true), Some(0));
        assert_eq!(step(Some(2), 3, true), Some(0));
        assert_eq!(step(Some(0), 3, false), Some(2));
        assert_eq!(step(None, 0, true), None);
    }
}
