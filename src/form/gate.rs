use crate::models::MosqueInfo;

/// Per-mosque password check guarding a report form.
///
/// The comparison is a plain trimmed string match against the password
/// stored on the mosque row; there is nothing more to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordGate {
    selected: Option<String>,
    entered: String,
    admin: bool,
}

impl PasswordGate {
    pub fn new(admin: bool) -> Self {
        Self {
            selected: None,
            entered: String::new(),
            admin,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn entered(&self) -> &str {
        &self.entered
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Switching mosques always clears whatever was typed.
    pub fn select(&mut self, mosque_code: &str) {
        let code = mosque_code.trim();
        self.selected = if code.is_empty() {
            None
        } else {
            Some(code.to_string())
        };
        self.entered.clear();
    }

    pub fn set_password(&mut self, entered: &str) {
        self.entered = entered.to_string();
    }

    pub fn push_char(&mut self, c: char) {
        self.entered.push(c);
    }

    pub fn pop_char(&mut self) {
        self.entered.pop();
    }

    pub fn is_unlocked(&self, mosques: &[MosqueInfo]) -> bool {
        if self.admin {
            return true;
        }
        let Some(code) = self.selected.as_deref() else {
            return false;
        };
        mosques
            .iter()
            .find(|m| m.mosque_code == code)
            .map(|m| password_matches(&m.pwd, &self.entered))
            .unwrap_or(false)
    }
}

/// Trimmed equality. An empty stored password never matches, so a mosque
/// row with a blank `pwd` cannot be opened by an empty entry.
pub fn password_matches(stored: &str, entered: &str) -> bool {
    let stored = stored.trim();
    !stored.is_empty() && stored == entered.trim()
}
