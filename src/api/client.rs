use chrono::Utc;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::api::error::ApiError;
use crate::api::response::{check_success, parse_dataset, Dataset};

// ─── Submission ──────────────────────────────────────────────────────────────

/// One record (or the changed part of one) addressed to a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub sheet: String,
    pub fields: Map<String, Value>,
}

impl Submission {
    pub fn new(sheet: &str, fields: Map<String, Value>) -> Self {
        Self {
            sheet: sheet.to_string(),
            fields,
        }
    }

    pub fn record_id(&self) -> Option<&str> {
        self.fields.get("record_id").and_then(Value::as_str)
    }

    /// JSON body: the fields plus `sheet` and `sheet_name` tags.
    pub fn to_body(&self) -> String {
        let mut body = self.fields.clone();
        body.insert("sheet".into(), Value::from(self.sheet.clone()));
        body.insert("sheet_name".into(), Value::from(self.sheet.clone()));
        Value::Object(body).to_string()
    }
}

/// What a save call learned. A best-effort post cannot read the reply, so
/// success there is assumed rather than confirmed.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveReceipt {
    Assumed,
    Confirmed(Value),
}

// ─── Store seam ──────────────────────────────────────────────────────────────

/// The remote sheet, as the rest of the app sees it.
pub trait SheetStore {
    fn fetch_all(&self) -> Result<Dataset, ApiError>;
    fn save(&self, submission: &Submission) -> Result<SaveReceipt, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostMode {
    /// `text/plain`, response not read. Avoids the endpoint's preflight quirks.
    BestEffort,
    /// `application/json`, status checked, body returned.
    Standard,
}

/// Raw HTTP under the store; swapped out in tests.
pub trait Transport {
    fn get(&self, url: &str) -> Result<String, ApiError>;
    fn post(&self, url: &str, body: String, mode: PostMode) -> Result<Option<String>, ApiError>;
}

// ─── reqwest transport ───────────────────────────────────────────────────────

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// `timeout_secs = None` keeps requests unbounded.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout_secs.map(Duration::from_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<String, ApiError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(resp.text()?)
    }

    fn post(&self, url: &str, body: String, mode: PostMode) -> Result<Option<String>, ApiError> {
        match mode {
            PostMode::BestEffort => {
                self.client
                    .post(url)
                    .header(CONTENT_TYPE, "text/plain;charset=utf-8")
                    .body(body)
                    .send()?;
                Ok(None)
            }
            PostMode::Standard => {
                let resp = self
                    .client
                    .post(url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
                    .send()?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(ApiError::Status(status.as_u16()));
                }
                Ok(Some(resp.text()?))
            }
        }
    }
}

// ─── HTTP store ──────────────────────────────────────────────────────────────

pub struct HttpStore<T: Transport = ReqwestTransport> {
    endpoint: String,
    transport: T,
}

impl HttpStore<ReqwestTransport> {
    pub fn connect(endpoint: &str, timeout_secs: Option<u64>) -> Result<Self, ApiError> {
        Ok(Self::with_transport(endpoint, ReqwestTransport::new(timeout_secs)?))
    }
}

impl<T: Transport> HttpStore<T> {
    pub fn with_transport(endpoint: &str, transport: T) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            transport,
        }
    }

    /// Endpoint with a `t=<millis>` query so caches never answer for it.
    fn fresh_url(&self) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}t={}", self.endpoint, sep, Utc::now().timestamp_millis())
    }
}

impl<T: Transport> SheetStore for HttpStore<T> {
    fn fetch_all(&self) -> Result<Dataset, ApiError> {
        let url = self.fresh_url();
        debug!("GET {}", url);
        let body = self.transport.get(&url)?;
        let dataset = parse_dataset(&body)?;
        info!(
            "fetched {} daily, {} maintenance, {} mosques, {} days",
            dataset.records.len(),
            dataset.maintenance.len(),
            dataset.mosques.len(),
            dataset.days.len()
        );
        Ok(dataset)
    }

    fn save(&self, submission: &Submission) -> Result<SaveReceipt, ApiError> {
        let body = submission.to_body();
        debug!(
            "POST {} sheet={} record_id={:?}",
            self.endpoint,
            submission.sheet,
            submission.record_id()
        );

        match self.transport.post(&self.endpoint, body.clone(), PostMode::BestEffort) {
            Ok(_) => return Ok(SaveReceipt::Assumed),
            Err(e) => warn!("best-effort post failed ({}), retrying as JSON", e),
        }

        let reply = self
            .transport
            .post(&self.endpoint, body, PostMode::Standard)?
            .unwrap_or_default();
        let value: Value = serde_json::from_str(&reply)?;
        if let Some(obj) = value.as_object() {
            check_success(obj)?;
        }
        Ok(SaveReceipt::Confirmed(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Scripted transport: records calls, answers from queues.
    #[derive(Default)]
    struct Scripted {
        get_body: String,
        best_effort_fails: bool,
        standard_reply: Option<Result<String, u16>>,
        calls: RefCell<Vec<(String, PostMode, String)>>,
        gets: RefCell<Vec<String>>,
    }

    impl Transport for Scripted {
        fn get(&self, url: &str) -> Result<String, ApiError> {
            self.gets.borrow_mut().push(url.to_string());
            Ok(self.get_body.clone())
        }

        fn post(&self, url: &str, body: String, mode: PostMode) -> Result<Option<String>, ApiError> {
            self.calls.borrow_mut().push((url.to_string(), mode, body));
            match mode {
                PostMode::BestEffort if self.best_effort_fails => {
                    Err(ApiError::Network("connection reset".into()))
                }
                PostMode::BestEffort => Ok(None),
                PostMode::Standard => match &self.standard_reply {
                    Some(Ok(s)) => Ok(Some(s.clone())),
                    Some(Err(code)) => Err(ApiError::Status(*code)),
                    None => Err(ApiError::Network("unreachable".into())),
                },
            }
        }
    }

    fn submission() -> Submission {
        let mut fields = Map::new();
        fields.insert("record_id".into(), Value::from("R1"));
        fields.insert("عدد_المصلين_رجال".into(), Value::from(12));
        Submission::new("daily_mosque_report", fields)
    }

    #[test]
    fn body_carries_sheet_tags() {
        let v: Value = serde_json::from_str(&submission().to_body()).unwrap();
        assert_eq!(v["sheet"], "daily_mosque_report");
        assert_eq!(v["sheet_name"], "daily_mosque_report");
        assert_eq!(v["record_id"], "R1");
        assert_eq!(v["عدد_المصلين_رجال"], 12);
    }

    #[test]
    fn best_effort_success_is_assumed_and_single_call() {
        let store = HttpStore::with_transport("https://sheet.test/exec", Scripted::default());
        let receipt = store.save(&submission()).unwrap();
        assert_eq!(receipt, SaveReceipt::Assumed);
        let calls = store.transport.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, PostMode::BestEffort);
    }

    #[test]
    fn falls_back_to_json_post_once() {
        let transport = Scripted {
            best_effort_fails: true,
            standard_reply: Some(Ok(r#"{"success": true, "row": 7}"#.into())),
            ..Default::default()
        };
        let store = HttpStore::with_transport("https://sheet.test/exec", transport);
        let receipt = store.save(&submission()).unwrap();
        assert!(matches!(receipt, SaveReceipt::Confirmed(v) if v["row"] == 7));
        let calls = store.transport.calls.borrow();
        let modes: Vec<PostMode> = calls.iter().map(|c| c.1).collect();
        assert_eq!(modes, vec![PostMode::BestEffort, PostMode::Standard]);
        assert_eq!(calls[0].2, calls[1].2);
    }

    #[test]
    fn fallback_failure_propagates() {
        let transport = Scripted {
            best_effort_fails: true,
            standard_reply: Some(Err(500)),
            ..Default::default()
        };
        let store = HttpStore::with_transport("https://sheet.test/exec", transport);
        assert!(matches!(store.save(&submission()), Err(ApiError::Status(500))));
    }

    #[test]
    fn fallback_reply_with_success_false_is_rejected() {
        let transport = Scripted {
            best_effort_fails: true,
            standard_reply: Some(Ok(r#"{"success": false, "error": "locked"}"#.into())),
            ..Default::default()
        };
        let store = HttpStore::with_transport("https://sheet.test/exec", transport);
        assert!(matches!(store.save(&submission()), Err(ApiError::Rejected(m)) if m == "locked"));
    }

    #[test]
    fn fetch_adds_cache_buster() {
        let transport = Scripted {
            get_body: r#"{"success": true, "data": []}"#.into(),
            ..Default::default()
        };
        let store = HttpStore::with_transport("https://sheet.test/exec?k=1", transport);
        store.fetch_all().unwrap();
        let gets = store.transport.gets.borrow();
        assert!(gets[0].starts_with("https://sheet.test/exec?k=1&t="));
    }
}
