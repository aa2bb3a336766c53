//! Tracker REST client.
//!
//! [`TrackerApi`] is the seam between the presentation pipeline and the
//! network: tools depend on the trait, [`HttpTrackerClient`] implements it
//! over blocking `reqwest`, and tests substitute in-memory fakes.

use crate::config::Config;
use crate::error::{Result, TrackerError};
use crate::members::MemberDirectory;
use crate::raw::{field, RawRecord};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

// ---------------------------------------------------------------------------
// TrackerApi
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemQuery {
    pub keywords: Option<String>,
    pub project: Option<String>,
    pub limit: u32,
}

pub trait TrackerApi: Send + Sync {
    fn work_item(&self, id: &str) -> Result<RawRecord>;
    fn work_item_comments(&self, id: &str) -> Result<Vec<Value>>;
    fn search_work_items(&self, query: &WorkItemQuery) -> Result<Vec<RawRecord>>;
    fn projects(&self) -> Result<Vec<RawRecord>>;
    fn releases(&self, project: &str) -> Result<Vec<RawRecord>>;
    fn members(&self) -> Result<MemberDirectory>;
}

/// Fetch a work item with its comments and the member directory needed to
/// display it. Comments and members are enrichment: failures there are
/// logged and the item is still returned.
pub fn fetch_work_item(api: &dyn TrackerApi, id: &str) -> Result<(RawRecord, MemberDirectory)> {
    let mut raw = api.work_item(id)?;

    if raw.array("comments").is_empty() {
        match api.work_item_comments(id) {
            Ok(comments) => raw.set("comments", Value::Array(comments)),
            Err(e) => tracing::warn!(id, error = %e, "failed to fetch comments"),
        }
    }

    let members = api.members().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch members; names may be missing");
        MemberDirectory::new()
    });

    Ok((raw, members))
}

// ---------------------------------------------------------------------------
// HttpTrackerClient
// ---------------------------------------------------------------------------

pub struct HttpTrackerClient {
    base_url: Url,
    cookie: String,
    http: Client,
}

impl HttpTrackerClient {
    pub fn new(config: &Config, cookie: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| TrackerError::InvalidConfig(format!("base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TrackerError::InvalidConfig(format!(
                "base_url '{}' cannot be used as a base",
                config.base_url
            )));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            base_url,
            cookie: cookie.into(),
            http,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET and unwrap the `{code, message, data}` envelope.
    fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value> {
        let url = self.url(segments);
        tracing::debug!(url = %url, "tracker request");

        let resp = self
            .http
            .get(url)
            .header(COOKIE, &self.cookie)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TrackerError::NotAuthenticated);
        }
        let body: Value = if status.is_success() {
            resp.json()?
        } else {
            let text = resp.text().unwrap_or_default();
            return Err(TrackerError::Api {
                status: status.as_u16(),
                message: error_message(&text).unwrap_or_else(|| status.to_string()),
            });
        };

        unwrap_envelope(body)
    }
}

fn error_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    field(&v, "message")?.as_str().map(str::to_string)
}

fn unwrap_envelope(body: Value) -> Result<Value> {
    let code = field(&body, "code").and_then(crate::raw::as_int);
    match code {
        None | Some(0) | Some(200) => {}
        Some(401) | Some(403) => return Err(TrackerError::NotAuthenticated),
        Some(code) => {
            return Err(TrackerError::Api {
                status: u16::try_from(code).unwrap_or(0),
                message: field(&body, "message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            })
        }
    }
    Ok(match body {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        other => other,
    })
}

/// List payloads are either a bare array or `{ "value": [...] }`.
fn list_of(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("value") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Single-object payloads may also be wrapped in `{ "value": {...} }`.
fn single_of(data: Value) -> Value {
    match data {
        Value::Object(mut map) if matches!(map.get("value"), Some(Value::Object(_))) => {
            map.remove("value").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn is_not_found(e: &TrackerError) -> bool {
    matches!(e, TrackerError::Api { status: 404, .. })
}

impl TrackerApi for HttpTrackerClient {
    fn work_item(&self, id: &str) -> Result<RawRecord> {
        let data = self
            .get(&["api", "agile", "work-items", id], &[])
            .map_err(|e| {
                if is_not_found(&e) {
                    TrackerError::WorkItemNotFound(id.to_string())
                } else {
                    e
                }
            })?;
        match single_of(data) {
            Value::Null => Err(TrackerError::WorkItemNotFound(id.to_string())),
            v => Ok(RawRecord::new(v)),
        }
    }

    fn work_item_comments(&self, id: &str) -> Result<Vec<Value>> {
        let data = self.get(&["api", "agile", "work-items", id, "comments"], &[])?;
        Ok(list_of(data))
    }

    fn search_work_items(&self, query: &WorkItemQuery) -> Result<Vec<RawRecord>> {
        let mut params = vec![("page_size", query.limit.max(1).to_string())];
        if let Some(k) = &query.keywords {
            params.push(("keywords", k.clone()));
        }
        if let Some(p) = &query.project {
            params.push(("project_id", p.clone()));
        }
        let data = self.get(&["api", "agile", "work-items"], &params)?;
        Ok(list_of(data).into_iter().map(RawRecord::new).collect())
    }

    fn projects(&self) -> Result<Vec<RawRecord>> {
        let data = self.get(&["api", "agile", "projects"], &[])?;
        Ok(list_of(data).into_iter().map(RawRecord::new).collect())
    }

    fn releases(&self, project: &str) -> Result<Vec<RawRecord>> {
        let data = self
            .get(&["api", "agile", "projects", project, "releases"], &[])
            .map_err(|e| {
                if is_not_found(&e) {
                    TrackerError::ProjectNotFound(project.to_string())
                } else {
                    e
                }
            })?;
        Ok(list_of(data).into_iter().map(RawRecord::new).collect())
    }

    fn members(&self) -> Result<MemberDirectory> {
        let data = self.get(&["api", "directory", "members"], &[])?;
        Ok(MemberDirectory::from_values(&list_of(data)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(server: &Server) -> HttpTrackerClient {
        let config = Config::default().with_base_url(Some(server.url()));
        HttpTrackerClient::new(&config, "sid=abc").unwrap()
    }

    #[test]
    fn work_item_unwraps_envelope_and_sends_cookie() {
        let mut server = Server::new();
        let m = server
            .mock("GET", "/api/agile/work-items/LFY-42")
            .match_header("cookie", "sid=abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"code": 200, "data": {"value": {"whole_identifier": "LFY-42"}}})
                    .to_string(),
            )
            .create();

        let raw = client(&server).work_item("LFY-42").unwrap();
        assert_eq!(raw.str("whole_identifier"), Some("LFY-42"));
        m.assert();
    }

    #[test]
    fn not_found_maps_to_work_item_not_found() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/agile/work-items/NOPE-1")
            .with_status(404)
            .with_body(r#"{"message": "no such item"}"#)
            .create();

        let err = client(&server).work_item("NOPE-1").unwrap_err();
        assert!(matches!(err, TrackerError::WorkItemNotFound(ref id) if id == "NOPE-1"));
    }

    #[test]
    fn unauthorized_maps_to_not_authenticated() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/agile/projects")
            .with_status(401)
            .create();
        let err = client(&server).projects().unwrap_err();
        assert!(matches!(err, TrackerError::NotAuthenticated));
    }

    #[test]
    fn envelope_error_code_is_an_api_error() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/agile/projects")
            .with_status(200)
            .with_body(r#"{"code": 500, "message": "boom"}"#)
            .create();
        let err = client(&server).projects().unwrap_err();
        match err {
            TrackerError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn search_passes_query_parameters() {
        let mut server = Server::new();
        let m = server
            .mock("GET", "/api/agile/work-items")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("keywords".into(), "crash".into()),
                Matcher::UrlEncoded("project_id".into(), "LFY".into()),
                Matcher::UrlEncoded("page_size".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body(json!({"data": {"value": [{"title": "a"}, {"title": "b"}]}}).to_string())
            .create();

        let items = client(&server)
            .search_work_items(&WorkItemQuery {
                keywords: Some("crash".to_string()),
                project: Some("LFY".to_string()),
                limit: 5,
            })
            .unwrap();
        assert_eq!(items.len(), 2);
        m.assert();
    }

    #[test]
    fn members_build_directory() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/directory/members")
            .with_status(200)
            .with_body(json!({"data": [{"uid": "u1", "display_name": "Alice"}]}).to_string())
            .create();
        let dir = client(&server).members().unwrap();
        assert_eq!(dir.name_of("u1"), Some("Alice"));
    }

    #[test]
    fn releases_404_is_project_not_found() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/agile/projects/GONE/releases")
            .with_status(404)
            .create();
        let err = client(&server).releases("GONE").unwrap_err();
        assert!(matches!(err, TrackerError::ProjectNotFound(_)));
    }

    #[test]
    fn fetch_work_item_merges_comments_and_tolerates_member_failure() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/agile/work-items/LFY-1")
            .with_status(200)
            .with_body(json!({"data": {"whole_identifier": "LFY-1"}}).to_string())
            .create();
        server
            .mock("GET", "/api/agile/work-items/LFY-1/comments")
            .with_status(200)
            .with_body(json!({"data": {"value": [{"content": "hi"}]}}).to_string())
            .create();
        server
            .mock("GET", "/api/directory/members")
            .with_status(500)
            .create();

        let api = client(&server);
        let (raw, members) = fetch_work_item(&api, "LFY-1").unwrap();
        assert_eq!(raw.array("comments").len(), 1);
        assert!(members.is_empty());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = Config::default().with_base_url(Some("not a url".to_string()));
        assert!(matches!(
            HttpTrackerClient::new(&config, "x"),
            Err(TrackerError::InvalidConfig(_))
        ));
    }
}
