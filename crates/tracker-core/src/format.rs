//! Raw tracker record → display-ready scalar fields.
//!
//! Every function here is total: missing or malformed data degrades to the
//! [`UNKNOWN`] / [`NOT_SET`] sentinels or an empty string.

use crate::members::MemberDirectory;
use crate::raw::{as_int, display_name, field, RawRecord};
use crate::types::{priority_label, StateCategory, WorkItemKind, NOT_SET, UNKNOWN};
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Epoch values at or above this are milliseconds.
const MILLIS_THRESHOLD: u64 = 1_000_000_000_000;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// FormatContext
// ---------------------------------------------------------------------------

/// Lookup state shared by every formatter call for one request.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    pub members: MemberDirectory,
    /// Fixed display offset. `None` uses the system's local time zone.
    pub utc_offset: Option<FixedOffset>,
}

impl FormatContext {
    pub fn new(members: MemberDirectory) -> Self {
        Self {
            members,
            utc_offset: None,
        }
    }

    pub fn with_utc_offset_minutes(mut self, minutes: Option<i32>) -> Self {
        self.utc_offset = minutes
            .and_then(|m| m.checked_mul(60))
            .and_then(FixedOffset::east_opt);
        self
    }

    pub fn format_time(&self, ts: Option<i64>) -> String {
        format_timestamp(ts, self.utc_offset)
    }
}

// ---------------------------------------------------------------------------
// FieldEntry / RecordFields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub label: String,
    pub value: String,
}

impl FieldEntry {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub identifier: String,
    pub title: String,
    pub type_name: String,
    pub kind: WorkItemKind,
    pub state: String,
    pub priority: String,
    pub assignee: String,
    pub creator: String,
    pub created_at: String,
    pub updated_at: String,
}

impl RecordFields {
    /// Metadata entries in display order. Creator and timestamps are omitted
    /// when empty.
    pub fn entries(&self) -> Vec<FieldEntry> {
        let mut out = vec![
            FieldEntry::new("Type", &self.type_name),
            FieldEntry::new("State", &self.state),
            FieldEntry::new("Priority", &self.priority),
            FieldEntry::new("Assignee", &self.assignee),
        ];
        for (label, value) in [
            ("Creator", &self.creator),
            ("Created", &self.created_at),
            ("Updated", &self.updated_at),
        ] {
            if !value.is_empty() {
                out.push(FieldEntry::new(label, value));
            }
        }
        out
    }
}

pub fn format_fields(raw: &RawRecord, ctx: &FormatContext) -> RecordFields {
    let type_name = type_name(raw);
    RecordFields {
        identifier: identifier(raw),
        title: raw.str("title").unwrap_or_default().trim().to_string(),
        kind: WorkItemKind::from_label(&type_name),
        type_name,
        state: state_name(raw),
        priority: priority_name(raw),
        assignee: assignee_name(raw, &ctx.members),
        creator: creator_name(raw, &ctx.members),
        created_at: ctx.format_time(raw.i64("created_at")),
        updated_at: ctx.format_time(raw.i64("updated_at")),
    }
}

// ---------------------------------------------------------------------------
// Individual fields
// ---------------------------------------------------------------------------

pub fn identifier(raw: &RawRecord) -> String {
    if let Some(whole) = raw.str("whole_identifier") {
        return whole.to_string();
    }
    match raw.get("identifier") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(v) => as_int(v).map(|n| format!("#{n}")).unwrap_or_default(),
        None => String::new(),
    }
}

pub fn type_name(raw: &RawRecord) -> String {
    match raw.get("type") {
        Some(Value::Number(_)) => raw
            .i64("type")
            .map(|code| WorkItemKind::from_code(code).label())
            .unwrap_or(WorkItemKind::Other.label())
            .to_string(),
        Some(obj @ Value::Object(_)) => display_name(obj).unwrap_or(UNKNOWN).to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => match s.trim().parse::<i64>() {
            Ok(code) => WorkItemKind::from_code(code).label().to_string(),
            Err(_) => s.trim().to_string(),
        },
        _ => UNKNOWN.to_string(),
    }
}

pub fn state_name(raw: &RawRecord) -> String {
    if let Some(name) = raw.object("state").and_then(display_name) {
        return name.to_string();
    }
    raw.i64("state_type")
        .or_else(|| raw.i64("state"))
        .and_then(StateCategory::from_code)
        .map(|c| c.as_str())
        .unwrap_or(UNKNOWN)
        .to_string()
}

pub fn priority_name(raw: &RawRecord) -> String {
    let priority = raw.get("priority");
    let id = match priority {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(obj @ Value::Object(_)) => field(obj, "_id")
            .or_else(|| field(obj, "id"))
            .and_then(Value::as_str),
        _ => None,
    };
    if let Some(label) = id.and_then(priority_label) {
        return label.to_string();
    }
    raw.str("priority_name")
        .or_else(|| raw.object("priority").and_then(display_name))
        .unwrap_or(NOT_SET)
        .to_string()
}

pub fn assignee_name(raw: &RawRecord, members: &MemberDirectory) -> String {
    members
        .resolve(raw.value(), "assignee_name", "assignee")
        .unwrap_or_else(|| NOT_SET.to_string())
}

pub fn creator_name(raw: &RawRecord, members: &MemberDirectory) -> String {
    members
        .resolve(raw.value(), "created_by_name", "created_by")
        .unwrap_or_default()
}

/// Format a Unix timestamp in seconds or milliseconds. Absent or out of
/// range values yield an empty string.
pub fn format_timestamp(ts: Option<i64>, offset: Option<FixedOffset>) -> String {
    let Some(ts) = ts else {
        return String::new();
    };
    let secs = if ts.unsigned_abs() >= MILLIS_THRESHOLD {
        ts.div_euclid(1000)
    } else {
        ts
    };
    let Some(utc) = DateTime::from_timestamp(secs, 0) else {
        return String::new();
    };
    match offset {
        Some(off) => utc.with_timezone(&off).format(TIME_FORMAT).to_string(),
        None => utc.with_timezone(&Local).format(TIME_FORMAT).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawRecord {
        RawRecord::new(v)
    }

    fn utc() -> Option<FixedOffset> {
        FixedOffset::east_opt(0)
    }

    #[test]
    fn identifier_preference_order() {
        assert_eq!(
            identifier(&raw(json!({"whole_identifier": "LFY-42", "identifier": 42}))),
            "LFY-42"
        );
        assert_eq!(identifier(&raw(json!({"identifier": "LFY-7"}))), "LFY-7");
        assert_eq!(identifier(&raw(json!({"identifier": 7}))), "#7");
        assert_eq!(identifier(&raw(json!({}))), "");
    }

    #[test]
    fn type_from_code_object_and_missing() {
        assert_eq!(type_name(&raw(json!({"type": 5}))), "bug");
        assert_eq!(type_name(&raw(json!({"type": 2}))), "requirement");
        assert_eq!(type_name(&raw(json!({"type": 42}))), "work item");
        assert_eq!(
            type_name(&raw(json!({"type": {"display_name": "Defect", "name": "bug"}}))),
            "Defect"
        );
        assert_eq!(type_name(&raw(json!({"type": {"name": "story"}}))), "story");
        assert_eq!(type_name(&raw(json!({"type": {}}))), "unknown");
        assert_eq!(type_name(&raw(json!({}))), "unknown");
    }

    #[test]
    fn state_prefers_embedded_object() {
        let r = raw(json!({"state": {"display_name": "Fixing"}, "state_type": 3}));
        assert_eq!(state_name(&r), "Fixing");
        assert_eq!(state_name(&raw(json!({"state_type": 2}))), "in progress");
        assert_eq!(state_name(&raw(json!({"state": 4}))), "closed");
        assert_eq!(state_name(&raw(json!({"state_type": 9}))), "unknown");
        assert_eq!(state_name(&raw(json!({}))), "unknown");
    }

    #[test]
    fn priority_table_then_embedded_name() {
        let urgent = raw(json!({"priority": "5cb9466afda1ce4ca0090001"}));
        assert_eq!(priority_name(&urgent), "urgent");

        let as_object = raw(json!({"priority": {"_id": "5cb9466afda1ce4ca0090003"}}));
        assert_eq!(priority_name(&as_object), "medium");

        let custom = raw(json!({"priority": {"_id": "abc", "name": "P0"}}));
        assert_eq!(priority_name(&custom), "P0");

        let named = raw(json!({"priority": "abc", "priority_name": "Blocker"}));
        assert_eq!(priority_name(&named), "Blocker");

        assert_eq!(priority_name(&raw(json!({"priority": "abc"}))), "not set");
        assert_eq!(priority_name(&raw(json!({}))), "not set");
    }

    #[test]
    fn people_resolution() {
        let mut members = MemberDirectory::new();
        members.insert("u1", "Alice");
        let r = raw(json!({"assignee": "u1", "created_by": {"name": "bob"}}));
        assert_eq!(assignee_name(&r, &members), "Alice");
        assert_eq!(creator_name(&r, &members), "bob");

        let empty = raw(json!({}));
        assert_eq!(assignee_name(&empty, &members), "not set");
        assert_eq!(creator_name(&empty, &members), "");
    }

    #[test]
    fn seconds_and_millis_format_identically() {
        let secs = format_timestamp(Some(1_700_000_000), utc());
        let millis = format_timestamp(Some(1_700_000_000_000), utc());
        assert_eq!(secs, millis);
        assert_eq!(secs, "2023-11-14 22:13");

        // Local time zone path agrees with itself as well.
        assert_eq!(
            format_timestamp(Some(1_700_000_000), None),
            format_timestamp(Some(1_700_000_000_000), None)
        );
    }

    #[test]
    fn timestamps_respect_offset_and_absence() {
        let plus8 = FixedOffset::east_opt(8 * 3600);
        assert_eq!(format_timestamp(Some(1_700_000_000), plus8), "2023-11-15 06:13");
        assert_eq!(format_timestamp(None, utc()), "");
        assert_eq!(format_timestamp(Some(i64::MAX), utc()), "");
        assert_eq!(format_timestamp(Some(i64::MIN), utc()), "");
    }

    #[test]
    fn entries_omit_empty_optional_fields() {
        let ctx = FormatContext::default().with_utc_offset_minutes(Some(0));
        let fields = format_fields(&raw(json!({"type": 4, "title": "t"})), &ctx);
        let labels: Vec<String> = fields.entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Type", "State", "Priority", "Assignee"]);

        let full = format_fields(
            &raw(json!({
                "type": 4,
                "created_by_name": "bob",
                "created_at": 1_700_000_000,
                "updated_at": 1_700_000_000_000_i64
            })),
            &ctx,
        );
        let labels: Vec<String> = full.entries().into_iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec!["Type", "State", "Priority", "Assignee", "Creator", "Created", "Updated"]
        );
    }

    #[test]
    fn format_fields_never_panics_on_garbage() {
        let ctx = FormatContext::default();
        for junk in [json!(null), json!([1, 2]), json!("x"), json!({"type": [], "state": "?"})] {
            let f = format_fields(&raw(junk), &ctx);
            assert_eq!(f.assignee, "not set");
        }
    }
}
