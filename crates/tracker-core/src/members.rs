use crate::raw::{display_name, first_str};
use serde_json::Value;
use std::collections::HashMap;

/// Member id → display name, resolved once per request by the caller.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    names: HashMap<String, String>,
}

impl MemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Build from tracker member payloads. Entries without an id or a name
    /// are skipped.
    pub fn from_values(members: &[Value]) -> Self {
        let mut dir = Self::new();
        for m in members {
            let id = first_str(m, &["uid", "_id", "id"]);
            let name = display_name(m);
            if let (Some(id), Some(name)) = (id, name) {
                dir.insert(id, name);
            }
        }
        dir
    }

    /// Resolve a person reference: a pre-resolved name field on `record`
    /// wins, then an embedded object's display name, then a directory lookup
    /// of a bare id.
    pub fn resolve(&self, record: &Value, name_key: &str, ref_key: &str) -> Option<String> {
        if let Some(name) = first_str(record, &[name_key]) {
            return Some(name.to_string());
        }
        match record.get(ref_key)? {
            obj @ Value::Object(_) => display_name(obj)
                .map(str::to_string)
                .or_else(|| {
                    first_str(obj, &["uid", "_id", "id"])
                        .and_then(|id| self.name_of(id))
                        .map(str::to_string)
                }),
            Value::String(id) => self.name_of(id).map(str::to_string),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directory() -> MemberDirectory {
        MemberDirectory::from_values(&[
            json!({"uid": "u1", "display_name": "Alice"}),
            json!({"uid": "u2", "name": "bob"}),
            json!({"display_name": "no id"}),
        ])
    }

    #[test]
    fn from_values_skips_incomplete_entries() {
        let dir = directory();
        assert_eq!(dir.name_of("u1"), Some("Alice"));
        assert_eq!(dir.name_of("u2"), Some("bob"));
        assert_eq!(dir.name_of("no id"), None);
    }

    #[test]
    fn resolve_prefers_pre_resolved_name() {
        let dir = directory();
        let rec = json!({"assignee_name": "Carol", "assignee": "u1"});
        assert_eq!(
            dir.resolve(&rec, "assignee_name", "assignee").as_deref(),
            Some("Carol")
        );
    }

    #[test]
    fn resolve_embedded_object_then_id() {
        let dir = directory();
        let embedded = json!({"assignee": {"display_name": "Dana", "uid": "u1"}});
        assert_eq!(
            dir.resolve(&embedded, "assignee_name", "assignee").as_deref(),
            Some("Dana")
        );
        let by_obj_id = json!({"assignee": {"uid": "u1"}});
        assert_eq!(
            dir.resolve(&by_obj_id, "assignee_name", "assignee").as_deref(),
            Some("Alice")
        );
        let bare = json!({"assignee": "u2"});
        assert_eq!(
            dir.resolve(&bare, "assignee_name", "assignee").as_deref(),
            Some("bob")
        );
        let unknown = json!({"assignee": "u9"});
        assert_eq!(dir.resolve(&unknown, "assignee_name", "assignee"), None);
    }
}
