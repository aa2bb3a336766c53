use serde_json::Value;
use tracker_core::client::TrackerApi;
use tracker_core::config::Config;
use tracker_core::TrackerError;

pub mod get_work_item;
pub mod list_projects;
pub mod list_releases;
pub mod search_work_items;

/// Shared state for one tool-server session.
pub struct ToolContext {
    pub config: Config,
    /// `None` when no session cookie is configured; tools then fail with a
    /// "not authenticated" result instead of the server refusing to start.
    pub api: Option<Box<dyn TrackerApi>>,
}

impl ToolContext {
    pub fn api(&self) -> Result<&dyn TrackerApi, String> {
        self.api
            .as_deref()
            .ok_or_else(|| TrackerError::NotAuthenticated.to_string())
    }
}

pub trait TrackerTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> Value;
    fn call(&self, args: Value, ctx: &ToolContext) -> Result<Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn TrackerTool>> {
    vec![
        Box::new(get_work_item::GetWorkItemTool),
        Box::new(search_work_items::SearchWorkItemsTool),
        Box::new(list_projects::ListProjectsTool),
        Box::new(list_releases::ListReleasesTool),
    ]
}

/// Optional string argument; blank strings count as absent.
pub(crate) fn opt_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args[key].as_str().map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    opt_str(args, key).ok_or_else(|| format!("missing required argument: {key}"))
}

// ---------------------------------------------------------------------------
// In-memory tracker for tool tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fake {
    use super::ToolContext;
    use serde_json::{json, Value};
    use tracker_core::client::{TrackerApi, WorkItemQuery};
    use tracker_core::config::Config;
    use tracker_core::members::MemberDirectory;
    use tracker_core::{RawRecord, Result, TrackerError};

    pub struct FakeApi;

    fn bug() -> Value {
        json!({
            "whole_identifier": "LFY-42",
            "title": "crash on save",
            "type": 5,
            "state_type": 1,
            "assignee": "u1",
            "description": [{"type": "paragraph", "children": [{"text": "boom"}]}]
        })
    }

    impl TrackerApi for FakeApi {
        fn work_item(&self, id: &str) -> Result<RawRecord> {
            match id {
                "LFY-42" => Ok(RawRecord::new(bug())),
                "LFY-7" => Ok(RawRecord::new(json!({
                    "whole_identifier": "LFY-7", "title": "export csv", "type": 2
                }))),
                _ => Err(TrackerError::WorkItemNotFound(id.to_string())),
            }
        }

        fn work_item_comments(&self, id: &str) -> Result<Vec<Value>> {
            Ok(match id {
                "LFY-42" => vec![json!({"created_by": "u1", "content": "seen on 1.2"})],
                _ => Vec::new(),
            })
        }

        fn search_work_items(&self, query: &WorkItemQuery) -> Result<Vec<RawRecord>> {
            let all = vec![RawRecord::new(bug())];
            Ok(all
                .into_iter()
                .filter(|r| match &query.keywords {
                    Some(k) => r.str("title").unwrap_or_default().contains(k.as_str()),
                    None => true,
                })
                .take(query.limit as usize)
                .collect())
        }

        fn projects(&self) -> Result<Vec<RawRecord>> {
            Ok(vec![RawRecord::new(json!({"identifier": "LFY", "name": "Lifecycle"}))])
        }

        fn releases(&self, project: &str) -> Result<Vec<RawRecord>> {
            match project {
                "LFY" => Ok(vec![RawRecord::new(json!({"name": "v1.0", "state": 2}))]),
                _ => Err(TrackerError::ProjectNotFound(project.to_string())),
            }
        }

        fn members(&self) -> Result<MemberDirectory> {
            let mut m = MemberDirectory::new();
            m.insert("u1", "Alice");
            Ok(m)
        }
    }

    /// Same items, but the member directory endpoint fails.
    pub struct MembersDown;

    impl TrackerApi for MembersDown {
        fn work_item(&self, id: &str) -> Result<RawRecord> {
            FakeApi.work_item(id)
        }

        fn work_item_comments(&self, id: &str) -> Result<Vec<Value>> {
            FakeApi.work_item_comments(id)
        }

        fn search_work_items(&self, query: &WorkItemQuery) -> Result<Vec<RawRecord>> {
            FakeApi.search_work_items(query)
        }

        fn projects(&self) -> Result<Vec<RawRecord>> {
            FakeApi.projects()
        }

        fn releases(&self, project: &str) -> Result<Vec<RawRecord>> {
            FakeApi.releases(project)
        }

        fn members(&self) -> Result<MemberDirectory> {
            Err(TrackerError::Api {
                status: 500,
                message: "directory unavailable".to_string(),
            })
        }
    }

    pub fn members_down() -> ToolContext {
        ToolContext {
            api: Some(Box::new(MembersDown)),
            ..ctx()
        }
    }

    pub fn ctx() -> ToolContext {
        ToolContext {
            config: Config {
                utc_offset_minutes: Some(0),
                ..Config::default()
            },
            api: Some(Box::new(FakeApi)),
        }
    }

    pub fn unauthenticated() -> ToolContext {
        ToolContext {
            config: Config::default(),
            api: None,
        }
    }
}
