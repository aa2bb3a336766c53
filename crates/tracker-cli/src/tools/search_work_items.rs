use super::{opt_str, ToolContext, TrackerTool};
use tracker_core::client::WorkItemQuery;
use tracker_core::listing::render_work_item_list;
use tracker_core::members::MemberDirectory;

pub struct SearchWorkItemsTool;

const MAX_LIMIT: u64 = 100;

impl TrackerTool for SearchWorkItemsTool {
    fn name(&self) -> &str {
        "tracker_search_work_items"
    }

    fn description(&self) -> &str {
        "Search work items by keyword and/or project"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "string",
                    "description": "Text to match against titles and identifiers"
                },
                "project": {
                    "type": "string",
                    "description": "Project identifier (defaults to the configured default_project)"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results (1-100)"
                }
            }
        })
    }

    fn call(&self, args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String> {
        let api = ctx.api()?;
        let limit = args["limit"]
            .as_u64()
            .map(|n| n.clamp(1, MAX_LIMIT) as u32)
            .unwrap_or(ctx.config.page_size.max(1));
        let query = WorkItemQuery {
            keywords: opt_str(&args, "keywords").map(str::to_string),
            project: opt_str(&args, "project")
                .map(str::to_string)
                .or_else(|| ctx.config.default_project.clone()),
            limit,
        };

        let items = api.search_work_items(&query).map_err(|e| e.to_string())?;
        let members = api.members().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to fetch members");
            MemberDirectory::new()
        });
        let markdown = render_work_item_list(&items, &ctx.config.format_context(members));

        Ok(serde_json::json!({
            "count": items.len(),
            "markdown": markdown,
        }))
    }
}
