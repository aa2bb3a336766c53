use super::{required_str, ToolContext, TrackerTool};
use tracker_core::client::fetch_work_item;
use tracker_core::present;

pub struct GetWorkItemTool;

impl TrackerTool for GetWorkItemTool {
    fn name(&self) -> &str {
        "tracker_get_work_item"
    }

    fn description(&self) -> &str {
        "Get a work item (bug, requirement, task…) as markdown, with the workflow \
         directives the agent must follow while working on it"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Work item identifier, e.g. LFY-42"
                }
            },
            "required": ["id"]
        })
    }

    fn call(&self, args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String> {
        let id = required_str(&args, "id")?;
        let api = ctx.api()?;

        let (raw, members) = fetch_work_item(api, id).map_err(|e| e.to_string())?;
        let presentation = present(&raw, &ctx.config.format_context(members));
        tracing::info!(
            id,
            kind = %presentation.record.kind(),
            comments = presentation.record.comments.len(),
            "presented work item"
        );

        Ok(serde_json::json!({
            "required_first_output": presentation.directives.required_first_output.clone(),
            "directives": presentation.directives,
            "markdown": presentation.markdown,
            "record": presentation.record,
        }))
    }
}
