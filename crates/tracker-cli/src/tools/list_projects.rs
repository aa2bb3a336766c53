use super::{ToolContext, TrackerTool};
use tracker_core::listing::render_projects;

pub struct ListProjectsTool;

impl TrackerTool for ListProjectsTool {
    fn name(&self) -> &str {
        "tracker_list_projects"
    }

    fn description(&self) -> &str {
        "List the projects visible to the current session"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    fn call(&self, _args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String> {
        let projects = ctx.api()?.projects().map_err(|e| e.to_string())?;
        Ok(serde_json::json!({
            "count": projects.len(),
            "markdown": render_projects(&projects),
        }))
    }
}
