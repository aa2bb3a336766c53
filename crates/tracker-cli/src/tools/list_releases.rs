use super::{opt_str, ToolContext, TrackerTool};
use tracker_core::listing::render_releases;
use tracker_core::members::MemberDirectory;

pub struct ListReleasesTool;

impl TrackerTool for ListReleasesTool {
    fn name(&self) -> &str {
        "tracker_list_releases"
    }

    fn description(&self) -> &str {
        "List the releases of a project with their state and date range"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "project": {
                    "type": "string",
                    "description": "Project identifier (defaults to the configured default_project)"
                }
            }
        })
    }

    fn call(&self, args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String> {
        let project = opt_str(&args, "project")
            .map(str::to_string)
            .or_else(|| ctx.config.default_project.clone())
            .ok_or_else(|| "missing required argument: project".to_string())?;

        let releases = ctx.api()?.releases(&project).map_err(|e| e.to_string())?;
        let fmt = ctx.config.format_context(MemberDirectory::new());
        Ok(serde_json::json!({
            "project": project,
            "count": releases.len(),
            "markdown": render_releases(&releases, &fmt),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fake;

    #[test]
    fn lists_releases() {
        let result = ListReleasesTool
            .call(serde_json::json!({"project": "LFY"}), &fake::ctx())
            .unwrap();
        assert_eq!(result["project"], "LFY");
        assert!(result["markdown"]
            .as_str()
            .unwrap()
            .contains("- **v1.0** · in progress · — → —"));
    }

    #[test]
    fn falls_back_to_default_project() {
        let mut ctx = fake::ctx();
        ctx.config.default_project = Some("LFY".to_string());
        let result = ListReleasesTool.call(serde_json::json!({}), &ctx).unwrap();
        assert_eq!(result["count"], 1);
    }

    #[test]
    fn missing_project_errors() {
        let err = ListReleasesTool
            .call(serde_json::json!({}), &fake::ctx())
            .unwrap_err();
        assert!(err.contains("missing required argument: project"));
    }

    #[test]
    fn unknown_project_errors() {
        let err = ListReleasesTool
            .call(serde_json::json!({"project": "NOPE"}), &fake::ctx())
            .unwrap_err();
        assert!(err.contains("project not found: NOPE"));
    }
}
