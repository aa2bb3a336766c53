use super::require_api;
use crate::output::{print_json, print_markdown};
use crate::tools::ToolContext;
use anyhow::Context;
use tracker_core::client::WorkItemQuery;
use tracker_core::format::{assignee_name, identifier, state_name, type_name};
use tracker_core::listing::render_work_item_list;

pub fn run(
    ctx: &ToolContext,
    keywords: Option<String>,
    project: Option<String>,
    limit: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let api = require_api(ctx)?;
    let query = WorkItemQuery {
        keywords,
        project: project.or_else(|| ctx.config.default_project.clone()),
        limit: limit.unwrap_or(ctx.config.page_size).clamp(1, 100),
    };

    let items = api
        .search_work_items(&query)
        .context("failed to search work items")?;
    let members = api.members().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch members");
        Default::default()
    });

    if json {
        let rows: Vec<serde_json::Value> = items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "identifier": identifier(item),
                    "title": item.str("title").unwrap_or_default(),
                    "type": type_name(item),
                    "state": state_name(item),
                    "assignee": assignee_name(item, &members),
                })
            })
            .collect();
        print_json(&rows)
    } else {
        print_markdown(&render_work_item_list(&items, &ctx.config.format_context(members)));
        Ok(())
    }
}
