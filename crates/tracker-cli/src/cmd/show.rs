use super::require_api;
use crate::output::{print_json, print_markdown};
use crate::tools::ToolContext;
use anyhow::Context;
use tracker_core::client::fetch_work_item;
use tracker_core::present;

pub fn run(ctx: &ToolContext, id: &str, json: bool) -> anyhow::Result<()> {
    let api = require_api(ctx)?;
    let (raw, members) =
        fetch_work_item(api, id).with_context(|| format!("failed to fetch work item {id}"))?;
    let presentation = present(&raw, &ctx.config.format_context(members));

    if json {
        print_json(&presentation)
    } else {
        print_markdown(&presentation.markdown);
        Ok(())
    }
}
