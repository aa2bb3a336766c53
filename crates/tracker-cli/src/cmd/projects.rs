use super::require_api;
use crate::output::{print_json, print_markdown};
use crate::tools::ToolContext;
use anyhow::Context;
use tracker_core::listing::{render_projects, render_releases};
use tracker_core::members::MemberDirectory;
use tracker_core::RawRecord;

// ---------------------------------------------------------------------------
// projects
// ---------------------------------------------------------------------------

pub fn run_projects(ctx: &ToolContext, json: bool) -> anyhow::Result<()> {
    let projects = require_api(ctx)?
        .projects()
        .context("failed to list projects")?;

    if json {
        print_json(&projects)
    } else {
        print_markdown(&render_projects(&projects));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// releases
// ---------------------------------------------------------------------------

pub fn run_releases(ctx: &ToolContext, project: Option<String>, json: bool) -> anyhow::Result<()> {
    let project = project
        .or_else(|| ctx.config.default_project.clone())
        .ok_or_else(|| anyhow::anyhow!("no project given and no default_project configured"))?;

    let releases: Vec<RawRecord> = require_api(ctx)?
        .releases(&project)
        .with_context(|| format!("failed to list releases of {project}"))?;

    if json {
        print_json(&releases)
    } else {
        let fmt = ctx.config.format_context(MemberDirectory::new());
        print_markdown(&render_releases(&releases, &fmt));
        Ok(())
    }
}
