//! Compact markdown listings for search results, projects and releases.

use crate::format::{assignee_name, identifier, state_name, type_name, FormatContext};
use crate::html::sanitize_html;
use crate::raw::{display_name, RawRecord};
use crate::types::{release_state_label, UNKNOWN};

const NO_DATE: &str = "—";

pub fn render_work_item_list(items: &[RawRecord], ctx: &FormatContext) -> String {
    if items.is_empty() {
        return "No work items found.\n".to_string();
    }
    let mut doc = format!("{} work item(s)\n\n", items.len());
    for item in items {
        doc.push_str(&format!(
            "- **{}** {} · {} · {} · {}\n",
            identifier(item),
            item.str("title").unwrap_or_default().trim(),
            type_name(item),
            state_name(item),
            assignee_name(item, &ctx.members),
        ));
    }
    doc
}

pub fn render_projects(projects: &[RawRecord]) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }
    let mut doc = format!("{} project(s)\n\n", projects.len());
    for p in projects {
        let key = p.str("identifier").unwrap_or(UNKNOWN);
        let name = p.str("name").unwrap_or_default();
        doc.push_str(&format!("- **{key}** {name}"));
        // First line of the description only.
        let summary = p.str("description").map(sanitize_html).unwrap_or_default();
        if let Some(first) = summary.lines().find(|l| !l.trim().is_empty()) {
            doc.push_str(&format!(": {}", first.trim()));
        }
        doc.push('\n');
    }
    doc
}

pub fn render_releases(releases: &[RawRecord], ctx: &FormatContext) -> String {
    if releases.is_empty() {
        return "No releases found.\n".to_string();
    }
    let mut doc = format!("{} release(s)\n\n", releases.len());
    for r in releases {
        let state = r
            .object("state")
            .and_then(display_name)
            .map(str::to_string)
            .or_else(|| r.i64("state").map(|c| release_state_label(c).to_string()))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let date = |key: &str| {
            let s = ctx.format_time(r.i64(key));
            if s.is_empty() {
                NO_DATE.to_string()
            } else {
                s
            }
        };
        doc.push_str(&format!(
            "- **{}** · {} · {} → {}\n",
            r.str("name").unwrap_or(UNKNOWN),
            state,
            date("start_at"),
            date("end_at"),
        ));
    }
    doc
}
