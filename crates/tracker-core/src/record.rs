//! Projection of a raw work item into a display-ready record, and its
//! markdown serialization.

use crate::format::{format_fields, FieldEntry, FormatContext, RecordFields};
use crate::raw::{field, first_str, int_field, RawRecord};
use crate::richtext::render_rich_text;
use crate::types::{WorkItemKind, UNKNOWN};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// ProjectedRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub author: String,
    pub time: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedRecord {
    #[serde(flatten)]
    pub fields: RecordFields,
    pub description: String,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<CommentView>,
}

impl ProjectedRecord {
    pub fn identifier(&self) -> &str {
        &self.fields.identifier
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn kind(&self) -> WorkItemKind {
        self.fields.kind
    }

    pub fn entries(&self) -> Vec<FieldEntry> {
        self.fields.entries()
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

pub fn format_record(raw: &RawRecord, ctx: &FormatContext) -> ProjectedRecord {
    ProjectedRecord {
        fields: format_fields(raw, ctx),
        description: raw
            .get("description")
            .map(render_rich_text)
            .unwrap_or_default(),
        attachments: raw.array("attachments").iter().map(attachment).collect(),
        comments: raw
            .array("comments")
            .iter()
            .filter(|c| c.is_object())
            .map(|c| comment(c, ctx))
            .collect(),
    }
}

fn attachment(v: &Value) -> Attachment {
    Attachment {
        name: first_str(v, &["title", "name"])
            .unwrap_or("attachment")
            .to_string(),
        url: first_str(v, &["url", "download_url"]).map(str::to_string),
    }
}

fn comment(v: &Value, ctx: &FormatContext) -> CommentView {
    let author = ctx
        .members
        .resolve(v, "created_by_name", "created_by")
        .or_else(|| ctx.members.resolve(v, "author_name", "author"))
        .unwrap_or_else(|| UNKNOWN.to_string());
    CommentView {
        author,
        time: ctx.format_time(int_field(v, "created_at")),
        content: field(v, "content")
            .map(render_rich_text)
            .unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

pub fn render_markdown(rec: &ProjectedRecord) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("## {} - {}\n\n", rec.identifier(), rec.title()));
    for entry in rec.entries() {
        doc.push_str(&format!("- **{}:** {}\n", entry.label, entry.value));
    }

    if !rec.description.trim().is_empty() {
        doc.push_str("\n### description\n\n");
        doc.push_str(rec.description.trim_end());
        doc.push('\n');
    }

    if !rec.attachments.is_empty() {
        doc.push_str("\n### attachments\n\n");
        for a in &rec.attachments {
            match &a.url {
                Some(url) => doc.push_str(&format!("- [{}]({url})\n", a.name)),
                None => doc.push_str(&format!("- {}\n", a.name)),
            }
        }
    }

    if !rec.comments.is_empty() {
        doc.push_str(&format!("\n### comments ({})\n", rec.comments.len()));
        for (i, c) in rec.comments.iter().enumerate() {
            doc.push('\n');
            if c.time.is_empty() {
                doc.push_str(&format!("{}. **{}**\n", i + 1, c.author));
            } else {
                doc.push_str(&format!("{}. **{}** ({})\n", i + 1, c.author, c.time));
            }
            push_quoted(&mut doc, &c.content);
        }
    }

    doc
}

/// Indented quote lines under a numbered comment header.
fn push_quoted(doc: &mut String, content: &str) {
    let content = content.trim_end();
    if content.is_empty() {
        doc.push_str("   >\n");
        return;
    }
    for line in content.lines() {
        if line.is_empty() {
            doc.push_str("   >\n");
        } else {
            doc.push_str(&format!("   > {line}\n"));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::MemberDirectory;
    use serde_json::json;

    fn ctx() -> FormatContext {
        let mut members = MemberDirectory::new();
        members.insert("u1", "Alice");
        members.insert("u2", "Bob");
        FormatContext::new(members).with_utc_offset_minutes(Some(0))
    }

    fn sample() -> RawRecord {
        RawRecord::new(json!({
            "whole_identifier": "LFY-42",
            "title": "crash on save",
            "type": 5,
            "state": {"display_name": "Open"},
            "priority": "5cb9466afda1ce4ca0090002",
            "assignee": "u1",
            "created_by": "u2",
            "created_at": 1_700_000_000,
            "description": [
                {"type": "paragraph", "children": [{"text": "Saving a file crashes."}]},
                {"type": "code", "language": "text", "content": "panic at save.rs:10"}
            ],
            "attachments": [
                {"title": "log.txt", "url": "https://cdn/log.txt"},
                {"name": "trace.json", "download_url": "https://cdn/trace.json"},
                {}
            ],
            "comments": [
                {"created_by": "u2", "created_at": 1_700_000_060_000_i64,
                 "content": [{"type": "paragraph", "children": [{"text": "repro\nconfirmed"}]}]},
                {"author_name": "Carol", "content": "<p>+1</p>"}
            ]
        }))
    }

    #[test]
    fn projection_collects_everything() {
        let rec = format_record(&sample(), &ctx());
        assert_eq!(rec.identifier(), "LFY-42");
        assert_eq!(rec.kind(), WorkItemKind::Bug);
        assert_eq!(rec.fields.priority, "high");
        assert_eq!(rec.fields.assignee, "Alice");
        assert_eq!(rec.fields.creator, "Bob");
        assert_eq!(rec.attachments.len(), 3);
        assert_eq!(rec.attachments[1].url.as_deref(), Some("https://cdn/trace.json"));
        assert_eq!(rec.attachments[2].name, "attachment");
        assert_eq!(rec.attachments[2].url, None);
        assert_eq!(rec.comments[0].author, "Bob");
        assert_eq!(rec.comments[0].time, "2023-11-14 22:14");
        assert_eq!(rec.comments[1].author, "Carol");
        assert_eq!(rec.comments[1].content, "+1");
    }

    #[test]
    fn markdown_section_order() {
        let md = render_markdown(&format_record(&sample(), &ctx()));
        assert!(md.starts_with("## LFY-42 - crash on save\n\n- **Type:** bug\n"));

        let order = [
            "- **Type:** bug",
            "- **State:** Open",
            "- **Priority:** high",
            "- **Assignee:** Alice",
            "- **Creator:** Bob",
            "- **Created:** 2023-11-14 22:13",
            "### description",
            "```text\npanic at save.rs:10\n```",
            "### attachments",
            "- [log.txt](https://cdn/log.txt)",
            "- attachment\n",
            "### comments (2)",
            "1. **Bob** (2023-11-14 22:14)\n   > repro\n   > confirmed\n",
            "\n2. **Carol**\n   > +1\n",
        ];
        let mut cursor = 0;
        for needle in order {
            let pos = md[cursor..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing or out of order: {needle:?}\n{md}"));
            cursor += pos + needle.len();
        }
        assert!(!md.contains("**Updated:**"));
    }

    #[test]
    fn empty_record_has_no_optional_sections() {
        let rec = format_record(
            &RawRecord::new(json!({"identifier": 3, "title": "quiet"})),
            &ctx(),
        );
        let md = render_markdown(&rec);
        assert!(md.starts_with("## #3 - quiet\n"));
        assert!(!md.contains("### description"));
        assert!(!md.contains("attachments"));
        assert!(!md.contains("comments"));
    }

    #[test]
    fn whitespace_only_description_is_omitted() {
        let rec = format_record(
            &RawRecord::new(json!({"description": "<p> </p><br>"})),
            &ctx(),
        );
        assert!(!render_markdown(&rec).contains("### description"));
    }

    #[test]
    fn empty_comment_body_still_gets_a_quote_line() {
        let rec = format_record(
            &RawRecord::new(json!({"comments": [{"author": {"display_name": "Eve"}}]})),
            &ctx(),
        );
        let md = render_markdown(&rec);
        assert!(md.contains("### comments (1)\n\n1. **Eve**\n   >\n"));
    }

    #[test]
    fn projected_record_serializes_flat() {
        let rec = format_record(&sample(), &ctx());
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["identifier"], "LFY-42");
        assert_eq!(v["kind"], "bug");
        assert_eq!(v["comments"].as_array().unwrap().len(), 2);
    }
}
