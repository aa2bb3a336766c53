//! Block-tree rich text → markdown.
//!
//! Descriptions and comment bodies arrive as a tree of typed nodes:
//!
//! ```text
//! [{"type": "paragraph", "children": [{"text": "see "},
//!     {"type": "link", "url": "https://x", "children": [{"text": "docs"}]}]},
//!  {"type": "code", "language": "go", "content": "x:=1"}]
//! ```
//!
//! The tree is parsed into the closed [`Block`] / [`Inline`] sum types and
//! rendered by plain recursion. Parsing and rendering are total: unrecognized
//! kinds go through [`Fallback`], malformed nodes degrade to empty text.

use crate::html::sanitize_html;
use crate::raw::{array_field, field, first_str, str_field};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Node model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Code {
        language: Option<String>,
        content: String,
    },
    Image {
        url: Option<String>,
    },
    Blockquote(Vec<Block>),
    BulletedList(Vec<Block>),
    NumberedList(Vec<Block>),
    ListItem(Vec<Node>),
    Unknown(Fallback),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Link {
        url: Option<String>,
        children: Vec<Inline>,
    },
    Mention {
        display_name: Option<String>,
        text: Option<String>,
    },
    Image {
        url: Option<String>,
    },
    Unknown(Fallback),
}

/// A list-item child may be either a nested block or an inline span.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Inline(Inline),
}

/// Catch-all for kinds outside the supported set. Children are always
/// treated as inline spans, even when the node sits in block position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fallback {
    pub kind: Option<String>,
    pub children: Vec<Inline>,
    pub text: Option<String>,
}

const BLOCK_KINDS: &[&str] = &[
    "paragraph",
    "code",
    "image",
    "blockquote",
    "block-quote",
    "bulleted-list",
    "numbered-list",
    "list-item",
];

fn kind_of(v: &Value) -> Option<&str> {
    str_field(v, "type")
}

/// Raw string field, kept verbatim (blank strings included).
fn raw_str(v: &Value, key: &str) -> Option<String> {
    field(v, key)?.as_str().map(str::to_string)
}

fn url_of(v: &Value) -> Option<String> {
    first_str(v, &["url", "src"]).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Block {
    pub fn from_value(v: &Value) -> Self {
        if let Value::String(s) = v {
            return Block::Paragraph(vec![Inline::Text(s.clone())]);
        }
        match kind_of(v) {
            Some("paragraph") => Block::Paragraph(Inline::list(array_field(v, "children"))),
            Some("code") => Block::Code {
                language: first_str(v, &["language", "lang"]).map(str::to_string),
                content: raw_str(v, "content").unwrap_or_default(),
            },
            Some("image") => Block::Image { url: url_of(v) },
            Some("blockquote") | Some("block-quote") => {
                Block::Blockquote(Block::list(array_field(v, "children")))
            }
            Some("bulleted-list") => Block::BulletedList(Block::list(array_field(v, "children"))),
            Some("numbered-list") => Block::NumberedList(Block::list(array_field(v, "children"))),
            Some("list-item") => Block::ListItem(
                array_field(v, "children")
                    .iter()
                    .map(Node::from_value)
                    .collect(),
            ),
            _ => Block::Unknown(Fallback::from_value(v)),
        }
    }

    pub fn list(values: &[Value]) -> Vec<Block> {
        values.iter().map(Block::from_value).collect()
    }
}

impl Inline {
    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::String(s) => return Inline::Text(s.clone()),
            Value::Object(_) => {}
            _ => return Inline::Text(String::new()),
        }
        match kind_of(v) {
            None => Inline::Text(raw_str(v, "text").unwrap_or_default()),
            Some("link") => Inline::Link {
                url: first_str(v, &["url", "href"]).map(str::to_string),
                children: Inline::list(array_field(v, "children")),
            },
            Some("mention") => Inline::Mention {
                display_name: first_str(v, &["display_name", "name"])
                    .or_else(|| {
                        field(v, "data").and_then(|d| first_str(d, &["display_name", "name"]))
                    })
                    .map(str::to_string),
                text: str_field(v, "text").map(str::to_string),
            },
            Some("image") => Inline::Image { url: url_of(v) },
            Some(_) => Inline::Unknown(Fallback::from_value(v)),
        }
    }

    pub fn list(values: &[Value]) -> Vec<Inline> {
        values.iter().map(Inline::from_value).collect()
    }
}

impl Node {
    pub fn from_value(v: &Value) -> Self {
        match kind_of(v) {
            Some(kind) if BLOCK_KINDS.contains(&kind) => Node::Block(Block::from_value(v)),
            _ => Node::Inline(Inline::from_value(v)),
        }
    }
}

impl Fallback {
    pub fn from_value(v: &Value) -> Self {
        Fallback {
            kind: kind_of(v).map(str::to_string),
            children: Inline::list(array_field(v, "children")),
            text: raw_str(v, "text").or_else(|| raw_str(v, "content")),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn image_marker(url: Option<&str>) -> String {
    format!("[image]({})", url.unwrap_or(""))
}

fn concat_inline(spans: &[Inline]) -> String {
    spans.iter().map(Inline::render).collect()
}

impl Block {
    pub fn render(&self) -> String {
        match self {
            Block::Paragraph(children) => concat_inline(children),
            Block::Code { language, content } => {
                format!("```{}\n{}\n```", language.as_deref().unwrap_or(""), content)
            }
            Block::Image { url } => image_marker(url.as_deref()),
            Block::Blockquote(children) => {
                let inner = children
                    .iter()
                    .map(Block::render)
                    .collect::<Vec<_>>()
                    .join("\n");
                inner
                    .split('\n')
                    .map(|line| format!("> {line}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Block::BulletedList(items) => items
                .iter()
                .map(|item| format!("- {}", item.render()))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::NumberedList(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {}", i + 1, item.render()))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::ListItem(children) => children.iter().map(Node::render).collect(),
            Block::Unknown(fallback) => fallback.render(),
        }
    }
}

impl Inline {
    pub fn render(&self) -> String {
        match self {
            Inline::Text(text) => text.clone(),
            Inline::Link { url, children } => {
                let url = url.as_deref().unwrap_or("");
                let label = if children.is_empty() {
                    url.to_string()
                } else {
                    concat_inline(children)
                };
                format!("[{label}]({url})")
            }
            Inline::Mention { display_name, text } => {
                let name = display_name
                    .as_deref()
                    .or(text.as_deref())
                    .unwrap_or("user");
                format!("@{name}")
            }
            Inline::Image { url } => image_marker(url.as_deref()),
            Inline::Unknown(fallback) => fallback.render(),
        }
    }
}

impl Node {
    pub fn render(&self) -> String {
        match self {
            Node::Block(b) => b.render(),
            Node::Inline(i) => i.render(),
        }
    }
}

impl Fallback {
    pub fn render(&self) -> String {
        if !self.children.is_empty() {
            concat_inline(&self.children)
        } else {
            self.text.clone().unwrap_or_default()
        }
    }
}

// ---------------------------------------------------------------------------
// Document entry points
// ---------------------------------------------------------------------------

/// Render a top-level block list. Blocks are separated by a single newline.
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::render)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end_matches('\n')
        .to_string()
}

/// Render any rich-text payload the tracker may send: a block array, a single
/// block object, a JSON-encoded block tree inside a string, or a legacy HTML
/// fragment.
pub fn render_rich_text(v: &Value) -> String {
    match v {
        Value::Array(items) => render_blocks(&Block::list(items)),
        Value::Object(_) => render_blocks(&[Block::from_value(v)]),
        Value::String(s) => render_text_payload(s),
        _ => String::new(),
    }
}

fn render_text_payload(s: &str) -> String {
    let trimmed = s.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(tree) = serde_json::from_str::<Value>(trimmed) {
            if is_block_tree(&tree) {
                return render_rich_text(&tree);
            }
        }
    }
    sanitize_html(s)
}

/// JSON that merely parses (`[1, 2]`, `{"k": 1}`) is still plain text.
fn is_block_tree(v: &Value) -> bool {
    let is_node = |n: &Value| {
        n.as_object()
            .is_some_and(|o| o.contains_key("type") || o.contains_key("children") || o.contains_key("text"))
    };
    match v {
        Value::Array(items) => !items.is_empty() && items.iter().all(is_node),
        other => is_node(other),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
