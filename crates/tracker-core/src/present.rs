use crate::directive::{build_directives, protocol_for, Directives};
use crate::format::FormatContext;
use crate::raw::RawRecord;
use crate::record::{format_record, render_markdown, ProjectedRecord};
use serde::Serialize;

/// Everything the tool layer needs to answer a work-item request.
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    pub markdown: String,
    pub record: ProjectedRecord,
    pub directives: Directives,
}

pub fn present(raw: &RawRecord, ctx: &FormatContext) -> Presentation {
    let record = format_record(raw, ctx);
    let directives = build_directives(&record);
    let markdown = compose_markdown(&record);
    Presentation {
        markdown,
        record,
        directives,
    }
}

/// Record markdown, preceded by the classification's static protocol when
/// one applies.
pub fn compose_markdown(record: &ProjectedRecord) -> String {
    let body = render_markdown(record);
    match protocol_for(record.kind()) {
        Some(protocol) => format!("{}\n\n---\n\n{body}", protocol.trim_end()),
        None => body,
    }
}
