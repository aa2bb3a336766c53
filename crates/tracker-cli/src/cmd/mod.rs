pub mod auth;
pub mod config;
pub mod mcp;
pub mod projects;
pub mod search;
pub mod show;

use crate::tools::ToolContext;
use tracker_core::client::TrackerApi;

/// One-shot commands need a session up front.
pub(crate) fn require_api(ctx: &ToolContext) -> anyhow::Result<&dyn TrackerApi> {
    ctx.api().map_err(anyhow::Error::msg)
}
