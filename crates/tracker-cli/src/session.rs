use crate::tools::ToolContext;
use anyhow::Context;
use std::path::Path;
use tracker_core::client::{HttpTrackerClient, TrackerApi};
use tracker_core::config::Config;
use tracker_core::credentials::resolve_cookie;

/// Effective config: the file under `home` with command-line overrides on top.
pub fn load_config(home: &Path, base_url: Option<String>) -> anyhow::Result<Config> {
    let config = Config::load(home)
        .with_context(|| format!("failed to load config from {}", home.display()))?;
    Ok(config.with_base_url(base_url))
}

/// Build the context shared by tools and one-shot commands.
///
/// A missing cookie is not an error here; calls that need the tracker
/// report "not authenticated" themselves.
pub fn open(home: &Path, base_url: Option<String>, cookie: Option<&str>) -> anyhow::Result<ToolContext> {
    let config = load_config(home, base_url)?;
    let cookie = resolve_cookie(cookie, home).context("failed to read credentials")?;

    let api = match cookie {
        Some(cookie) => {
            let client = HttpTrackerClient::new(&config, cookie).context("failed to build tracker client")?;
            Some(Box::new(client) as Box<dyn TrackerApi>)
        }
        None => {
            tracing::info!("no session cookie configured");
            None
        }
    };

    Ok(ToolContext { config, api })
}
